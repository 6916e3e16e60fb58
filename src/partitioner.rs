use {
    crate::RingPosition,
    std::hash::{BuildHasher, Hash, Hasher},
    xxhash_rust::xxh3::Xxh3Builder,
};

/// A keyspace partitioning strategy.
///
/// Partitioner is responsible for mapping hashable objects to positions on the
/// ring i.e. it knows how to partition the keyspace. Both keys and virtual
/// nodes are positioned by the same partitioner, so it must be deterministic
/// and identical for every process participating in the same logical ring.
///
/// Positions are computed from the `Hash` impl of keys and nodes. Strings and
/// byte slices hash the same on every platform; integers are fed in native
/// byte order, so rings shared between little- and big-endian hosts should
/// use string (or byte) identifiers.
pub trait Partitioner {
    /// Returns ring position for a given key.
    fn position<K: Hash + ?Sized>(&self, key: &K) -> RingPosition;

    /// Returns ring position of the `vnode`-th virtual node of `node`.
    ///
    /// Position is a pure function of `(node, vnode)`, which is what allows
    /// the ring to locate placements for removal by recomputing them.
    fn vnode_position<N: Hash + ?Sized>(&self, node: &N, vnode: u32) -> RingPosition {
        self.position(&(node, vnode))
    }
}

/// Seed used by the default partitioner.
///
/// Any seed works, as long as every participant uses the same one (XXH3 uses
/// `0` by default).
pub const DEFAULT_SEED: u64 = 12345;

/// A partitioner that uses a XXH3 hash function to partition data.
#[derive(Clone)]
pub struct Xxh3Partitioner {
    hash_builder: Xxh3Builder,
    seed: u64,
}

impl Default for Xxh3Partitioner {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl Xxh3Partitioner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a partitioner hashing with the given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            hash_builder: Xxh3Builder::new(),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn hash<K: Hash + ?Sized>(&self, key: &K, seed: u64) -> RingPosition {
        let mut hasher = self.hash_builder.with_seed(seed).build_hasher();
        key.hash(&mut hasher);
        hasher.finish()
    }
}

impl Partitioner for Xxh3Partitioner {
    fn position<K: Hash + ?Sized>(&self, key: &K) -> RingPosition {
        self.hash(key, self.seed)
    }

    /// Hashes the node followed by the little-endian vnode index, so the
    /// index contributes the same bytes on every platform.
    fn vnode_position<N: Hash + ?Sized>(&self, node: &N, vnode: u32) -> RingPosition {
        let mut hasher = self.hash_builder.with_seed(self.seed).build_hasher();
        node.hash(&mut hasher);
        hasher.write(&vnode.to_le_bytes());
        hasher.finish()
    }
}

/// Default partitioner.
pub type DefaultPartitioner = Xxh3Partitioner;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vnode_positions_differ_per_index() {
        let partitioner = Xxh3Partitioner::new();
        let positions = (0..100)
            .map(|i| partitioner.vnode_position("n1", i))
            .collect::<std::collections::BTreeSet<_>>();
        assert_eq!(positions.len(), 100);
    }

    #[test]
    fn vnode_position_is_stable() {
        let a = Xxh3Partitioner::new();
        let b = Xxh3Partitioner::new();
        for i in 0..10 {
            assert_eq!(a.vnode_position("node", i), b.vnode_position("node", i));
        }
        assert_ne!(a.vnode_position("node", 0), a.vnode_position("edon", 0));
    }

    #[test]
    fn seed_changes_positions() {
        let a = Xxh3Partitioner::with_seed(1);
        let b = Xxh3Partitioner::with_seed(2);
        assert_ne!(a.position("key"), b.position("key"));
        assert_eq!(a.seed(), 1);
    }
}
