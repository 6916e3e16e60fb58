#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

mod config;
mod error;
mod iter;
mod partitioner;
mod range;
mod snapshot;
mod token;

use {
    crate::{
        snapshot::Snapshot,
        RingDirection::{Clockwise, CounterClockwise},
    },
    parking_lot::{Mutex, RwLock},
    std::{
        collections::{BTreeMap, BTreeSet},
        fmt::Debug,
        hash::Hash,
        sync::Arc,
    },
    tracing::{debug, trace},
};
pub use {
    config::{RingConfig, DEFAULT_VIRTUAL_NODE_COUNT},
    error::RingError,
    partitioner::*,
    range::*,
    token::RingToken,
};

/// Node that serves as a destination for data.
///
/// Node controls one or more intervals of the key space, one per virtual
/// node. Keys which fall into such an interval are routed to the node.
pub trait RingNode: Hash + Ord + Clone + Debug + Send + Sync + 'static {}

impl<T> RingNode for T where T: Hash + Ord + Clone + Debug + Send + Sync + 'static {}

/// Position on the ring.
pub type RingPosition = u64;

/// Defines the direction in which the ring is traversed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingDirection {
    Clockwise,
    CounterClockwise,
}

/// Consistent hash ring with virtual nodes.
///
/// Every node is placed on the ring `virtual_node_count` times. A key is owned
/// by the node whose placement comes first at or after the key's position,
/// wrapping around past the largest position.
///
/// The ring is shared by reference: lookups work on an immutable snapshot of
/// the sorted placements and never wait for a membership change, which
/// builds the next snapshot aside and publishes it in one step.
pub struct HashRing<N: RingNode, P = DefaultPartitioner> {
    /// Partitioner used to compute ring positions.
    partitioner: P,

    /// The current placements (sorted in ascending order).
    snapshot: RwLock<Arc<Snapshot<N>>>,

    /// Serializes membership changes.
    writer: Mutex<()>,

    /// Number of placements per node.
    virtual_node_count: u32,
}

impl<N: RingNode> Default for HashRing<N> {
    fn default() -> Self {
        Self::with_partitioner(DefaultPartitioner::new(), DEFAULT_VIRTUAL_NODE_COUNT)
    }
}

impl<N: RingNode> HashRing<N> {
    /// Creates a new, empty hash ring.
    ///
    /// Any type implementing [`RingNode`] can be used as a node type.
    ///
    /// # Examples
    ///
    /// ```
    /// let ring = vnring::HashRing::<String>::new();
    /// assert!(ring.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty hash ring from the given configuration.
    pub fn with_config(config: RingConfig) -> Result<Self, RingError<N>> {
        config.validate::<N>()?;
        Ok(Self::with_partitioner(
            DefaultPartitioner::with_seed(config.seed),
            config.virtual_node_count,
        ))
    }

    /// Creates a hash ring holding the given nodes, added in order.
    ///
    /// # Examples
    ///
    /// ```
    /// let ring = vnring::HashRing::with_nodes(["n1", "n2", "n3", "n4"]).unwrap();
    /// assert_eq!(ring.node_count(), 4);
    /// assert_eq!(ring.len(), 400);
    /// ```
    pub fn with_nodes<I>(nodes: I) -> Result<Self, RingError<N>>
    where
        I: IntoIterator<Item = N>,
    {
        Self::with_config_and_nodes(RingConfig::default(), nodes)
    }

    /// Creates a hash ring from the given configuration, holding the given
    /// nodes, added in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use vnring::{HashRing, RingConfig};
    ///
    /// let config = RingConfig::new().with_virtual_node_count(32);
    /// let ring = HashRing::with_config_and_nodes(config, ["n1", "n2"]).unwrap();
    /// assert_eq!(ring.len(), 64);
    /// ```
    pub fn with_config_and_nodes<I>(config: RingConfig, nodes: I) -> Result<Self, RingError<N>>
    where
        I: IntoIterator<Item = N>,
    {
        let ring = Self::with_config(config)?;
        for node in nodes {
            ring.add(node)?;
        }
        Ok(ring)
    }
}

impl<N: RingNode, P: Partitioner> HashRing<N, P> {
    /// Creates an empty hash ring positioning nodes and keys with a custom
    /// partitioner.
    ///
    /// A zero `virtual_node_count` is raised to one.
    pub fn with_partitioner(partitioner: P, virtual_node_count: u32) -> Self {
        Self {
            partitioner,
            snapshot: RwLock::new(Arc::new(Snapshot::empty())),
            writer: Mutex::new(()),
            virtual_node_count: virtual_node_count.max(1),
        }
    }

    /// Adds a new node to the ring.
    ///
    /// The node's placements are computed deterministically from the node
    /// itself using the ring's partitioner.
    ///
    /// # Examples
    ///
    /// ```
    /// use vnring::{HashRing, RingError};
    ///
    /// let ring = HashRing::new();
    /// ring.add("n1").unwrap();
    /// assert_eq!(ring.add("n1"), Err(RingError::DuplicateNode("n1")));
    /// ```
    pub fn add(&self, node: N) -> Result<(), RingError<N>> {
        let _guard = self.writer.lock();
        let current = self.load();
        if current.contains(&self.token(&node, 0)) {
            return Err(RingError::DuplicateNode(node));
        }

        let tokens = self.vnode_tokens(&node);
        let next = current.with_added(tokens);
        self.publish(next);
        debug!(?node, vnodes = self.virtual_node_count, "added node to ring");
        Ok(())
    }

    /// Removes a node from the ring.
    ///
    /// The node's placements are recomputed and removed. Nothing else is
    /// touched, so only keys owned by the removed node move.
    ///
    /// # Examples
    ///
    /// ```
    /// use vnring::{HashRing, RingError};
    ///
    /// let ring = HashRing::new();
    /// ring.add(42u64).unwrap();
    /// ring.remove(&42).unwrap();
    /// assert_eq!(ring.remove(&42), Err(RingError::NodeNotFound(42)));
    /// ```
    pub fn remove(&self, node: &N) -> Result<(), RingError<N>> {
        let _guard = self.writer.lock();
        let current = self.load();
        if !current.contains(&self.token(node, 0)) {
            return Err(RingError::NodeNotFound(node.clone()));
        }

        let mut tokens = self.vnode_tokens(node);
        tokens.sort_unstable();
        let next = current.without(&tokens);
        self.publish(next);
        debug!(?node, vnodes = self.virtual_node_count, "removed node from ring");
        Ok(())
    }

    /// Returns `true` if the node is on the ring.
    pub fn contains(&self, node: &N) -> bool {
        self.load().contains(&self.token(node, 0))
    }

    /// Returns the node owning the given key.
    ///
    /// Fails with [`RingError::EmptyRing`] when there are no nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// let ring = vnring::HashRing::with_nodes(["n1", "n2"]).unwrap();
    /// let node = ring.assign(&"A").unwrap();
    /// assert!(node == "n1" || node == "n2");
    /// ```
    pub fn assign<K: Hash + ?Sized>(&self, key: &K) -> Result<N, RingError<N>> {
        self.node(key)
            .map(RingToken::into_node)
            .ok_or(RingError::EmptyRing)
    }

    /// Returns the token owning the given key.
    ///
    /// The owner is the first placement when moving clockwise from the key's
    /// position, inclusive. `None` is returned on an empty ring.
    pub fn node<K: Hash + ?Sized>(&self, key: &K) -> Option<RingToken<N>> {
        let pos = self.position(key);
        let token = self.load().successor(pos).cloned();
        if let Some(token) = &token {
            trace!(
                key_position = pos,
                owner = ?token.node(),
                vnode = token.vnode(),
                "assigned key"
            );
        }
        token
    }

    /// Returns up to `k` tokens of distinct nodes responsible for the given
    /// key.
    ///
    /// The first token is the primary owner, the same one returned by
    /// [`node()`](Self::node). Fewer than `k` tokens are returned when the
    /// ring holds fewer nodes.
    pub fn replicas<K: Hash + ?Sized>(&self, key: &K, k: usize) -> Vec<RingToken<N>> {
        let snapshot = self.load();
        let mut seen = BTreeSet::new();
        snapshot
            .iter_from(self.position(key), Clockwise)
            .filter(|token| seen.insert(token.node()))
            .take(k)
            .cloned()
            .collect()
    }

    /// Returns intervals of the key space controlled by the given node.
    ///
    /// This is what needs to be moved before the node leaves the ring (or
    /// what the node receives after joining). Neighbouring placements of the
    /// same node are reported as one interval. Intervals are listed in
    /// ascending order of their end position.
    ///
    /// Whenever the node is not part of the key space, `None` is returned.
    pub fn intervals(&self, node: &N) -> Option<Vec<KeyRange<RingPosition>>> {
        let snapshot = self.load();
        if !snapshot.contains(&self.token(node, 0)) {
            return None;
        }

        let tokens = snapshot.tokens();
        let mut ranges: Vec<KeyRange<RingPosition>> = Vec::new();
        for (idx, token) in tokens.iter().enumerate() {
            if token.node() != node {
                continue;
            }
            let Some(range) = snapshot.owned_range(idx) else {
                continue;
            };
            match ranges.last_mut() {
                Some(last) if last.end == range.start => last.end = range.end,
                _ => ranges.push(range),
            }
        }

        // The first and the last interval may meet at the origin.
        if ranges.len() > 1 {
            let last_end = ranges[ranges.len() - 1].end;
            if last_end == ranges[0].start {
                if let Some(last) = ranges.pop() {
                    ranges[0].start = last.start;
                }
            }
        }
        Some(ranges)
    }

    /// Groups keys by their owning node.
    ///
    /// All keys are assigned against the same ring state. Keys keep their
    /// relative order within a group.
    ///
    /// # Examples
    ///
    /// ```
    /// let ring = vnring::HashRing::with_nodes(["n1", "n2", "n3"]).unwrap();
    /// let report = ring.assignments(["A", "B", "C"]).unwrap();
    /// assert_eq!(report.values().map(Vec::len).sum::<usize>(), 3);
    /// ```
    pub fn assignments<K, I>(&self, keys: I) -> Result<BTreeMap<N, Vec<K>>, RingError<N>>
    where
        K: Hash,
        I: IntoIterator<Item = K>,
    {
        let snapshot = self.load();
        let mut report = BTreeMap::<N, Vec<K>>::new();
        for key in keys {
            let owner = snapshot
                .successor(self.position(&key))
                .ok_or(RingError::EmptyRing)?;
            report.entry(owner.node().clone()).or_default().push(key);
        }
        Ok(report)
    }

    /// Returns ring position to which a given key will be assigned.
    ///
    /// # Examples
    ///
    /// ```
    /// let ring = vnring::HashRing::<u64>::new();
    /// assert_eq!(ring.position("some key"), ring.position("some key"));
    /// ```
    pub fn position<K: Hash + ?Sized>(&self, key: &K) -> RingPosition {
        self.partitioner.position(key)
    }

    /// Returns the nodes currently on the ring, in ascending order.
    pub fn nodes(&self) -> Vec<N> {
        let snapshot = self.load();
        let mut nodes = snapshot.nodes().cloned().collect::<Vec<_>>();
        nodes.sort_unstable();
        nodes
    }

    /// Returns all placements, in ascending order of ring position.
    pub fn tokens(&self) -> Vec<RingToken<N>> {
        self.load().tokens().to_vec()
    }

    /// Returns placements starting from the given location on the ring.
    ///
    /// Since positions wrap around, every placement is visited once: moving
    /// clockwise starts at the first placement at or after `start`, moving
    /// counter-clockwise at the last one at or before it.
    pub fn tokens_from(&self, start: RingPosition, dir: RingDirection) -> Vec<RingToken<N>> {
        self.load().iter_from(start, dir).cloned().collect()
    }

    /// Returns the predecessor of the given position, i.e. the last placement
    /// position strictly before it when moving clockwise.
    ///
    /// When several placements share that position, the one owning it (the
    /// first in ring order) is returned.
    pub fn predecessor(&self, pos: RingPosition) -> Option<RingToken<N>> {
        let snapshot = self.load();
        let prev = snapshot
            .iter_from(pos.wrapping_sub(1), CounterClockwise)
            .next()?;
        snapshot.successor(prev.position()).cloned()
    }

    /// Returns the number of placements on the ring.
    pub fn len(&self) -> usize {
        self.load().len()
    }

    /// Returns `true` if the ring has no nodes.
    pub fn is_empty(&self) -> bool {
        self.load().is_empty()
    }

    /// Returns the number of distinct nodes on the ring.
    pub fn node_count(&self) -> usize {
        self.load().nodes().count()
    }

    /// Returns the number of placements every node contributes.
    pub fn virtual_node_count(&self) -> u32 {
        self.virtual_node_count
    }

    /// Returns the partitioner used to compute positions.
    pub fn partitioner(&self) -> &P {
        &self.partitioner
    }

    fn load(&self) -> Arc<Snapshot<N>> {
        Arc::clone(&self.snapshot.read())
    }

    fn publish(&self, next: Snapshot<N>) {
        *self.snapshot.write() = Arc::new(next);
    }

    fn token(&self, node: &N, vnode: u32) -> RingToken<N> {
        let pos = self.partitioner.vnode_position(node, vnode);
        RingToken::new(pos, node.clone(), vnode)
    }

    fn vnode_tokens(&self, node: &N) -> Vec<RingToken<N>> {
        (0..self.virtual_node_count)
            .map(|vnode| self.token(node, vnode))
            .collect()
    }
}

impl<N: RingNode, P> Debug for HashRing<N, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = Arc::clone(&self.snapshot.read());
        f.debug_struct("HashRing")
            .field("nodes", &snapshot.nodes().collect::<Vec<_>>())
            .field("placements", &snapshot.len())
            .field("virtual_node_count", &self.virtual_node_count)
            .finish()
    }
}
