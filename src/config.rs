use crate::{error::RingError, partitioner::DEFAULT_SEED};

/// Number of virtual nodes each physical node places on the ring.
///
/// More virtual nodes even out the key distribution, at the cost of memory
/// and slower membership changes.
pub const DEFAULT_VIRTUAL_NODE_COUNT: u32 = 100;

/// Ring construction parameters.
///
/// Both values are fixed for the lifetime of a ring: changing either one
/// moves every placement, so all rings sharing a keyspace must agree on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RingConfig {
    /// Virtual nodes per physical node.
    pub virtual_node_count: u32,

    /// Seed of the default partitioner. Ignored by custom partitioners.
    pub seed: u64,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            virtual_node_count: DEFAULT_VIRTUAL_NODE_COUNT,
            seed: DEFAULT_SEED,
        }
    }
}

impl RingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_virtual_node_count(mut self, count: u32) -> Self {
        self.virtual_node_count = count;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks that a ring built from this config can hold nodes.
    pub fn validate<N: std::fmt::Debug>(&self) -> Result<(), RingError<N>> {
        if self.virtual_node_count == 0 {
            return Err(RingError::InvalidConfig(
                "virtual_node_count must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RingConfig::default();
        assert_eq!(config.virtual_node_count, 100);
        assert_eq!(config.seed, DEFAULT_SEED);
        assert!(config.validate::<String>().is_ok());
    }

    #[test]
    fn rejects_zero_virtual_nodes() {
        let config = RingConfig::new().with_virtual_node_count(0);
        assert!(matches!(
            config.validate::<String>(),
            Err(RingError::InvalidConfig(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_partial() {
        let config: RingConfig = serde_json::from_str(r#"{"virtual_node_count": 160}"#).unwrap();
        assert_eq!(config, RingConfig::new().with_virtual_node_count(160));
    }
}
