use crate::{ShardingAlgorithm, ShardingValue};

/// The no-op algorithm paired with an empty sharding-column set.
///
/// It never narrows: every candidate target is returned unchanged. A rule
/// whose strategy defaults to this algorithm routes a single-target
/// configuration to that one target deterministically, and a multi-target
/// configuration to all of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneShardingAlgorithm;

impl NoneShardingAlgorithm {
    /// Construct the no-op algorithm.
    pub fn new() -> Self {
        Self
    }
}

impl ShardingAlgorithm for NoneShardingAlgorithm {
    fn shard(&self, available_targets: &[String], _values: &[ShardingValue]) -> Vec<String> {
        available_targets.to_vec()
    }
}
