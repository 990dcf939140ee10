use crate::{ShardingAlgorithm, ShardingValue, ShardingValues};

/// A modulo algorithm for numeric routing values.
///
/// Each discrete value `v` selects `available_targets[v % n]`, the common
/// layout where target names carry a `_0..n-1` suffix and are configured
/// in suffix order. Non-numeric values and ranges cannot be narrowed and
/// degrade to a broadcast.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuloShardingAlgorithm;

impl ModuloShardingAlgorithm {
    /// Construct the modulo algorithm.
    pub fn new() -> Self {
        Self
    }
}

impl ShardingAlgorithm for ModuloShardingAlgorithm {
    fn shard(&self, available_targets: &[String], values: &[ShardingValue]) -> Vec<String> {
        if available_targets.is_empty() || values.is_empty() {
            return available_targets.to_vec();
        }

        if values
            .iter()
            .any(|v| matches!(v.values(), ShardingValues::Range { .. }))
        {
            return available_targets.to_vec();
        }

        let mut result = Vec::new();
        for value in values.iter().flat_map(ShardingValue::discrete_values) {
            let Ok(numeric) = value.parse::<u64>() else {
                // Not narrowable without numeric semantics.
                return available_targets.to_vec();
            };
            let target = &available_targets[(numeric % available_targets.len() as u64) as usize];
            if !result.contains(target) {
                result.push(target.clone());
            }
        }
        result
    }
}
