use std::hash::{Hash, Hasher};

use siphasher::sip::SipHasher13;

use crate::{ShardingAlgorithm, ShardingValue, ShardingValues};

/// A keyed-hash algorithm mapping each discrete routing value to one
/// target.
///
/// Every instance built with the same seed key maps the same value to the
/// same target index for a given target count, so all middleware instances
/// in a cluster agree on routing without coordination. Range values cannot
/// be enumerated and degrade to a broadcast.
#[derive(Debug, Clone, Copy)]
pub struct HashShardingAlgorithm {
    hasher: SipHasher13,
}

impl HashShardingAlgorithm {
    /// Construct the algorithm with the cluster-wide default seed key.
    pub fn new() -> Self {
        // A fixed random key so every instance in the cluster hashes a
        // routing value to the same target.
        let key = [
            0x4b, 0x1d, 0x7e, 0xc8, 0x35, 0x9a, 0x02, 0xf1, 0x66, 0xd4, 0x2b, 0x83, 0x5f, 0xa7,
            0x10, 0xe9,
        ];
        Self {
            hasher: SipHasher13::new_with_key(&key),
        }
    }

    /// Reinitialise with a custom seed key. Changing the key changes the
    /// value-to-target mapping.
    pub fn with_seed_key(self, key: &[u8; 16]) -> Self {
        Self {
            hasher: SipHasher13::new_with_key(key),
        }
    }

    fn target_index(&self, value: &str, target_count: usize) -> usize {
        let mut state = self.hasher;
        value.hash(&mut state);
        (state.finish() % target_count as u64) as usize
    }
}

impl Default for HashShardingAlgorithm {
    fn default() -> Self {
        Self::new()
    }
}

impl ShardingAlgorithm for HashShardingAlgorithm {
    fn shard(&self, available_targets: &[String], values: &[ShardingValue]) -> Vec<String> {
        if available_targets.is_empty() || values.is_empty() {
            return available_targets.to_vec();
        }

        // A range cannot be narrowed by hashing; fall back to all targets.
        if values
            .iter()
            .any(|v| matches!(v.values(), ShardingValues::Range { .. }))
        {
            return available_targets.to_vec();
        }

        let mut result = Vec::new();
        for value in values.iter().flat_map(ShardingValue::discrete_values) {
            let target = &available_targets[self.target_index(value, available_targets.len())];
            if !result.contains(target) {
                result.push(target.clone());
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("ds_{i}")).collect()
    }

    #[test]
    fn test_deterministic() {
        let targets = targets(4);
        let algorithm = HashShardingAlgorithm::new();
        let values = [ShardingValue::single("user_id", "12345")];

        let first = algorithm.shard(&targets, &values);
        assert_eq!(first.len(), 1);

        // Identical inputs always map to the same target, including across
        // separately constructed instances.
        for _ in 0..100 {
            assert_eq!(HashShardingAlgorithm::new().shard(&targets, &values), first);
        }
    }

    #[test]
    fn test_seed_key_changes_mapping() {
        let targets = targets(32);
        let default = HashShardingAlgorithm::new();
        let rekeyed = HashShardingAlgorithm::new().with_seed_key(&[7; 16]);

        let moved = (0..1000).filter(|i| {
            let values = [ShardingValue::single("user_id", i.to_string())];
            default.shard(&targets, &values) != rekeyed.shard(&targets, &values)
        });
        assert!(moved.count() > 0);
    }

    #[test]
    fn test_list_dedupes_targets() {
        let targets = targets(2);
        let algorithm = HashShardingAlgorithm::new();
        let values = [ShardingValue::new(
            "user_id",
            ShardingValues::List((0..100).map(|i| i.to_string()).collect()),
        )];

        let got = algorithm.shard(&targets, &values);
        assert!(got.len() <= 2);
        assert!(got.iter().all(|t| targets.contains(t)));
    }

    #[test]
    fn test_range_broadcasts() {
        let targets = targets(4);
        let algorithm = HashShardingAlgorithm::new();
        let values = [ShardingValue::new(
            "user_id",
            ShardingValues::Range {
                lower: "1".into(),
                upper: "100".into(),
            },
        )];

        assert_eq!(algorithm.shard(&targets, &values), targets);
    }

    #[test]
    fn test_no_values_broadcasts() {
        let targets = targets(4);
        let algorithm = HashShardingAlgorithm::new();
        assert_eq!(algorithm.shard(&targets, &[]), targets);
    }
}
