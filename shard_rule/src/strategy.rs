use std::sync::Arc;

use sharder::{AlgorithmRegistry, NoneShardingAlgorithm, ShardingAlgorithm};

use crate::Result;

/// One axis of a sharding decision: the columns whose values drive it,
/// paired with the algorithm that computes the targets from those values.
///
/// The same shape serves both routing phases: a rule holds one strategy
/// for the database axis and one for the table axis, and a table rule may
/// override either. The column order is kept as configured so algorithm
/// input is assembled deterministically; membership itself is
/// order-independent.
#[derive(Debug, Clone)]
pub struct ShardingStrategy {
    sharding_columns: Vec<String>,
    algorithm: Arc<dyn ShardingAlgorithm>,
}

impl ShardingStrategy {
    /// Pair `sharding_columns` with the `algorithm` they feed.
    pub fn new<I, S>(sharding_columns: I, algorithm: Arc<dyn ShardingAlgorithm>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sharding_columns: sharding_columns.into_iter().map(Into::into).collect(),
            algorithm,
        }
    }

    /// Pair `sharding_columns` with the algorithm registered under
    /// `algorithm_id`, for configuration layers that carry algorithms by
    /// identifier. Fails fast on an unknown identifier.
    pub fn from_registry<I, S>(
        sharding_columns: I,
        algorithm_id: &str,
        registry: &AlgorithmRegistry,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::new(sharding_columns, registry.create(algorithm_id)?))
    }

    /// The "no sharding column" strategy: an empty column set and the
    /// no-op algorithm. This is what rule-level defaults fall back to, so
    /// a table with no sharding configuration still routes
    /// deterministically.
    pub fn none() -> Self {
        Self::new(Vec::<String>::new(), Arc::new(NoneShardingAlgorithm::new()))
    }

    /// The sharding columns, in configured order.
    pub fn sharding_columns(&self) -> &[String] {
        &self.sharding_columns
    }

    /// Whether `column` is one of this strategy's sharding columns.
    pub fn contains_column(&self, column: &str) -> bool {
        self.sharding_columns.iter().any(|c| c == column)
    }

    /// The algorithm this strategy routes through.
    pub fn algorithm(&self) -> &Arc<dyn ShardingAlgorithm> {
        &self.algorithm
    }
}
