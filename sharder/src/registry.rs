use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::{
    HashShardingAlgorithm, ModuloShardingAlgorithm, NoneShardingAlgorithm, ShardingAlgorithm,
};

/// Errors returned when resolving an algorithm identifier.
#[derive(Debug, Error)]
pub enum Error {
    /// No algorithm is registered under the requested identifier.
    #[error("unknown sharding algorithm '{id}'")]
    UnknownAlgorithm {
        /// The identifier that failed to resolve.
        id: String,
    },
}

/// Convenience alias over [`enum@Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

type Constructor = Arc<dyn Fn() -> Arc<dyn ShardingAlgorithm> + Send + Sync>;

/// Resolves algorithm identifiers from configuration to constructed
/// algorithm instances.
///
/// The built-in identifiers are `none`, `hash` and `modulo`; custom
/// algorithms are registered by name before the sharding rule is built.
/// Resolution of an unknown identifier fails fast so a misconfigured rule
/// never silently falls back to a different routing behavior.
#[derive(Clone)]
pub struct AlgorithmRegistry {
    constructors: HashMap<String, Constructor>,
}

impl AlgorithmRegistry {
    /// A registry containing only the built-in algorithms.
    pub fn new() -> Self {
        let mut registry = Self {
            constructors: HashMap::new(),
        };
        registry.register("none", || Arc::new(NoneShardingAlgorithm::new()));
        registry.register("hash", || Arc::new(HashShardingAlgorithm::new()));
        registry.register("modulo", || Arc::new(ModuloShardingAlgorithm::new()));
        registry
    }

    /// Register a custom algorithm constructor under `id`, replacing any
    /// previous registration for the same identifier.
    pub fn register<F>(&mut self, id: impl Into<String>, constructor: F)
    where
        F: Fn() -> Arc<dyn ShardingAlgorithm> + Send + Sync + 'static,
    {
        self.constructors.insert(id.into(), Arc::new(constructor));
    }

    /// Construct the algorithm registered under `id`.
    pub fn create(&self, id: &str) -> Result<Arc<dyn ShardingAlgorithm>> {
        self.constructors
            .get(id)
            .map(|constructor| constructor())
            .ok_or_else(|| Error::UnknownAlgorithm { id: id.to_string() })
    }
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids = self.constructors.keys().collect::<Vec<_>>();
        ids.sort();
        f.debug_struct("AlgorithmRegistry")
            .field("algorithms", &ids)
            .finish()
    }
}
