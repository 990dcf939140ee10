use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::{KeyGenerator, SnowflakeKeyGenerator, UuidKeyGenerator};

/// Errors returned when constructing a key generator.
#[derive(Debug, Error)]
pub enum Error {
    /// No generator is registered under the requested identifier.
    #[error("unknown key generator '{id}'")]
    UnknownGenerator {
        /// The identifier that failed to resolve.
        id: String,
    },

    /// The configured worker id does not fit the snowflake worker field.
    #[error("worker id {worker_id} exceeds maximum of {max}")]
    WorkerIdOutOfRange {
        /// The out-of-range worker id.
        worker_id: u16,
        /// The largest representable worker id.
        max: u16,
    },
}

/// Convenience alias over [`enum@Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

type Constructor = Arc<dyn Fn() -> Result<Arc<dyn KeyGenerator>> + Send + Sync>;

/// Resolves key-generator identifiers from configuration to constructed
/// generator instances.
///
/// The built-in identifiers are `snowflake` (worker id 0) and `uuid`;
/// deployments with multiple middleware instances register a `snowflake`
/// constructor carrying their assigned worker id. Resolution happens once,
/// when the sharding rule is built, and an unknown identifier fails the
/// build rather than silently disabling key generation.
#[derive(Clone)]
pub struct KeyGeneratorFactory {
    constructors: HashMap<String, Constructor>,
}

impl KeyGeneratorFactory {
    /// A factory containing only the built-in generators.
    pub fn new() -> Self {
        let mut factory = Self {
            constructors: HashMap::new(),
        };
        factory.register("snowflake", || {
            Ok(Arc::new(SnowflakeKeyGenerator::new(0)?) as Arc<dyn KeyGenerator>)
        });
        factory.register("uuid", || Ok(Arc::new(UuidKeyGenerator::new()) as Arc<dyn KeyGenerator>));
        factory
    }

    /// Register a custom generator constructor under `id`, replacing any
    /// previous registration for the same identifier.
    pub fn register<F>(&mut self, id: impl Into<String>, constructor: F)
    where
        F: Fn() -> Result<Arc<dyn KeyGenerator>> + Send + Sync + 'static,
    {
        self.constructors.insert(id.into(), Arc::new(constructor));
    }

    /// Construct the generator registered under `id`.
    pub fn create(&self, id: &str) -> Result<Arc<dyn KeyGenerator>> {
        let constructor =
            self.constructors
                .get(id)
                .ok_or_else(|| Error::UnknownGenerator {
                    id: id.to_string(),
                })?;
        constructor()
    }
}

impl Default for KeyGeneratorFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for KeyGeneratorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids = self.constructors.keys().collect::<Vec<_>>();
        ids.sort();
        f.debug_struct("KeyGeneratorFactory")
            .field("generators", &ids)
            .finish()
    }
}
