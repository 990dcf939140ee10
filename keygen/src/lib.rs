//! Distributed key generation for auto-generated primary-key columns.
//!
//! Plain auto-increment is unsafe once a logical table spans shards, so
//! inserts into tables with a configured generated-key column get their
//! key from a [`KeyGenerator`] instead. The generator implementation is
//! selected once, when the sharding rule is built, through
//! [`KeyGeneratorFactory`].

use std::fmt::Debug;

mod factory;
mod snowflake;
mod uuid_gen;

pub use factory::{Error, KeyGeneratorFactory, Result};
pub use snowflake::SnowflakeKeyGenerator;
pub use uuid_gen::UuidKeyGenerator;

/// A generated key value.
///
/// Generators produce either a 64-bit integer (the usual shape for
/// numeric primary keys) or a UUID for schemas keyed on string columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyValue {
    /// A numeric key.
    Number(i64),
    /// A UUID key.
    Uuid(uuid::Uuid),
}

impl KeyValue {
    /// The numeric form of this key, if it has one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Uuid(_) => None,
        }
    }
}

impl std::fmt::Display for KeyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Uuid(u) => write!(f, "{u}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_value_display() {
        assert_eq!(KeyValue::Number(42).to_string(), "42");
        assert_eq!(KeyValue::Number(-7).to_string(), "-7");

        let id = uuid::Uuid::new_v4();
        assert_eq!(KeyValue::Uuid(id).to_string(), id.to_string());
    }
}

/// Produces distributed-unique key values, one per insert that needs
/// auto-generation.
///
/// Implementations must be safe to call from many query threads at once;
/// any internal state is the implementation's own concern.
pub trait KeyGenerator: Debug + Send + Sync {
    /// Produce the next key value.
    fn next_key(&self) -> KeyValue;
}
