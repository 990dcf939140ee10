use uuid::Uuid;

use crate::{KeyGenerator, KeyValue};

/// A key generator producing random v4 UUIDs.
///
/// Collision-free across shards and processes without any configured
/// worker identity, at the cost of non-numeric, non-ordered keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidKeyGenerator;

impl UuidKeyGenerator {
    /// Construct the UUID generator.
    pub fn new() -> Self {
        Self
    }
}

impl KeyGenerator for UuidKeyGenerator {
    fn next_key(&self) -> KeyValue {
        KeyValue::Uuid(Uuid::new_v4())
    }
}
