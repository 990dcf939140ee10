//! Sharding algorithms and the seam through which a sharding strategy
//! invokes them.
//!
//! An algorithm maps the routing values extracted for a strategy's
//! sharding columns onto a subset of the available physical targets. The
//! resolution core never computes routes itself; it only resolves which
//! algorithm applies and hands it the values.

use std::fmt::Debug;

mod hash;
mod modulo;
mod none;
mod registry;
mod value;

pub use hash::HashShardingAlgorithm;
pub use modulo::ModuloShardingAlgorithm;
pub use none::NoneShardingAlgorithm;
pub use registry::{AlgorithmRegistry, Error, Result};
pub use value::{ShardingValue, ShardingValues};

/// A sharding algorithm maps routing values to physical targets.
///
/// `available_targets` is the full candidate set for the routing phase the
/// strategy applies to (data source names at the database level, physical
/// table names at the table level). Implementations return the subset the
/// values route to; returning every target is a broadcast.
///
/// Implementations must be pure: the same targets and values always
/// produce the same result, with no side effects. The routing layer relies
/// on this to call concurrently without synchronization.
pub trait ShardingAlgorithm: Debug + Send + Sync {
    /// Compute the targets within `available_targets` that `values` route
    /// to.
    fn shard(&self, available_targets: &[String], values: &[ShardingValue]) -> Vec<String>;
}
