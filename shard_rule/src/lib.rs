//! The rule-resolution core of the sharding middleware.
//!
//! A [`ShardingRule`] is the process-wide, immutable description of how
//! logical tables map onto physical data sources and tables, which
//! columns drive routing, and which columns receive generated keys. It is
//! built once at startup (via [`ShardingRule::builder`]) and answers the
//! routing layer's per-query resolution questions:
//!
//! - which [`TableRule`] backs a logical table, and which database/table
//!   [`ShardingStrategy`] applies to it (per-table override falling back
//!   to the rule-level default);
//! - whether a set of joined logical tables forms one binding group
//!   ([`BindingTableRule`]), letting the router reuse a single routing
//!   decision instead of crossing per-table routes;
//! - whether a column reference is a sharding column, and which column of
//!   a table (if any) receives an auto-generated key.
//!
//! Every query-path method is a pure function over the immutable
//! configuration, so a built rule is shared across query threads without
//! synchronization.

mod binding;
mod rule;
mod strategy;
mod table_rule;

pub use binding::BindingTableRule;
pub use rule::{ShardingRule, ShardingRuleBuilder};
pub use strategy::ShardingStrategy;
pub use table_rule::{TableRule, TableRuleBuilder};

use thiserror::Error;

/// Errors raised by rule construction and the one must-exist lookup.
///
/// Everything except [`RuleError::UnknownLogicalTable`] is a
/// configuration error: it surfaces at build time, aborts startup and is
/// never retryable. `UnknownLogicalTable` is raised at query time by
/// [`ShardingRule::find_table_rule`] and means the SQL referenced a table
/// the configuration does not know; callers reject the query rather than
/// retry.
#[derive(Debug, Error)]
pub enum RuleError {
    /// A sharding rule cannot be built without a data source rule.
    #[error("data source rule is required to build a sharding rule")]
    MissingDataSourceRule,

    /// The requested logical table has no table rule.
    #[error("'{table}' does not exist in the sharding rule")]
    UnknownLogicalTable {
        /// The logical table name that was requested.
        table: String,
    },

    /// A logical table was declared in more than one binding table rule.
    #[error("logical table '{table}' belongs to more than one binding table rule")]
    DuplicateBindingTable {
        /// The multiply-declared logical table name.
        table: String,
    },

    /// A table rule declared plain physical table names but no data
    /// source rule to distribute them over.
    #[error("table rule '{table}' needs a data source rule to expand its physical tables")]
    MissingDataSourceForTable {
        /// The logical table whose physical mapping could not be built.
        table: String,
    },

    /// An invalid logical table name.
    #[error(transparent)]
    TableName(#[from] shard_types::TableNameError),

    /// An invalid `data_source.table` data node.
    #[error(transparent)]
    DataNode(#[from] shard_types::DataNodeError),

    /// A sharding-algorithm identifier failed to resolve.
    #[error(transparent)]
    Algorithm(#[from] sharder::Error),

    /// A key-generator identifier failed to resolve or construct.
    #[error(transparent)]
    KeyGenerator(#[from] keygen::Error),
}

/// Convenience alias over [`RuleError`].
pub type Result<T, E = RuleError> = std::result::Result<T, E>;
