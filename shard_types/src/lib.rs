//! Shared value types for the sharding rule-resolution core.
//!
//! These are the vocabulary types exchanged between the configuration
//! loader, the SQL parser and the routing layer: validated logical table
//! names, physical data-node addresses, the data-source registry and the
//! column references produced by the parser.

mod column;
mod data_node;
mod data_source;
mod table_name;

pub use column::ColumnRef;
pub use data_node::{DataNode, DataNodeError};
pub use data_source::{DataSourceRule, DataSourceRuleError};
pub use table_name::{TableName, TableNameError};
