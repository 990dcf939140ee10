use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The delimiter between data source and table in the textual form.
const DELIMITER: char = '.';

/// Errors returned when parsing a [`DataNode`] from its textual form.
#[derive(Debug, Error)]
pub enum DataNodeError {
    /// The textual form was not `data_source.table`.
    #[error("invalid data node '{text}', expected 'data_source.table'")]
    InvalidFormat {
        /// The input that failed to parse.
        text: String,
    },
}

/// One physical target: a table within a data source.
///
/// Logical tables map onto a list of data nodes; the textual form used in
/// configuration is `data_source.table`, e.g. `ds_0.t_order_1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataNode {
    data_source: String,
    table_name: String,
}

impl DataNode {
    /// Create a data node addressing `table_name` inside `data_source`.
    pub fn new(data_source: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            data_source: data_source.into(),
            table_name: table_name.into(),
        }
    }

    /// The physical data source name.
    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    /// The physical table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

impl FromStr for DataNode {
    type Err = DataNodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(DELIMITER) {
            Some((data_source, table)) if !data_source.is_empty() && !table.is_empty() => {
                Ok(Self::new(data_source, table))
            }
            _ => Err(DataNodeError::InvalidFormat {
                text: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for DataNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.data_source, DELIMITER, self.table_name)
    }
}
