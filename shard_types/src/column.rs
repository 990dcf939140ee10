use serde::{Deserialize, Serialize};

/// A column reference extracted from a SQL statement by the (external)
/// parser: the table it belongs to and the column name itself.
///
/// This is the input to sharding-column classification, which decides
/// whether the rewriter must extract a routing value for the column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    table_name: String,
    column_name: String,
}

impl ColumnRef {
    /// Create a column reference for `column_name` of `table_name`.
    pub fn new(table_name: impl Into<String>, column_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            column_name: column_name.into(),
        }
    }

    /// The logical table the column belongs to, as spelled in the SQL.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// The column name, as spelled in the SQL.
    pub fn column_name(&self) -> &str {
        &self.column_name
    }
}

impl std::fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.table_name, self.column_name)
    }
}
