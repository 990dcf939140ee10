use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// [`TableName`] validation errors.
#[derive(Debug, Clone, Copy, Error)]
pub enum TableNameError {
    /// The provided logical table name was the empty string.
    #[error("logical table name must not be empty")]
    Empty,
}

/// A validated logical table name.
///
/// SQL identifiers are case-insensitive, so two [`TableName`]s differing
/// only in ASCII case compare equal and hash identically. All rule lookups
/// (table rules, binding membership, generated-key columns) go through this
/// type or [`TableName::matches`], which keeps the case handling in one
/// place.
///
/// This type derefs to a `str` and therefore can be used in place of
/// anything that is expecting a `str`:
///
/// ```rust
/// # use shard_types::TableName;
/// fn print_table(s: &str) {
///     println!("logical table: {}", s);
/// }
///
/// let table = TableName::new("t_order").unwrap();
/// print_table(&table);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableName(String);

impl TableName {
    /// Create a new, valid [`TableName`].
    pub fn new<T: Into<String>>(name: T) -> Result<Self, TableNameError> {
        let name = name.into();
        if name.is_empty() {
            return Err(TableNameError::Empty);
        }
        Ok(Self(name))
    }

    /// Borrow a string slice of the name, in its configured spelling.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against an arbitrary identifier.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl PartialEq for TableName {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl Eq for TableName {}

impl Hash for TableName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Must agree with the case-insensitive Eq impl.
        for b in self.0.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
    }
}

impl From<TableName> for String {
    fn from(name: TableName) -> Self {
        name.0
    }
}

impl TryFrom<String> for TableName {
    type Error = TableNameError;

    fn try_from(v: String) -> Result<Self, Self::Error> {
        Self::new(v)
    }
}

impl TryFrom<&str> for TableName {
    type Error = TableNameError;

    fn try_from(v: &str) -> Result<Self, Self::Error> {
        Self::new(v)
    }
}

impl std::ops::Deref for TableName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use super::*;

    fn hash_of(name: &TableName) -> u64 {
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_case_insensitive_eq() {
        let lower = TableName::new("t_order").unwrap();
        let upper = TableName::new("T_ORDER").unwrap();
        let mixed = TableName::new("T_Order").unwrap();

        assert_eq!(lower, upper);
        assert_eq!(lower, mixed);
        assert!(lower.matches("t_ORDER"));
        assert!(!lower.matches("t_order_item"));
    }

    #[test]
    fn test_hash_agrees_with_eq() {
        let lower = TableName::new("t_order").unwrap();
        let upper = TableName::new("T_ORDER").unwrap();

        assert_eq!(hash_of(&lower), hash_of(&upper));
    }

    #[test]
    fn test_spelling_preserved() {
        let name = TableName::new("T_Order").unwrap();
        assert_eq!(name.as_str(), "T_Order");
        assert_eq!(name.to_string(), "T_Order");
    }

    #[test]
    fn test_empty_rejected() {
        let err = TableName::new("").unwrap_err();
        // The fieldless error is Copy; both copies stay usable.
        let copy = err;
        assert!(matches!(err, TableNameError::Empty));
        assert_eq!(copy.to_string(), "logical table name must not be empty");
    }

    #[test]
    fn test_serde_round_trip() {
        let name = TableName::new("t_order").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, r#""t_order""#);

        let got: TableName = serde_json::from_str(&json).unwrap();
        assert_eq!(got, name);

        let err = serde_json::from_str::<TableName>(r#""""#);
        assert!(err.is_err());
    }
}
