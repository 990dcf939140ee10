use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned when constructing a [`DataSourceRule`].
#[derive(Debug, Error)]
pub enum DataSourceRuleError {
    /// No data source names were supplied.
    #[error("at least one data source is required")]
    Empty,

    /// The requested default data source is not in the set.
    #[error("default data source '{name}' is not a configured data source")]
    UnknownDefault {
        /// The name that was requested as the default.
        name: String,
    },
}

/// The registry of physical data sources a sharding rule distributes
/// over.
///
/// The connection pool behind each name lives in an external layer; this
/// core only deals in the names. Insertion order is preserved so that
/// defaulted physical mappings are deterministic, and duplicate names
/// collapse to the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceRule {
    data_sources: IndexSet<String>,
    default_data_source: Option<String>,
}

impl DataSourceRule {
    /// Create a rule over the given data source names.
    pub fn new<I, S>(names: I) -> Result<Self, DataSourceRuleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let data_sources: IndexSet<String> = names.into_iter().map(Into::into).collect();
        if data_sources.is_empty() {
            return Err(DataSourceRuleError::Empty);
        }
        Ok(Self {
            data_sources,
            default_data_source: None,
        })
    }

    /// Mark one of the configured data sources as the default target for
    /// tables without any sharding configuration.
    pub fn with_default(mut self, name: impl Into<String>) -> Result<Self, DataSourceRuleError> {
        let name = name.into();
        if !self.data_sources.contains(&name) {
            return Err(DataSourceRuleError::UnknownDefault { name });
        }
        self.default_data_source = Some(name);
        Ok(self)
    }

    /// All configured data source names, in insertion order.
    pub fn data_source_names(&self) -> impl Iterator<Item = &str> {
        self.data_sources.iter().map(String::as_str)
    }

    /// Whether `name` is a configured data source.
    pub fn contains(&self, name: &str) -> bool {
        self.data_sources.contains(name)
    }

    /// The default data source name, if one was configured.
    pub fn default_data_source_name(&self) -> Option<&str> {
        self.default_data_source.as_deref()
    }

    /// Number of configured data sources; always at least one.
    pub fn len(&self) -> usize {
        self.data_sources.len()
    }

    /// Always false; retained for the conventional `len`/`is_empty` pair.
    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_order_and_dedupes() {
        let rule = DataSourceRule::new(["ds_1", "ds_0", "ds_1"]).unwrap();
        assert_eq!(
            rule.data_source_names().collect::<Vec<_>>(),
            vec!["ds_1", "ds_0"]
        );
        assert_eq!(rule.len(), 2);
        assert!(rule.contains("ds_0"));
        assert!(!rule.contains("ds_9"));
    }

    #[test]
    fn test_empty_rejected() {
        let err = DataSourceRule::new(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, DataSourceRuleError::Empty));
    }

    #[test]
    fn test_default_must_be_member() {
        let rule = DataSourceRule::new(["ds_0", "ds_1"]).unwrap();
        let rule = rule.with_default("ds_1").unwrap();
        assert_eq!(rule.default_data_source_name(), Some("ds_1"));

        let rule = DataSourceRule::new(["ds_0"]).unwrap();
        let err = rule.with_default("ds_9").unwrap_err();
        assert!(matches!(err, DataSourceRuleError::UnknownDefault { .. }));
    }
}
