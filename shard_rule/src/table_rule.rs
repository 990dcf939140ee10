use shard_types::{DataNode, DataSourceRule, TableName};

use crate::{Result, RuleError, ShardingStrategy};

/// The sharding configuration of one logical table.
///
/// Holds the physical mapping (the data nodes the logical table's rows
/// are distributed across), the optional per-table strategy overrides and
/// the optional generated-key column. Constructed through
/// [`TableRule::builder`] and owned by the sharding rule it was built
/// into.
#[derive(Debug, Clone)]
pub struct TableRule {
    logic_table: TableName,
    actual_data_nodes: Vec<DataNode>,
    database_sharding_strategy: Option<ShardingStrategy>,
    table_sharding_strategy: Option<ShardingStrategy>,
    generate_key_column: Option<String>,
}

impl TableRule {
    /// Start building a rule for `logic_table`.
    pub fn builder(logic_table: impl Into<String>) -> TableRuleBuilder {
        TableRuleBuilder {
            logic_table: logic_table.into(),
            actual_tables: Vec::new(),
            data_source_rule: None,
            database_sharding_strategy: None,
            table_sharding_strategy: None,
            generate_key_column: None,
        }
    }

    /// The logical table this rule configures.
    pub fn logic_table(&self) -> &TableName {
        &self.logic_table
    }

    /// The physical data nodes backing the logical table.
    pub fn actual_data_nodes(&self) -> &[DataNode] {
        &self.actual_data_nodes
    }

    /// This table's database-axis override, if any.
    pub fn database_sharding_strategy(&self) -> Option<&ShardingStrategy> {
        self.database_sharding_strategy.as_ref()
    }

    /// This table's table-axis override, if any.
    pub fn table_sharding_strategy(&self) -> Option<&ShardingStrategy> {
        self.table_sharding_strategy.as_ref()
    }

    /// The column that receives an auto-generated key on insert, if any.
    pub fn generate_key_column(&self) -> Option<&str> {
        self.generate_key_column.as_deref()
    }

    /// The distinct data source names this table is distributed across,
    /// in node order.
    pub fn actual_data_source_names(&self) -> Vec<&str> {
        let mut result = Vec::new();
        for node in &self.actual_data_nodes {
            if !result.contains(&node.data_source()) {
                result.push(node.data_source());
            }
        }
        result
    }

    /// The physical table names within `data_source`, in node order.
    pub fn actual_table_names(&self, data_source: &str) -> Vec<&str> {
        self.actual_data_nodes
            .iter()
            .filter(|node| node.data_source().eq_ignore_ascii_case(data_source))
            .map(DataNode::table_name)
            .collect()
    }

    /// The position of `actual_table` among this table's physical tables
    /// in `data_source`, if it is one of them. Binding-table routing uses
    /// the index to pair corresponding physical tables across bound
    /// logical tables.
    pub fn find_actual_table_index(&self, data_source: &str, actual_table: &str) -> Option<usize> {
        self.actual_table_names(data_source)
            .iter()
            .position(|table| table.eq_ignore_ascii_case(actual_table))
    }
}

/// Staged construction of a [`TableRule`].
#[derive(Debug, Clone)]
pub struct TableRuleBuilder {
    logic_table: String,
    actual_tables: Vec<String>,
    data_source_rule: Option<DataSourceRule>,
    database_sharding_strategy: Option<ShardingStrategy>,
    table_sharding_strategy: Option<ShardingStrategy>,
    generate_key_column: Option<String>,
}

impl TableRuleBuilder {
    /// The physical tables backing the logical table. Entries of the form
    /// `data_source.table` address one node; a plain table name is
    /// expanded across every data source of the rule supplied via
    /// [`Self::data_source_rule`].
    pub fn actual_tables<I, S>(mut self, actual_tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actual_tables = actual_tables.into_iter().map(Into::into).collect();
        self
    }

    /// The data sources plain table names (and an empty physical mapping)
    /// are expanded across.
    pub fn data_source_rule(mut self, data_source_rule: &DataSourceRule) -> Self {
        self.data_source_rule = Some(data_source_rule.clone());
        self
    }

    /// Override the rule-level default database strategy for this table.
    pub fn database_sharding_strategy(mut self, strategy: ShardingStrategy) -> Self {
        self.database_sharding_strategy = Some(strategy);
        self
    }

    /// Override the rule-level default table strategy for this table.
    pub fn table_sharding_strategy(mut self, strategy: ShardingStrategy) -> Self {
        self.table_sharding_strategy = Some(strategy);
        self
    }

    /// The column that receives an auto-generated key on insert.
    pub fn generate_key_column(mut self, column: impl Into<String>) -> Self {
        self.generate_key_column = Some(column.into());
        self
    }

    /// Validate and build the [`TableRule`].
    ///
    /// With no configured physical tables, the logical table maps to a
    /// same-named table in every data source.
    pub fn build(self) -> Result<TableRule> {
        let logic_table = TableName::new(self.logic_table)?;
        let actual_data_nodes = Self::build_data_nodes(
            &logic_table,
            self.actual_tables,
            self.data_source_rule.as_ref(),
        )?;
        Ok(TableRule {
            logic_table,
            actual_data_nodes,
            database_sharding_strategy: self.database_sharding_strategy,
            table_sharding_strategy: self.table_sharding_strategy,
            generate_key_column: self.generate_key_column,
        })
    }

    fn build_data_nodes(
        logic_table: &TableName,
        actual_tables: Vec<String>,
        data_source_rule: Option<&DataSourceRule>,
    ) -> Result<Vec<DataNode>> {
        let missing_data_sources = || RuleError::MissingDataSourceForTable {
            table: logic_table.to_string(),
        };

        if actual_tables.is_empty() {
            // Default mapping: the logical table name in every data source.
            let data_source_rule = data_source_rule.ok_or_else(missing_data_sources)?;
            return Ok(data_source_rule
                .data_source_names()
                .map(|ds| DataNode::new(ds, logic_table.as_str()))
                .collect());
        }

        let mut result = Vec::with_capacity(actual_tables.len());
        for entry in actual_tables {
            if entry.contains('.') {
                result.push(entry.parse::<DataNode>()?);
            } else {
                let data_source_rule = data_source_rule.ok_or_else(missing_data_sources)?;
                result.extend(
                    data_source_rule
                        .data_source_names()
                        .map(|ds| DataNode::new(ds, entry.as_str())),
                );
            }
        }
        Ok(result)
    }
}
