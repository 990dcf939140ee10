use std::collections::HashSet;
use std::sync::Arc;

use keygen::{KeyGenerator, KeyGeneratorFactory};
use shard_types::{ColumnRef, DataSourceRule};
use tracing::debug;

use crate::{BindingTableRule, Result, RuleError, ShardingStrategy, TableRule};

/// The root of the sharding configuration and the resolution entry point
/// for the routing layer.
///
/// Built once at process start, immutable thereafter; every method is a
/// pure read, so one instance is shared across query threads without
/// synchronization. See the crate docs for the resolution queries it
/// answers.
#[derive(Debug)]
pub struct ShardingRule {
    data_source_rule: DataSourceRule,
    table_rules: Vec<TableRule>,
    binding_table_rules: Vec<BindingTableRule>,
    default_database_strategy: ShardingStrategy,
    default_table_strategy: ShardingStrategy,
    key_generator: Option<Arc<dyn KeyGenerator>>,
}

impl ShardingRule {
    /// Start building a sharding rule.
    pub fn builder() -> ShardingRuleBuilder {
        ShardingRuleBuilder::default()
    }

    /// All-arguments construction with the same defaulting as the
    /// builder, kept for configuration layers that assemble every part
    /// themselves.
    #[deprecated(note = "use `ShardingRule::builder` instead")]
    pub fn new(
        data_source_rule: DataSourceRule,
        table_rules: Vec<TableRule>,
        binding_table_rules: Vec<BindingTableRule>,
        default_database_strategy: Option<ShardingStrategy>,
        default_table_strategy: Option<ShardingStrategy>,
        key_generator: Option<Arc<dyn KeyGenerator>>,
    ) -> Result<Self> {
        Self::from_parts(
            data_source_rule,
            table_rules,
            binding_table_rules,
            default_database_strategy,
            default_table_strategy,
            key_generator,
        )
    }

    fn from_parts(
        data_source_rule: DataSourceRule,
        table_rules: Vec<TableRule>,
        binding_table_rules: Vec<BindingTableRule>,
        default_database_strategy: Option<ShardingStrategy>,
        default_table_strategy: Option<ShardingStrategy>,
        key_generator: Option<Arc<dyn KeyGenerator>>,
    ) -> Result<Self> {
        // A table bound into two groups would make group resolution
        // dependent on iteration order; reject it outright.
        let mut bound = HashSet::new();
        for binding in &binding_table_rules {
            for table in binding.all_logic_tables() {
                if !bound.insert(table.as_str().to_ascii_lowercase()) {
                    return Err(RuleError::DuplicateBindingTable {
                        table: table.to_string(),
                    });
                }
            }
        }

        debug!(
            data_sources = data_source_rule.len(),
            tables = table_rules.len(),
            binding_groups = binding_table_rules.len(),
            has_key_generator = key_generator.is_some(),
            "built sharding rule"
        );

        Ok(Self {
            data_source_rule,
            table_rules,
            binding_table_rules,
            default_database_strategy: default_database_strategy
                .unwrap_or_else(ShardingStrategy::none),
            default_table_strategy: default_table_strategy.unwrap_or_else(ShardingStrategy::none),
            key_generator,
        })
    }

    /// The physical data source registry.
    pub fn data_source_rule(&self) -> &DataSourceRule {
        &self.data_source_rule
    }

    /// All configured table rules.
    pub fn table_rules(&self) -> &[TableRule] {
        &self.table_rules
    }

    /// All configured binding table rules.
    pub fn binding_table_rules(&self) -> &[BindingTableRule] {
        &self.binding_table_rules
    }

    /// The rule-level default database strategy. Never absent; defaults
    /// to [`ShardingStrategy::none`].
    pub fn default_database_strategy(&self) -> &ShardingStrategy {
        &self.default_database_strategy
    }

    /// The rule-level default table strategy. Never absent; defaults to
    /// [`ShardingStrategy::none`].
    pub fn default_table_strategy(&self) -> &ShardingStrategy {
        &self.default_table_strategy
    }

    /// The rule-level key generator, if one was configured.
    pub fn key_generator(&self) -> Option<&Arc<dyn KeyGenerator>> {
        self.key_generator.as_ref()
    }

    /// Look up the table rule for `logic_table`, case-insensitively.
    ///
    /// The collection is small and immutable, so a linear scan is both
    /// sufficient and deterministic.
    pub fn try_find_table_rule(&self, logic_table: &str) -> Option<&TableRule> {
        self.table_rules
            .iter()
            .find(|rule| rule.logic_table().matches(logic_table))
    }

    /// Like [`Self::try_find_table_rule`], but absence is an error: this
    /// is the lookup for call sites where the table must be configured,
    /// and a miss means the SQL referenced an unknown logical table.
    pub fn find_table_rule(&self, logic_table: &str) -> Result<&TableRule> {
        self.try_find_table_rule(logic_table)
            .ok_or_else(|| RuleError::UnknownLogicalTable {
                table: logic_table.to_string(),
            })
    }

    /// The database-axis strategy for `table_rule`: its own override if
    /// it carries one, the rule-level default otherwise.
    pub fn database_sharding_strategy<'a>(
        &'a self,
        table_rule: &'a TableRule,
    ) -> &'a ShardingStrategy {
        table_rule
            .database_sharding_strategy()
            .unwrap_or(&self.default_database_strategy)
    }

    /// The table-axis strategy for `table_rule`: its own override if it
    /// carries one, the rule-level default otherwise.
    pub fn table_sharding_strategy<'a>(&'a self, table_rule: &'a TableRule) -> &'a ShardingStrategy {
        table_rule
            .table_sharding_strategy()
            .unwrap_or(&self.default_table_strategy)
    }

    /// The binding group containing `logic_table`, if any. First match
    /// wins; construction guarantees a table belongs to at most one
    /// group.
    pub fn find_binding_table_rule(&self, logic_table: &str) -> Option<&BindingTableRule> {
        self.binding_table_rules
            .iter()
            .find(|rule| rule.has_logic_table(logic_table))
    }

    /// The first binding group containing any of `logic_tables`, probing
    /// the names in their given order.
    fn find_binding_table_rule_any<S: AsRef<str>>(
        &self,
        logic_tables: &[S],
    ) -> Option<&BindingTableRule> {
        logic_tables
            .iter()
            .find_map(|table| self.find_binding_table_rule(table.as_ref()))
    }

    /// The subset of `logic_tables` that belongs to the binding group
    /// discovered from any one of them. Input spelling is preserved; the
    /// result is a set, no ordering is promised.
    pub fn filter_all_binding_tables<S: AsRef<str>>(&self, logic_tables: &[S]) -> Vec<String> {
        if logic_tables.is_empty() {
            return Vec::new();
        }
        let Some(binding) = self.find_binding_table_rule_any(logic_tables) else {
            return Vec::new();
        };
        logic_tables
            .iter()
            .map(AsRef::as_ref)
            .filter(|table| binding.has_logic_table(table))
            .map(str::to_string)
            .collect()
    }

    /// Whether every one of `logic_tables` belongs to one binding group.
    ///
    /// When true, a join across the tables can reuse a single routing
    /// decision. Tables spanning two groups correctly fail the check: the
    /// first-hit group cannot cover members of the other.
    pub fn is_all_binding_tables<S: AsRef<str>>(&self, logic_tables: &[S]) -> bool {
        let filtered = self.filter_all_binding_tables(logic_tables);
        !filtered.is_empty() && filtered.len() == logic_tables.len()
    }

    /// Whether `column` must participate in routing-value extraction.
    ///
    /// The rule-level defaults are checked first, for any table; the
    /// per-table overrides are consulted only for the table named in the
    /// reference, so an unrelated table's override never classifies a
    /// column.
    pub fn is_sharding_column(&self, column: &ColumnRef) -> bool {
        if self
            .default_database_strategy
            .contains_column(column.column_name())
            || self
                .default_table_strategy
                .contains_column(column.column_name())
        {
            return true;
        }
        self.table_rules
            .iter()
            .filter(|rule| rule.logic_table().matches(column.table_name()))
            .any(|rule| {
                rule.database_sharding_strategy()
                    .is_some_and(|strategy| strategy.contains_column(column.column_name()))
                    || rule
                        .table_sharding_strategy()
                        .is_some_and(|strategy| strategy.contains_column(column.column_name()))
            })
    }

    /// The auto-generated key column of `table_name`, if the table is
    /// configured and declares one.
    ///
    /// An unknown table and a table without a generated-key column both
    /// yield `None`; callers that must distinguish the two use
    /// [`Self::find_table_rule`] first.
    pub fn generate_key_column(&self, table_name: &str) -> Option<&str> {
        self.try_find_table_rule(table_name)
            .and_then(TableRule::generate_key_column)
    }
}

/// Staged construction of a [`ShardingRule`].
///
/// Defaulting and validation happen in one place, [`Self::build`]; no
/// partially constructed rule is ever observable.
#[derive(Debug, Default)]
pub struct ShardingRuleBuilder {
    data_source_rule: Option<DataSourceRule>,
    table_rules: Vec<TableRule>,
    binding_table_rules: Vec<BindingTableRule>,
    default_database_strategy: Option<ShardingStrategy>,
    default_table_strategy: Option<ShardingStrategy>,
    key_generator_id: Option<String>,
    key_generator_factory: KeyGeneratorFactory,
}

impl ShardingRuleBuilder {
    /// The physical data source registry. Required.
    pub fn data_source_rule(mut self, data_source_rule: DataSourceRule) -> Self {
        self.data_source_rule = Some(data_source_rule);
        self
    }

    /// The table rules, replacing any set previously.
    pub fn table_rules(mut self, table_rules: impl IntoIterator<Item = TableRule>) -> Self {
        self.table_rules = table_rules.into_iter().collect();
        self
    }

    /// The binding table rules, replacing any set previously.
    pub fn binding_table_rules(
        mut self,
        binding_table_rules: impl IntoIterator<Item = BindingTableRule>,
    ) -> Self {
        self.binding_table_rules = binding_table_rules.into_iter().collect();
        self
    }

    /// The rule-level default database strategy.
    pub fn default_database_strategy(mut self, strategy: ShardingStrategy) -> Self {
        self.default_database_strategy = Some(strategy);
        self
    }

    /// The rule-level default table strategy.
    pub fn default_table_strategy(mut self, strategy: ShardingStrategy) -> Self {
        self.default_table_strategy = Some(strategy);
        self
    }

    /// Select the key generator by identifier, resolved through the
    /// factory at build time.
    pub fn key_generator(mut self, id: impl Into<String>) -> Self {
        self.key_generator_id = Some(id.into());
        self
    }

    /// Replace the key-generator factory, e.g. to register custom
    /// generators before building.
    pub fn key_generator_factory(mut self, factory: KeyGeneratorFactory) -> Self {
        self.key_generator_factory = factory;
        self
    }

    /// Validate, default and build the immutable [`ShardingRule`].
    ///
    /// Fails if no data source rule was supplied, if a logical table is
    /// bound into two groups, or if the key-generator identifier does not
    /// resolve; all of these are configuration errors that abort startup.
    pub fn build(self) -> Result<ShardingRule> {
        let data_source_rule = self
            .data_source_rule
            .ok_or(RuleError::MissingDataSourceRule)?;
        let key_generator = self
            .key_generator_id
            .as_deref()
            .map(|id| self.key_generator_factory.create(id))
            .transpose()?;
        ShardingRule::from_parts(
            data_source_rule,
            self.table_rules,
            self.binding_table_rules,
            self.default_database_strategy,
            self.default_table_strategy,
            key_generator,
        )
    }
}
