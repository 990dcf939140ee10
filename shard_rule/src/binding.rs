use shard_types::TableName;

use crate::TableRule;

/// A group of logical tables declared to shard identically.
///
/// For any routing value, the bound tables land on the same physical
/// targets, so a join between them can reuse one routing decision instead
/// of crossing independent per-table routes. Membership is
/// case-insensitive, consistent with table-rule naming.
#[derive(Debug, Clone)]
pub struct BindingTableRule {
    table_rules: Vec<TableRule>,
}

impl BindingTableRule {
    /// Bind the given table rules together. A group needs at least two
    /// members to be meaningful, but that is not enforced.
    pub fn new(table_rules: Vec<TableRule>) -> Self {
        Self { table_rules }
    }

    /// The table rules in this group.
    pub fn table_rules(&self) -> &[TableRule] {
        &self.table_rules
    }

    /// Whether `logic_table` belongs to this group.
    pub fn has_logic_table(&self, logic_table: &str) -> bool {
        self.table_rules
            .iter()
            .any(|rule| rule.logic_table().matches(logic_table))
    }

    /// The logical table names of every member, in declaration order.
    pub fn all_logic_tables(&self) -> impl Iterator<Item = &TableName> {
        self.table_rules.iter().map(TableRule::logic_table)
    }

    /// The physical table of `logic_table` in `data_source` that
    /// corresponds to `other_actual_table`, a physical table of another
    /// member of this group.
    ///
    /// Bound tables shard identically, so corresponding physical tables
    /// sit at the same index within a data source; the router uses this
    /// to translate a routing decision made for one member onto the
    /// others. Returns `None` when `other_actual_table` is not a physical
    /// table of any member in `data_source`, or `logic_table` is not in
    /// this group.
    pub fn binding_actual_table(
        &self,
        data_source: &str,
        logic_table: &str,
        other_actual_table: &str,
    ) -> Option<&str> {
        let index = self
            .table_rules
            .iter()
            .find_map(|rule| rule.find_actual_table_index(data_source, other_actual_table))?;
        self.table_rules
            .iter()
            .find(|rule| rule.logic_table().matches(logic_table))
            .and_then(|rule| rule.actual_table_names(data_source).get(index).copied())
    }
}
