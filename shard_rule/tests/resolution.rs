//! End-to-end resolution behavior over a representative configuration:
//! two data sources, a bound order/order-item/order-status group sharded
//! by `order_id`, and an unbound `t_user` table riding on the rule-level
//! defaults.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use shard_rule::{BindingTableRule, RuleError, ShardingRule, ShardingStrategy, TableRule};
use shard_types::{ColumnRef, DataSourceRule};
use sharder::{HashShardingAlgorithm, ModuloShardingAlgorithm};

fn data_sources() -> DataSourceRule {
    DataSourceRule::new(["ds_0", "ds_1"]).unwrap()
}

fn order_table_strategy() -> ShardingStrategy {
    ShardingStrategy::new(["order_id"], Arc::new(ModuloShardingAlgorithm::new()))
}

fn sharding_rule() -> ShardingRule {
    let data_sources = data_sources();

    let order = TableRule::builder("t_order")
        .data_source_rule(&data_sources)
        .actual_tables(["t_order_0", "t_order_1"])
        .table_sharding_strategy(order_table_strategy())
        .generate_key_column("order_id")
        .build()
        .unwrap();
    let order_item = TableRule::builder("t_order_item")
        .data_source_rule(&data_sources)
        .actual_tables(["t_order_item_0", "t_order_item_1"])
        .table_sharding_strategy(order_table_strategy())
        .build()
        .unwrap();
    let order_status = TableRule::builder("t_order_status")
        .data_source_rule(&data_sources)
        .actual_tables(["t_order_status_0", "t_order_status_1"])
        .table_sharding_strategy(order_table_strategy())
        .build()
        .unwrap();
    let user = TableRule::builder("t_user")
        .data_source_rule(&data_sources)
        .build()
        .unwrap();

    let binding = BindingTableRule::new(vec![
        order.clone(),
        order_item.clone(),
        order_status.clone(),
    ]);

    ShardingRule::builder()
        .data_source_rule(data_sources)
        .table_rules([order, order_item, order_status, user])
        .binding_table_rules([binding])
        .default_database_strategy(ShardingStrategy::new(
            ["user_id"],
            Arc::new(HashShardingAlgorithm::new()),
        ))
        .build()
        .unwrap()
}

#[test]
fn table_rule_lookup_is_case_insensitive() {
    let rule = sharding_rule();

    for variant in ["t_order", "T_ORDER", "T_Order", "t_ORDER"] {
        let found = rule.find_table_rule(variant).unwrap();
        assert_eq!(found.logic_table().as_str(), "t_order");
    }

    assert!(rule.try_find_table_rule("ghost").is_none());
    let err = rule.find_table_rule("ghost").unwrap_err();
    assert!(matches!(
        err,
        RuleError::UnknownLogicalTable { ref table } if table == "ghost"
    ));
    assert_eq!(err.to_string(), "'ghost' does not exist in the sharding rule");
}

#[test]
fn strategy_resolution_prefers_override_then_default() {
    let rule = sharding_rule();

    // t_order carries a table-axis override but no database-axis one.
    let order = rule.find_table_rule("t_order").unwrap();
    assert_eq!(
        rule.table_sharding_strategy(order).sharding_columns(),
        ["order_id"]
    );
    assert_eq!(
        rule.database_sharding_strategy(order).sharding_columns(),
        ["user_id"]
    );

    // t_user has no overrides at all and rides both defaults.
    let user = rule.find_table_rule("t_user").unwrap();
    assert_eq!(
        rule.database_sharding_strategy(user).sharding_columns(),
        ["user_id"]
    );
    assert!(rule.table_sharding_strategy(user).sharding_columns().is_empty());
}

#[test]
fn binding_affinity_truth_table() {
    let rule = sharding_rule();

    assert!(rule.is_all_binding_tables(&["t_order", "t_order_item"]));
    assert!(rule.is_all_binding_tables(&["T_ORDER", "t_Order_Item", "t_order_status"]));
    assert!(rule.is_all_binding_tables(&["t_order_item"]));

    // t_user is configured but unbound.
    assert!(!rule.is_all_binding_tables(&["t_order", "t_user"]));
    assert!(!rule.is_all_binding_tables(&["t_user"]));
    assert!(!rule.is_all_binding_tables(&Vec::<String>::new()));
}

#[test]
fn binding_filter_intersects_with_first_hit_group() {
    let rule = sharding_rule();

    assert_eq!(
        rule.filter_all_binding_tables(&["t_order", "t_user"]),
        vec!["t_order".to_string()]
    );
    assert_eq!(
        rule.filter_all_binding_tables(&Vec::<String>::new()),
        Vec::<String>::new()
    );
    assert_eq!(
        rule.filter_all_binding_tables(&["t_user"]),
        Vec::<String>::new()
    );

    // Input spelling is preserved.
    assert_eq!(
        rule.filter_all_binding_tables(&["T_ORDER"]),
        vec!["T_ORDER".to_string()]
    );
}

#[test]
fn find_binding_table_rule_by_member() {
    let rule = sharding_rule();

    let group = rule.find_binding_table_rule("T_ORDER_STATUS").unwrap();
    assert!(group.has_logic_table("t_order"));
    assert!(rule.find_binding_table_rule("t_user").is_none());
}

#[test]
fn sharding_column_classification() {
    let rule = sharding_rule();

    // Default database strategy column applies to any table.
    assert!(rule.is_sharding_column(&ColumnRef::new("t_order", "user_id")));
    assert!(rule.is_sharding_column(&ColumnRef::new("t_user", "user_id")));
    assert!(rule.is_sharding_column(&ColumnRef::new("unconfigured", "user_id")));

    // Per-table override applies only to the named table.
    assert!(rule.is_sharding_column(&ColumnRef::new("t_order", "order_id")));
    assert!(rule.is_sharding_column(&ColumnRef::new("T_ORDER", "order_id")));
    assert!(!rule.is_sharding_column(&ColumnRef::new("t_user", "order_id")));

    // Ordinary columns pass through.
    assert!(!rule.is_sharding_column(&ColumnRef::new("t_order", "note")));
}

#[test]
fn generate_key_column_lookup() {
    let rule = sharding_rule();

    // Case-insensitive on the table name.
    assert_eq!(rule.generate_key_column("t_order"), Some("order_id"));
    assert_eq!(rule.generate_key_column("T_ORDER"), Some("order_id"));

    // Configured table without a generated key, and an unknown table,
    // are indistinguishable through this lookup.
    assert_eq!(rule.generate_key_column("t_user"), None);
    assert_eq!(rule.generate_key_column("ghost"), None);
}

#[test]
fn binding_actual_table_correspondence() {
    let rule = sharding_rule();
    let group = rule.find_binding_table_rule("t_order").unwrap();

    assert_eq!(
        group.binding_actual_table("ds_0", "t_order_item", "t_order_1"),
        Some("t_order_item_1")
    );
    assert_eq!(
        group.binding_actual_table("ds_1", "t_order_status", "t_order_0"),
        Some("t_order_status_0")
    );
}

proptest! {
    // Resolution is a pure function of the immutable configuration:
    // repeated identical calls must agree, whatever the inputs.
    #[test]
    fn resolution_is_idempotent(
        table in "[a-zA-Z_][a-zA-Z0-9_]{0,12}",
        column in "[a-zA-Z_][a-zA-Z0-9_]{0,12}",
        joined in proptest::collection::vec("[a-zA-Z_][a-zA-Z0-9_]{0,12}", 0..4),
    ) {
        let rule = sharding_rule();
        let column_ref = ColumnRef::new(table.as_str(), column.as_str());

        let found = rule.try_find_table_rule(&table).map(|r| r.logic_table().to_string());
        let classified = rule.is_sharding_column(&column_ref);
        let key_column = rule.generate_key_column(&table).map(str::to_string);
        let all_bound = rule.is_all_binding_tables(&joined);
        let filtered = rule.filter_all_binding_tables(&joined);

        for _ in 0..3 {
            prop_assert_eq!(
                rule.try_find_table_rule(&table).map(|r| r.logic_table().to_string()),
                found.clone()
            );
            prop_assert_eq!(rule.is_sharding_column(&column_ref), classified);
            prop_assert_eq!(rule.generate_key_column(&table).map(str::to_string), key_column.clone());
            prop_assert_eq!(rule.is_all_binding_tables(&joined), all_bound);
            prop_assert_eq!(rule.filter_all_binding_tables(&joined), filtered.clone());
        }
    }
}
