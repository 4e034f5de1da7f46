use super::compile;
use crate::{
    predicate::{FieldPresence, FilterExpr, FilterNode, Row, eval},
    value::{EnumValue, Value},
};
use std::collections::BTreeMap;
use time::macros::date;

#[derive(Clone, Debug, Default)]
struct TestRow {
    fields: BTreeMap<String, Value>,
}

impl TestRow {
    fn with(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(path.to_string(), value.into());
        self
    }
}

impl Row for TestRow {
    fn field(&self, name: &str) -> FieldPresence {
        match self.fields.get(name) {
            Some(value) => FieldPresence::Present(value.clone()),
            None => FieldPresence::Missing,
        }
    }
}

fn order() -> TestRow {
    TestRow::default()
        .with("code", "ALICE-42")
        .with("paid", true)
        .with("quantity", 5i64)
        .with("placed_on", date!(2024 - 03 - 10))
        .with("priority", EnumValue::new("Priority", "HIGH", 2))
        .with(
            "tags",
            Value::List(vec![Value::from("gift"), Value::from("express")]),
        )
        .with(
            "items.quantity",
            Value::List(vec![Value::Int(1), Value::Int(12)]),
        )
}

fn holds(node: FilterNode) -> bool {
    eval(&order(), &compile(&node))
}

#[test]
fn boundary_constants() {
    assert!(eval(&order(), &FilterExpr::always()));
    assert!(!eval(&order(), &FilterExpr::never()));
}

#[test]
fn wildcard_equality_matches_case_insensitively() {
    assert!(holds(FilterNode::eq("code", "al*42")));
    assert!(!holds(FilterNode::eq("code", "bob*")));
    assert!(holds(FilterNode::ne("code", "bob*")));
}

#[test]
fn strict_date_inequality_has_day_granularity() {
    // placed_on = 2024-03-10
    assert!(!holds(FilterNode::gt("placed_on", "2024-03-10")));
    assert!(holds(FilterNode::gt("placed_on", "2024-03-09")));
    assert!(holds(FilterNode::ge("placed_on", "2024-03-10")));
    assert!(!holds(FilterNode::lt("placed_on", "2024-03-10")));
    assert!(holds(FilterNode::lt("placed_on", "2024-03-11")));
    assert!(holds(FilterNode::le("placed_on", "10/03/2024")));
}

#[test]
fn numeric_comparisons() {
    assert!(holds(FilterNode::gt("quantity", "4")));
    assert!(!holds(FilterNode::gt("quantity", "5")));
    assert!(holds(FilterNode::in_("quantity", ["3", "5"])));
    assert!(holds(FilterNode::not_in("quantity", ["3", "4"])));
}

#[test]
fn enum_candidates_match_members() {
    assert!(holds(FilterNode::eq("priority", "hi")));
    assert!(!holds(FilterNode::eq("priority", "LOW")));
}

#[test]
fn multi_valued_paths_match_any_element() {
    assert!(holds(FilterNode::eq("tags", "gif*")));
    assert!(holds(FilterNode::gt("items.quantity", "10")));
    assert!(!holds(FilterNode::gt("items.quantity", "20")));
}

#[test]
fn missing_and_null_fields() {
    assert!(holds(FilterNode::eq("total", "")));
    assert!(!holds(FilterNode::ne("total", "")));
    assert!(!holds(FilterNode::ne("total", "1.5")));
    assert!(holds(FilterNode::ne("paid", "")));
}

#[test]
fn logic_combinators() {
    assert!(holds(FilterNode::eq("paid", "true") & FilterNode::gt("quantity", "1")));
    assert!(!holds(FilterNode::eq("paid", "false") & FilterNode::gt("quantity", "1")));
    assert!(holds(FilterNode::eq("paid", "false") | FilterNode::gt("quantity", "1")));
}
