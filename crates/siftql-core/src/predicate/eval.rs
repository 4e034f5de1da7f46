use crate::{
    predicate::expr::{ComparePredicate, FilterExpr, MatchOp, Operand},
    value::{TypedValue, Value, strict_order_cmp, value_eq},
};
use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
};

///
/// FieldPresence
///
/// Result of reading a path from a row. Distinguishes a missing path from
/// a present one whose value may be `Value::Null`.
///

#[derive(Clone, Debug, PartialEq)]
pub enum FieldPresence {
    /// Path exists (multi-valued paths yield a `Value::List`).
    Present(Value),
    /// Path is not present on the row.
    Missing,
}

///
/// Row
///
/// Abstraction over an already-materialized record exposing values by
/// logical dotted path.
///

pub trait Row {
    fn field(&self, path: &str) -> FieldPresence;
}

impl<S: BuildHasher> Row for HashMap<String, Value, S> {
    fn field(&self, path: &str) -> FieldPresence {
        self.get(path)
            .cloned()
            .map_or(FieldPresence::Missing, FieldPresence::Present)
    }
}

impl Row for BTreeMap<String, Value> {
    fn field(&self, path: &str) -> FieldPresence {
        self.get(path)
            .cloned()
            .map_or(FieldPresence::Missing, FieldPresence::Present)
    }
}

///
/// Evaluate a compiled filter against a single row.
///
/// Comparisons against missing or null values are false, except the null
/// tests. A multi-valued path matches when any of its elements matches.
///
#[must_use]
pub fn eval<R: Row + ?Sized>(row: &R, expr: &FilterExpr) -> bool {
    match expr {
        FilterExpr::And(children) => children.iter().all(|child| eval(row, child)),
        FilterExpr::Or(children) => children.iter().any(|child| eval(row, child)),
        FilterExpr::Compare(cmp) => eval_compare(row, cmp),
    }
}

fn eval_compare<R: Row + ?Sized>(row: &R, cmp: &ComparePredicate) -> bool {
    let presence = row.field(&cmp.path.dotted());

    let is_null = match &presence {
        FieldPresence::Missing | FieldPresence::Present(Value::Null) => true,
        FieldPresence::Present(Value::List(items)) if cmp.path.multi_valued() => items.is_empty(),
        FieldPresence::Present(_) => false,
    };

    match cmp.op {
        MatchOp::IsNull => return is_null,
        MatchOp::IsNotNull => return !is_null,
        _ => {}
    }

    match presence {
        FieldPresence::Missing => false,
        FieldPresence::Present(Value::List(items)) if cmp.path.multi_valued() => items
            .iter()
            .any(|item| eval_scalar(item, cmp.op, &cmp.operand)),
        FieldPresence::Present(value) => eval_scalar(&value, cmp.op, &cmp.operand),
    }
}

fn eval_scalar(actual: &Value, op: MatchOp, operand: &Operand) -> bool {
    if actual.is_null() {
        return false;
    }

    match (op, operand) {
        (MatchOp::Eq, Operand::Value(v)) => value_eq(actual, &v.value),
        (MatchOp::Ne, Operand::Value(v)) => !value_eq(actual, &v.value),
        (MatchOp::Gt, Operand::Value(v)) => order_is(actual, v, |o| o == Ordering::Greater),
        (MatchOp::Ge, Operand::Value(v)) => order_is(actual, v, |o| o != Ordering::Less),
        (MatchOp::Lt, Operand::Value(v)) => order_is(actual, v, |o| o == Ordering::Less),
        (MatchOp::Le, Operand::Value(v)) => order_is(actual, v, |o| o != Ordering::Greater),
        (MatchOp::In, Operand::List(items)) => items.iter().any(|v| value_eq(actual, &v.value)),
        (MatchOp::NotIn, Operand::List(items)) => {
            !items.iter().any(|v| value_eq(actual, &v.value))
        }
        (MatchOp::Like, Operand::Pattern(p)) => actual.as_text().is_some_and(|t| p.matches(t)),
        (MatchOp::NotLike, Operand::Pattern(p)) => actual.as_text().is_some_and(|t| !p.matches(t)),
        (MatchOp::Between, Operand::Range { low, high }) => {
            order_is(actual, low, |o| o != Ordering::Less)
                && order_is(actual, high, |o| o != Ordering::Greater)
        }
        // Any other pairing is not produced by the compiler.
        _ => false,
    }
}

fn order_is(actual: &Value, bound: &TypedValue, accept: impl Fn(Ordering) -> bool) -> bool {
    strict_order_cmp(actual, &bound.value).is_some_and(accept)
}
