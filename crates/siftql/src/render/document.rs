//! Document-store renderer: a Mongo-style filter document over dotted
//! storage paths.

use crate::render::{RenderError, operand_label};
use serde_json::{Map, Value as Json, json};
use siftql_core::{
    predicate::{ComparePredicate, FilterExpr, MatchOp, Operand},
    value::{TypedValue, Value},
};

/// Render `expr` as a filter document.
pub fn render(expr: &FilterExpr) -> Result<Json, RenderError> {
    match expr {
        FilterExpr::And(children) => group(children, "$and", json!({})),
        FilterExpr::Or(children) => group(children, "$or", json!({ "$nor": [{}] })),
        FilterExpr::Compare(cmp) => compare(cmp),
    }
}

fn group(children: &[FilterExpr], operator: &str, empty: Json) -> Result<Json, RenderError> {
    match children {
        [] => Ok(empty),
        [only] => render(only),
        _ => {
            let parts = children.iter().map(render).collect::<Result<Vec<_>, _>>()?;
            let mut doc = Map::new();
            doc.insert(operator.to_string(), Json::Array(parts));

            Ok(Json::Object(doc))
        }
    }
}

fn compare(cmp: &ComparePredicate) -> Result<Json, RenderError> {
    let key = cmp.path.storage_path();
    let mismatch = || RenderError::new(cmp.path.dotted(), cmp.op, operand_label(&cmp.operand));

    let condition = match (cmp.op, &cmp.operand) {
        (MatchOp::IsNull, _) => Json::Null,
        (MatchOp::IsNotNull, _) => json!({ "$ne": null }),
        (MatchOp::Eq, Operand::Value(v)) => typed(v),
        (op, Operand::Value(v)) => {
            let operator = match op {
                MatchOp::Ne => "$ne",
                MatchOp::Gt => "$gt",
                MatchOp::Ge => "$gte",
                MatchOp::Lt => "$lt",
                MatchOp::Le => "$lte",
                _ => return Err(mismatch()),
            };
            json!({ operator: typed(v) })
        }
        (MatchOp::In, Operand::List(values)) => json!({ "$in": list(values) }),
        (MatchOp::NotIn, Operand::List(values)) => json!({ "$nin": list(values) }),
        (MatchOp::Like, Operand::Pattern(pattern)) => {
            json!({ "$regex": pattern.to_regex(), "$options": "i" })
        }
        (MatchOp::NotLike, Operand::Pattern(pattern)) => {
            json!({ "$not": { "$regex": pattern.to_regex(), "$options": "i" } })
        }
        (MatchOp::Between, Operand::Range { low, high }) => {
            json!({ "$gte": typed(low), "$lte": typed(high) })
        }
        _ => return Err(mismatch()),
    };

    let mut doc = Map::new();
    doc.insert(key, condition);

    Ok(Json::Object(doc))
}

fn list(values: &[TypedValue]) -> Vec<Json> {
    values.iter().map(typed).collect()
}

fn typed(value: &TypedValue) -> Json {
    to_json(&value.value)
}

// Integers that fit JSON numbers stay numbers; wide and exact numerics are
// written as text. Temporal values use the extended-JSON date wrapper.
fn to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(n) => json!(n),
        Value::Uint(n) => json!(n),
        Value::Year(n) => json!(n),
        Value::Float32(f) => finite_or_text(f64::from(*f), value),
        Value::Float64(f) => finite_or_text(*f, value),
        Value::ObjectId(oid) => json!({ "$oid": oid.to_string() }),
        Value::Date(_) | Value::DateTime(_) | Value::Instant(_) => {
            json!({ "$date": value.to_string() })
        }
        Value::List(items) => Json::Array(items.iter().map(to_json).collect()),
        Value::BigInt(_)
        | Value::Bytes(_)
        | Value::Char(_)
        | Value::Decimal(_)
        | Value::Duration(_)
        | Value::Enum(_)
        | Value::Int128(_)
        | Value::Period(_)
        | Value::Text(_)
        | Value::Time(_)
        | Value::Ulid(_)
        | Value::Uuid(_) => Json::String(value.to_string()),
    }
}

fn finite_or_text(f: f64, value: &Value) -> Json {
    serde_json::Number::from_f64(f).map_or_else(|| Json::String(value.to_string()), Json::Number)
}
