//! Core of siftql: schema descriptions, argument coercion, path resolution,
//! the predicate compiler and free-text traversal, all producing a
//! backend-agnostic `FilterExpr`.
#![warn(unreachable_pub)]

#[macro_use]
pub(crate) mod scalar_registry;

// public exports are one module level down
pub mod candidate;
pub mod coerce;
pub mod config;
pub mod error;
pub mod obs;
pub mod path;
pub mod predicate;
pub mod schema;
pub mod search;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, caches, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        predicate::{FilterExpr, FilterNode, MatchOp, Operand, Operator},
        schema::{
            Cardinality, CustomType, EnumMember, EnumModel, FieldKind, ScalarType,
            SchemaDescription, SchemaField, TypeRef,
        },
        value::{TypedValue, Value},
    };
}
