//! Backend renderers.
//!
//! Each renderer is a closed interpreter over `FilterExpr`: one function
//! per backend, matching on the tree directly.

#[cfg(feature = "document")]
pub mod document;
#[cfg(feature = "sql")]
pub mod sql;

use siftql_core::predicate::MatchOp;
use thiserror::Error as ThisError;

///
/// RenderError
///
/// A comparison whose operand shape does not fit its operator. The
/// predicate compiler never produces one; hand-built trees can.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("operator {op:?} on '{path}' cannot take a {operand} operand")]
pub struct RenderError {
    pub path: String,
    pub op: MatchOp,
    pub operand: &'static str,
}

impl RenderError {
    pub(crate) fn new(path: impl Into<String>, op: MatchOp, operand: &'static str) -> Self {
        Self {
            path: path.into(),
            op,
            operand,
        }
    }
}

#[cfg(any(feature = "sql", feature = "document"))]
pub(crate) const fn operand_label(operand: &siftql_core::predicate::Operand) -> &'static str {
    use siftql_core::predicate::Operand;

    match operand {
        Operand::None => "empty",
        Operand::Value(_) => "single-value",
        Operand::Range { .. } => "range",
        Operand::List(_) => "list",
        Operand::Pattern(_) => "pattern",
    }
}
