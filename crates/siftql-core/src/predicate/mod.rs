//! Predicate Compiler.
//!
//! `ast` is the caller-facing filter tree, `expr` the compiled
//! backend-agnostic output, `compile` the lowering between them and `eval`
//! an in-memory interpreter of the output.

mod ast;
mod compile;
mod eval;
mod expr;

#[cfg(test)]
mod tests;

// re-exports
pub use ast::{Comparison, FilterNode, Operator, UnsupportedOperatorError};
pub use compile::PredicateCompiler;
pub use eval::{FieldPresence, Row, eval};
pub use expr::{ComparePredicate, FilterExpr, LikePattern, MatchOp, Operand, PatternPart};

pub(crate) use expr::casefold;
