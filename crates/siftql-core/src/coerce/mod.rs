//! Type Coercion Engine.
//!
//! Converts raw textual operands into values of a field's declared type.
//! Conversion runs through an ordered strategy chain: caller-registered
//! strategies first, then the built-in chain (primitives, temporal,
//! identifiers and bytes, arrays, enumerations, named constructors). The
//! first strategy that accepts the target type owns the conversion; its
//! failure is final.

mod strategy;
mod temporal;


use crate::{
    schema::TypeRef,
    value::{TypedValue, Value},
};
use dashmap::DashMap;
use std::{fmt, sync::Arc};
use thiserror::Error as ThisError;

// re-exports
pub(crate) use strategy::parse_bool;
pub use strategy::{
    ArrayStrategy, EnumStrategy, IdentifierStrategy, NamedConstructorStrategy, PrimitiveStrategy,
};
pub use temporal::{TemporalStrategy, parse_duration, parse_period};

///
/// CoercionError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CoercionError {
    #[error("cannot coerce '{raw}' to {target}: {reason}")]
    Invalid {
        raw: String,
        target: String,
        reason: String,
    },

    #[error("operator '{op}' is not applicable to {target}")]
    OperatorNotApplicable { op: &'static str, target: String },

    #[error("operator '{op}' expects {expected} argument(s), found {found}")]
    Arity {
        op: &'static str,
        expected: &'static str,
        found: usize,
    },
}

impl CoercionError {
    pub(crate) fn invalid(raw: &str, target: &TypeRef, reason: impl fmt::Display) -> Self {
        Self::Invalid {
            raw: raw.to_string(),
            target: target.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn not_applicable(op: &'static str, target: &TypeRef) -> Self {
        Self::OperatorNotApplicable {
            op,
            target: target.to_string(),
        }
    }
}

///
/// CoercionStrategy
///
/// One link of the chain. Strategies are stateless; `accepts` must be a pure
/// function of the target type so routing can be cached.
///

pub trait CoercionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn accepts(&self, target: &TypeRef) -> bool;

    /// Convert a trimmed, non-blank operand.
    fn convert(&self, raw: &str, target: &TypeRef, coercer: &Coercer)
    -> Result<Value, CoercionError>;
}

///
/// Coercer
///
/// Finalized, immutable strategy chain. Routing (target type to strategy)
/// is cached in a concurrent map keyed by the full declared type, so two
/// enums sharing a name but not their members route independently.
/// Concurrent misses recompute the same index and the last insert wins.
///

pub struct Coercer {
    strategies: Vec<Arc<dyn CoercionStrategy>>,
    routes: DashMap<TypeRef, usize>,
}

impl Coercer {
    #[must_use]
    pub fn builder() -> CoercerBuilder {
        CoercerBuilder::default()
    }

    /// The built-in chain with no caller extensions.
    #[must_use]
    pub fn standard() -> Arc<Self> {
        Self::builder().build()
    }

    /// Coerce one operand. Blank input yields `Null`.
    pub fn coerce(&self, raw: &str, target: &TypeRef) -> Result<TypedValue, CoercionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(TypedValue::null(target.clone()));
        }

        let value = self.convert(trimmed, target)?;

        Ok(TypedValue::new(value, target.clone()))
    }

    pub fn coerce_all<S: AsRef<str>>(
        &self,
        raws: &[S],
        target: &TypeRef,
    ) -> Result<Vec<TypedValue>, CoercionError> {
        raws.iter()
            .map(|raw| self.coerce(raw.as_ref(), target))
            .collect()
    }

    /// Whether some strategy accepts `target`.
    #[must_use]
    pub fn covers(&self, target: &TypeRef) -> bool {
        self.route(target).is_some()
    }

    /// Name of the strategy that owns `target`, if any.
    #[must_use]
    pub fn strategy_for(&self, target: &TypeRef) -> Option<&'static str> {
        self.route(target).map(|i| self.strategies[i].name())
    }

    // Raw conversion on an already-trimmed, non-blank operand.
    pub(crate) fn convert(&self, raw: &str, target: &TypeRef) -> Result<Value, CoercionError> {
        let Some(index) = self.route(target) else {
            return Err(CoercionError::invalid(
                raw,
                target,
                "no coercion strategy accepts this type",
            ));
        };

        self.strategies[index].convert(raw, target, self)
    }

    fn route(&self, target: &TypeRef) -> Option<usize> {
        if let Some(index) = self.routes.get(target) {
            return Some(*index);
        }

        let index = self.strategies.iter().position(|s| s.accepts(target))?;
        self.routes.insert(target.clone(), index);

        Some(index)
    }
}

impl fmt::Debug for Coercer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coercer")
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

///
/// CoercerBuilder
///
/// Append-only registration of caller strategies, tried ahead of the
/// built-in chain in registration order. `build` finalizes the chain.
///

#[derive(Default)]
pub struct CoercerBuilder {
    custom: Vec<Arc<dyn CoercionStrategy>>,
}

impl CoercerBuilder {
    #[must_use]
    pub fn strategy(mut self, strategy: impl CoercionStrategy + 'static) -> Self {
        self.custom.push(Arc::new(strategy));
        self
    }

    /// Register a parser for exactly one declared type.
    #[must_use]
    pub fn parser(
        self,
        target: TypeRef,
        parse: impl Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        self.strategy(ExactTypeParser {
            target,
            parse: Box::new(parse),
        })
    }

    #[must_use]
    pub fn build(self) -> Arc<Coercer> {
        let mut strategies = self.custom;
        strategies.push(Arc::new(PrimitiveStrategy));
        strategies.push(Arc::new(TemporalStrategy));
        strategies.push(Arc::new(IdentifierStrategy));
        strategies.push(Arc::new(ArrayStrategy));
        strategies.push(Arc::new(EnumStrategy));
        strategies.push(Arc::new(NamedConstructorStrategy));

        Arc::new(Coercer {
            strategies,
            routes: DashMap::new(),
        })
    }
}

///
/// ExactTypeParser
///

type ParseFn = Box<dyn Fn(&str) -> Result<Value, String> + Send + Sync>;

struct ExactTypeParser {
    target: TypeRef,
    parse: ParseFn,
}

impl CoercionStrategy for ExactTypeParser {
    fn name(&self) -> &'static str {
        "custom-parser"
    }

    fn accepts(&self, target: &TypeRef) -> bool {
        *target == self.target
    }

    fn convert(&self, raw: &str, target: &TypeRef, _: &Coercer) -> Result<Value, CoercionError> {
        (self.parse)(raw).map_err(|reason| CoercionError::invalid(raw, target, reason))
    }
}
