use crate::{coerce::CoercionError, path::PathError, predicate::UnsupportedOperatorError};
use thiserror::Error as ThisError;

// re-exports
pub use crate::{config::ConfigError, schema::SchemaError};

///
/// CompileError
///
/// Failure compiling one comparison of an explicit filter. Carries the
/// offending selector so callers can point at the clause that broke.
/// There is no partial success: one failing clause fails the whole filter.
///

#[derive(Debug, ThisError)]
pub enum CompileError {
    #[error("selector '{selector}': {source}")]
    Path {
        selector: String,
        #[source]
        source: PathError,
    },

    #[error("selector '{selector}': {source}")]
    Coercion {
        selector: String,
        #[source]
        source: CoercionError,
    },

    #[error("selector '{selector}': {source}")]
    UnsupportedOperator {
        selector: String,
        #[source]
        source: UnsupportedOperatorError,
    },
}

impl CompileError {
    #[must_use]
    pub fn selector(&self) -> &str {
        match self {
            Self::Path { selector, .. }
            | Self::Coercion { selector, .. }
            | Self::UnsupportedOperator { selector, .. } => selector,
        }
    }

    pub(crate) fn path(selector: &str, source: PathError) -> Self {
        Self::Path {
            selector: selector.to_string(),
            source,
        }
    }

    pub(crate) fn coercion(selector: &str, source: CoercionError) -> Self {
        Self::Coercion {
            selector: selector.to_string(),
            source,
        }
    }

    pub(crate) fn unsupported(selector: &str, source: UnsupportedOperatorError) -> Self {
        Self::UnsupportedOperator {
            selector: selector.to_string(),
            source,
        }
    }
}
