use siftql_core::{error::CompileError, path::PathError};
use thiserror::Error as ThisError;

///
/// SearchError
///

#[derive(Debug, ThisError)]
pub enum SearchError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("cannot sort by '{property}': {source}")]
    Sort {
        property: String,
        #[source]
        source: PathError,
    },

    #[error("schema '{schema}' has no association named {}", .names.join(", "))]
    UnknownPropagation { schema: String, names: Vec<String> },

    #[error("page size must be at least 1")]
    EmptyPage,
}

impl SearchError {
    /// Selector or property the error is about, when there is one.
    #[must_use]
    pub fn selector(&self) -> Option<&str> {
        match self {
            Self::Compile(err) => Some(err.selector()),
            Self::Sort { property, .. } => Some(property),
            Self::UnknownPropagation { .. } | Self::EmptyPage => None,
        }
    }
}
