//! ## Crate layout
//! - `core`: schema descriptions, coercion, path resolution, the predicate
//!   compiler and free-text traversal.
//! - `compiler`: combines a keyword and a filter into one compiled search.
//! - `options`: search options (keyword, propagation, filter, sort, paging).
//! - `render`: backend renderers for a compiled `FilterExpr`.
//!
//! The `prelude` module carries what a backend adapter needs to build
//! options and render the result.

pub use siftql_core as core;

pub mod compiler;
pub mod error;
pub mod options;
pub mod render;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use compiler::{CompiledSearch, ResolvedOrder, SearchCompiler};
pub use error::SearchError;
pub use options::{Direction, Pagination, SearchOptions, SortOrder};

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        compiler::{CompiledSearch, SearchCompiler},
        options::{Direction, Pagination, SearchOptions},
    };
    pub use siftql_core::prelude::*;
}
