use crate::{
    error::SearchError,
    options::{Direction, Pagination, SearchOptions},
};
use siftql_core::{
    coerce::Coercer,
    config::CompilerConfig,
    obs::CompileSpan,
    path::{PathResolver, ResolvedPath},
    predicate::{FilterExpr, PredicateCompiler},
    schema::SchemaDescription,
    search::{FreeTextSearch, unknown_propagations},
};
use std::sync::Arc;

///
/// ResolvedOrder
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedOrder {
    pub path: Arc<ResolvedPath>,
    pub direction: Direction,
}

///
/// CompiledSearch
///
/// The backend-neutral result of one search request. `distinct` is set
/// when any path in `filter` can fan a root row out into several.
///

#[derive(Clone, Debug, PartialEq)]
pub struct CompiledSearch {
    pub filter: FilterExpr,
    pub distinct: bool,
    pub sort: Vec<ResolvedOrder>,
    pub pagination: Option<Pagination>,
}

///
/// SearchCompiler
///
/// Compiles the keyword and the filter independently and joins the two
/// fragments with AND. Holds the path and target caches, so one compiler
/// should be shared across requests.
///

#[derive(Debug)]
pub struct SearchCompiler {
    config: CompilerConfig,
    predicates: PredicateCompiler,
    free_text: FreeTextSearch,
}

impl SearchCompiler {
    #[must_use]
    pub fn new(config: CompilerConfig, coercer: Arc<Coercer>) -> Self {
        let resolver = Arc::new(PathResolver::new(config.max_path_depth));
        let predicates =
            PredicateCompiler::with_resolver(config.clone(), Arc::clone(&coercer), resolver);
        let free_text = FreeTextSearch::new(config.clone(), coercer);

        Self {
            config,
            predicates,
            free_text,
        }
    }

    /// Default configuration and the built-in coercion chain.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(CompilerConfig::default(), Coercer::standard())
    }

    #[must_use]
    pub const fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn compile(
        &self,
        options: &SearchOptions,
        root: &SchemaDescription,
    ) -> Result<CompiledSearch, SearchError> {
        let mut span = CompileSpan::new(root.name());
        tracing::debug!(
            schema = root.name(),
            keyword = ?options.keyword,
            has_filter = options.filter.is_some(),
            "compiling search"
        );

        self.check_propagation(options, root)?;
        if options.pagination.is_some_and(|p| p.size == 0) {
            return Err(SearchError::EmptyPage);
        }

        let mut fragments = Vec::new();
        if let Some(keyword) = options.keyword.as_deref().filter(|k| !k.trim().is_empty()) {
            fragments.push(self.free_text.traverse(keyword, root, &options.propagate));
        }
        if let Some(filter) = &options.filter {
            fragments.push(self.predicates.compile(filter, root)?);
        }

        let filter = FilterExpr::all(fragments);
        let distinct = filter.references_multi_valued();
        let sort = options
            .sort
            .iter()
            .map(|order| {
                self.predicates
                    .resolver()
                    .resolve(&order.property, root)
                    .map(|path| ResolvedOrder {
                        path,
                        direction: order.direction,
                    })
                    .map_err(|source| SearchError::Sort {
                        property: order.property.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        span.succeed();

        Ok(CompiledSearch {
            filter,
            distinct,
            sort,
            pagination: options.pagination,
        })
    }

    fn check_propagation(
        &self,
        options: &SearchOptions,
        root: &SchemaDescription,
    ) -> Result<(), SearchError> {
        if !self.config.strict_propagation {
            return Ok(());
        }

        let names = unknown_propagations(root, &options.propagate);
        if names.is_empty() {
            Ok(())
        } else {
            Err(SearchError::UnknownPropagation {
                schema: root.name().to_string(),
                names,
            })
        }
    }
}

impl Default for SearchCompiler {
    fn default() -> Self {
        Self::standard()
    }
}
