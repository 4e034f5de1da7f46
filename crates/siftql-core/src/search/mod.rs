//! Free-Text Traversal.
//!
//! Turns a bare keyword into a disjunction of per-field matches. Embedded
//! groups are always visited; associations only when the caller names them
//! in the propagation set. A field whose heuristic fails is skipped.

mod heuristic;


use crate::{
    coerce::Coercer,
    config::CompilerConfig,
    obs::sink::{MetricsEvent, record},
    path::{ResolvedPath, Segment},
    predicate::{ComparePredicate, FilterExpr},
    schema::{FieldKind, SchemaDescription, SchemaField},
};
use dashmap::DashMap;
use std::{collections::BTreeSet, sync::Arc};

// re-exports
pub use heuristic::SearchHeuristic;

///
/// SearchTarget
///
/// One searchable leaf: the path reaching it and the heuristic its type
/// selects.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchTarget {
    pub path: Arc<ResolvedPath>,
    pub heuristic: SearchHeuristic,
}

type TargetKey = (u64, Vec<String>);

///
/// FreeTextSearch
///
/// The searchable leaves of a schema depend only on the schema and the
/// propagation set, so they are computed once per (schema id, propagation
/// set) pair and cached.
///

#[derive(Debug)]
pub struct FreeTextSearch {
    config: CompilerConfig,
    coercer: Arc<Coercer>,
    targets: DashMap<TargetKey, Arc<Vec<SearchTarget>>>,
}

impl FreeTextSearch {
    #[must_use]
    pub fn new(config: CompilerConfig, coercer: Arc<Coercer>) -> Self {
        Self {
            config,
            coercer,
            targets: DashMap::new(),
        }
    }

    /// Disjunction of every applicable field match for `keyword`.
    ///
    /// Always an `Or`; with no applicable field it is the never-matching
    /// empty disjunction.
    #[must_use]
    pub fn traverse(
        &self,
        keyword: &str,
        root: &SchemaDescription,
        propagate: &BTreeSet<String>,
    ) -> FilterExpr {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return FilterExpr::never();
        }

        for name in unknown_propagations(root, propagate) {
            tracing::debug!(
                schema = root.name(),
                field = name.as_str(),
                "propagation name is not an association; ignored"
            );
        }

        let targets = self.targets(root, propagate);
        let mut terms = Vec::new();

        for target in targets.iter() {
            let dotted = target.path.dotted();

            match target
                .heuristic
                .term(keyword, target.path.terminal(), &self.coercer)
            {
                Ok(Some((op, operand))) => {
                    tracing::trace!(
                        schema = root.name(),
                        field = dotted.as_str(),
                        heuristic = target.heuristic.name(),
                        "free-text term"
                    );
                    record(MetricsEvent::FreeTextTerm {
                        schema: root.name(),
                    });
                    terms.push(FilterExpr::Compare(ComparePredicate::new(
                        Arc::clone(&target.path),
                        op,
                        operand,
                    )));
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::trace!(
                        schema = root.name(),
                        field = dotted.as_str(),
                        error = %err,
                        "free-text field skipped"
                    );
                    record(MetricsEvent::FreeTextFieldSkipped {
                        schema: root.name(),
                        field: &dotted,
                    });
                }
            }
        }

        FilterExpr::Or(terms)
    }

    /// Searchable leaves of `root` under `propagate`, cached.
    pub fn targets(
        &self,
        root: &SchemaDescription,
        propagate: &BTreeSet<String>,
    ) -> Arc<Vec<SearchTarget>> {
        let key = (root.id(), propagate.iter().cloned().collect::<Vec<_>>());
        if let Some(hit) = self.targets.get(&key) {
            record(MetricsEvent::TargetCache { hit: true });
            return Arc::clone(&hit);
        }
        record(MetricsEvent::TargetCache { hit: false });

        let mut out = Vec::new();
        let mut prefix = Vec::new();
        self.collect(root, root, Some(propagate), &mut prefix, &mut out);

        let targets = Arc::new(out);
        self.targets.insert(key, Arc::clone(&targets));

        targets
    }

    // Depth-first over declaration order. `propagate` is only set while
    // walking the root schema itself.
    fn collect(
        &self,
        root: &SchemaDescription,
        schema: &SchemaDescription,
        propagate: Option<&BTreeSet<String>>,
        prefix: &mut Vec<Segment>,
        out: &mut Vec<SearchTarget>,
    ) {
        if prefix.len() >= self.config.max_path_depth {
            tracing::debug!(
                schema = root.name(),
                depth = prefix.len(),
                "free-text traversal depth limit reached"
            );
            return;
        }

        for field in schema.fields() {
            match field.kind {
                FieldKind::Scalar | FieldKind::ElementCollection => {
                    let Some(heuristic) = SearchHeuristic::for_type(&field.declared_type) else {
                        continue;
                    };
                    out.push(SearchTarget {
                        path: Arc::new(leaf(root, prefix, field)),
                        heuristic,
                    });
                }
                FieldKind::Embedded => {
                    if let Some(nested) = field.nested.as_deref() {
                        prefix.push(Segment::of(field));
                        self.collect(root, nested, None, prefix, out);
                        prefix.pop();
                    }
                }
                FieldKind::Association => {
                    let follows = propagate.is_some_and(|names| names.contains(&field.name));
                    if let (true, Some(nested)) = (follows, field.nested.as_deref()) {
                        prefix.push(Segment::of(field));
                        self.collect(root, nested, None, prefix, out);
                        prefix.pop();
                    }
                }
            }
        }
    }
}

fn leaf(root: &SchemaDescription, prefix: &[Segment], field: &SchemaField) -> ResolvedPath {
    let mut segments = prefix.to_vec();
    segments.push(Segment::of(field));

    ResolvedPath::from_segments(root.name(), segments, field.declared_type.clone())
}

/// Propagation names that do not name an association of `root`.
#[must_use]
pub fn unknown_propagations(root: &SchemaDescription, propagate: &BTreeSet<String>) -> Vec<String> {
    propagate
        .iter()
        .filter(|name| {
            root.field(name)
                .is_none_or(|field| field.kind != FieldKind::Association)
        })
        .cloned()
        .collect()
}
