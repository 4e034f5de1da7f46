//! Path Resolver.
//!
//! Walks a dotted selector through a Schema Description. Scalars and element
//! collections end a selector; embedded groups continue transparently;
//! associations continue and mark the path as requiring a join.

#[cfg(test)]
mod tests;

use crate::{
    obs::sink::{MetricsEvent, record},
    schema::{Cardinality, FieldKind, SchemaDescription, SchemaField, TypeRef},
};
use dashmap::DashMap;
use std::{fmt, sync::Arc};
use thiserror::Error as ThisError;

///
/// PathError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PathError {
    #[error("unknown field '{field}' on {owner}")]
    UnknownField { field: String, owner: String },

    #[error("{kind} field '{field}' on {owner} must be the last segment")]
    NotTerminal {
        field: String,
        owner: String,
        kind: FieldKind,
    },

    #[error("selector ends on {kind} field '{field}' of {owner}; a scalar terminal is required")]
    Unterminated {
        field: String,
        owner: String,
        kind: FieldKind,
    },

    #[error("selector exceeds the maximum depth of {max} segments")]
    DepthExceeded { max: usize },

    #[error("selector '{selector}' contains an empty segment")]
    EmptySegment { selector: String },
}

///
/// SegmentKind
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SegmentKind {
    Scalar,
    Embedded,
    Association(Cardinality),
    ElementCollection,
}

impl SegmentKind {
    /// Segments a relational backend reaches through a join.
    #[must_use]
    pub const fn requires_join(self) -> bool {
        matches!(self, Self::Association(_) | Self::ElementCollection)
    }

    /// Segments that can fan one row out into several.
    #[must_use]
    pub const fn is_multi_valued(self) -> bool {
        matches!(
            self,
            Self::Association(Cardinality::Many) | Self::ElementCollection
        )
    }

    const fn of(field: &SchemaField) -> Self {
        match field.kind {
            FieldKind::Scalar => Self::Scalar,
            FieldKind::Embedded => Self::Embedded,
            FieldKind::Association => Self::Association(field.cardinality),
            FieldKind::ElementCollection => Self::ElementCollection,
        }
    }
}

///
/// Segment
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Segment {
    pub name: String,
    pub storage_name: String,
    pub kind: SegmentKind,
}

impl Segment {
    #[must_use]
    pub fn of(field: &SchemaField) -> Self {
        Self {
            name: field.name.clone(),
            storage_name: field.storage_name().to_string(),
            kind: SegmentKind::of(field),
        }
    }
}

///
/// ResolvedPath
///
/// Validated decomposition of a selector. Only the last segment is a
/// scalar or element collection; every earlier one is embedded or an
/// association.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedPath {
    owner: String,
    segments: Vec<Segment>,
    terminal: TypeRef,
    traverses_join: bool,
    multi_valued: bool,
}

impl ResolvedPath {
    /// Build from an already-walked segment list.
    #[must_use]
    pub fn from_segments(owner: impl Into<String>, segments: Vec<Segment>, terminal: TypeRef) -> Self {
        let traverses_join = segments.iter().any(|s| s.kind.requires_join());
        let multi_valued = segments.iter().any(|s| s.kind.is_multi_valued());

        Self {
            owner: owner.into(),
            segments,
            terminal,
            traverses_join,
            multi_valued,
        }
    }

    /// Name of the root schema the path was resolved against.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Declared type of the terminal field (element type for collections).
    #[must_use]
    pub const fn terminal(&self) -> &TypeRef {
        &self.terminal
    }

    #[must_use]
    pub const fn traverses_join(&self) -> bool {
        self.traverses_join
    }

    /// True when a to-many association or element collection is on the path.
    #[must_use]
    pub const fn multi_valued(&self) -> bool {
        self.multi_valued
    }

    /// Logical dotted form, e.g. `customer.address.city`.
    #[must_use]
    pub fn dotted(&self) -> String {
        self.join(|s| &s.name)
    }

    /// Dotted form over backend storage names.
    #[must_use]
    pub fn storage_path(&self) -> String {
        self.join(|s| &s.storage_name)
    }

    fn join<'a>(&'a self, part: impl Fn(&'a Segment) -> &'a String) -> String {
        self.segments
            .iter()
            .map(part)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted())
    }
}

///
/// PathResolver
///
/// Resolution is a pure function of (schema, selector), so results are
/// cached per `(schema id, selector)`.
///

#[derive(Debug)]
pub struct PathResolver {
    max_depth: usize,
    cache: DashMap<(u64, String), Arc<ResolvedPath>>,
}

impl PathResolver {
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            cache: DashMap::new(),
        }
    }

    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn resolve(
        &self,
        selector: &str,
        root: &SchemaDescription,
    ) -> Result<Arc<ResolvedPath>, PathError> {
        let key = (root.id(), selector.to_string());
        if let Some(hit) = self.cache.get(&key) {
            record(MetricsEvent::PathCache { hit: true });
            return Ok(Arc::clone(&hit));
        }
        record(MetricsEvent::PathCache { hit: false });

        let resolved = Arc::new(self.walk(selector, root)?);
        self.cache.insert(key, Arc::clone(&resolved));

        Ok(resolved)
    }

    fn walk(&self, selector: &str, root: &SchemaDescription) -> Result<ResolvedPath, PathError> {
        // Pending segments, next on top; aliases push their expansion.
        let mut pending = split_selector(selector)?;
        pending.reverse();

        let mut schema = root;
        let mut segments = Vec::new();
        let mut steps = 0usize;

        while let Some(name) = pending.pop() {
            steps += 1;
            if steps > self.max_depth {
                return Err(PathError::DepthExceeded {
                    max: self.max_depth,
                });
            }

            let Some(field) = schema.field(name) else {
                let Some(target) = schema.alias(name) else {
                    return Err(PathError::UnknownField {
                        field: name.to_string(),
                        owner: schema.name().to_string(),
                    });
                };
                let mut expansion = split_selector(target)?;
                expansion.reverse();
                pending.extend(expansion);
                continue;
            };

            let is_last = pending.is_empty();
            segments.push(Segment::of(field));

            if field.kind.is_terminal() {
                if !is_last {
                    return Err(PathError::NotTerminal {
                        field: field.name.clone(),
                        owner: schema.name().to_string(),
                        kind: field.kind,
                    });
                }

                return Ok(ResolvedPath::from_segments(
                    root.name(),
                    segments,
                    field.declared_type.clone(),
                ));
            }

            let nested = match (is_last, field.nested.as_deref()) {
                (false, Some(nested)) => nested,
                _ => {
                    return Err(PathError::Unterminated {
                        field: field.name.clone(),
                        owner: schema.name().to_string(),
                        kind: field.kind,
                    });
                }
            };
            schema = nested;
        }

        Err(PathError::EmptySegment {
            selector: selector.to_string(),
        })
    }
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new(crate::config::CompilerConfig::DEFAULT_MAX_PATH_DEPTH)
    }
}

fn split_selector(selector: &str) -> Result<Vec<&str>, PathError> {
    let parts: Vec<&str> = selector.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(PathError::EmptySegment {
            selector: selector.to_string(),
        });
    }

    Ok(parts)
}
