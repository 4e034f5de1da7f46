//! Schema Description: the read-only field model the compiler walks.
//!
//! Descriptions are built once by a backend adapter (from ORM metadata, a
//! document mapping, or by hand) and shared behind `Arc`. Nested schemas are
//! attached by `Arc` at build time, so a description graph is acyclic by
//! construction. Only aliases can introduce loops; the path resolver bounds
//! those with its depth limit.

mod types;

#[cfg(test)]
mod tests;

use derive_more::Display;
use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use thiserror::Error as ThisError;

// re-exports
pub use types::{
    CandidateFn, ConstructorFn, CustomType, EnumMember, EnumModel, ScalarType, TypeRef,
};

///
/// SchemaError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SchemaError {
    #[error("schema '{schema}' declares field '{field}' more than once")]
    DuplicateField { schema: String, field: String },

    #[error("field '{schema}.{field}' of kind {kind} {problem}")]
    NestedMismatch {
        schema: String,
        field: String,
        kind: FieldKind,
        problem: &'static str,
    },

    #[error("field '{schema}.{field}' of kind {kind} cannot have cardinality {cardinality}")]
    CardinalityMismatch {
        schema: String,
        field: String,
        kind: FieldKind,
        cardinality: Cardinality,
    },

    #[error("element collection '{schema}.{field}' has non-scalar element type {found}")]
    InvalidElementType {
        schema: String,
        field: String,
        found: TypeRef,
    },

    #[error("alias '{alias}' on schema '{schema}' shadows a declared field")]
    AliasShadowsField { schema: String, alias: String },

    #[error("alias '{alias}' on schema '{schema}' points at unknown selector '{target}'")]
    UnknownAliasTarget {
        schema: String,
        alias: String,
        target: String,
    },
}

///
/// Cardinality
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Cardinality {
    #[display("single")]
    Single,
    #[display("many")]
    Many,
}

///
/// FieldKind
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum FieldKind {
    #[display("scalar")]
    Scalar,
    #[display("embedded")]
    Embedded,
    #[display("association")]
    Association,
    #[display("element-collection")]
    ElementCollection,
}

impl FieldKind {
    /// Kinds that must end a selector.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Scalar | Self::ElementCollection)
    }

    /// Kinds that carry a nested schema.
    #[must_use]
    pub const fn has_nested(self) -> bool {
        matches!(self, Self::Embedded | Self::Association)
    }
}

///
/// SchemaField
///

#[derive(Clone, Debug)]
pub struct SchemaField {
    pub name: String,
    pub storage_name: Option<String>,
    pub declared_type: TypeRef,
    pub cardinality: Cardinality,
    pub kind: FieldKind,
    pub nested: Option<Arc<SchemaDescription>>,
}

impl SchemaField {
    /// General constructor; consistency is checked by `SchemaBuilder::build`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        declared_type: TypeRef,
        cardinality: Cardinality,
        kind: FieldKind,
        nested: Option<Arc<SchemaDescription>>,
    ) -> Self {
        Self {
            name: name.into(),
            storage_name: None,
            declared_type,
            cardinality,
            kind,
            nested,
        }
    }

    #[must_use]
    pub fn scalar(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self::new(name, ty.into(), Cardinality::Single, FieldKind::Scalar, None)
    }

    /// A collection of scalar values owned by the entity.
    #[must_use]
    pub fn element_collection(name: impl Into<String>, element: impl Into<TypeRef>) -> Self {
        Self::new(
            name,
            element.into(),
            Cardinality::Many,
            FieldKind::ElementCollection,
            None,
        )
    }

    #[must_use]
    pub fn embedded(name: impl Into<String>, nested: Arc<SchemaDescription>) -> Self {
        let ty = TypeRef::Record(nested.name.clone());
        Self::new(name, ty, Cardinality::Single, FieldKind::Embedded, Some(nested))
    }

    #[must_use]
    pub fn association(
        name: impl Into<String>,
        cardinality: Cardinality,
        nested: Arc<SchemaDescription>,
    ) -> Self {
        let ty = TypeRef::Record(nested.name.clone());
        Self::new(name, ty, cardinality, FieldKind::Association, Some(nested))
    }

    #[must_use]
    pub fn with_storage_name(mut self, storage_name: impl Into<String>) -> Self {
        self.storage_name = Some(storage_name.into());
        self
    }

    /// Backend name, falling back to the logical name.
    #[must_use]
    pub fn storage_name(&self) -> &str {
        self.storage_name.as_deref().unwrap_or(&self.name)
    }
}

///
/// SchemaDescription
///
/// Each `build` assigns a fresh identity, so two descriptions that share a
/// name but were built separately never share cached resolutions.
///

#[derive(Clone, Debug)]
pub struct SchemaDescription {
    id: u64,
    name: String,
    fields: Vec<SchemaField>,
    index: HashMap<String, usize>,
    aliases: BTreeMap<String, String>,
}

impl SchemaDescription {
    #[must_use]
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Build identity. Clones keep it.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    #[must_use]
    pub fn alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

static NEXT_SCHEMA_ID: AtomicU64 = AtomicU64::new(0);

///
/// SchemaBuilder
///

#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<SchemaField>,
    aliases: BTreeMap<String, String>,
}

impl SchemaBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            aliases: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, field: SchemaField) -> Self {
        self.fields.push(field);
        self
    }

    /// Map a selector segment onto a dotted path relative to this schema.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), target.into());
        self
    }

    pub fn build(self) -> Result<Arc<SchemaDescription>, SchemaError> {
        let mut index = HashMap::with_capacity(self.fields.len());

        for (i, field) in self.fields.iter().enumerate() {
            if index.insert(field.name.clone(), i).is_some() {
                return Err(SchemaError::DuplicateField {
                    schema: self.name.clone(),
                    field: field.name.clone(),
                });
            }
            validate_field(&self.name, field)?;
        }

        for (alias, target) in &self.aliases {
            if index.contains_key(alias) {
                return Err(SchemaError::AliasShadowsField {
                    schema: self.name.clone(),
                    alias: alias.clone(),
                });
            }

            let head = target.split('.').next().unwrap_or_default();
            if head.is_empty() || !(index.contains_key(head) || self.aliases.contains_key(head)) {
                return Err(SchemaError::UnknownAliasTarget {
                    schema: self.name.clone(),
                    alias: alias.clone(),
                    target: target.clone(),
                });
            }
        }

        Ok(Arc::new(SchemaDescription {
            id: NEXT_SCHEMA_ID.fetch_add(1, Ordering::Relaxed),
            name: self.name,
            fields: self.fields,
            index,
            aliases: self.aliases,
        }))
    }
}

fn validate_field(schema: &str, field: &SchemaField) -> Result<(), SchemaError> {
    let nested_err = |problem| SchemaError::NestedMismatch {
        schema: schema.to_string(),
        field: field.name.clone(),
        kind: field.kind,
        problem,
    };

    match (field.kind.has_nested(), field.nested.is_some()) {
        (true, false) => return Err(nested_err("requires a nested schema")),
        (false, true) => return Err(nested_err("must not carry a nested schema")),
        _ => {}
    }

    let cardinality_ok = match field.kind {
        FieldKind::Scalar | FieldKind::Embedded => field.cardinality == Cardinality::Single,
        FieldKind::ElementCollection => field.cardinality == Cardinality::Many,
        FieldKind::Association => true,
    };
    if !cardinality_ok {
        return Err(SchemaError::CardinalityMismatch {
            schema: schema.to_string(),
            field: field.name.clone(),
            kind: field.kind,
            cardinality: field.cardinality,
        });
    }

    if field.kind == FieldKind::ElementCollection && !field.declared_type.is_element_type() {
        return Err(SchemaError::InvalidElementType {
            schema: schema.to_string(),
            field: field.name.clone(),
            found: field.declared_type.clone(),
        });
    }

    Ok(())
}
