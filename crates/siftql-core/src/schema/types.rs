use crate::value::{TypeFamily, Value};
use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

///
/// ScalarType
///
/// Closed set of scalar field types understood by the coercion engine.
/// Metadata for every variant lives in the scalar registry.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ScalarType {
    Text,
    Char,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Int128,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    Decimal,
    BigInt,
    Date,
    DateTime,
    Time,
    Instant,
    Duration,
    Period,
    Year,
    Uuid,
    Ulid,
    ObjectId,
    Bytes,
}

// Local helpers to expand the scalar registry into match arms.
macro_rules! scalar_all_from_registry {
    ( @entries $( ($scalar:ident, $family:expr, $value_pat:pat, name = $name:literal, supports_ordering = $ord:expr, range_widened = $rw:expr) ),* $(,)? ) => {
        &[ $( ScalarType::$scalar, )* ]
    };
}

macro_rules! scalar_family_from_registry {
    ( @args $self:expr; @entries $( ($scalar:ident, $family:expr, $value_pat:pat, name = $name:literal, supports_ordering = $ord:expr, range_widened = $rw:expr) ),* $(,)? ) => {
        match $self {
            $( ScalarType::$scalar => $family, )*
        }
    };
}

macro_rules! scalar_name_from_registry {
    ( @args $self:expr; @entries $( ($scalar:ident, $family:expr, $value_pat:pat, name = $name:literal, supports_ordering = $ord:expr, range_widened = $rw:expr) ),* $(,)? ) => {
        match $self {
            $( ScalarType::$scalar => $name, )*
        }
    };
}

macro_rules! scalar_from_name_from_registry {
    ( @args $name_in:expr; @entries $( ($scalar:ident, $family:expr, $value_pat:pat, name = $name:literal, supports_ordering = $ord:expr, range_widened = $rw:expr) ),* $(,)? ) => {
        match $name_in {
            $( $name => Some(ScalarType::$scalar), )*
            _ => None,
        }
    };
}

macro_rules! scalar_supports_ordering_from_registry {
    ( @args $self:expr; @entries $( ($scalar:ident, $family:expr, $value_pat:pat, name = $name:literal, supports_ordering = $ord:expr, range_widened = $rw:expr) ),* $(,)? ) => {
        match $self {
            $( ScalarType::$scalar => $ord, )*
        }
    };
}

macro_rules! scalar_range_widened_from_registry {
    ( @args $self:expr; @entries $( ($scalar:ident, $family:expr, $value_pat:pat, name = $name:literal, supports_ordering = $ord:expr, range_widened = $rw:expr) ),* $(,)? ) => {
        match $self {
            $( ScalarType::$scalar => $rw, )*
        }
    };
}

macro_rules! scalar_matches_value_from_registry {
    ( @args $self:expr, $value:expr; @entries $( ($scalar:ident, $family:expr, $value_pat:pat, name = $name:literal, supports_ordering = $ord:expr, range_widened = $rw:expr) ),* $(,)? ) => {
        match $self {
            $( ScalarType::$scalar => matches!($value, $value_pat), )*
        }
    };
}

impl ScalarType {
    pub const ALL: &'static [Self] = scalar_registry!(scalar_all_from_registry);

    #[must_use]
    pub const fn family(self) -> TypeFamily {
        scalar_registry!(scalar_family_from_registry, self)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        scalar_registry!(scalar_name_from_registry, self)
    }

    /// Look a scalar up by its registry name (`"i32"`, `"date"`, ...).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        scalar_registry!(scalar_from_name_from_registry, name)
    }

    #[must_use]
    pub const fn supports_ordering(self) -> bool {
        scalar_registry!(scalar_supports_ordering_from_registry, self)
    }

    /// Calendar-bearing scalars whose ordering compiles to a day range.
    #[must_use]
    pub const fn range_widened(self) -> bool {
        scalar_registry!(scalar_range_widened_from_registry, self)
    }

    /// Whether `value` is the runtime shape this scalar coerces into.
    #[must_use]
    pub const fn matches_value(self, value: &Value) -> bool {
        scalar_registry!(scalar_matches_value_from_registry, self, value)
    }

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self.family(), TypeFamily::Numeric)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

///
/// CandidateFn
///
/// Custom free-text predicate attached to an enumeration member.
///

pub type CandidateFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;

///
/// EnumMember
///

#[derive(Clone)]
pub struct EnumMember {
    pub name: String,
    pub ordinal: u32,
    pub candidate: Option<CandidateFn>,
}

impl EnumMember {
    #[must_use]
    pub fn new(name: impl Into<String>, ordinal: u32) -> Self {
        Self {
            name: name.into(),
            ordinal,
            candidate: None,
        }
    }

    #[must_use]
    pub fn with_candidate(mut self, f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.candidate = Some(Arc::new(f));
        self
    }

    /// Run the custom predicate, if any.
    #[must_use]
    pub fn is_candidate(&self, keyword: &str) -> bool {
        self.candidate.as_ref().is_some_and(|f| f(keyword))
    }
}

impl fmt::Debug for EnumMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumMember")
            .field("name", &self.name)
            .field("ordinal", &self.ordinal)
            .field("candidate", &self.candidate.is_some())
            .finish()
    }
}

impl PartialEq for EnumMember {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.ordinal == other.ordinal
    }
}

impl Eq for EnumMember {}

impl Hash for EnumMember {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.ordinal.hash(state);
    }
}

///
/// EnumModel
///
/// Declared member set of an enumeration type, in declaration order.
/// Identity is the name plus the full member list.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct EnumModel {
    pub name: String,
    pub members: Vec<EnumMember>,
}

impl EnumModel {
    /// Build from member names; ordinals follow declaration order.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members = members
            .into_iter()
            .zip(0u32..)
            .map(|(member, ordinal)| EnumMember::new(member, ordinal))
            .collect();

        Self {
            name: name.into(),
            members,
        }
    }

    #[must_use]
    pub fn from_members(name: impl Into<String>, members: Vec<EnumMember>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }

    /// Exact, case-sensitive member lookup.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.name == name)
    }
}

///
/// ConstructorFn
///
/// Named constructor for a caller-defined type: raw text in, value out.
///

pub type ConstructorFn = Arc<dyn Fn(&str) -> Result<Value, String> + Send + Sync>;

///
/// CustomType
///
/// A caller-defined scalar exposing a named constructor. Identity is the
/// type name.
///

#[derive(Clone)]
pub struct CustomType {
    pub name: String,
    pub orderable: bool,
    pub constructor: ConstructorFn,
}

impl CustomType {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        constructor: impl Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            orderable: false,
            constructor: Arc::new(constructor),
        }
    }

    #[must_use]
    pub const fn orderable(mut self, orderable: bool) -> Self {
        self.orderable = orderable;
        self
    }

    pub fn construct(&self, raw: &str) -> Result<Value, String> {
        (self.constructor)(raw)
    }
}

impl fmt::Debug for CustomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomType")
            .field("name", &self.name)
            .field("orderable", &self.orderable)
            .finish_non_exhaustive()
    }
}

impl PartialEq for CustomType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for CustomType {}

impl Hash for CustomType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

///
/// TypeRef
///
/// Declared type of a schema field.
///
/// Record → the nested schema of an embedded group or association, by name.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum TypeRef {
    Scalar(ScalarType),
    Array(Box<Self>),
    Enum(Arc<EnumModel>),
    Custom(Arc<CustomType>),
    Record(String),
}

impl TypeRef {
    #[must_use]
    pub fn array(element: impl Into<Self>) -> Self {
        Self::Array(Box::new(element.into()))
    }

    #[must_use]
    pub fn enumeration(model: EnumModel) -> Self {
        Self::Enum(Arc::new(model))
    }

    #[must_use]
    pub fn custom(custom: CustomType) -> Self {
        Self::Custom(Arc::new(custom))
    }

    #[must_use]
    pub const fn scalar(&self) -> Option<ScalarType> {
        match self {
            Self::Scalar(s) => Some(*s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn family(&self) -> TypeFamily {
        match self {
            Self::Scalar(s) => s.family(),
            Self::Array(_) => TypeFamily::Collection,
            Self::Enum(_) => TypeFamily::Enum,
            Self::Custom(_) => TypeFamily::Custom,
            Self::Record(_) => TypeFamily::Record,
        }
    }

    /// Whether `<`, `<=`, `>`, `>=` have a defined meaning for this type.
    #[must_use]
    pub fn supports_ordering(&self) -> bool {
        match self {
            Self::Scalar(s) => s.supports_ordering(),
            Self::Enum(_) => true,
            Self::Custom(c) => c.orderable,
            Self::Array(_) | Self::Record(_) => false,
        }
    }

    #[must_use]
    pub const fn range_widened(&self) -> bool {
        match self {
            Self::Scalar(s) => s.range_widened(),
            _ => false,
        }
    }

    /// Types a field may carry as the element of an element collection.
    #[must_use]
    pub const fn is_element_type(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::Enum(_) | Self::Custom(_))
    }
}

impl From<ScalarType> for TypeRef {
    fn from(value: ScalarType) -> Self {
        Self::Scalar(value)
    }
}

impl From<EnumModel> for TypeRef {
    fn from(value: EnumModel) -> Self {
        Self::enumeration(value)
    }
}

impl From<CustomType> for TypeRef {
    fn from(value: CustomType) -> Self {
        Self::custom(value)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => f.write_str(s.name()),
            Self::Array(inner) => write!(f, "array<{inner}>"),
            Self::Enum(model) => write!(f, "enum:{}", model.name),
            Self::Custom(custom) => write!(f, "custom:{}", custom.name),
            Self::Record(name) => write!(f, "record:{name}"),
        }
    }
}
