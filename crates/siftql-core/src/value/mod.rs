mod compare;
mod family;
mod object_id;
mod period;


use crate::schema::TypeRef;
use num_bigint::BigInt;
use rust_decimal::Decimal;
use std::fmt;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};
use ulid::Ulid;
use uuid::Uuid;

// re-exports
pub use compare::strict_order_cmp;
pub(crate) use compare::value_eq;
pub use family::TypeFamily;
pub use object_id::{ObjectId, ObjectIdError};
pub use period::Period;

///
/// Value
///
/// A coerced operand. Every variant has a canonical textual form (its
/// `Display`) that the coercion engine accepts back for the same target type.
///
/// Null → the argument was blank, or the literal `null` under equality.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    BigInt(BigInt),
    Bool(bool),
    Bytes(Vec<u8>),
    Char(char),
    Date(Date),
    DateTime(PrimitiveDateTime),
    Decimal(Decimal),
    Duration(time::Duration),
    Enum(EnumValue),
    Float32(f32),
    Float64(f64),
    Instant(OffsetDateTime),
    Int(i64),
    Int128(i128),
    /// Ordered list of values, produced by array coercion.
    List(Vec<Self>),
    Null,
    ObjectId(ObjectId),
    Period(Period),
    Text(String),
    Time(Time),
    Uint(u64),
    Ulid(Ulid),
    Uuid(Uuid),
    Year(i32),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Self::Enum(v) => Some(v),
            _ => None,
        }
    }

    /// Short variant label for diagnostics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::BigInt(_) => "bigint",
            Self::Bool(_) => "bool",
            Self::Bytes(_) => "bytes",
            Self::Char(_) => "char",
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
            Self::Decimal(_) => "decimal",
            Self::Duration(_) => "duration",
            Self::Enum(_) => "enum",
            Self::Float32(_) => "f32",
            Self::Float64(_) => "f64",
            Self::Instant(_) => "instant",
            Self::Int(_) => "int",
            Self::Int128(_) => "i128",
            Self::List(_) => "list",
            Self::Null => "null",
            Self::ObjectId(_) => "object_id",
            Self::Period(_) => "period",
            Self::Text(_) => "text",
            Self::Time(_) => "time",
            Self::Uint(_) => "uint",
            Self::Ulid(_) => "ulid",
            Self::Uuid(_) => "uuid",
            Self::Year(_) => "year",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BigInt(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Bytes(v) => f.write_str(&String::from_utf8_lossy(v)),
            Self::Char(v) => write!(f, "{v}"),
            Self::Date(v) => write_date(f, *v),
            Self::DateTime(v) => {
                write_date(f, v.date())?;
                f.write_str("T")?;
                write_time(f, v.time())
            }
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Duration(v) => write_duration(f, *v),
            Self::Enum(v) => f.write_str(&v.member),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Instant(v) => {
                let utc = v.to_offset(UtcOffset::UTC);
                write_date(f, utc.date())?;
                f.write_str("T")?;
                write_time(f, utc.time())?;
                f.write_str("Z")
            }
            Self::Int(v) => write!(f, "{v}"),
            Self::Int128(v) => write!(f, "{v}"),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Self::Null => Ok(()),
            Self::ObjectId(v) => write!(f, "{v}"),
            Self::Period(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Time(v) => write_time(f, *v),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Ulid(v) => write!(f, "{v}"),
            Self::Uuid(v) => write!(f, "{}", v.hyphenated()),
            Self::Year(v) if *v < 0 => write!(f, "-{:04}", v.unsigned_abs()),
            Self::Year(v) => write!(f, "{v:04}"),
        }
    }
}

// Four-digit year with a leading sign only when negative: `-0005-01-01`.
fn write_date(f: &mut fmt::Formatter<'_>, date: Date) -> fmt::Result {
    if date.year() < 0 {
        f.write_str("-")?;
    }
    write!(
        f,
        "{:04}-{:02}-{:02}",
        date.year().unsigned_abs(),
        u8::from(date.month()),
        date.day()
    )
}

fn write_time(f: &mut fmt::Formatter<'_>, time: Time) -> fmt::Result {
    write!(
        f,
        "{:02}:{:02}:{:02}",
        time.hour(),
        time.minute(),
        time.second()
    )?;
    match time.nanosecond() {
        0 => Ok(()),
        nanos => write!(f, ".{nanos:09}"),
    }
}

// ISO-8601 seconds form, sign in front: `PT90S`, `-PT1.5S`.
fn write_duration(f: &mut fmt::Formatter<'_>, duration: time::Duration) -> fmt::Result {
    if duration.is_negative() {
        f.write_str("-")?;
    }
    let secs = duration.whole_seconds().unsigned_abs();
    let nanos = duration.subsec_nanoseconds().unsigned_abs();

    if nanos == 0 {
        write!(f, "PT{secs}S")
    } else {
        write!(f, "PT{secs}.{nanos:09}S")
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Uint(value)
    }
}

impl From<Date> for Value {
    fn from(value: Date) -> Self {
        Self::Date(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<EnumValue> for Value {
    fn from(value: EnumValue) -> Self {
        Self::Enum(value)
    }
}

///
/// EnumValue
///
/// A resolved enumeration member. Ordering follows the declaration ordinal,
/// so two members of the same enum compare the way the enum declares them.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct EnumValue {
    pub enum_name: String,
    pub member: String,
    pub ordinal: u32,
}

impl EnumValue {
    #[must_use]
    pub fn new(enum_name: impl Into<String>, member: impl Into<String>, ordinal: u32) -> Self {
        Self {
            enum_name: enum_name.into(),
            member: member.into(),
            ordinal,
        }
    }
}

impl PartialOrd for EnumValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        if self.enum_name == other.enum_name {
            Some(self.ordinal.cmp(&other.ordinal))
        } else {
            None
        }
    }
}

///
/// TypedValue
///
/// A coerced value paired with the declared type it was coerced against,
/// so a renderer never has to re-inspect the schema.
///

#[derive(Clone, Debug, PartialEq)]
pub struct TypedValue {
    pub value: Value,
    pub declared: TypeRef,
}

impl TypedValue {
    #[must_use]
    pub const fn new(value: Value, declared: TypeRef) -> Self {
        Self { value, declared }
    }

    #[must_use]
    pub fn null(declared: TypeRef) -> Self {
        Self::new(Value::Null, declared)
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.value.is_null()
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
