use crate::{
    coerce::{CoercionError, CoercionStrategy, Coercer},
    schema::{ScalarType, TypeRef},
    value::{EnumValue, ObjectId, Value},
};
use num_bigint::BigInt;
use rust_decimal::Decimal;
use std::{fmt::Display, str::FromStr};
use ulid::Ulid;
use uuid::Uuid;

// Parse with `FromStr`, mapping the error into the target's diagnostic.
fn parse_as<T>(raw: &str, target: &TypeRef) -> Result<T, CoercionError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse::<T>()
        .map_err(|err| CoercionError::invalid(raw, target, err))
}

///
/// PrimitiveStrategy
///
/// Text, characters, booleans, every numeric width, and years.
///

pub struct PrimitiveStrategy;

impl CoercionStrategy for PrimitiveStrategy {
    fn name(&self) -> &'static str {
        "primitive"
    }

    fn accepts(&self, target: &TypeRef) -> bool {
        matches!(
            target.scalar(),
            Some(
                ScalarType::Text
                    | ScalarType::Char
                    | ScalarType::Bool
                    | ScalarType::Int8
                    | ScalarType::Int16
                    | ScalarType::Int32
                    | ScalarType::Int64
                    | ScalarType::Int128
                    | ScalarType::Uint8
                    | ScalarType::Uint16
                    | ScalarType::Uint32
                    | ScalarType::Uint64
                    | ScalarType::Float32
                    | ScalarType::Float64
                    | ScalarType::Decimal
                    | ScalarType::BigInt
                    | ScalarType::Year
            )
        )
    }

    fn convert(&self, raw: &str, target: &TypeRef, _: &Coercer) -> Result<Value, CoercionError> {
        let Some(scalar) = target.scalar() else {
            return Err(CoercionError::invalid(raw, target, "not a primitive type"));
        };

        let value = match scalar {
            ScalarType::Text => Value::Text(raw.to_string()),
            ScalarType::Char => {
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Value::Char(c),
                    _ => {
                        return Err(CoercionError::invalid(
                            raw,
                            target,
                            "expected exactly one character",
                        ));
                    }
                }
            }
            ScalarType::Bool => Value::Bool(parse_bool(raw).ok_or_else(|| {
                CoercionError::invalid(raw, target, "expected 'true' or 'false'")
            })?),
            ScalarType::Int8 => Value::Int(parse_as::<i8>(raw, target)?.into()),
            ScalarType::Int16 => Value::Int(parse_as::<i16>(raw, target)?.into()),
            ScalarType::Int32 => Value::Int(parse_as::<i32>(raw, target)?.into()),
            ScalarType::Int64 => Value::Int(parse_as::<i64>(raw, target)?),
            ScalarType::Int128 => Value::Int128(parse_as::<i128>(raw, target)?),
            ScalarType::Uint8 => Value::Uint(parse_as::<u8>(raw, target)?.into()),
            ScalarType::Uint16 => Value::Uint(parse_as::<u16>(raw, target)?.into()),
            ScalarType::Uint32 => Value::Uint(parse_as::<u32>(raw, target)?.into()),
            ScalarType::Uint64 => Value::Uint(parse_as::<u64>(raw, target)?),
            ScalarType::Float32 => Value::Float32(parse_as::<f32>(raw, target)?),
            ScalarType::Float64 => Value::Float64(parse_as::<f64>(raw, target)?),
            ScalarType::Decimal => Value::Decimal(parse_decimal(raw, target)?),
            ScalarType::BigInt => Value::BigInt(parse_as::<BigInt>(raw, target)?),
            ScalarType::Year => Value::Year(parse_year(raw, target)?),
            _ => return Err(CoercionError::invalid(raw, target, "not a primitive type")),
        };

        Ok(value)
    }
}

/// Case-insensitive `true` / `false`; anything else is rejected.
#[must_use]
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_decimal(raw: &str, target: &TypeRef) -> Result<Decimal, CoercionError> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|err| CoercionError::invalid(raw, target, err))
}

fn parse_year(raw: &str, target: &TypeRef) -> Result<i32, CoercionError> {
    let year = parse_as::<i32>(raw, target)?;
    if (-9999..=9999).contains(&year) {
        Ok(year)
    } else {
        Err(CoercionError::invalid(raw, target, "year out of range"))
    }
}

///
/// IdentifierStrategy
///
/// UUID, ULID, object identifiers and raw byte sequences.
///

pub struct IdentifierStrategy;

impl CoercionStrategy for IdentifierStrategy {
    fn name(&self) -> &'static str {
        "identifier"
    }

    fn accepts(&self, target: &TypeRef) -> bool {
        matches!(
            target.scalar(),
            Some(ScalarType::Uuid | ScalarType::Ulid | ScalarType::ObjectId | ScalarType::Bytes)
        )
    }

    fn convert(&self, raw: &str, target: &TypeRef, _: &Coercer) -> Result<Value, CoercionError> {
        match target.scalar() {
            Some(ScalarType::Uuid) => Ok(Value::Uuid(parse_as::<Uuid>(raw, target)?)),
            Some(ScalarType::Ulid) => Ok(Value::Ulid(parse_as::<Ulid>(raw, target)?)),
            Some(ScalarType::ObjectId) => Ok(Value::ObjectId(parse_as::<ObjectId>(raw, target)?)),
            Some(ScalarType::Bytes) => Ok(Value::Bytes(raw.as_bytes().to_vec())),
            _ => Err(CoercionError::invalid(raw, target, "not an identifier type")),
        }
    }
}

///
/// ArrayStrategy
///
/// Comma-separated operands, each coerced against the element type.
///

pub struct ArrayStrategy;

impl CoercionStrategy for ArrayStrategy {
    fn name(&self) -> &'static str {
        "array"
    }

    fn accepts(&self, target: &TypeRef) -> bool {
        matches!(target, TypeRef::Array(_))
    }

    fn convert(
        &self,
        raw: &str,
        target: &TypeRef,
        coercer: &Coercer,
    ) -> Result<Value, CoercionError> {
        let TypeRef::Array(element) = target else {
            return Err(CoercionError::invalid(raw, target, "not an array type"));
        };

        let items = raw
            .split(',')
            .map(|part| coercer.coerce(part, element).map(|typed| typed.value))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Value::List(items))
    }
}

///
/// EnumStrategy
///
/// Exact, case-sensitive member-name lookup.
///

pub struct EnumStrategy;

impl CoercionStrategy for EnumStrategy {
    fn name(&self) -> &'static str {
        "enum"
    }

    fn accepts(&self, target: &TypeRef) -> bool {
        matches!(target, TypeRef::Enum(_))
    }

    fn convert(&self, raw: &str, target: &TypeRef, _: &Coercer) -> Result<Value, CoercionError> {
        let TypeRef::Enum(model) = target else {
            return Err(CoercionError::invalid(raw, target, "not an enum type"));
        };

        let member = model
            .member(raw)
            .ok_or_else(|| CoercionError::invalid(raw, target, "no member with this name"))?;

        Ok(Value::Enum(EnumValue::new(
            &model.name,
            &member.name,
            member.ordinal,
        )))
    }
}

///
/// NamedConstructorStrategy
///
/// Fallback for caller-defined types exposing a named constructor.
///

pub struct NamedConstructorStrategy;

impl CoercionStrategy for NamedConstructorStrategy {
    fn name(&self) -> &'static str {
        "named-constructor"
    }

    fn accepts(&self, target: &TypeRef) -> bool {
        matches!(target, TypeRef::Custom(_))
    }

    fn convert(&self, raw: &str, target: &TypeRef, _: &Coercer) -> Result<Value, CoercionError> {
        let TypeRef::Custom(custom) = target else {
            return Err(CoercionError::invalid(raw, target, "not a custom type"));
        };

        custom
            .construct(raw)
            .map_err(|reason| CoercionError::invalid(raw, target, reason))
    }
}
