///
/// Scalar Registry
///
/// Single source of truth for scalar metadata shared across the core.
///

// NOTE: `range_widened` marks calendar-bearing scalars whose ordering
// comparisons compile to a bounded day range instead of a direct comparison.
// Time-of-day, Duration and Year order directly.
macro_rules! scalar_registry_entries {
    ($macro:ident $(, @args $($args:tt)+ )?) => {
        $macro! {
            $(
                @args $($args)+;
            )?
            @entries
            (Text, TypeFamily::Textual, Value::Text(_), name = "text", supports_ordering = true, range_widened = false),
            (Char, TypeFamily::Character, Value::Char(_), name = "char", supports_ordering = true, range_widened = false),
            (Bool, TypeFamily::Bool, Value::Bool(_), name = "bool", supports_ordering = true, range_widened = false),
            (Int8, TypeFamily::Numeric, Value::Int(_), name = "i8", supports_ordering = true, range_widened = false),
            (Int16, TypeFamily::Numeric, Value::Int(_), name = "i16", supports_ordering = true, range_widened = false),
            (Int32, TypeFamily::Numeric, Value::Int(_), name = "i32", supports_ordering = true, range_widened = false),
            (Int64, TypeFamily::Numeric, Value::Int(_), name = "i64", supports_ordering = true, range_widened = false),
            (Int128, TypeFamily::Numeric, Value::Int128(_), name = "i128", supports_ordering = true, range_widened = false),
            (Uint8, TypeFamily::Numeric, Value::Uint(_), name = "u8", supports_ordering = true, range_widened = false),
            (Uint16, TypeFamily::Numeric, Value::Uint(_), name = "u16", supports_ordering = true, range_widened = false),
            (Uint32, TypeFamily::Numeric, Value::Uint(_), name = "u32", supports_ordering = true, range_widened = false),
            (Uint64, TypeFamily::Numeric, Value::Uint(_), name = "u64", supports_ordering = true, range_widened = false),
            (Float32, TypeFamily::Numeric, Value::Float32(_), name = "f32", supports_ordering = true, range_widened = false),
            (Float64, TypeFamily::Numeric, Value::Float64(_), name = "f64", supports_ordering = true, range_widened = false),
            (Decimal, TypeFamily::Numeric, Value::Decimal(_), name = "decimal", supports_ordering = true, range_widened = false),
            (BigInt, TypeFamily::Numeric, Value::BigInt(_), name = "bigint", supports_ordering = true, range_widened = false),
            (Date, TypeFamily::Temporal, Value::Date(_), name = "date", supports_ordering = true, range_widened = true),
            (DateTime, TypeFamily::Temporal, Value::DateTime(_), name = "datetime", supports_ordering = true, range_widened = true),
            (Time, TypeFamily::Temporal, Value::Time(_), name = "time", supports_ordering = true, range_widened = false),
            (Instant, TypeFamily::Temporal, Value::Instant(_), name = "instant", supports_ordering = true, range_widened = true),
            (Duration, TypeFamily::Temporal, Value::Duration(_), name = "duration", supports_ordering = true, range_widened = false),
            (Period, TypeFamily::Temporal, Value::Period(_), name = "period", supports_ordering = false, range_widened = false),
            (Year, TypeFamily::Year, Value::Year(_), name = "year", supports_ordering = true, range_widened = false),
            (Uuid, TypeFamily::Identifier, Value::Uuid(_), name = "uuid", supports_ordering = true, range_widened = false),
            (Ulid, TypeFamily::Identifier, Value::Ulid(_), name = "ulid", supports_ordering = true, range_widened = false),
            (ObjectId, TypeFamily::Identifier, Value::ObjectId(_), name = "object_id", supports_ordering = true, range_widened = false),
            (Bytes, TypeFamily::Bytes, Value::Bytes(_), name = "bytes", supports_ordering = false, range_widened = false),
        }
    };
}

macro_rules! scalar_registry {
    ($macro:ident) => {
        scalar_registry_entries!($macro)
    };
    ($macro:ident, $($args:tt)+) => {
        scalar_registry_entries!($macro, @args $($args)+)
    };
}
