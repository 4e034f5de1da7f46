use crate::{
    coerce::{CoercionError, CoercionStrategy, Coercer},
    schema::{ScalarType, TypeRef},
    value::{Period, Value},
};
use time::{
    Date, Duration, OffsetDateTime, PrimitiveDateTime, Time, format_description::BorrowedFormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};

// Tried in order; the first format that parses wins.
const DATE_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!("[year]-[month]-[day]"),
    format_description!("[day]/[month]/[year]"),
    format_description!("[day]-[month]-[year]"),
    format_description!("[month]/[day]/[year]"),
];

const DATETIME_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!(
        "[year]-[month]-[day]T[hour]:[minute][optional [:[second][optional [.[subsecond]]]]]"
    ),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]"),
    format_description!("[day]/[month]/[year] [hour]:[minute]:[second]"),
    format_description!("[day]/[month]/[year] [hour]:[minute]"),
];

const TIME_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!("[hour]:[minute]:[second][optional [.[subsecond]]]"),
    format_description!("[hour]:[minute]"),
];

const NANOS_PER_SECOND: i128 = 1_000_000_000;

///
/// TemporalStrategy
///
/// Dates, date-times, times of day, instants, durations and periods, each
/// attempted against several textual formats.
///

pub struct TemporalStrategy;

impl CoercionStrategy for TemporalStrategy {
    fn name(&self) -> &'static str {
        "temporal"
    }

    fn accepts(&self, target: &TypeRef) -> bool {
        matches!(
            target.scalar(),
            Some(
                ScalarType::Date
                    | ScalarType::DateTime
                    | ScalarType::Time
                    | ScalarType::Instant
                    | ScalarType::Duration
                    | ScalarType::Period
            )
        )
    }

    fn convert(&self, raw: &str, target: &TypeRef, _: &Coercer) -> Result<Value, CoercionError> {
        let parsed = match target.scalar() {
            Some(ScalarType::Date) => parse_date(raw).map(Value::Date),
            Some(ScalarType::DateTime) => parse_datetime(raw).map(Value::DateTime),
            Some(ScalarType::Time) => parse_time(raw).map(Value::Time),
            Some(ScalarType::Instant) => parse_instant(raw).map(Value::Instant),
            Some(ScalarType::Duration) => parse_duration(raw).map(Value::Duration),
            Some(ScalarType::Period) => parse_period(raw).map(Value::Period),
            _ => Err("not a temporal type".to_string()),
        };

        parsed.map_err(|reason| CoercionError::invalid(raw, target, reason))
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<Date, String> {
    DATE_FORMATS
        .iter()
        .find_map(|format| Date::parse(raw, format).ok())
        .ok_or_else(|| "unrecognized date format".to_string())
}

// Date-time formats first, then a bare date at the start of its day.
pub(crate) fn parse_datetime(raw: &str) -> Result<PrimitiveDateTime, String> {
    DATETIME_FORMATS
        .iter()
        .find_map(|format| PrimitiveDateTime::parse(raw, format).ok())
        .or_else(|| parse_date(raw).ok().map(Date::midnight))
        .ok_or_else(|| "unrecognized date-time format".to_string())
}

pub(crate) fn parse_time(raw: &str) -> Result<Time, String> {
    TIME_FORMATS
        .iter()
        .find_map(|format| Time::parse(raw, format).ok())
        .ok_or_else(|| "unrecognized time format".to_string())
}

// RFC 3339 first, then epoch milliseconds.
pub(crate) fn parse_instant(raw: &str) -> Result<OffsetDateTime, String> {
    if let Ok(instant) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(instant);
    }

    let millis = raw
        .parse::<i64>()
        .map_err(|_| "expected RFC 3339 or epoch milliseconds".to_string())?;

    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .map_err(|err| err.to_string())
}

/// Parse an ISO-8601 duration (`PnDTnHnMn.nS`), optionally signed.
pub fn parse_duration(raw: &str) -> Result<Duration, String> {
    let (negated, body) = split_designator(raw)?;
    let (date_part, time_part) = match body.find(['T', 't']) {
        Some(i) => (&body[..i], Some(&body[i + 1..])),
        None => (body, None),
    };

    let mut total: i128 = 0;
    let mut seen = false;

    for (number, _) in components(date_part, &['D'])? {
        let days = i128::from(parse_int::<i64>(number)?);
        total = add_nanos(total, days * 86_400 * NANOS_PER_SECOND)?;
        seen = true;
    }

    if let Some(time_part) = time_part {
        let parts = components(time_part, &['H', 'M', 'S'])?;
        if parts.is_empty() {
            return Err("empty time section after 'T'".to_string());
        }
        for (number, unit) in parts {
            let nanos = match unit {
                'H' => i128::from(parse_int::<i64>(number)?) * 3_600 * NANOS_PER_SECOND,
                'M' => i128::from(parse_int::<i64>(number)?) * 60 * NANOS_PER_SECOND,
                _ => parse_seconds(number)?,
            };
            total = add_nanos(total, nanos)?;
            seen = true;
        }
    }

    if !seen {
        return Err("duration has no components".to_string());
    }
    if negated {
        total = -total;
    }

    let secs = i64::try_from(total / NANOS_PER_SECOND).map_err(|_| "duration overflow")?;
    let nanos = i32::try_from(total % NANOS_PER_SECOND).map_err(|_| "duration overflow")?;

    Ok(Duration::new(secs, nanos))
}

/// Parse an ISO-8601 period (`PnYnMnWnD`), optionally signed. Weeks fold
/// into days.
pub fn parse_period(raw: &str) -> Result<Period, String> {
    let (negated, body) = split_designator(raw)?;
    let parts = components(body, &['Y', 'M', 'W', 'D'])?;
    if parts.is_empty() {
        return Err("period has no components".to_string());
    }

    let mut period = Period::ZERO;
    let mut weeks = 0i32;
    for (number, unit) in parts {
        let n = parse_int::<i32>(number)?;
        match unit {
            'Y' => period.years = n,
            'M' => period.months = n,
            'W' => weeks = n,
            _ => period.days = n,
        }
    }

    period.days = weeks
        .checked_mul(7)
        .and_then(|d| d.checked_add(period.days))
        .ok_or("period day overflow")?;

    if negated {
        period = Period::new(
            period.years.checked_neg().ok_or("period overflow")?,
            period.months.checked_neg().ok_or("period overflow")?,
            period.days.checked_neg().ok_or("period overflow")?,
        );
    }

    Ok(period)
}

// Strip an optional sign and the `P` designator.
fn split_designator(raw: &str) -> Result<(bool, &str), String> {
    let (negated, rest) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    rest.strip_prefix(['P', 'p'])
        .map(|body| (negated, body))
        .ok_or_else(|| "missing 'P' designator".to_string())
}

// Split `12Y-3M` into (number, unit) pairs. Units must come from `allowed`,
// in the order given there, each at most once.
fn components<'a>(s: &'a str, allowed: &[char]) -> Result<Vec<(&'a str, char)>, String> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut last_rank = None;

    for (i, c) in s.char_indices() {
        if !c.is_ascii_alphabetic() {
            continue;
        }

        let unit = c.to_ascii_uppercase();
        let rank = allowed
            .iter()
            .position(|&u| u == unit)
            .ok_or_else(|| format!("unexpected designator '{c}'"))?;
        if last_rank.is_some_and(|last| rank <= last) {
            return Err(format!("designator '{c}' out of order"));
        }

        let number = &s[start..i];
        if number.is_empty() {
            return Err(format!("designator '{c}' has no value"));
        }

        out.push((number, unit));
        last_rank = Some(rank);
        start = i + 1;
    }

    if start < s.len() {
        return Err(format!("dangling value '{}'", &s[start..]));
    }

    Ok(out)
}

fn parse_int<T: std::str::FromStr>(number: &str) -> Result<T, String> {
    number
        .parse::<T>()
        .map_err(|_| format!("invalid number '{number}'"))
}

// Seconds with an optional fraction of up to nine digits.
fn parse_seconds(number: &str) -> Result<i128, String> {
    let (whole, frac) = match number.split_once(['.', ',']) {
        Some((whole, frac)) => (whole, frac),
        None => (number, ""),
    };

    let negative = whole.starts_with('-');
    let secs = i128::from(parse_int::<i64>(whole)?);

    if frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid fractional seconds '{frac}'"));
    }
    let frac_nanos = if frac.is_empty() {
        0
    } else {
        let digits = parse_int::<i128>(frac)?;
        let scale = 10i128.pow(9 - u32::try_from(frac.len()).unwrap_or(9));
        digits * scale
    };

    let magnitude = secs.abs() * NANOS_PER_SECOND + frac_nanos;

    Ok(if negative { -magnitude } else { magnitude })
}

fn add_nanos(total: i128, nanos: i128) -> Result<i128, String> {
    total
        .checked_add(nanos)
        .ok_or_else(|| "duration overflow".to_string())
}
