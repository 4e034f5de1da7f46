use crate::{
    candidate::candidate_values,
    coerce::{Coercer, CoercionError, parse_bool},
    predicate::{LikePattern, MatchOp, Operand},
    schema::{ScalarType, TypeRef},
    value::{TypeFamily, TypedValue, Value},
};
use regex::Regex;
use std::sync::LazyLock;

static UUID_LITERAL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .ok()
});
static ULID_LITERAL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[0-7][0-9A-HJKMNP-TV-Za-hjkmnp-tv-z]{25}$").ok());
static OBJECT_ID_LITERAL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{24}$").ok());
static YEAR_LITERAL: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\d{4}$").ok());
static NUMERIC_LITERAL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d*\.?\d+$").ok());

fn is_match(pattern: &LazyLock<Option<Regex>>, keyword: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(keyword))
}

///
/// SearchHeuristic
///
/// How a free-text keyword turns into a term for one field, chosen once per
/// field from its declared type. Each heuristic either contributes a term,
/// declines (the keyword does not look like a value of the type), or fails.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SearchHeuristic {
    Substring,
    IdentifierLiteral(ScalarType),
    BooleanLiteral,
    YearLiteral,
    EnumCandidates,
    NumericEquality,
}

impl SearchHeuristic {
    /// Heuristic for a field type; `None` when the type is not searchable.
    #[must_use]
    pub fn for_type(ty: &TypeRef) -> Option<Self> {
        match ty.family() {
            TypeFamily::Textual => Some(Self::Substring),
            TypeFamily::Identifier => ty.scalar().map(Self::IdentifierLiteral),
            TypeFamily::Bool => Some(Self::BooleanLiteral),
            TypeFamily::Year => Some(Self::YearLiteral),
            TypeFamily::Enum => Some(Self::EnumCandidates),
            TypeFamily::Numeric => Some(Self::NumericEquality),
            TypeFamily::Character
            | TypeFamily::Temporal
            | TypeFamily::Bytes
            | TypeFamily::Collection
            | TypeFamily::Record
            | TypeFamily::Custom => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Substring => "substring",
            Self::IdentifierLiteral(_) => "identifier",
            Self::BooleanLiteral => "boolean",
            Self::YearLiteral => "year",
            Self::EnumCandidates => "enum-candidates",
            Self::NumericEquality => "numeric",
        }
    }

    /// Build the match for `keyword` (already trimmed, non-blank) against a
    /// field of type `ty`. `Ok(None)` means the heuristic does not apply.
    pub(crate) fn term(
        self,
        keyword: &str,
        ty: &TypeRef,
        coercer: &Coercer,
    ) -> Result<Option<(MatchOp, Operand)>, CoercionError> {
        let equals = |value: Value| {
            Some((
                MatchOp::Eq,
                Operand::Value(TypedValue::new(value, ty.clone())),
            ))
        };

        match self {
            Self::Substring => Ok(Some((
                MatchOp::Like,
                Operand::Pattern(LikePattern::contains(keyword)),
            ))),

            Self::IdentifierLiteral(scalar) => {
                let pattern = match scalar {
                    ScalarType::Uuid => &UUID_LITERAL,
                    ScalarType::Ulid => &ULID_LITERAL,
                    ScalarType::ObjectId => &OBJECT_ID_LITERAL,
                    _ => return Ok(None),
                };
                if !is_match(pattern, keyword) {
                    return Ok(None);
                }

                Ok(equals(coercer.convert(keyword, ty)?))
            }

            Self::BooleanLiteral => Ok(parse_bool(keyword).and_then(|b| equals(Value::Bool(b)))),

            Self::YearLiteral => {
                if !is_match(&YEAR_LITERAL, keyword) {
                    return Ok(None);
                }

                Ok(equals(coercer.convert(keyword, ty)?))
            }

            Self::EnumCandidates => {
                let TypeRef::Enum(model) = ty else {
                    return Ok(None);
                };
                let candidates = candidate_values(model, keyword);
                if candidates.is_empty() {
                    return Ok(None);
                }

                let list = candidates
                    .into_iter()
                    .map(|v| TypedValue::new(Value::Enum(v), ty.clone()))
                    .collect();

                Ok(Some((MatchOp::In, Operand::List(list))))
            }

            Self::NumericEquality => {
                if !is_match(&NUMERIC_LITERAL, keyword) {
                    return Ok(None);
                }

                Ok(equals(coercer.convert(keyword, ty)?))
            }
        }
    }
}
