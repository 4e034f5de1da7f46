use crate::{path::ResolvedPath, value::TypedValue};
use std::{fmt, sync::Arc};

///
/// FilterExpr
///
/// Backend-agnostic compiled filter, the only artifact handed to a backend
/// adapter. `And([])` always matches; `Or([])` never matches.
///

#[derive(Clone, Debug, PartialEq)]
pub enum FilterExpr {
    And(Vec<Self>),
    Or(Vec<Self>),
    Compare(ComparePredicate),
}

impl FilterExpr {
    #[must_use]
    pub const fn always() -> Self {
        Self::And(Vec::new())
    }

    #[must_use]
    pub const fn never() -> Self {
        Self::Or(Vec::new())
    }

    #[must_use]
    pub fn is_always(&self) -> bool {
        matches!(self, Self::And(children) if children.is_empty())
    }

    #[must_use]
    pub fn is_never(&self) -> bool {
        matches!(self, Self::Or(children) if children.is_empty())
    }

    /// Conjunction that collapses a single child.
    #[must_use]
    pub fn all(mut children: Vec<Self>) -> Self {
        if children.len() == 1 {
            children.remove(0)
        } else {
            Self::And(children)
        }
    }

    /// Every comparison in the tree, depth first.
    #[must_use]
    pub fn comparisons(&self) -> Vec<&ComparePredicate> {
        let mut out = Vec::new();
        self.collect_comparisons(&mut out);
        out
    }

    fn collect_comparisons<'a>(&'a self, out: &mut Vec<&'a ComparePredicate>) {
        match self {
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.collect_comparisons(out);
                }
            }
            Self::Compare(cmp) => out.push(cmp),
        }
    }

    /// Whether any referenced path can fan one row out into several.
    #[must_use]
    pub fn references_multi_valued(&self) -> bool {
        self.comparisons().iter().any(|c| c.path.multi_valued())
    }
}

///
/// MatchOp
///
/// Lowered comparison. Patterns are case-insensitive; `Between` bounds are
/// inclusive.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MatchOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    In,
    NotIn,
    Like,
    NotLike,
    IsNull,
    IsNotNull,
    Between,
}

impl MatchOp {
    #[must_use]
    pub const fn is_negated(self) -> bool {
        matches!(self, Self::Ne | Self::NotIn | Self::NotLike | Self::IsNotNull)
    }
}

///
/// Operand
///

#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    None,
    Value(TypedValue),
    Range { low: TypedValue, high: TypedValue },
    List(Vec<TypedValue>),
    Pattern(LikePattern),
}

impl Operand {
    /// Typed values carried by this operand, in order.
    #[must_use]
    pub fn values(&self) -> Vec<&TypedValue> {
        match self {
            Self::None | Self::Pattern(_) => Vec::new(),
            Self::Value(v) => vec![v],
            Self::Range { low, high } => vec![low, high],
            Self::List(items) => items.iter().collect(),
        }
    }
}

///
/// ComparePredicate
///

#[derive(Clone, Debug, PartialEq)]
pub struct ComparePredicate {
    pub path: Arc<ResolvedPath>,
    pub op: MatchOp,
    pub operand: Operand,
}

impl ComparePredicate {
    #[must_use]
    pub const fn new(path: Arc<ResolvedPath>, op: MatchOp, operand: Operand) -> Self {
        Self { path, op, operand }
    }
}

///
/// PatternPart
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PatternPart {
    /// Casefolded literal text.
    Literal(String),
    /// Any run of characters, possibly empty.
    AnyRun,
}

///
/// LikePattern
///
/// Case-insensitive wildcard pattern. Literals are stored casefolded;
/// adjacent wildcards collapse.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LikePattern {
    parts: Vec<PatternPart>,
}

impl LikePattern {
    /// Split `raw` on the wildcard marker.
    #[must_use]
    pub fn from_wildcard(raw: &str, wildcard: char) -> Self {
        let mut parts = Vec::new();
        for (i, literal) in raw.split(wildcard).enumerate() {
            if i > 0 && parts.last() != Some(&PatternPart::AnyRun) {
                parts.push(PatternPart::AnyRun);
            }
            if !literal.is_empty() {
                parts.push(PatternPart::Literal(casefold(literal)));
            }
        }

        Self { parts }
    }

    /// `*keyword*`: substring containment.
    #[must_use]
    pub fn contains(keyword: &str) -> Self {
        let mut parts = vec![PatternPart::AnyRun];
        if !keyword.is_empty() {
            parts.push(PatternPart::Literal(casefold(keyword)));
            parts.push(PatternPart::AnyRun);
        }

        Self { parts }
    }

    #[must_use]
    pub fn parts(&self) -> &[PatternPart] {
        &self.parts
    }

    /// True when the pattern holds no wildcard.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        !self.parts.contains(&PatternPart::AnyRun)
    }

    /// Case-insensitive match against `candidate`.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        let text = casefold(candidate);
        let last = self.parts.len().saturating_sub(1);
        let mut pos = 0usize;

        if self.parts.is_empty() {
            return text.is_empty();
        }

        for (i, part) in self.parts.iter().enumerate() {
            let PatternPart::Literal(lit) = part else {
                continue;
            };

            match (i == 0, i == last) {
                (true, true) => return text == *lit,
                (true, false) => {
                    if !text.starts_with(lit.as_str()) {
                        return false;
                    }
                    pos = lit.len();
                }
                (false, true) => {
                    return text.len() >= pos + lit.len() && text.ends_with(lit.as_str());
                }
                (false, false) => match text[pos..].find(lit.as_str()) {
                    Some(at) => pos += at + lit.len(),
                    None => return false,
                },
            }
        }

        true
    }

    /// SQL `LIKE` operand with `%` wildcards; literal `%`, `_` and the
    /// escape character are escaped with `escape`.
    #[must_use]
    pub fn to_sql_like(&self, escape: char) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                PatternPart::AnyRun => out.push('%'),
                PatternPart::Literal(lit) => {
                    for c in lit.chars() {
                        if c == '%' || c == '_' || c == escape {
                            out.push(escape);
                        }
                        out.push(c);
                    }
                }
            }
        }

        out
    }

    /// Anchored regular expression source (`^...$`), literals escaped.
    /// Case-insensitivity is left to the caller's regex options.
    #[must_use]
    pub fn to_regex(&self) -> String {
        let mut out = String::from("^");
        for part in &self.parts {
            match part {
                PatternPart::AnyRun => out.push_str(".*"),
                PatternPart::Literal(lit) => out.push_str(&regex::escape(lit)),
            }
        }
        out.push('$');

        out
    }
}

impl fmt::Display for LikePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            match part {
                PatternPart::AnyRun => f.write_str("*")?,
                PatternPart::Literal(lit) => f.write_str(lit)?,
            }
        }

        Ok(())
    }
}

/// Lowercase for case-insensitive comparison; ASCII takes the fast path.
#[must_use]
pub(crate) fn casefold(input: &str) -> String {
    if input.is_ascii() {
        return input.to_ascii_lowercase();
    }

    input.to_lowercase()
}
