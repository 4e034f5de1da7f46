use std::{
    fmt,
    ops::{BitAnd, BitOr},
    str::FromStr,
};
use thiserror::Error as ThisError;

///
/// Filter AST
///
/// Already-parsed filter tree handed over by the grammar front end
/// (`;` = AND, `,` = OR, `selector OP value[,value...]`). Operators stay
/// textual here; the compiler maps them and rejects what it does not know.
///

///
/// Operator
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    In,
    NotIn,
}

impl Operator {
    pub const ALL: [Self; 8] = [
        Self::Eq,
        Self::Ne,
        Self::Gt,
        Self::Ge,
        Self::Lt,
        Self::Le,
        Self::In,
        Self::NotIn,
    ];

    /// Canonical symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::In => "=in=",
            Self::NotIn => "=out=",
        }
    }

    /// Accepts canonical symbols and their FIQL spellings.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "==" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            ">" | "=gt=" => Some(Self::Gt),
            ">=" | "=ge=" => Some(Self::Ge),
            "<" | "=lt=" => Some(Self::Lt),
            "<=" | "=le=" => Some(Self::Le),
            "=in=" => Some(Self::In),
            "=out=" => Some(Self::NotIn),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

///
/// UnsupportedOperatorError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("unsupported operator '{operator}', expected one of {}", supported_symbols())]
pub struct UnsupportedOperatorError {
    pub operator: String,
}

fn supported_symbols() -> String {
    Operator::ALL
        .iter()
        .map(|op| op.symbol())
        .collect::<Vec<_>>()
        .join(" ")
}

impl FromStr for Operator {
    type Err = UnsupportedOperatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbol(s).ok_or_else(|| UnsupportedOperatorError {
            operator: s.to_string(),
        })
    }
}

///
/// Comparison
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Comparison {
    pub selector: String,
    pub operator: String,
    pub arguments: Vec<String>,
}

///
/// FilterNode
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FilterNode {
    And(Vec<Self>),
    Or(Vec<Self>),
    Comparison(Comparison),
}

impl FilterNode {
    #[must_use]
    pub const fn and(children: Vec<Self>) -> Self {
        Self::And(children)
    }

    #[must_use]
    pub const fn or(children: Vec<Self>) -> Self {
        Self::Or(children)
    }

    /// Comparison with an operator symbol as written by the caller.
    #[must_use]
    pub fn comparison<I, S>(selector: impl Into<String>, operator: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Comparison(Comparison {
            selector: selector.into(),
            operator: operator.into(),
            arguments: args.into_iter().map(Into::into).collect(),
        })
    }

    #[must_use]
    pub fn cmp<I, S>(selector: impl Into<String>, op: Operator, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::comparison(selector, op.symbol(), args)
    }

    #[must_use]
    pub fn eq(selector: impl Into<String>, arg: impl Into<String>) -> Self {
        Self::cmp(selector, Operator::Eq, [arg.into()])
    }

    #[must_use]
    pub fn ne(selector: impl Into<String>, arg: impl Into<String>) -> Self {
        Self::cmp(selector, Operator::Ne, [arg.into()])
    }

    #[must_use]
    pub fn gt(selector: impl Into<String>, arg: impl Into<String>) -> Self {
        Self::cmp(selector, Operator::Gt, [arg.into()])
    }

    #[must_use]
    pub fn ge(selector: impl Into<String>, arg: impl Into<String>) -> Self {
        Self::cmp(selector, Operator::Ge, [arg.into()])
    }

    #[must_use]
    pub fn lt(selector: impl Into<String>, arg: impl Into<String>) -> Self {
        Self::cmp(selector, Operator::Lt, [arg.into()])
    }

    #[must_use]
    pub fn le(selector: impl Into<String>, arg: impl Into<String>) -> Self {
        Self::cmp(selector, Operator::Le, [arg.into()])
    }

    #[must_use]
    pub fn in_<I, S>(selector: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::cmp(selector, Operator::In, args)
    }

    #[must_use]
    pub fn not_in<I, S>(selector: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::cmp(selector, Operator::NotIn, args)
    }
}

impl BitAnd for FilterNode {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::And(vec![self, rhs])
    }
}

impl BitOr for FilterNode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::Or(vec![self, rhs])
    }
}
