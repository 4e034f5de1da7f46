//! Relational renderer: path joins, a WHERE clause with positional `?`
//! parameters, and the parameter list in placeholder order.

use crate::render::{RenderError, operand_label};
use siftql_core::{
    path::{ResolvedPath, SegmentKind},
    predicate::{ComparePredicate, FilterExpr, MatchOp, Operand},
    value::{TypedValue, Value},
};
use std::fmt;

/// Alias of the root entity in the rendered clause.
pub const ROOT_ALIAS: &str = "e";

/// Escape character for `LIKE` operands.
pub const LIKE_ESCAPE: char = '\\';

///
/// SqlJoin
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SqlJoin {
    /// Dotted source, `alias.member[.member...]`.
    pub source: String,
    pub alias: String,
}

impl fmt::Display for SqlJoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LEFT JOIN {} AS {}", self.source, self.alias)
    }
}

///
/// SqlFilter
///

#[derive(Clone, Debug, PartialEq)]
pub struct SqlFilter {
    pub joins: Vec<SqlJoin>,
    pub where_clause: String,
    pub params: Vec<TypedValue>,
}

impl SqlFilter {
    /// Join clauses, space-separated, in first-use order.
    #[must_use]
    pub fn join_clause(&self) -> String {
        self.joins
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Render `expr` into joins, a WHERE clause and its parameters.
pub fn render(expr: &FilterExpr) -> Result<SqlFilter, RenderError> {
    let mut out = Renderer::default();
    let where_clause = out.expr(expr)?;

    Ok(SqlFilter {
        joins: out.joins,
        where_clause,
        params: out.params,
    })
}

#[derive(Default)]
struct Renderer {
    joins: Vec<SqlJoin>,
    params: Vec<TypedValue>,
}

impl Renderer {
    fn expr(&mut self, expr: &FilterExpr) -> Result<String, RenderError> {
        match expr {
            FilterExpr::And(children) => self.group(children, " AND ", "1=1"),
            FilterExpr::Or(children) => self.group(children, " OR ", "1=0"),
            FilterExpr::Compare(cmp) => self.compare(cmp),
        }
    }

    fn group(
        &mut self,
        children: &[FilterExpr],
        joiner: &str,
        empty: &str,
    ) -> Result<String, RenderError> {
        match children {
            [] => Ok(empty.to_string()),
            [only] => self.expr(only),
            _ => {
                let parts = children
                    .iter()
                    .map(|child| self.expr(child))
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(format!("({})", parts.join(joiner)))
            }
        }
    }

    fn compare(&mut self, cmp: &ComparePredicate) -> Result<String, RenderError> {
        let column = self.column(&cmp.path);
        let mismatch = || RenderError::new(cmp.path.dotted(), cmp.op, operand_label(&cmp.operand));

        let sql = match (cmp.op, &cmp.operand) {
            (MatchOp::IsNull, _) => format!("{column} IS NULL"),
            (MatchOp::IsNotNull, _) => format!("{column} IS NOT NULL"),
            (op, Operand::Value(value)) => {
                let symbol = match op {
                    MatchOp::Eq => "=",
                    MatchOp::Ne => "<>",
                    MatchOp::Gt => ">",
                    MatchOp::Ge => ">=",
                    MatchOp::Lt => "<",
                    MatchOp::Le => "<=",
                    _ => return Err(mismatch()),
                };
                self.params.push(value.clone());
                format!("{column} {symbol} ?")
            }
            (MatchOp::In | MatchOp::NotIn, Operand::List(values)) => {
                let negated = cmp.op.is_negated();
                if values.is_empty() {
                    return Ok(if negated { "1=1" } else { "1=0" }.to_string());
                }
                self.bind(&cmp.operand);
                let marks = vec!["?"; values.len()].join(", ");
                let keyword = if negated { "NOT IN" } else { "IN" };
                format!("{column} {keyword} ({marks})")
            }
            (MatchOp::Like | MatchOp::NotLike, Operand::Pattern(pattern)) => {
                let like = pattern.to_sql_like(LIKE_ESCAPE);
                self.params.push(TypedValue::new(
                    Value::Text(like),
                    cmp.path.terminal().clone(),
                ));
                let keyword = if cmp.op.is_negated() { "NOT LIKE" } else { "LIKE" };
                format!("LOWER({column}) {keyword} ? ESCAPE '{LIKE_ESCAPE}'")
            }
            (MatchOp::Between, Operand::Range { .. }) => {
                self.bind(&cmp.operand);
                format!("{column} BETWEEN ? AND ?")
            }
            _ => return Err(mismatch()),
        };

        Ok(sql)
    }

    // Parameters in placeholder order.
    fn bind(&mut self, operand: &Operand) {
        self.params.extend(operand.values().into_iter().cloned());
    }

    // Column expression for a path, joining every association and element
    // collection on the way. Joins are shared by identical sources.
    fn column(&mut self, path: &ResolvedPath) -> String {
        let mut current = ROOT_ALIAS.to_string();

        for segment in path.segments() {
            let source = format!("{current}.{}", segment.storage_name);

            current = match segment.kind {
                SegmentKind::Association(_) | SegmentKind::ElementCollection => {
                    self.join(source)
                }
                SegmentKind::Embedded | SegmentKind::Scalar => source,
            };
        }

        current
    }

    fn join(&mut self, source: String) -> String {
        if let Some(existing) = self.joins.iter().find(|j| j.source == source) {
            return existing.alias.clone();
        }

        let alias = format!("j{}", self.joins.len() + 1);
        self.joins.push(SqlJoin {
            source,
            alias: alias.clone(),
        });

        alias
    }
}
