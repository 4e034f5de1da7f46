use crate::{
    candidate::candidate_values,
    coerce::{Coercer, CoercionError},
    config::CompilerConfig,
    error::CompileError,
    obs::sink::{MetricsEvent, record},
    path::{PathResolver, ResolvedPath},
    predicate::{
        ast::{Comparison, FilterNode, Operator},
        expr::{ComparePredicate, FilterExpr, LikePattern, MatchOp, Operand},
    },
    schema::{SchemaDescription, TypeRef},
    value::{TypedValue, Value},
};
use std::sync::Arc;
use time::{Date, Duration, PrimitiveDateTime, UtcOffset, macros::time};

///
/// PredicateCompiler
///
/// Lowers a filter AST into a `FilterExpr`. Every comparison resolves its
/// selector, coerces its operands against the terminal type, then applies
/// the operator rules. Any failure aborts the whole compile.
///

#[derive(Debug)]
pub struct PredicateCompiler {
    config: CompilerConfig,
    coercer: Arc<Coercer>,
    resolver: Arc<PathResolver>,
}

impl PredicateCompiler {
    #[must_use]
    pub fn new(config: CompilerConfig, coercer: Arc<Coercer>) -> Self {
        let resolver = Arc::new(PathResolver::new(config.max_path_depth));

        Self::with_resolver(config, coercer, resolver)
    }

    /// Share a resolver (and its cache) with other compilers.
    #[must_use]
    pub const fn with_resolver(
        config: CompilerConfig,
        coercer: Arc<Coercer>,
        resolver: Arc<PathResolver>,
    ) -> Self {
        Self {
            config,
            coercer,
            resolver,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &CompilerConfig {
        &self.config
    }

    #[must_use]
    pub const fn resolver(&self) -> &Arc<PathResolver> {
        &self.resolver
    }

    pub fn compile(
        &self,
        node: &FilterNode,
        root: &SchemaDescription,
    ) -> Result<FilterExpr, CompileError> {
        match node {
            FilterNode::And(children) => Ok(FilterExpr::And(self.compile_all(children, root)?)),
            FilterNode::Or(children) => {
                if children.is_empty() {
                    tracing::debug!(schema = root.name(), "empty disjunction compiles to never");
                }
                Ok(FilterExpr::Or(self.compile_all(children, root)?))
            }
            FilterNode::Comparison(cmp) => self.compile_comparison(cmp, root),
        }
    }

    fn compile_all(
        &self,
        children: &[FilterNode],
        root: &SchemaDescription,
    ) -> Result<Vec<FilterExpr>, CompileError> {
        children
            .iter()
            .map(|child| self.compile(child, root))
            .collect()
    }

    fn compile_comparison(
        &self,
        cmp: &Comparison,
        root: &SchemaDescription,
    ) -> Result<FilterExpr, CompileError> {
        let selector = cmp.selector.as_str();
        let op: Operator = cmp
            .operator
            .parse()
            .map_err(|err| CompileError::unsupported(selector, err))?;
        let path = self
            .resolver
            .resolve(selector, root)
            .map_err(|err| CompileError::path(selector, err))?;

        tracing::trace!(
            schema = root.name(),
            selector,
            op = op.symbol(),
            args = cmp.arguments.len(),
            "compiling comparison"
        );

        let expr = self
            .lower(op, path, &cmp.arguments)
            .map_err(|err| CompileError::coercion(selector, err))?;

        record(MetricsEvent::ComparisonCompiled {
            schema: root.name(),
            op: op.symbol(),
        });

        Ok(expr)
    }

    fn lower(
        &self,
        op: Operator,
        path: Arc<ResolvedPath>,
        args: &[String],
    ) -> Result<FilterExpr, CoercionError> {
        match op {
            Operator::Eq | Operator::Ne => {
                let raw = single_argument(op, args)?;
                self.lower_equality(op == Operator::Ne, path, raw)
            }
            Operator::Gt | Operator::Ge | Operator::Lt | Operator::Le => {
                let raw = single_argument(op, args)?;
                self.lower_ordering(op, path, raw)
            }
            Operator::In | Operator::NotIn => {
                if args.is_empty() {
                    return Err(CoercionError::Arity {
                        op: op.symbol(),
                        expected: "at least 1",
                        found: 0,
                    });
                }
                let values = self.coercer.coerce_all(args, path.terminal())?;
                let match_op = if op == Operator::In {
                    MatchOp::In
                } else {
                    MatchOp::NotIn
                };

                Ok(compare(path, match_op, Operand::List(values)))
            }
        }
    }

    // Text → case-insensitive pattern, null → presence test, else equality.
    // Enum operands that name no member fall back to candidate membership.
    fn lower_equality(
        &self,
        negated: bool,
        path: Arc<ResolvedPath>,
        raw: &str,
    ) -> Result<FilterExpr, CoercionError> {
        let target = path.terminal().clone();

        let typed = match self.coercer.coerce(raw, &target) {
            Ok(typed) => typed,
            Err(err) => {
                let TypeRef::Enum(model) = &target else {
                    return Err(err);
                };
                let candidates = candidate_values(model, raw.trim());
                if candidates.is_empty() {
                    return Err(err);
                }

                let list = candidates
                    .into_iter()
                    .map(|v| TypedValue::new(Value::Enum(v), target.clone()))
                    .collect();
                let op = if negated { MatchOp::NotIn } else { MatchOp::In };

                return Ok(compare(path, op, Operand::List(list)));
            }
        };

        let (op, operand) = match &typed.value {
            Value::Null => (pick(negated, MatchOp::IsNull, MatchOp::IsNotNull), Operand::None),
            Value::Text(text) => (
                pick(negated, MatchOp::Like, MatchOp::NotLike),
                Operand::Pattern(LikePattern::from_wildcard(text, self.config.wildcard)),
            ),
            _ => (pick(negated, MatchOp::Eq, MatchOp::Ne), Operand::Value(typed)),
        };

        Ok(compare(path, op, operand))
    }

    fn lower_ordering(
        &self,
        op: Operator,
        path: Arc<ResolvedPath>,
        raw: &str,
    ) -> Result<FilterExpr, CoercionError> {
        let target = path.terminal().clone();
        if !target.supports_ordering() {
            return Err(CoercionError::not_applicable(op.symbol(), &target));
        }

        let typed = self.coercer.coerce(raw, &target)?;
        if typed.is_null() {
            return Err(CoercionError::not_applicable(op.symbol(), &target));
        }

        if target.range_widened() {
            return Ok(match self.widen(op, &typed.value) {
                Some((low, high)) => compare(
                    path,
                    MatchOp::Between,
                    Operand::Range {
                        low: TypedValue::new(low, target.clone()),
                        high: TypedValue::new(high, target),
                    },
                ),
                None => FilterExpr::never(),
            });
        }

        let match_op = match op {
            Operator::Gt => MatchOp::Gt,
            Operator::Ge => MatchOp::Ge,
            Operator::Lt => MatchOp::Lt,
            _ => MatchOp::Le,
        };

        Ok(compare(path, match_op, Operand::Value(typed)))
    }

    // Bounded day range between the configured sentinels. Strict operators
    // move the boundary by one day. `None` when the range is empty.
    fn widen(&self, op: Operator, value: &Value) -> Option<(Value, Value)> {
        let floor = self.config.range_floor;
        let ceiling = self.config.range_ceiling;
        let end_of_day = time!(23:59:59.999999999);

        let (low, high) = match value {
            Value::Date(d) => {
                let (low, high) =
                    day_bounds(op, *d, floor, ceiling, Date::next_day, Date::previous_day)?;
                (Value::Date(low), Value::Date(high))
            }
            Value::DateTime(dt) => {
                let (low, high) = day_bounds(
                    op,
                    *dt,
                    floor.midnight(),
                    PrimitiveDateTime::new(ceiling, end_of_day),
                    |v| v.checked_add(Duration::DAY),
                    |v| v.checked_sub(Duration::DAY),
                )?;
                (Value::DateTime(low), Value::DateTime(high))
            }
            Value::Instant(at) => {
                let (low, high) = day_bounds(
                    op,
                    *at,
                    floor.midnight().assume_offset(UtcOffset::UTC),
                    PrimitiveDateTime::new(ceiling, end_of_day).assume_offset(UtcOffset::UTC),
                    |v| v.checked_add(Duration::DAY),
                    |v| v.checked_sub(Duration::DAY),
                )?;
                (Value::Instant(low), Value::Instant(high))
            }
            _ => return None,
        };

        Some((low, high))
    }
}

fn day_bounds<T: PartialOrd + Copy>(
    op: Operator,
    value: T,
    floor: T,
    ceiling: T,
    next: impl Fn(T) -> Option<T>,
    prev: impl Fn(T) -> Option<T>,
) -> Option<(T, T)> {
    let (low, high) = match op {
        Operator::Gt => (next(value)?, ceiling),
        Operator::Ge => (value, ceiling),
        Operator::Lt => (floor, prev(value)?),
        _ => (floor, value),
    };

    (low <= high).then_some((low, high))
}

fn single_argument(op: Operator, args: &[String]) -> Result<&str, CoercionError> {
    match args {
        [only] => Ok(only.as_str()),
        _ => Err(CoercionError::Arity {
            op: op.symbol(),
            expected: "exactly 1",
            found: args.len(),
        }),
    }
}

const fn pick(negated: bool, positive: MatchOp, negative: MatchOp) -> MatchOp {
    if negated { negative } else { positive }
}

const fn compare(path: Arc<ResolvedPath>, op: MatchOp, operand: Operand) -> FilterExpr {
    FilterExpr::Compare(ComparePredicate::new(path, op, operand))
}
