use super::{compile, compiler};
use crate::{
    coerce::CoercionError,
    config::CompilerConfig,
    error::CompileError,
    path::PathError,
    predicate::{
        FilterExpr, FilterNode, LikePattern, MatchOp, Operand, Operator, UnsupportedOperatorError,
    },
    schema::TypeRef,
    test_fixtures::{order_schema, order_schema_with, priority_enum_with_alias},
    value::{EnumValue, Value},
};
use time::macros::{date, datetime};

fn single(expr: &FilterExpr) -> (&str, MatchOp, &Operand) {
    match expr {
        FilterExpr::Compare(cmp) => (cmp.path.owner(), cmp.op, &cmp.operand),
        other => panic!("expected a comparison, got {other:?}"),
    }
}

#[test]
fn empty_and_is_always_and_empty_or_is_never() {
    assert!(compile(&FilterNode::and(vec![])).is_always());
    assert!(compile(&FilterNode::or(vec![])).is_never());
}

#[test]
fn text_equality_becomes_case_insensitive_pattern() {
    let expr = compile(&FilterNode::eq("code", "Al*Ce"));
    let (_, op, operand) = single(&expr);

    assert_eq!(op, MatchOp::Like);
    assert_eq!(
        operand,
        &Operand::Pattern(LikePattern::from_wildcard("al*ce", '*'))
    );
}

#[test]
fn text_inequality_negates_the_pattern() {
    let expr = compile(&FilterNode::ne("code", "x*"));
    assert_eq!(single(&expr).1, MatchOp::NotLike);
}

#[test]
fn blank_equality_is_a_null_test() {
    let expr = compile(&FilterNode::eq("paid", "  "));
    assert_eq!(single(&expr).1, MatchOp::IsNull);
    assert_eq!(single(&expr).2, &Operand::None);

    let expr = compile(&FilterNode::ne("paid", ""));
    assert_eq!(single(&expr).1, MatchOp::IsNotNull);
}

#[test]
fn non_text_equality_is_exact() {
    let expr = compile(&FilterNode::eq("quantity", "7"));
    let (_, op, operand) = single(&expr);

    assert_eq!(op, MatchOp::Eq);
    let Operand::Value(v) = operand else {
        panic!("expected value operand");
    };
    assert_eq!(v.value, Value::Int(7));
    assert_eq!(v.declared, TypeRef::Scalar(crate::schema::ScalarType::Int32));
}

#[test]
fn enum_exact_name_is_equality() {
    let expr = compile(&FilterNode::eq("priority", "HIGH"));
    let (_, op, operand) = single(&expr);

    assert_eq!(op, MatchOp::Eq);
    assert_eq!(operand.values()[0].value, Value::Enum(EnumValue::new("Priority", "HIGH", 2)));
}

#[test]
fn enum_miss_falls_back_to_candidates() {
    let expr = compile(&FilterNode::eq("priority", "hig"));
    let (_, op, operand) = single(&expr);

    assert_eq!(op, MatchOp::In);
    let members: Vec<_> = operand.values().iter().map(|v| v.value.to_string()).collect();
    assert_eq!(members, ["HIGH"]);

    let expr = compiler()
        .compile(
            &FilterNode::ne("priority", "normal"),
            &order_schema_with(priority_enum_with_alias()),
        )
        .unwrap();
    let (_, op, operand) = single(&expr);
    assert_eq!(op, MatchOp::NotIn);
    assert_eq!(operand.values()[0].value.to_string(), "MEDIUM");
}

#[test]
fn padded_enum_keyword_reaches_the_custom_predicate() {
    let expr = compiler()
        .compile(
            &FilterNode::eq("priority", " normal "),
            &order_schema_with(priority_enum_with_alias()),
        )
        .unwrap();
    let (_, op, operand) = single(&expr);

    assert_eq!(op, MatchOp::In);
    assert_eq!(operand.values()[0].value.to_string(), "MEDIUM");
}

#[test]
fn enum_without_candidates_fails() {
    let err = compiler()
        .compile(&FilterNode::eq("priority", "urgent"), &order_schema())
        .unwrap_err();

    assert_eq!(err.selector(), "priority");
    assert!(matches!(
        err,
        CompileError::Coercion {
            source: CoercionError::Invalid { .. },
            ..
        }
    ));
}

#[test]
fn strict_greater_than_on_date_starts_the_day_after() {
    let expr = compile(&FilterNode::gt("placed_on", "2024-03-10"));
    let (_, op, operand) = single(&expr);

    assert_eq!(op, MatchOp::Between);
    let Operand::Range { low, high } = operand else {
        panic!("expected range");
    };
    assert_eq!(low.value, Value::Date(date!(2024 - 03 - 11)));
    assert_eq!(high.value, Value::Date(date!(9999 - 12 - 31)));
}

#[test]
fn date_ordering_bounds_follow_the_sentinels() {
    let cases = [
        (FilterNode::ge("placed_on", "2024-03-10"), date!(2024 - 03 - 10), date!(9999 - 12 - 31)),
        (FilterNode::lt("placed_on", "2024-03-10"), CompilerConfig::DEFAULT_RANGE_FLOOR, date!(2024 - 03 - 09)),
        (FilterNode::le("placed_on", "2024-03-10"), CompilerConfig::DEFAULT_RANGE_FLOOR, date!(2024 - 03 - 10)),
    ];

    for (node, want_low, want_high) in cases {
        let expr = compile(&node);
        let Operand::Range { low, high } = single(&expr).2 else {
            panic!("expected range for {node:?}");
        };
        assert_eq!(low.value, Value::Date(want_low));
        assert_eq!(high.value, Value::Date(want_high));
    }
}

#[test]
fn datetime_strict_bound_moves_by_one_day() {
    let expr = compile(&FilterNode::gt("placed_at", "2024-03-10 08:30"));
    let Operand::Range { low, high } = single(&expr).2 else {
        panic!("expected range");
    };

    assert_eq!(low.value, Value::DateTime(datetime!(2024 - 03 - 11 08:30)));
    assert_eq!(
        high.value,
        Value::DateTime(datetime!(9999 - 12 - 31 23:59:59.999999999))
    );
}

#[test]
fn strict_bound_past_the_ceiling_never_matches() {
    let expr = compile(&FilterNode::gt("placed_on", "9999-12-31"));
    assert!(expr.is_never());
}

#[test]
fn numeric_ordering_is_direct() {
    let expr = compile(&FilterNode::gt("quantity", "3"));
    let (_, op, operand) = single(&expr);

    assert_eq!(op, MatchOp::Gt);
    assert_eq!(operand.values()[0].value, Value::Int(3));
}

#[test]
fn ordering_on_unordered_type_is_not_applicable() {
    let err = compiler()
        .compile(&FilterNode::lt("lucky_numbers", "1"), &order_schema())
        .unwrap_err();

    assert!(matches!(
        err,
        CompileError::Coercion {
            source: CoercionError::OperatorNotApplicable { op: "<", .. },
            ..
        }
    ));
}

#[test]
fn ordering_against_blank_is_not_applicable() {
    let err = compiler()
        .compile(&FilterNode::ge("quantity", " "), &order_schema())
        .unwrap_err();

    assert!(matches!(
        err,
        CompileError::Coercion {
            source: CoercionError::OperatorNotApplicable { .. },
            ..
        }
    ));
}

#[test]
fn membership_coerces_every_argument() {
    let expr = compile(&FilterNode::in_("quantity", ["1", "2", "3"]));
    let (_, op, operand) = single(&expr);

    assert_eq!(op, MatchOp::In);
    let values: Vec<_> = operand.values().iter().map(|v| v.value.clone()).collect();
    assert_eq!(values, [Value::Int(1), Value::Int(2), Value::Int(3)]);

    let expr = compile(&FilterNode::not_in("priority", ["LOW"]));
    assert_eq!(single(&expr).1, MatchOp::NotIn);
}

#[test]
fn one_bad_argument_fails_the_whole_membership() {
    let err = compiler()
        .compile(&FilterNode::in_("quantity", ["1", "two"]), &order_schema())
        .unwrap_err();

    assert!(matches!(err, CompileError::Coercion { .. }));
}

#[test]
fn arity_is_checked() {
    let err = compiler()
        .compile(&FilterNode::cmp("code", Operator::Eq, ["a", "b"]), &order_schema())
        .unwrap_err();
    assert!(matches!(
        err,
        CompileError::Coercion {
            source: CoercionError::Arity { found: 2, .. },
            ..
        }
    ));

    let err = compiler()
        .compile(&FilterNode::in_("code", Vec::<String>::new()), &order_schema())
        .unwrap_err();
    assert!(matches!(
        err,
        CompileError::Coercion {
            source: CoercionError::Arity { found: 0, .. },
            ..
        }
    ));
}

#[test]
fn fiql_spellings_are_accepted() {
    let expr = compile(&FilterNode::comparison("quantity", "=ge=", ["5"]));
    assert_eq!(single(&expr).1, MatchOp::Ge);
}

#[test]
fn every_canonical_symbol_parses_back() {
    for op in Operator::ALL {
        assert_eq!(op.symbol().parse::<Operator>(), Ok(op));
    }
}

#[test]
fn unknown_operator_fails_loudly() {
    let err = compiler()
        .compile(&FilterNode::comparison("code", "=like=", ["x"]), &order_schema())
        .unwrap_err();

    assert!(matches!(err, CompileError::UnsupportedOperator { .. }));
    assert_eq!(err.selector(), "code");

    let message = UnsupportedOperatorError {
        operator: "=like=".into(),
    }
    .to_string();
    assert_eq!(
        message,
        "unsupported operator '=like=', expected one of == != > >= < <= =in= =out="
    );
}

#[test]
fn path_errors_carry_the_selector() {
    let err = compiler()
        .compile(
            &(FilterNode::eq("code", "a") & FilterNode::eq("customer.nickname", "b")),
            &order_schema(),
        )
        .unwrap_err();

    assert_eq!(err.selector(), "customer.nickname");
    assert!(matches!(
        err,
        CompileError::Path {
            source: PathError::UnknownField { .. },
            ..
        }
    ));
}

#[test]
fn a_failing_clause_fails_the_whole_disjunction() {
    let node = FilterNode::eq("code", "a") | FilterNode::eq("quantity", "lots");
    assert!(compiler().compile(&node, &order_schema()).is_err());
}

#[test]
fn nested_logic_keeps_its_shape() {
    let node = FilterNode::and(vec![
        FilterNode::eq("paid", "true"),
        FilterNode::or(vec![
            FilterNode::eq("customer.name", "ann*"),
            FilterNode::gt("items.quantity", "10"),
        ]),
    ]);
    let expr = compile(&node);

    let FilterExpr::And(children) = &expr else {
        panic!("expected conjunction");
    };
    assert_eq!(children.len(), 2);
    assert!(matches!(&children[1], FilterExpr::Or(inner) if inner.len() == 2));
    assert!(expr.references_multi_valued());
}

#[test]
fn custom_type_goes_through_its_constructor() {
    let expr = compile(&FilterNode::ge("amount", "1250 EUR"));
    let (_, op, operand) = single(&expr);

    assert_eq!(op, MatchOp::Ge);
    assert_eq!(operand.values()[0].value, Value::Int(1250));
}

#[test]
fn aliases_resolve_inside_comparisons() {
    let expr = compile(&FilterNode::eq("buyer", "ann"));
    let FilterExpr::Compare(cmp) = &expr else {
        panic!("expected comparison");
    };

    assert_eq!(cmp.path.dotted(), "customer.name");
    assert_eq!(single(&expr).0, "Order");
}
