use super::*;
use crate::{
    schema::{ScalarType, SchemaDescription, SchemaField, TypeRef},
    test_fixtures::order_schema,
};
use proptest::prelude::*;

fn resolver() -> PathResolver {
    PathResolver::default()
}

#[test]
fn resolves_root_scalar() {
    let path = resolver().resolve("code", &order_schema()).unwrap();

    assert_eq!(path.dotted(), "code");
    assert_eq!(path.terminal(), &TypeRef::Scalar(ScalarType::Text));
    assert!(!path.traverses_join());
    assert!(!path.multi_valued());
}

#[test]
fn embedded_segments_are_transparent() {
    let path = resolver().resolve("shipping.zip", &order_schema()).unwrap();

    assert_eq!(path.dotted(), "shipping.zip");
    assert_eq!(path.storage_path(), "shipping.postal_code");
    assert_eq!(path.segments()[0].kind, SegmentKind::Embedded);
    assert!(!path.traverses_join());
}

#[test]
fn to_one_association_marks_join_but_not_multi_valued() {
    let path = resolver()
        .resolve("customer.address.city", &order_schema())
        .unwrap();

    assert_eq!(
        path.segments()[0].kind,
        SegmentKind::Association(Cardinality::Single)
    );
    assert!(path.traverses_join());
    assert!(!path.multi_valued());
}

#[test]
fn to_many_association_is_multi_valued() {
    let path = resolver().resolve("items.price", &order_schema()).unwrap();

    assert!(path.traverses_join());
    assert!(path.multi_valued());
    assert_eq!(path.terminal(), &TypeRef::Scalar(ScalarType::Decimal));
}

#[test]
fn element_collection_terminal_uses_element_type() {
    let path = resolver().resolve("tags", &order_schema()).unwrap();

    assert_eq!(path.segments()[0].kind, SegmentKind::ElementCollection);
    assert_eq!(path.terminal(), &TypeRef::Scalar(ScalarType::Text));
    assert!(path.multi_valued());
}

#[test]
fn unknown_field_names_owner() {
    let err = resolver()
        .resolve("customer.nickname", &order_schema())
        .unwrap_err();

    assert_eq!(
        err,
        PathError::UnknownField {
            field: "nickname".to_string(),
            owner: "Customer".to_string(),
        }
    );
}

#[test]
fn scalar_in_the_middle_is_not_terminal() {
    let err = resolver().resolve("code.length", &order_schema()).unwrap_err();

    assert!(matches!(
        err,
        PathError::NotTerminal { ref field, kind: FieldKind::Scalar, .. } if field == "code"
    ));
}

#[test]
fn element_collection_in_the_middle_is_not_terminal() {
    let err = resolver().resolve("tags.value", &order_schema()).unwrap_err();

    assert!(matches!(
        err,
        PathError::NotTerminal {
            kind: FieldKind::ElementCollection,
            ..
        }
    ));
}

#[test]
fn selector_ending_on_record_is_unterminated() {
    let err = resolver().resolve("customer", &order_schema()).unwrap_err();
    assert!(matches!(
        err,
        PathError::Unterminated {
            kind: FieldKind::Association,
            ..
        }
    ));

    let err = resolver().resolve("shipping", &order_schema()).unwrap_err();
    assert!(matches!(
        err,
        PathError::Unterminated {
            kind: FieldKind::Embedded,
            ..
        }
    ));
}

#[test]
fn empty_segments_are_rejected() {
    for selector in ["", ".code", "code.", "shipping..city"] {
        let err = resolver().resolve(selector, &order_schema()).unwrap_err();
        assert!(
            matches!(err, PathError::EmptySegment { .. }),
            "{selector}: {err:?}"
        );
    }
}

#[test]
fn aliases_expand_before_lookup() {
    let schema = order_schema();
    let path = resolver().resolve("buyer", &schema).unwrap();
    assert_eq!(path.dotted(), "customer.name");

    let path = resolver().resolve("city", &schema).unwrap();
    assert_eq!(path.dotted(), "shipping.city");
}

#[test]
fn alias_loops_hit_the_depth_limit() {
    let schema = SchemaDescription::builder("Loop")
        .field(SchemaField::scalar("id", ScalarType::Int64))
        .alias("a", "b")
        .alias("b", "a")
        .build()
        .unwrap();

    let err = PathResolver::new(8).resolve("a", &schema).unwrap_err();
    assert_eq!(err, PathError::DepthExceeded { max: 8 });
}

#[test]
fn depth_limit_counts_segments() {
    let err = PathResolver::new(2)
        .resolve("customer.address.city", &order_schema())
        .unwrap_err();

    assert_eq!(err, PathError::DepthExceeded { max: 2 });
}

#[test]
fn repeated_resolution_is_served_from_cache() {
    let resolver = resolver();
    let schema = order_schema();

    let first = resolver.resolve("items.sku", &schema).unwrap();
    let second = resolver.resolve("items.sku", &schema).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn same_named_schemas_are_cached_separately() {
    let resolver = resolver();
    let text = SchemaDescription::builder("Order")
        .field(SchemaField::scalar("code", ScalarType::Text))
        .build()
        .unwrap();
    let numeric = SchemaDescription::builder("Order")
        .field(SchemaField::scalar("code", ScalarType::Int64))
        .build()
        .unwrap();

    let first = resolver.resolve("code", &text).unwrap();
    let second = resolver.resolve("code", &numeric).unwrap();

    assert_eq!(*first.terminal(), TypeRef::Scalar(ScalarType::Text));
    assert_eq!(*second.terminal(), TypeRef::Scalar(ScalarType::Int64));

    let copy = SchemaDescription::clone(&text);
    assert!(Arc::ptr_eq(&first, &resolver.resolve("code", &copy).unwrap()));
}

#[test]
fn concurrent_resolution_agrees() {
    let resolver = Arc::new(resolver());
    let schema = order_schema();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            let schema = Arc::clone(&schema);
            std::thread::spawn(move || resolver.resolve("customer.address.zip", &schema).unwrap())
        })
        .collect();

    for handle in handles {
        let path = handle.join().unwrap();
        assert_eq!(path.storage_path(), "customer.address.postal_code");
    }
}

// Every selector that is valid for the order fixture.
const VALID: &[&str] = &[
    "id",
    "code",
    "priority",
    "placed_on",
    "placed_at",
    "paid",
    "total",
    "quantity",
    "fiscal_year",
    "amount",
    "lucky_numbers",
    "tags",
    "shipping.street",
    "shipping.city",
    "shipping.zip",
    "customer.id",
    "customer.name",
    "customer.vip",
    "customer.address.street",
    "customer.address.city",
    "customer.address.zip",
    "items.sku",
    "items.quantity",
    "items.price",
];

proptest! {
    #[test]
    fn valid_selectors_resolve_to_themselves(selector in prop::sample::select(VALID)) {
        let path = resolver().resolve(selector, &order_schema()).unwrap();
        prop_assert_eq!(path.dotted(), selector);
    }

    #[test]
    fn extending_a_terminal_fails_at_that_segment(
        selector in prop::sample::select(VALID),
        suffix in "[a-z]{1,8}",
    ) {
        let extended = format!("{selector}.{suffix}");
        let err = resolver().resolve(&extended, &order_schema()).unwrap_err();

        let is_not_terminal = matches!(err, PathError::NotTerminal { .. });
        prop_assert!(is_not_terminal, "{:?}", err);
    }

    #[test]
    fn unknown_root_segment_is_reported_first(name in "zz[a-z]{1,6}", rest in "[a-z]{1,6}") {
        let selector = format!("{name}.{rest}");
        let err = resolver().resolve(&selector, &order_schema()).unwrap_err();

        prop_assert_eq!(
            err,
            PathError::UnknownField { field: name, owner: "Order".to_string() }
        );
    }
}
