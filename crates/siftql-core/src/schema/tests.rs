use super::*;
use crate::{
    test_fixtures::{address_schema, order_schema, priority_enum},
    value::{TypeFamily, Value},
};

#[test]
fn fields_keep_declaration_order() {
    let schema = order_schema();
    let names: Vec<_> = schema.fields().iter().map(|f| f.name.as_str()).collect();

    assert_eq!(names[..3], ["id", "code", "priority"]);
    assert_eq!(schema.field("id").unwrap().storage_name(), "_id");
    assert_eq!(schema.field("code").unwrap().storage_name(), "code");
    assert_eq!(schema.alias("buyer"), Some("customer.name"));
}

#[test]
fn duplicate_field_is_rejected() {
    let err = SchemaDescription::builder("Dup")
        .field(SchemaField::scalar("a", ScalarType::Text))
        .field(SchemaField::scalar("a", ScalarType::Int32))
        .build()
        .unwrap_err();

    assert!(matches!(err, SchemaError::DuplicateField { field, .. } if field == "a"));
}

#[test]
fn embedded_without_nested_schema_is_rejected() {
    let field = SchemaField::new(
        "shipping",
        TypeRef::Record("Address".into()),
        Cardinality::Single,
        FieldKind::Embedded,
        None,
    );
    let err = SchemaDescription::builder("Order")
        .field(field)
        .build()
        .unwrap_err();

    assert!(matches!(err, SchemaError::NestedMismatch { .. }));
}

#[test]
fn scalar_with_nested_schema_is_rejected() {
    let mut field = SchemaField::scalar("code", ScalarType::Text);
    field.nested = Some(address_schema());
    let err = SchemaDescription::builder("Order")
        .field(field)
        .build()
        .unwrap_err();

    assert!(matches!(err, SchemaError::NestedMismatch { .. }));
}

#[test]
fn many_valued_embedded_group_is_rejected() {
    let mut field = SchemaField::embedded("shipping", address_schema());
    field.cardinality = Cardinality::Many;
    let err = SchemaDescription::builder("Order")
        .field(field)
        .build()
        .unwrap_err();

    assert!(matches!(
        err,
        SchemaError::CardinalityMismatch {
            cardinality: Cardinality::Many,
            ..
        }
    ));
}

#[test]
fn element_collection_needs_scalar_elements() {
    let err = SchemaDescription::builder("Order")
        .field(SchemaField::element_collection(
            "matrix",
            TypeRef::array(ScalarType::Int32),
        ))
        .build()
        .unwrap_err();

    assert!(matches!(err, SchemaError::InvalidElementType { .. }));

    SchemaDescription::builder("Order")
        .field(SchemaField::element_collection("levels", priority_enum()))
        .build()
        .unwrap();
}

#[test]
fn alias_validation() {
    let shadow = SchemaDescription::builder("S")
        .field(SchemaField::scalar("a", ScalarType::Text))
        .alias("a", "a")
        .build()
        .unwrap_err();
    assert!(matches!(shadow, SchemaError::AliasShadowsField { .. }));

    let unknown = SchemaDescription::builder("S")
        .field(SchemaField::scalar("a", ScalarType::Text))
        .alias("b", "missing.x")
        .build()
        .unwrap_err();
    assert!(matches!(unknown, SchemaError::UnknownAliasTarget { .. }));

    SchemaDescription::builder("S")
        .field(SchemaField::scalar("a", ScalarType::Text))
        .alias("b", "a")
        .alias("c", "b")
        .build()
        .unwrap();
}

#[test]
fn registry_metadata_is_consistent() {
    for scalar in ScalarType::ALL {
        assert_eq!(ScalarType::from_name(scalar.name()), Some(*scalar));
    }

    assert_eq!(ScalarType::ALL.len(), 27);
    assert_eq!(ScalarType::from_name("nope"), None);
}

#[test]
fn ordering_and_widening_flags() {
    assert!(ScalarType::Int32.supports_ordering());
    assert!(!ScalarType::Bytes.supports_ordering());
    assert!(!ScalarType::Period.supports_ordering());
    assert!(ScalarType::Date.range_widened());
    assert!(ScalarType::Instant.range_widened());
    assert!(!ScalarType::Time.range_widened());

    assert!(TypeRef::from(priority_enum()).supports_ordering());
    assert!(!TypeRef::array(ScalarType::Int32).supports_ordering());
    assert!(!TypeRef::Record("Address".into()).supports_ordering());
}

#[test]
fn families_group_scalars() {
    assert_eq!(ScalarType::Uint16.family(), TypeFamily::Numeric);
    assert_eq!(ScalarType::Ulid.family(), TypeFamily::Identifier);
    assert_eq!(ScalarType::Year.family(), TypeFamily::Year);
    assert_eq!(TypeRef::from(priority_enum()).family(), TypeFamily::Enum);
    assert!(ScalarType::Int8.matches_value(&Value::Int(1)));
    assert!(!ScalarType::Int8.matches_value(&Value::Uint(1)));
}

#[test]
fn type_display() {
    assert_eq!(TypeRef::array(ScalarType::Int32).to_string(), "array<i32>");
    assert_eq!(TypeRef::from(priority_enum()).to_string(), "enum:Priority");
    assert_eq!(TypeRef::Record("Address".into()).to_string(), "record:Address");
}

#[test]
fn enum_ordinals_follow_declaration() {
    let model = priority_enum();

    assert_eq!(model.member("HIGH").unwrap().ordinal, 2);
    assert!(model.member("high").is_none());
}

#[test]
fn kind_and_cardinality_display() {
    assert_eq!(FieldKind::ElementCollection.to_string(), "element-collection");
    assert_eq!(Cardinality::Many.to_string(), "many");
}
