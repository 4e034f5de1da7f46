use crate::schema::{
    Cardinality, CustomType, EnumMember, EnumModel, ScalarType, SchemaDescription, SchemaField,
    TypeRef,
};
use crate::value::Value;
use std::sync::Arc;

///
/// Fixtures
///
/// A small order-management model: an `Order` root with an embedded
/// shipping `Address`, a to-one `Customer`, a to-many `LineItem` list and
/// a `tags` element collection.
///

pub fn priority_enum() -> EnumModel {
    EnumModel::new("Priority", ["LOW", "MEDIUM", "HIGH"])
}

/// Priority where `MEDIUM` also answers to "normal".
pub fn priority_enum_with_alias() -> EnumModel {
    EnumModel::from_members(
        "Priority",
        vec![
            EnumMember::new("LOW", 0),
            EnumMember::new("MEDIUM", 1).with_candidate(|kw| kw.eq_ignore_ascii_case("normal")),
            EnumMember::new("HIGH", 2),
        ],
    )
}

pub fn money_type() -> CustomType {
    CustomType::new("Money", |raw| {
        let cents = raw
            .strip_suffix("EUR")
            .ok_or_else(|| "expected an amount ending in EUR".to_string())?
            .trim()
            .parse::<i64>()
            .map_err(|err| err.to_string())?;
        Ok(Value::Int(cents))
    })
    .orderable(true)
}

pub fn address_schema() -> Arc<SchemaDescription> {
    SchemaDescription::builder("Address")
        .field(SchemaField::scalar("street", ScalarType::Text))
        .field(SchemaField::scalar("city", ScalarType::Text))
        .field(SchemaField::scalar("zip", ScalarType::Text).with_storage_name("postal_code"))
        .build()
        .unwrap()
}

pub fn customer_schema() -> Arc<SchemaDescription> {
    SchemaDescription::builder("Customer")
        .field(SchemaField::scalar("id", ScalarType::Uuid))
        .field(SchemaField::scalar("name", ScalarType::Text))
        .field(SchemaField::scalar("vip", ScalarType::Bool))
        .field(SchemaField::embedded("address", address_schema()))
        .build()
        .unwrap()
}

pub fn line_item_schema() -> Arc<SchemaDescription> {
    SchemaDescription::builder("LineItem")
        .field(SchemaField::scalar("sku", ScalarType::Text))
        .field(SchemaField::scalar("quantity", ScalarType::Int32))
        .field(SchemaField::scalar("price", ScalarType::Decimal))
        .build()
        .unwrap()
}

pub fn order_schema() -> Arc<SchemaDescription> {
    order_schema_with(priority_enum())
}

pub fn order_schema_with(priority: EnumModel) -> Arc<SchemaDescription> {
    SchemaDescription::builder("Order")
        .field(SchemaField::scalar("id", ScalarType::Uuid).with_storage_name("_id"))
        .field(SchemaField::scalar("code", ScalarType::Text))
        .field(SchemaField::scalar("priority", priority))
        .field(SchemaField::scalar("placed_on", ScalarType::Date))
        .field(SchemaField::scalar("placed_at", ScalarType::DateTime))
        .field(SchemaField::scalar("paid", ScalarType::Bool))
        .field(SchemaField::scalar("total", ScalarType::Decimal))
        .field(SchemaField::scalar("quantity", ScalarType::Int32))
        .field(SchemaField::scalar("fiscal_year", ScalarType::Year))
        .field(SchemaField::scalar("amount", money_type()))
        .field(SchemaField::scalar("lucky_numbers", TypeRef::array(ScalarType::Int32)))
        .field(SchemaField::element_collection("tags", ScalarType::Text))
        .field(SchemaField::embedded("shipping", address_schema()))
        .field(SchemaField::association(
            "customer",
            Cardinality::Single,
            customer_schema(),
        ))
        .field(SchemaField::association(
            "items",
            Cardinality::Many,
            line_item_schema(),
        ))
        .alias("buyer", "customer.name")
        .alias("city", "shipping.city")
        .build()
        .unwrap()
}
