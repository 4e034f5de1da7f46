#![allow(dead_code)]

use siftql::core::schema::{
    Cardinality, EnumModel, ScalarType, SchemaDescription, SchemaField, TypeRef,
};
use std::sync::Arc;

pub fn address() -> Arc<SchemaDescription> {
    SchemaDescription::builder("Address")
        .field(SchemaField::scalar("city", ScalarType::Text))
        .field(SchemaField::scalar("zip", ScalarType::Text).with_storage_name("postal_code"))
        .build()
        .unwrap()
}

pub fn customer() -> Arc<SchemaDescription> {
    SchemaDescription::builder("Customer")
        .field(SchemaField::scalar("name", ScalarType::Text))
        .field(SchemaField::scalar("vip", ScalarType::Bool))
        .build()
        .unwrap()
}

pub fn line_item() -> Arc<SchemaDescription> {
    SchemaDescription::builder("LineItem")
        .field(SchemaField::scalar("sku", ScalarType::Text))
        .field(SchemaField::scalar("quantity", ScalarType::Int32))
        .build()
        .unwrap()
}

/// Root entity with one of every field kind.
pub fn order() -> Arc<SchemaDescription> {
    SchemaDescription::builder("Order")
        .field(SchemaField::scalar("id", ScalarType::Uuid).with_storage_name("_id"))
        .field(SchemaField::scalar("code", ScalarType::Text))
        .field(SchemaField::scalar(
            "status",
            EnumModel::new("Status", ["OPEN", "SHIPPED", "CLOSED"]),
        ))
        .field(SchemaField::scalar("placed_on", ScalarType::Date))
        .field(SchemaField::scalar("quantity", ScalarType::Int32))
        .field(SchemaField::scalar("codes", TypeRef::array(ScalarType::Text)))
        .field(SchemaField::element_collection("tags", ScalarType::Text))
        .field(SchemaField::embedded("shipping", address()))
        .field(SchemaField::association(
            "customer",
            Cardinality::Single,
            customer(),
        ))
        .field(SchemaField::association(
            "items",
            Cardinality::Many,
            line_item(),
        ))
        .build()
        .unwrap()
}

/// Root entity without any multi-valued field.
pub fn invoice() -> Arc<SchemaDescription> {
    SchemaDescription::builder("Invoice")
        .field(SchemaField::scalar("number", ScalarType::Text))
        .field(SchemaField::scalar("paid", ScalarType::Bool))
        .field(SchemaField::association(
            "customer",
            Cardinality::Single,
            customer(),
        ))
        .build()
        .unwrap()
}
