//! Table-level IR.

use serde::Serialize;

use crate::FieldIR;

/// A lowered table: one model, one migration, one admin resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableIR {
    /// Storage identifier.
    pub name: String,
    /// Names derived once at lowering time.
    pub names: TableNames,
    /// Column used to label records in relationship selects.
    pub display: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldIR>,
    pub timestamps: bool,
    pub soft_deletes: bool,
}

impl TableIR {
    pub fn field(&self, name: &str) -> Option<&FieldIR> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Model class name.
    pub fn model(&self) -> &str {
        &self.names.model
    }
}

/// Identifiers derived from the table (or an explicit model override).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableNames {
    /// `Product`
    pub model: String,
    /// `ProductResource`
    pub resource: String,
    /// `ProductController`
    pub controller: String,
    /// `ProductFactory`
    pub factory: String,
    /// `ProductSeeder`
    pub seeder: String,
    /// `create_products_table`
    pub migration: String,
    /// `products`, URL segment for routes
    pub route: String,
    /// `product`, suffix of permission names
    pub permission: String,
    /// `product`, variable and route parameter name
    pub variable: String,
}

impl TableNames {
    /// Derive every name from a table name and model class name.
    pub fn derive(table: &str, model: &str) -> Self {
        let snake_model = modforge_core::to_snake_case(model);
        Self {
            model: model.to_string(),
            resource: format!("{model}Resource"),
            controller: format!("{model}Controller"),
            factory: format!("{model}Factory"),
            seeder: format!("{model}Seeder"),
            migration: format!("create_{table}_table"),
            route: modforge_core::to_kebab_case(table),
            permission: snake_model.clone(),
            variable: modforge_core::to_camel_case(model),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_names() {
        let names = TableNames::derive("order_items", "OrderItem");
        assert_eq!(names.model, "OrderItem");
        assert_eq!(names.resource, "OrderItemResource");
        assert_eq!(names.controller, "OrderItemController");
        assert_eq!(names.factory, "OrderItemFactory");
        assert_eq!(names.seeder, "OrderItemSeeder");
        assert_eq!(names.migration, "create_order_items_table");
        assert_eq!(names.route, "order-items");
        assert_eq!(names.permission, "order_item");
        assert_eq!(names.variable, "orderItem");
    }
}
