//! Module Intermediate Representation.
//!
//! This module defines the lowered, fully-resolved schema that renderers
//! consume.
//!
//! # Architecture
//!
//! ```text
//! forge.toml → Manifest (parsing) → ModuleIR (lowering) → Generator (codegen)
//! ```

use serde::Serialize;

use crate::{RelationIR, RelationKind, TableIR};

/// Module IR - the unit of generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleIR {
    pub meta: ModuleMeta,
    pub features: Features,
    /// Tables in declaration order.
    pub tables: Vec<TableIR>,
    /// Relationships in declaration order, inferred belongsTo last.
    pub relations: Vec<RelationIR>,
}

/// Module metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleMeta {
    /// `Shop`
    pub name: String,
    /// `shop`, used in module.json and route names
    pub alias: String,
    /// `Modules\Shop`
    pub namespace: String,
    pub description: String,
    pub version: String,
    pub priority: i32,
    /// Currency for money columns.
    pub currency: String,
}

/// Which artifact families are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Features {
    pub api: bool,
    pub web_routes: bool,
    pub admin_panel: bool,
    pub permissions: bool,
    pub factories: bool,
    pub seeders: bool,
}

impl ModuleIR {
    /// Find a table by table name or model name.
    pub fn table(&self, reference: &str) -> Option<&TableIR> {
        self.tables
            .iter()
            .find(|t| t.name == reference || t.names.model == reference)
    }

    /// Relationships declared on a table.
    pub fn relations_from<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a RelationIR> {
        self.relations.iter().filter(move |r| r.from == table)
    }

    /// belongsTo relationships declared on a table.
    pub fn belongs_to<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a RelationIR> {
        self.relations_from(table)
            .filter(|r| r.kind == RelationKind::BelongsTo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RelationTarget, TableNames};

    fn module() -> ModuleIR {
        let table = |name: &str, model: &str| TableIR {
            name: name.into(),
            names: TableNames::derive(name, model),
            display: "name".into(),
            fields: vec![],
            timestamps: true,
            soft_deletes: false,
        };
        ModuleIR {
            meta: ModuleMeta {
                name: "Shop".into(),
                alias: "shop".into(),
                namespace: "Modules\\Shop".into(),
                description: String::new(),
                version: "1.0.0".into(),
                priority: 0,
                currency: "USD".into(),
            },
            features: Features {
                api: true,
                web_routes: false,
                admin_panel: true,
                permissions: true,
                factories: true,
                seeders: true,
            },
            tables: vec![table("categories", "Category"), table("products", "Product")],
            relations: vec![RelationIR {
                from: "products".into(),
                kind: RelationKind::BelongsTo,
                method: "category".into(),
                target: RelationTarget::Unresolved {
                    reference: "Category".into(),
                },
                foreign_key: None,
                local_key: None,
                pivot_table: None,
                morph_name: None,
                through: None,
                inferred: false,
            }],
        }
    }

    #[test]
    fn test_table_lookup() {
        let module = module();
        assert_eq!(module.table("Category").unwrap().name, "categories");
        assert_eq!(module.table("products").unwrap().model(), "Product");
        assert!(module.table("orders").is_none());
    }

    #[test]
    fn test_belongs_to_filter() {
        let module = module();
        assert_eq!(module.belongs_to("products").count(), 1);
        assert_eq!(module.belongs_to("categories").count(), 0);
    }
}
