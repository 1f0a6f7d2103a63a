//! Manifest types and parsing for forge.toml files.

mod edit;
mod field;
mod file;
mod module;
mod parse;
mod relationship;
mod table;
mod validate;

pub use edit::{append_field_block, append_relationship_block, render_field_block};
pub use field::{Field, FieldType, ForeignAction};
pub use file::ForgeToml;
pub use module::ModuleConfig;
pub use relationship::{RelationType, Relationship};
use serde::{Deserialize, Serialize};
pub use table::Table;
pub use validate::ParseContext;

use crate::{Error, Result};

/// Root manifest for forge.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Module identity and feature flags
    pub module: ModuleConfig,

    /// Tables in declaration order
    #[serde(default)]
    pub tables: Vec<Table>,

    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl Manifest {
    pub fn new(module: ModuleConfig) -> Self {
        Self {
            module,
            tables: Vec::new(),
            relationships: Vec::new(),
        }
    }

    /// Find a table by table name or model name.
    pub fn table(&self, reference: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.matches(reference))
    }

    fn table_mut(&mut self, reference: &str) -> Result<&mut Table> {
        self.tables
            .iter_mut()
            .find(|t| t.matches(reference))
            .ok_or_else(|| {
                Box::new(Error::UnknownTable {
                    table: reference.to_string(),
                })
            })
    }

    /// Append fields to an existing table and re-validate the result.
    pub fn add_fields(&mut self, table: &str, fields: Vec<Field>) -> Result<()> {
        self.table_mut(table)?.fields.extend(fields);
        self.revalidate()
    }

    /// Append a relationship and re-validate the result.
    pub fn add_relationship(&mut self, relationship: Relationship) -> Result<()> {
        self.relationships.push(relationship);
        self.revalidate()
    }

    /// Run structural validation against the serialized form of this manifest.
    pub fn revalidate(&self) -> Result<()> {
        let src = self.to_toml_string()?;
        validate::validate_manifest(self, &src, "forge.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shop() -> Manifest {
        let mut manifest = Manifest::new(ModuleConfig::new("Shop"));
        let mut products = Table::new("products");
        products.fields.push(Field::new("name", FieldType::String));
        manifest.tables.push(products);
        manifest
    }

    #[test]
    fn test_table_lookup_by_model_or_table_name() {
        let manifest = shop();
        assert!(manifest.table("products").is_some());
        assert!(manifest.table("Product").is_some());
        assert!(manifest.table("orders").is_none());
    }

    #[test]
    fn test_add_fields() {
        let mut manifest = shop();
        manifest
            .add_fields("products", vec![Field::new("weight", FieldType::Decimal)])
            .unwrap();
        let names: Vec<_> = manifest.tables[0]
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["name", "weight"]);
    }

    #[test]
    fn test_add_fields_rejects_duplicates() {
        let mut manifest = shop();
        let err = manifest
            .add_fields("products", vec![Field::new("name", FieldType::Text)])
            .unwrap_err();
        assert!(matches!(*err, Error::Duplicate { .. }));
    }

    #[test]
    fn test_add_fields_unknown_table() {
        let mut manifest = shop();
        let err = manifest
            .add_fields("orders", vec![Field::new("total", FieldType::Decimal)])
            .unwrap_err();
        assert!(matches!(*err, Error::UnknownTable { .. }));
    }
}
