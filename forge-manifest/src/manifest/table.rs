use serde::{Deserialize, Serialize};

use super::Field;

/// A `[[tables]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Storage identifier (snake_case, plural)
    pub name: String,

    /// Model class override; derived from `name` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Column used to label records in relationship selects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,

    #[serde(default = "default_true")]
    pub timestamps: bool,

    #[serde(default)]
    pub soft_deletes: bool,

    #[serde(default)]
    pub fields: Vec<Field>,
}

pub(crate) fn default_true() -> bool {
    true
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: None,
            display: None,
            timestamps: true,
            soft_deletes: false,
            fields: Vec::new(),
        }
    }

    /// Find a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Model class name, explicit or derived (`order_items` -> `OrderItem`).
    pub fn model_name(&self) -> String {
        self.model.clone().unwrap_or_else(|| {
            modforge_core::to_studly_case(&modforge_core::singularize(&self.name))
        })
    }

    /// Whether `reference` names this table, by table name or model name.
    pub fn matches(&self, reference: &str) -> bool {
        self.name == reference || self.model_name() == reference
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_name_derived() {
        assert_eq!(Table::new("order_items").model_name(), "OrderItem");
        assert_eq!(Table::new("categories").model_name(), "Category");
    }

    #[test]
    fn test_model_name_override() {
        let mut table = Table::new("people");
        table.model = Some("Member".into());
        assert_eq!(table.model_name(), "Member");
        assert!(table.matches("Member"));
        assert!(table.matches("people"));
        assert!(!table.matches("Person"));
    }

    #[test]
    fn test_defaults() {
        let table: Table = toml::from_str("name = \"tags\"").unwrap();
        assert!(table.timestamps);
        assert!(!table.soft_deletes);
        assert!(table.fields.is_empty());
    }
}
