//! Import of JSON module descriptions.
//!
//! Upstream tools describe a module as
//! `{ module_name, description, models: [...], relationships: [...] }`.
//! The description is converted into a [`Manifest`] so every later flow
//! works from a single forge.toml.

use std::path::Path;

use modforge_core::{pluralize, to_snake_case, to_studly_case};
use serde::Deserialize;

use crate::{
    Error, Field, FieldType, Manifest, ModuleConfig, RelationType, Relationship, Result, Table,
    manifest::ParseContext,
};

/// Root of a JSON module description.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleDescription {
    pub module_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub models: Vec<ModelDescription>,
    #[serde(default)]
    pub relationships: Vec<RelationshipDescription>,
    #[serde(default = "default_true")]
    pub generate_factory: bool,
    #[serde(default = "default_true")]
    pub generate_seeder: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelDescription {
    pub name: String,
    #[serde(default)]
    pub table_name: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDescription>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldDescription {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    #[serde(default, alias = "enum_values")]
    pub enum_options: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelationshipDescription {
    pub from_model: String,
    pub to_model: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub foreign_key: Option<String>,
    #[serde(default)]
    pub relationship_name: Option<String>,
    #[serde(default)]
    pub pivot_table: Option<String>,
}

impl ModuleDescription {
    /// Read a description from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        Self::from_json(&content, &path.display().to_string())
    }

    pub fn from_json(content: &str, filename: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|source| {
            Box::new(Error::Json {
                filename: filename.to_string(),
                source,
            })
        })
    }

    /// Convert into a validated manifest.
    pub fn into_manifest(self) -> Result<Manifest> {
        let mut module = ModuleConfig::new(to_studly_case(&self.module_name));
        module.description = self.description.unwrap_or_default();
        module.factories = self.generate_factory;
        module.seeders = self.generate_seeder;

        let mut manifest = Manifest::new(module);
        let ctx = ParseContext::new("", "module.json");

        for model in self.models {
            let table_name = model
                .table_name
                .unwrap_or_else(|| pluralize(&to_snake_case(&model.name)));
            let mut table = Table::new(table_name);
            if table.model_name() != model.name {
                table.model = Some(model.name.clone());
            }

            for desc in model.fields {
                let field_type: FieldType = desc.field_type.parse().map_err(|message| {
                    ctx.source_context().validation_error(
                        format!("field '{}.{}': {}", model.name, desc.name, message),
                        None,
                    )
                })?;
                let mut field = Field::new(desc.name, field_type);
                field.required = desc.required;
                field.length = desc.length;
                field.default = desc.default.and_then(json_to_toml);
                field.values = desc.enum_options.map(enum_options).unwrap_or_default();
                table.fields.push(field);
            }
            manifest.tables.push(table);
        }

        for desc in self.relationships {
            let kind: RelationType = desc.kind.parse().map_err(|message: String| {
                ctx.source_context().validation_error(
                    format!(
                        "relationship '{}' -> '{}': {}",
                        desc.from_model, desc.to_model, message
                    ),
                    None,
                )
            })?;
            let mut rel = Relationship::new(desc.from_model, kind, desc.to_model);
            rel.name = desc.relationship_name.filter(|n| !n.is_empty());
            rel.foreign_key = desc.foreign_key.filter(|k| !k.is_empty());
            rel.pivot_table = desc.pivot_table.filter(|p| !p.is_empty());
            manifest.relationships.push(rel);
        }

        manifest.revalidate()?;
        Ok(manifest)
    }
}

/// `enum_options` arrives as an array, a comma string, or a `{value: label}` map.
fn enum_options(value: serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                serde_json::Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        serde_json::Value::String(raw) => raw
            .split(',')
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect(),
        serde_json::Value::Object(map) => map.into_iter().map(|(key, _)| key).collect(),
        _ => Vec::new(),
    }
}

fn json_to_toml(value: serde_json::Value) -> Option<toml::Value> {
    match value {
        serde_json::Value::Bool(b) => Some(toml::Value::Boolean(b)),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(toml::Value::Integer)
            .or_else(|| n.as_f64().map(toml::Value::Float)),
        serde_json::Value::String(s) => Some(toml::Value::String(s)),
        _ => None,
    }
}
