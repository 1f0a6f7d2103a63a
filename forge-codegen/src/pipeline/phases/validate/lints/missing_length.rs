//! Lint for length-bearing columns declared without a length.

use modforge_ir::{DEFAULT_PRECISION, DEFAULT_SCALE, DEFAULT_STRING_LENGTH};
use modforge_manifest::{FieldType, Manifest};

use super::super::{Lint, lint::field_location};
use crate::pipeline::Diagnostic;

/// Warns about string, char and decimal fields without an explicit size.
pub struct MissingLengthLint;

impl Lint for MissingLengthLint {
    fn name(&self) -> &'static str {
        "missing-length"
    }

    fn description(&self) -> &'static str {
        "Check string, char and decimal fields declare their size"
    }

    fn check(&self, manifest: &Manifest, diagnostics: &mut Vec<Diagnostic>) {
        for table in &manifest.tables {
            for field in &table.fields {
                if !field.field_type.requires_length() {
                    continue;
                }
                let message = match field.field_type {
                    FieldType::Decimal if field.precision.is_none() => format!(
                        "decimal field '{}.{}' has no precision, defaulting to ({}, {})",
                        table.name,
                        field.name,
                        DEFAULT_PRECISION,
                        field.scale.unwrap_or(DEFAULT_SCALE)
                    ),
                    FieldType::String | FieldType::Char if field.length.is_none() => format!(
                        "{} field '{}.{}' has no length, defaulting to {}",
                        field.field_type.as_str(),
                        table.name,
                        field.name,
                        DEFAULT_STRING_LENGTH
                    ),
                    _ => continue,
                };
                diagnostics.push(
                    Diagnostic::warning("validate", message)
                        .at(field_location(&table.name, &field.name)),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(src: &str) -> Vec<Diagnostic> {
        let manifest: Manifest = src.parse().unwrap();
        let mut diagnostics = Vec::new();
        MissingLengthLint.check(&manifest, &mut diagnostics);
        diagnostics
    }

    #[test]
    fn test_reports_missing_sizes() {
        let diagnostics = check(
            r#"
            [module]
            name = "Shop"

            [[tables]]
            name = "products"

            [[tables.fields]]
            name = "name"
            type = "string"

            [[tables.fields]]
            name = "price"
            type = "decimal"

            [[tables.fields]]
            name = "sku"
            type = "string"
            length = 32

            [[tables.fields]]
            name = "body"
            type = "text"
            "#,
        );

        let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "string field 'products.name' has no length, defaulting to 255",
                "decimal field 'products.price' has no precision, defaulting to (10, 2)",
            ]
        );
        assert_eq!(
            diagnostics[1].location.as_deref(),
            Some("tables.products.fields.price")
        );
    }
}
