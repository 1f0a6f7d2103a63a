//! Lint for foreign key column names.

use modforge_manifest::{FieldType, Manifest};

use super::super::{Lint, lint::field_location};
use crate::pipeline::Diagnostic;

/// Warns about foreign key columns whose target can't be inferred from the
/// name because they neither end in `_id` nor set `references`.
pub struct ForeignKeyNamingLint;

impl Lint for ForeignKeyNamingLint {
    fn name(&self) -> &'static str {
        "foreign-key-naming"
    }

    fn description(&self) -> &'static str {
        "Check foreign key columns end in _id or name their table"
    }

    fn check(&self, manifest: &Manifest, diagnostics: &mut Vec<Diagnostic>) {
        for table in &manifest.tables {
            for field in &table.fields {
                if field.field_type == FieldType::ForeignId
                    && field.references.is_none()
                    && !field.name.ends_with("_id")
                {
                    diagnostics.push(
                        Diagnostic::warning(
                            "validate",
                            format!(
                                "foreign key '{}.{}' should end in '_id' or set `references`",
                                table.name, field.name
                            ),
                        )
                        .at(field_location(&table.name, &field.name)),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use modforge_manifest::{Field, ModuleConfig, Table};

    use super::*;

    #[test]
    fn test_foreign_key_without_suffix() {
        let mut manifest = Manifest::new(ModuleConfig::new("Shop"));
        let mut products = Table::new("products");
        products.fields.push(Field::new("category_id", FieldType::ForeignId));
        products.fields.push(Field::new("owner", FieldType::ForeignId));
        let mut explicit = Field::new("maker", FieldType::ForeignId);
        explicit.references = Some("brands".into());
        products.fields.push(explicit);
        manifest.tables.push(products);

        let mut diagnostics = Vec::new();
        ForeignKeyNamingLint.check(&manifest, &mut diagnostics);

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("products.owner"));
    }
}
