//! Lint for enum value lists.

use modforge_manifest::{FieldType, Manifest};

use super::super::{Lint, lint::field_location};
use crate::pipeline::Diagnostic;

/// Errors on enum fields without values and warns about `values` declared
/// on non-enum fields, where they are ignored.
pub struct EnumValuesLint;

impl Lint for EnumValuesLint {
    fn name(&self) -> &'static str {
        "enum-values"
    }

    fn description(&self) -> &'static str {
        "Check enum fields list their values"
    }

    fn check(&self, manifest: &Manifest, diagnostics: &mut Vec<Diagnostic>) {
        for table in &manifest.tables {
            for field in &table.fields {
                let location = field_location(&table.name, &field.name);
                match (field.field_type, field.values.is_empty()) {
                    (FieldType::Enum, true) => diagnostics.push(
                        Diagnostic::error(
                            "validate",
                            format!(
                                "enum field '{}.{}' must declare at least one value",
                                table.name, field.name
                            ),
                        )
                        .at(location),
                    ),
                    (FieldType::Enum, false) | (_, true) => {}
                    (other, false) => diagnostics.push(
                        Diagnostic::warning(
                            "validate",
                            format!(
                                "values on {} field '{}.{}' are ignored",
                                other, table.name, field.name
                            ),
                        )
                        .at(location),
                    ),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use modforge_manifest::{Field, ModuleConfig, Table};

    use super::*;

    fn manifest_with(field: Field) -> Manifest {
        let mut manifest = Manifest::new(ModuleConfig::new("Blog"));
        let mut table = Table::new("posts");
        table.fields.push(field);
        manifest.tables.push(table);
        manifest
    }

    #[test]
    fn test_empty_enum_is_error() {
        let manifest = manifest_with(Field::new("status", FieldType::Enum));
        let mut diagnostics = Vec::new();
        EnumValuesLint.check(&manifest, &mut diagnostics);

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].severity.is_error());
    }

    #[test]
    fn test_values_on_string_warns() {
        let mut field = Field::new("title", FieldType::String);
        field.values = vec!["a".into()];
        let mut diagnostics = Vec::new();
        EnumValuesLint.check(&manifest_with(field), &mut diagnostics);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "values on string field 'posts.title' are ignored"
        );
    }

    #[test]
    fn test_enum_with_values_passes() {
        let mut field = Field::new("status", FieldType::Enum);
        field.values = vec!["draft".into(), "published".into()];
        let mut diagnostics = Vec::new();
        EnumValuesLint.check(&manifest_with(field), &mut diagnostics);

        assert!(diagnostics.is_empty());
    }
}
