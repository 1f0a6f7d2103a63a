//! Lint for table naming conventions.

use modforge_core::{pluralize, singularize, to_snake_case};
use modforge_manifest::Manifest;

use super::super::Lint;
use crate::pipeline::Diagnostic;

/// Warns about table names that aren't plural snake_case.
///
/// Eloquent derives the table from the model as the plural snake name, so
/// `product` or `OrderItems` work only because the model pins `$table`.
pub struct TableNamingLint;

impl Lint for TableNamingLint {
    fn name(&self) -> &'static str {
        "table-naming"
    }

    fn description(&self) -> &'static str {
        "Check table names are plural snake_case"
    }

    fn check(&self, manifest: &Manifest, diagnostics: &mut Vec<Diagnostic>) {
        for table in &manifest.tables {
            let snake = to_snake_case(&table.name);
            let expected = pluralize(&singularize(&snake));
            if table.name != expected {
                diagnostics.push(
                    Diagnostic::warning(
                        "validate",
                        format!(
                            "table '{}' should be plural snake_case (e.g., '{}')",
                            table.name, expected
                        ),
                    )
                    .at(format!("tables.{}", table.name)),
                );
            }
        }
    }
}
