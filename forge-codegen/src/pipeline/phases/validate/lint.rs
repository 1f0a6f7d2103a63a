//! Lint trait for manifest validation.

use modforge_manifest::Manifest;

use crate::pipeline::Diagnostic;

/// Information about a lint.
#[derive(Debug, Clone)]
pub struct LintInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// A lint that checks the manifest for issues.
///
/// Structural errors (duplicates, reserved words) are reported by the
/// manifest parser with source spans; lints cover conventions that the
/// generated code tolerates but a reader should know about.
pub trait Lint: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Check the manifest and add any diagnostics.
    fn check(&self, manifest: &Manifest, diagnostics: &mut Vec<Diagnostic>);

    fn info(&self) -> LintInfo {
        LintInfo {
            name: self.name(),
            description: self.description(),
        }
    }
}

/// Location string for a field: `tables.<table>.fields.<field>`.
pub(crate) fn field_location(table: &str, field: &str) -> String {
    format!("tables.{}.fields.{}", table, field)
}
