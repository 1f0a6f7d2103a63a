//! Lint for an empty module description.

use modforge_manifest::Manifest;

use super::super::Lint;
use crate::pipeline::Diagnostic;

/// Warns when the module has no description; module.json and the service
/// provider docblock fall back to the module name.
pub struct EmptyDescriptionLint;

impl Lint for EmptyDescriptionLint {
    fn name(&self) -> &'static str {
        "empty-description"
    }

    fn description(&self) -> &'static str {
        "Check the module has a description"
    }

    fn check(&self, manifest: &Manifest, diagnostics: &mut Vec<Diagnostic>) {
        if manifest.module.description.trim().is_empty() {
            diagnostics.push(
                Diagnostic::warning(
                    "validate",
                    format!("module '{}' has no description", manifest.module.name),
                )
                .at("module.description"),
            );
        }
    }
}
