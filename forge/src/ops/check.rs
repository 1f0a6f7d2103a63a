//! Check operation - manifest validation.

use std::path::Path;

use eyre::Result;
use modforge_codegen::pipeline::{
    CompilationContext, Pipeline, Severity, phases::ValidatePhase,
};
use modforge_manifest::Manifest;

use crate::reports::{CheckReport, PipelineOverview};

/// Execute the check operation.
///
/// Runs the pipeline to validate the manifest and returns diagnostics. A
/// failed phase is only an error of its own when it left no diagnostic.
/// With `explain`, the report also lists the phases and lints that ran.
pub fn check(manifest: &Manifest, config_path: &Path, explain: bool) -> Result<CheckReport> {
    let validate = ValidatePhase::new();
    let lints = validate.lint_info();
    let pipeline = Pipeline::new().validate(validate);
    let overview = explain.then(|| PipelineOverview {
        phases: pipeline
            .phase_info()
            .into_iter()
            .map(|p| (p.name, p.description))
            .collect(),
        lints: lints.into_iter().map(|l| (l.name, l.description)).collect(),
    });

    let mut ctx = CompilationContext::new(manifest.clone());
    let outcome = pipeline.run_with(&mut ctx);
    if let Err(err) = outcome
        && !ctx.has_errors()
    {
        return Err(err.wrap_err("Validation failed"));
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut infos = Vec::new();

    for diag in &ctx.diagnostics {
        let msg = if let Some(loc) = &diag.location {
            format!("{}\n  --> {}", diag.message, loc)
        } else {
            diag.message.clone()
        };

        match diag.severity {
            Severity::Error => errors.push(msg),
            Severity::Warning => warnings.push(msg),
            Severity::Info => infos.push(msg),
        }
    }

    Ok(CheckReport {
        config_path: config_path.to_path_buf(),
        module: manifest.module.name.clone(),
        tables: manifest.tables.len(),
        relationships: manifest.relationships.len(),
        errors,
        warnings,
        infos,
        pipeline: overview,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_relation_target_is_reported() {
        let manifest: Manifest = r#"
[module]
name = "Shop"

[[tables]]
name = "products"

[[relationships]]
from = "Product"
type = "belongsTo"
to = "Supplier"
"#
        .parse()
        .unwrap();

        let report = check(&manifest, Path::new("forge.toml"), false).unwrap();
        assert_eq!(report.tables, 1);
        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.contains("Supplier")));
        assert!(report.pipeline.is_none());
    }

    #[test]
    fn test_explain_lists_phases_and_lints() {
        let manifest: Manifest = r#"
[module]
name = "Shop"
"#
        .parse()
        .unwrap();

        let report = check(&manifest, Path::new("forge.toml"), true).unwrap();
        let overview = report.pipeline.unwrap();
        let phases: Vec<&str> = overview.phases.iter().map(|(name, _)| *name).collect();
        assert_eq!(phases, vec!["validate", "lower", "analyze"]);
        assert_eq!(overview.lints.len(), 5);
    }
}
