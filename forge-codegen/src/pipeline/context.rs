//! Compilation context passed through pipeline phases.

use eyre::{Result, eyre};
use modforge_ir::ModuleIR;
use modforge_manifest::Manifest;

use super::diagnostic::{Diagnostic, Severity};
use crate::schema::ModuleAnalysis;

/// Context passed through all pipeline phases.
///
/// This struct carries the state of compilation through each phase,
/// accumulating results and diagnostics along the way.
#[derive(Debug)]
pub struct CompilationContext {
    /// The original manifest being compiled.
    pub manifest: Manifest,
    /// The lowered module (populated by LowerPhase).
    pub ir: Option<ModuleIR>,
    /// Ordering, pivots and foreign key index (populated by AnalyzePhase).
    pub analysis: Option<ModuleAnalysis>,
    /// Diagnostics collected during compilation.
    pub diagnostics: Vec<Diagnostic>,
}

impl CompilationContext {
    /// Create a new compilation context from a manifest.
    pub fn new(manifest: Manifest) -> Self {
        Self {
            manifest,
            ir: None,
            analysis: None,
            diagnostics: Vec::new(),
        }
    }

    /// Check if any error diagnostics have been recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }

    /// Check if any warning diagnostics have been recorded.
    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_warning())
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn add_error(&mut self, phase: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::error(phase, message));
    }

    pub fn add_warning(&mut self, phase: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::warning(phase, message));
    }

    pub fn add_info(&mut self, phase: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::info(phase, message));
    }

    /// Add a diagnostic with a location.
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.severity, Severity::Error))
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.severity, Severity::Warning))
    }

    /// Take the IR out of the context.
    pub fn take_ir(&mut self) -> Result<ModuleIR> {
        self.ir
            .take()
            .ok_or_else(|| eyre!("module IR not set - did LowerPhase run?"))
    }

    /// Take the analysis out of the context.
    pub fn take_analysis(&mut self) -> Result<ModuleAnalysis> {
        self.analysis
            .take()
            .ok_or_else(|| eyre!("module analysis not set - did AnalyzePhase run?"))
    }
}

#[cfg(test)]
mod tests {
    use modforge_manifest::ModuleConfig;

    use super::*;

    fn make_test_manifest() -> Manifest {
        Manifest::new(ModuleConfig::new("Shop"))
    }

    #[test]
    fn test_context_creation() {
        let ctx = CompilationContext::new(make_test_manifest());

        assert!(ctx.ir.is_none());
        assert!(ctx.analysis.is_none());
        assert!(ctx.diagnostics.is_empty());
    }

    #[test]
    fn test_context_diagnostics() {
        let mut ctx = CompilationContext::new(make_test_manifest());

        ctx.add_error("test", "test error");
        ctx.add_warning("test", "test warning");
        ctx.add_info("test", "note");

        assert!(ctx.has_errors());
        assert!(ctx.has_warnings());
        assert_eq!(ctx.error_count(), 1);
        assert_eq!(ctx.warning_count(), 1);
    }

    #[test]
    fn test_take_ir_before_lowering_fails() {
        let mut ctx = CompilationContext::new(make_test_manifest());
        let err = ctx.take_ir().unwrap_err();
        assert!(err.to_string().contains("LowerPhase"));
    }
}
