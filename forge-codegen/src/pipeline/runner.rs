//! Pipeline orchestrator.

use eyre::Result;
use modforge_manifest::Manifest;

use super::{
    CompilationContext, Phase, PhaseInfo, Plugin,
    phases::{AnalyzePhase, LowerPhase, ValidatePhase},
};

/// The compilation pipeline orchestrator.
///
/// Runs the built-in phases (validate, lower, analyze) followed by any user
/// phases, calling plugin hooks before and after each phase.
///
/// # Example
///
/// ```ignore
/// let pipeline = Pipeline::new().plugin(SnapshotPlugin::new());
/// let mut ctx = pipeline.run(manifest)?;
/// let module = ctx.take_ir()?;
/// ```
pub struct Pipeline {
    validate: ValidatePhase,
    phases: Vec<Box<dyn Phase>>,
    plugins: Vec<Box<dyn Plugin>>,
}

impl Pipeline {
    /// Create a new pipeline with default built-in phases.
    pub fn new() -> Self {
        Self {
            validate: ValidatePhase::new(),
            phases: Vec::new(),
            plugins: Vec::new(),
        }
    }

    /// Replace the validate phase (e.g., to add custom lints).
    pub fn validate(mut self, phase: ValidatePhase) -> Self {
        self.validate = phase;
        self
    }

    /// Add a phase to run after the built-in phases.
    pub fn phase(mut self, phase: impl Phase + 'static) -> Self {
        self.phases.push(Box::new(phase));
        self
    }

    /// Add a plugin to receive phase lifecycle hooks.
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Describe every phase in execution order.
    pub fn phase_info(&self) -> Vec<PhaseInfo> {
        let builtin: [&dyn Phase; 3] = [&self.validate, &LowerPhase, &AnalyzePhase];
        builtin
            .into_iter()
            .chain(self.phases.iter().map(|p| p.as_ref()))
            .map(|p| p.info())
            .collect()
    }

    /// Run the pipeline on a manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if any phase fails fatally. Use
    /// [`Pipeline::run_with`] to inspect the diagnostics of a failed run.
    pub fn run(&self, manifest: Manifest) -> Result<CompilationContext> {
        let mut ctx = CompilationContext::new(manifest);
        self.run_with(&mut ctx)?;
        Ok(ctx)
    }

    /// Run the pipeline on an existing context, keeping its diagnostics
    /// available to the caller even when a phase fails.
    pub fn run_with(&self, ctx: &mut CompilationContext) -> Result<()> {
        let builtin: [&dyn Phase; 3] = [&self.validate, &LowerPhase, &AnalyzePhase];

        for phase in builtin
            .into_iter()
            .chain(self.phases.iter().map(|p| p.as_ref()))
        {
            self.run_phase(phase, ctx)?;
        }

        Ok(())
    }

    /// Run a single phase with plugin hooks.
    fn run_phase(&self, phase: &dyn Phase, ctx: &mut CompilationContext) -> Result<()> {
        let phase_name = phase.name();
        let _span = tracing::debug_span!("phase", name = phase_name).entered();

        for plugin in &self.plugins {
            plugin.on_before_phase(phase_name, ctx)?;
        }

        phase.run(ctx)?;
        tracing::debug!(
            errors = ctx.error_count(),
            warnings = ctx.warning_count(),
            "phase complete"
        );

        for plugin in &self.plugins {
            plugin.on_after_phase(phase_name, ctx)?;
        }

        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    struct CountingPlugin {
        before_count: Arc<AtomicUsize>,
        after_count: Arc<AtomicUsize>,
    }

    impl Plugin for CountingPlugin {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn on_before_phase(&self, _phase: &str, _ctx: &mut CompilationContext) -> Result<()> {
            self.before_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn on_after_phase(&self, _phase: &str, _ctx: &mut CompilationContext) -> Result<()> {
            self.after_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn make_test_manifest() -> Manifest {
        r#"
        [module]
        name = "Blog"
        description = "Blog module"

        [[tables]]
        name = "posts"

        [[tables.fields]]
        name = "title"
        type = "string"
        length = 200
        "#
        .parse()
        .expect("Failed to parse test manifest")
    }

    #[test]
    fn test_pipeline_runs_phases() {
        let ctx = Pipeline::new()
            .run(make_test_manifest())
            .expect("pipeline should succeed");

        assert!(ctx.ir.is_some());
        assert!(ctx.analysis.is_some());
    }

    #[test]
    fn test_pipeline_plugin_hooks() {
        let before = Arc::new(AtomicUsize::new(0));
        let after = Arc::new(AtomicUsize::new(0));
        let plugin = CountingPlugin {
            before_count: before.clone(),
            after_count: after.clone(),
        };

        Pipeline::new()
            .plugin(plugin)
            .run(make_test_manifest())
            .expect("pipeline should succeed");

        // 3 built-in phases = 3 before + 3 after hooks
        assert_eq!(before.load(Ordering::SeqCst), 3);
        assert_eq!(after.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_phase_info_order() {
        let names: Vec<_> = Pipeline::new()
            .phase_info()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["validate", "lower", "analyze"]);
    }
}
