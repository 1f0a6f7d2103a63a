//! Generate operation - render a module, write it and install it into the host.

use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr, eyre};
use modforge_codegen::{
    language::LanguageCodegen,
    pipeline::{CompilationContext, Pipeline, SnapshotPlugin},
    schema::{DisplayStyle, SchemaDisplay},
};
use modforge_codegen_laravel::{GenerationReport, LaravelGenerator, MigrationClock, STATE_DIR};
use modforge_host::{
    ArtisanRunner, HostIntegration, HostModule, InstallOptions, InstallReport, ProjectStore,
    SeederPermissionStore,
};
use modforge_manifest::Manifest;

use crate::reports::{GenerateReport, GenerationResult, PreviewFile, PreviewResult, WrittenResult};

/// Options for the generate operation.
pub struct GenerateOptions<'a> {
    /// Root of the host application.
    pub host_root: &'a Path,
    /// Modules directory relative to the host root.
    pub modules_dir: &'a str,
    /// Preview without touching disk or host files.
    pub dry_run: bool,
    /// Write the module but leave the host alone.
    pub skip_host: bool,
    /// Write per-phase pipeline snapshots.
    pub visualize: bool,
    /// Pinned migration timestamps.
    pub clock: Option<MigrationClock>,
}

impl GenerateOptions<'_> {
    fn module_dir(&self, module: &str) -> PathBuf {
        self.host_root.join(self.modules_dir).join(module)
    }

    fn debug_dir(&self) -> PathBuf {
        self.host_root.join(STATE_DIR).join("debug")
    }
}

/// Run the pipeline and build the generator, folding every error diagnostic
/// into the returned error.
pub fn compile(manifest: &Manifest, snapshots: Option<&Path>) -> Result<LaravelGenerator> {
    let mut pipeline = Pipeline::new();
    if let Some(dir) = snapshots {
        pipeline = pipeline.plugin(SnapshotPlugin::with_output_dir(dir));
    }

    let mut ctx = CompilationContext::new(manifest.clone());
    if let Err(err) = pipeline.run_with(&mut ctx) {
        let details: Vec<String> = ctx
            .errors()
            .map(|d| match &d.location {
                Some(loc) => format!("{} (at {})", d.message, loc),
                None => d.message.clone(),
            })
            .collect();
        if details.is_empty() {
            return Err(err.wrap_err("pipeline failed"));
        }
        return Err(eyre!("{}: {}", err, details.join("; ")));
    }
    LaravelGenerator::from_context(&mut ctx)
}

/// Execute the generate operation.
///
/// Dry runs only render. Otherwise the project moves to `building`, and to
/// `built` or `error` once the module is written and installed.
pub fn generate(
    manifest: &Manifest,
    opts: GenerateOptions,
    runner: &dyn ArtisanRunner,
) -> Result<GenerateReport> {
    let name = manifest.module.name.clone();
    let module_dir = opts.module_dir(&name);
    let debug_dir = opts.visualize.then(|| opts.debug_dir());
    let _span = tracing::info_span!("generate", module = %name).entered();

    let compiled = compile(manifest, debug_dir.as_deref()).map(|generator| match opts.clock {
        Some(clock) => generator.clock(clock),
        None => generator,
    });

    let mut report = GenerateReport {
        module: name.clone(),
        version: manifest.module.version.to_string(),
        description: manifest.module.description.clone(),
        tables: String::new(),
        warnings: Vec::new(),
        debug_dir,
        result: GenerationResult::Preview(PreviewResult { files: Vec::new() }),
    };

    if opts.dry_run {
        let generator = compiled?;
        report.tables = SchemaDisplay::new(generator.module())
            .style(DisplayStyle::Simple)
            .render();
        report.warnings = generator.warnings().to_vec();
        let files = generator
            .registry_for(&module_dir)?
            .preview()
            .into_iter()
            .map(|f| PreviewFile {
                path: f.path,
                content: f.content,
            })
            .collect();
        report.result = GenerationResult::Preview(PreviewResult { files });
        return Ok(report);
    }

    let mut store = ProjectStore::open(opts.host_root)?;
    store.begin(&name)?;

    let (outcome, install) = match &compiled {
        Ok(generator) => {
            report.tables = SchemaDisplay::new(generator.module())
                .style(DisplayStyle::Simple)
                .render();
            write_and_install(generator, &module_dir, &opts, runner)
        }
        Err(err) => (GenerationReport::failed(format!("{:#}", err), Vec::new()), None),
    };

    store
        .finish(&name, &outcome)
        .wrap_err("failed to record the project status")?;

    report.warnings = outcome.warnings.clone();
    report.result = GenerationResult::Written(WrittenResult {
        module_dir,
        outcome,
        install,
    });
    Ok(report)
}

fn write_and_install(
    generator: &LaravelGenerator,
    module_dir: &Path,
    opts: &GenerateOptions,
    runner: &dyn ArtisanRunner,
) -> (GenerationReport, Option<InstallReport>) {
    let name = &generator.module().meta.name;

    let mut outcome = match generator.generate(module_dir) {
        Ok(result) => GenerationReport::succeeded(name, result),
        Err(err) => {
            tracing::error!(error = %err, "generation failed");
            let files = files_on_disk(generator, module_dir);
            return (GenerationReport::failed(format!("{:#}", err), files), None);
        }
    };

    if opts.skip_host {
        return (outcome, None);
    }

    let module = HostModule::from_generator(generator, opts.modules_dir);
    let store = SeederPermissionStore::new(runner);
    let host = HostIntegration::new(opts.host_root, runner);
    match host.install(&module, Some(&store), InstallOptions::default()) {
        Ok(install) => {
            for warning in &install.warnings {
                outcome.warn(warning.clone());
            }
            (outcome, Some(install))
        }
        Err(err) => {
            tracing::error!(error = %err, "host integration failed");
            let mut failed = GenerationReport::failed(
                format!("host integration failed: {:#}", err),
                outcome.files,
            );
            failed.warnings = outcome.warnings;
            (failed, None)
        }
    }
}

/// Files of the module that exist after a failed write.
fn files_on_disk(generator: &LaravelGenerator, module_dir: &Path) -> Vec<String> {
    generator
        .registry_for(module_dir)
        .map(|registry| {
            registry
                .entries()
                .filter(|e| e.full_path(module_dir).exists())
                .map(|e| e.path.clone())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use modforge_host::{DryRunner, ProjectStatus};

    use super::*;

    const MANIFEST: &str = r#"
[module]
name = "Shop"

[[tables]]
name = "categories"

[[tables.fields]]
name = "name"
type = "string"
length = 120
required = true
"#;

    fn host() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("composer.json"), "{\"autoload\": {\"psr-4\": {}}}").unwrap();
        fs::create_dir_all(root.join("bootstrap")).unwrap();
        fs::write(root.join("bootstrap/providers.php"), "<?php\n\nreturn [\n];\n").unwrap();
        fs::create_dir_all(root.join("app/Providers/Filament")).unwrap();
        fs::write(
            root.join("app/Providers/Filament/AdminPanelProvider.php"),
            "<?php\n\n        return $panel\n            ->id('admin');\n",
        )
        .unwrap();
        dir
    }

    fn options(root: &Path) -> GenerateOptions<'_> {
        GenerateOptions {
            host_root: root,
            modules_dir: "Modules",
            dry_run: false,
            skip_host: false,
            visualize: false,
            clock: MigrationClock::parse("2024_01_15_093000").ok(),
        }
    }

    fn manifest() -> Manifest {
        MANIFEST.parse().unwrap()
    }

    #[test]
    fn test_generate_writes_and_installs() {
        let dir = host();
        let runner = DryRunner::new();
        let report = generate(&manifest(), options(dir.path()), &runner).unwrap();
        assert!(report.is_success());

        let module_dir = dir.path().join("Modules/Shop");
        assert!(module_dir.join("module.json").exists());
        assert!(
            module_dir
                .join("database/migrations/2024_01_15_093000_create_categories_table.php")
                .exists()
        );
        assert!(
            fs::read_to_string(dir.path().join("bootstrap/providers.php"))
                .unwrap()
                .contains("Modules\\Shop\\Providers\\ShopServiceProvider::class,")
        );

        let store = ProjectStore::open(dir.path()).unwrap();
        assert_eq!(store.get("Shop").unwrap().status, ProjectStatus::Built);
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let dir = host();
        let runner = DryRunner::new();
        let opts = GenerateOptions {
            dry_run: true,
            ..options(dir.path())
        };
        let report = generate(&manifest(), opts, &runner).unwrap();
        let GenerationResult::Preview(preview) = &report.result else {
            panic!("expected a preview");
        };
        assert!(preview.files.iter().any(|f| f.path == "module.json"));
        assert!(!dir.path().join("Modules").exists());
        assert!(!ProjectStore::path(dir.path()).exists());
        assert!(runner.commands().is_empty());
    }

    #[test]
    fn test_migration_failure_marks_project_as_error() {
        let dir = host();
        let runner = DryRunner::new().failing("migrate");
        let report = generate(&manifest(), options(dir.path()), &runner).unwrap();
        assert!(!report.is_success());

        let GenerationResult::Written(written) = &report.result else {
            panic!("expected a written result");
        };
        assert!(written.outcome.message.contains("host integration failed"));
        // Files stay on disk.
        assert!(written.outcome.files.iter().any(|f| f == "module.json"));

        let store = ProjectStore::open(dir.path()).unwrap();
        assert_eq!(store.get("Shop").unwrap().status, ProjectStatus::Error);
    }

    #[test]
    fn test_skip_host_leaves_host_files() {
        let dir = host();
        let runner = DryRunner::new();
        let opts = GenerateOptions {
            skip_host: true,
            ..options(dir.path())
        };
        let report = generate(&manifest(), opts, &runner).unwrap();
        assert!(report.is_success());
        assert_eq!(
            fs::read_to_string(dir.path().join("bootstrap/providers.php")).unwrap(),
            "<?php\n\nreturn [\n];\n"
        );
        assert!(runner.commands().is_empty());
    }
}
