//! Generate command report data structures.

use std::path::PathBuf;

use modforge_codegen_laravel::GenerationReport;
use modforge_host::{Change, InstallReport};

use super::output::{Output, Report};

/// Report data from module generation.
#[derive(Debug)]
pub struct GenerateReport {
    /// Module name from the manifest.
    pub module: String,

    /// Module version from the manifest.
    pub version: String,

    /// Module description from the manifest.
    pub description: String,

    /// Table listing.
    pub tables: String,

    /// Warnings from the pipeline, rendering and host integration.
    pub warnings: Vec<String>,

    /// Path to debug snapshots, if visualization was enabled.
    pub debug_dir: Option<PathBuf>,

    /// Generation result (files written or preview).
    pub result: GenerationResult,
}

/// Result of code generation.
#[derive(Debug)]
pub enum GenerationResult {
    /// Files were written to disk.
    Written(WrittenResult),
    /// Dry-run preview.
    Preview(PreviewResult),
}

/// Result when the module was written to disk.
#[derive(Debug)]
pub struct WrittenResult {
    pub module_dir: PathBuf,
    pub outcome: GenerationReport,
    /// Host changes, absent when the host was skipped or integration failed.
    pub install: Option<InstallReport>,
}

/// Result of a dry-run preview.
#[derive(Debug)]
pub struct PreviewResult {
    /// Files that would be generated.
    pub files: Vec<PreviewFile>,
}

/// A file in preview mode.
#[derive(Debug)]
pub struct PreviewFile {
    /// Path relative to the module directory.
    pub path: String,
    pub content: String,
}

impl GenerateReport {
    /// False when generation or host integration failed.
    pub fn is_success(&self) -> bool {
        match &self.result {
            GenerationResult::Written(written) => written.outcome.success,
            GenerationResult::Preview(_) => true,
        }
    }
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        if let Some(debug_dir) = &self.debug_dir {
            out.key_value(
                "Pipeline snapshots written to",
                &debug_dir.display().to_string(),
            );
            out.newline();
        }

        match &self.result {
            GenerationResult::Written(written) => self.render_written(out, written),
            GenerationResult::Preview(preview) => self.render_preview(out, preview),
        }
    }
}

impl GenerateReport {
    fn render_header(&self, out: &mut dyn Output) {
        out.preformatted(&format!("{} v{}", self.module, self.version));
        if !self.description.is_empty() {
            out.preformatted(&self.description);
        }
        out.newline();

        if !self.tables.is_empty() {
            out.section("Tables");
            for line in self.tables.lines() {
                out.list_item(line);
            }
            out.newline();
        }
    }

    fn render_written(&self, out: &mut dyn Output, written: &WrittenResult) {
        for warning in &self.warnings {
            out.warning(warning);
        }

        self.render_header(out);

        let outcome = &written.outcome;
        if !outcome.success {
            out.error(&outcome.message);
            if !outcome.files.is_empty() {
                out.newline();
                out.section("Files left on disk");
                for file in &outcome.files {
                    out.list_item(file);
                }
            }
            return;
        }

        out.key_value("Generated", &written.module_dir.display().to_string());
        out.preformatted(&outcome.message);

        if let Some(install) = &written.install {
            render_install(out, install);
        }
    }

    fn render_preview(&self, out: &mut dyn Output, preview: &PreviewResult) {
        for warning in &self.warnings {
            out.warning(warning);
        }

        for file in &preview.files {
            out.divider(&file.path);
            out.preformatted(&file.content);
        }

        out.divider("Summary");
        out.preformatted(&format!("{} files would be generated", preview.files.len()));
    }
}

/// Host files, commands and permissions of an install.
fn render_install(out: &mut dyn Output, install: &InstallReport) {
    let updated: Vec<_> = install
        .changes
        .iter()
        .filter(|c| c.change == Change::Updated)
        .collect();
    if !updated.is_empty() {
        out.newline();
        out.section("Host files updated");
        for change in updated {
            out.added_item(&format!("{}: {}", change.file, change.entry));
        }
    }

    if !install.commands.is_empty() {
        out.newline();
        out.section("Commands");
        for (i, command) in install.commands.iter().enumerate() {
            out.numbered_item(i + 1, command);
        }
    }

    if !install.permissions.is_empty() {
        out.newline();
        out.key_value(
            "Permissions registered",
            &install.permissions.len().to_string(),
        );
    }
}

#[cfg(test)]
mod tests {
    use modforge_host::HostChange;

    use super::*;
    use crate::reports::output::BufferOutput;

    fn report(outcome: GenerationReport, install: Option<InstallReport>) -> GenerateReport {
        GenerateReport {
            module: "Shop".into(),
            version: "0.1.0".into(),
            description: "Storefront".into(),
            tables: "products (Product)\n".into(),
            warnings: Vec::new(),
            debug_dir: None,
            result: GenerationResult::Written(WrittenResult {
                module_dir: PathBuf::from("Modules/Shop"),
                outcome,
                install,
            }),
        }
    }

    #[test]
    fn test_render_installed_module() {
        let outcome = GenerationReport {
            success: true,
            message: "Module Shop generated (2 files)".into(),
            files: vec!["module.json".into(), "app/Models/Product.php".into()],
            warnings: Vec::new(),
        };
        let install = InstallReport {
            changes: vec![
                HostChange {
                    file: "bootstrap/providers.php",
                    entry: "Modules\\Shop\\Providers\\ShopServiceProvider::class".into(),
                    change: Change::Updated,
                },
                HostChange {
                    file: "modules_statuses.json",
                    entry: "Shop".into(),
                    change: Change::Unchanged,
                },
            ],
            commands: vec!["php artisan migrate --force".into()],
            permissions: Vec::new(),
            warnings: Vec::new(),
        };

        let output = BufferOutput::render(&report(outcome, Some(install)));
        insta::assert_snapshot!(output.trim_end(), @r"
        Shop v0.1.0
        Storefront

        Tables:
          - products (Product)

        Generated: Modules/Shop
        Module Shop generated (2 files)

        Host files updated:
          + bootstrap/providers.php: Modules\Shop\Providers\ShopServiceProvider::class

        Commands:
          1. php artisan migrate --force
        ");
    }

    #[test]
    fn test_failure_lists_files_left_on_disk() {
        let outcome = GenerationReport::failed("host integration failed", vec!["module.json".into()]);
        let report = report(outcome, None);
        assert!(!report.is_success());

        let output = BufferOutput::render(&report);
        assert!(output.contains("error: host integration failed"));
        assert!(output.contains("Files left on disk:\n  - module.json"));
        assert!(!output.contains("Generated:"));
    }
}
