//! Wiring a generated module into the host application.
//!
//! Host file edits and migrations are fatal: without them the module is not
//! installed. Autoload dumps, cache clearing and permission registration
//! only produce warnings.

use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};

use crate::{
    ArtisanRunner, Change, ComposerAutoload, HostManifest, HostModule, PanelDiscovery,
    PermissionStore, ProviderList, StatusRegistry,
};

/// Which optional steps an install runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallOptions {
    pub migrate: bool,
    pub register_permissions: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            migrate: true,
            register_permissions: true,
        }
    }
}

/// One host file touched by an install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostChange {
    pub file: &'static str,
    pub entry: String,
    pub change: Change,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub changes: Vec<HostChange>,
    pub commands: Vec<String>,
    pub permissions: Vec<String>,
    pub warnings: Vec<String>,
}

impl InstallReport {
    fn warn(&mut self, step: &str, err: eyre::Report) {
        tracing::warn!(step, error = %err, "host integration step failed");
        self.warnings.push(format!("{} failed: {:#}", step, err));
    }
}

/// Host integration for one host root.
pub struct HostIntegration<'a> {
    root: PathBuf,
    runner: &'a dyn ArtisanRunner,
}

impl<'a> HostIntegration<'a> {
    pub fn new(root: impl Into<PathBuf>, runner: &'a dyn ArtisanRunner) -> Self {
        Self {
            root: root.into(),
            runner,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Host files `module` is registered in, in edit order.
    pub fn manifests(module: &HostModule) -> Vec<Box<dyn HostManifest>> {
        let mut manifests: Vec<Box<dyn HostManifest>> = vec![
            Box::new(ComposerAutoload::new(module)),
            Box::new(ProviderList::new(module)),
        ];
        if module.admin_panel {
            manifests.push(Box::new(PanelDiscovery::new(module)));
        }
        manifests.push(Box::new(StatusRegistry::new(module.name.clone(), true)));
        manifests
    }

    fn ensure(&self, manifest: &dyn HostManifest, report: &mut InstallReport) -> Result<()> {
        let change = manifest
            .ensure(&self.root)
            .wrap_err_with(|| format!("failed to update {}", manifest.relative_path()))?;
        report.changes.push(HostChange {
            file: manifest.relative_path(),
            entry: manifest.entry(),
            change,
        });
        Ok(())
    }

    /// Register `module` with the host and run its migrations.
    pub fn install(
        &self,
        module: &HostModule,
        store: Option<&dyn PermissionStore>,
        options: InstallOptions,
    ) -> Result<InstallReport> {
        let _span = tracing::info_span!("install", module = %module.name).entered();
        let mut report = InstallReport::default();

        for manifest in Self::manifests(module) {
            self.ensure(manifest.as_ref(), &mut report)?;
        }

        report.commands.push("composer dump-autoload".into());
        if let Err(err) = self.runner.dump_autoload() {
            report.warn("composer dump-autoload", err);
        }

        if options.migrate {
            report.commands.push("php artisan migrate --force".into());
            self.runner
                .migrate()
                .wrap_err_with(|| format!("migrations of module {} failed", module.name))?;
        }

        report.commands.push("php artisan optimize:clear".into());
        if let Err(err) = self.runner.clear_caches() {
            report.warn("cache clear", err);
        }

        if options.register_permissions
            && let Some(store) = store
        {
            match store.register(module) {
                Ok(names) => report.permissions = names,
                Err(err) => report.warn("permission registration", err),
            }
        }

        Ok(report)
    }

    /// Flip the module's flag in the status registry.
    pub fn set_enabled(&self, module: &str, enabled: bool) -> Result<InstallReport> {
        let mut report = InstallReport::default();
        self.ensure(&StatusRegistry::new(module, enabled), &mut report)?;

        report.commands.push("php artisan optimize:clear".into());
        if let Err(err) = self.runner.clear_caches() {
            report.warn("cache clear", err);
        }
        Ok(report)
    }
}
