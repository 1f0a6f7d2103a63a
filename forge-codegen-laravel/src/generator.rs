//! The Laravel generator: renders every artifact of a module into a
//! [`FileRegistry`] and writes it in category order.

use std::{collections::HashSet, path::Path};

use eyre::{Result, WrapErr};
use modforge_codegen::{
    generation::{FileCategory, FileEntry, FileRegistry},
    language::{GenerateResult, LanguageCodegen, PreviewFile},
    pipeline::{CompilationContext, Pipeline},
    schema::ModuleAnalysis,
};
use modforge_core::Overwrite;
use modforge_ir::{ModuleIR, TableIR};
use modforge_manifest::Manifest;
use serde::Serialize;

use crate::{
    Alteration, LaravelTypeMapper, MigrationClock, MigrationLedger, RenderContext, Sidecar,
    files::{
        AlterTableMigration, ApiController, ApiRoutes, CreateTableMigration, DatabaseSeeder, Factory, Model,
        ModelSeeder, ModuleJson, PageKind, PermissionSeeder, PivotMigration, Resource,
        ResourcePage, ServiceProvider, WebRoutes, entry, provider_class,
    },
};

/// Generates a Laravel module from a lowered schema.
pub struct LaravelGenerator {
    manifest: Manifest,
    module: ModuleIR,
    analysis: ModuleAnalysis,
    mapper: LaravelTypeMapper,
    clock: MigrationClock,
    warnings: Vec<String>,
}

impl LaravelGenerator {
    pub fn new(manifest: Manifest, module: ModuleIR, analysis: ModuleAnalysis) -> Self {
        let mapper = LaravelTypeMapper::new(module.meta.currency.clone());
        Self {
            manifest,
            module,
            analysis,
            mapper,
            clock: MigrationClock::now(),
            warnings: Vec::new(),
        }
    }

    /// Build from a finished pipeline run, carrying its warnings along.
    pub fn from_context(ctx: &mut CompilationContext) -> Result<Self> {
        let module = ctx.take_ir()?;
        let analysis = ctx.take_analysis()?;
        let warnings = ctx.warnings().map(|d| d.message.clone()).collect();
        Ok(Self {
            warnings,
            ..Self::new(ctx.manifest.clone(), module, analysis)
        })
    }

    /// Run the default pipeline on `manifest` and build a generator.
    pub fn compile(manifest: Manifest) -> Result<Self> {
        let mut ctx = Pipeline::new().run(manifest)?;
        Self::from_context(&mut ctx)
    }

    /// Pin the migration timestamps.
    pub fn clock(mut self, clock: MigrationClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn module(&self) -> &ModuleIR {
        &self.module
    }

    pub fn analysis(&self) -> &ModuleAnalysis {
        &self.analysis
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    fn context(&self) -> RenderContext<'_> {
        RenderContext::new(&self.module, &self.analysis, &self.mapper)
    }

    /// Fully qualified service provider class.
    pub fn provider_class(&self) -> String {
        provider_class(&self.context())
    }

    /// Fully qualified permission seeder class, when permissions are generated.
    pub fn permission_seeder_class(&self) -> Option<String> {
        let ctx = self.context();
        self.module.features.permissions.then(|| {
            format!(
                "{}\\{}",
                ctx.ns("Database\\Seeders"),
                PermissionSeeder::new(ctx).class_name()
            )
        })
    }

    /// Every permission name of the module, table by table.
    pub fn permissions(&self) -> Vec<String> {
        PermissionSeeder::new(self.context()).permissions()
    }

    /// Render every artifact into memory.
    pub fn registry(&self) -> Result<FileRegistry> {
        self.render(None)
    }

    /// Render for an existing module directory: migrations keep the
    /// timestamps recorded in its snapshot.
    pub fn registry_for(&self, module_dir: &Path) -> Result<FileRegistry> {
        let previous = Sidecar::load(module_dir)?;
        self.render(previous.as_ref())
    }

    fn render(&self, previous: Option<&Sidecar>) -> Result<FileRegistry> {
        let ctx = self.context();
        let features = self.module.features;
        let tables = self.analysis.ordered_tables(&self.module);
        let recorded = previous.map(|s| &s.migrations);
        let _span = tracing::debug_span!("render", module = %self.module.meta.name).entered();

        let mut registry = FileRegistry::new();
        let mut ledger = MigrationLedger::default();

        registry.register(entry(&ModuleJson::new(ctx), FileCategory::Structure));
        registry.register(entry(&ServiceProvider::new(ctx), FileCategory::Structure));

        let mut added = 0;
        for (i, table) in tables.iter().enumerate() {
            let created = recorded.and_then(|l| l.tables.get(&table.name)).cloned();
            let mut alterations: Vec<Alteration> = recorded
                .map(|l| l.alterations.as_slice())
                .unwrap_or_default()
                .iter()
                .filter(|a| a.table == table.name)
                .filter_map(|a| {
                    let fields: Vec<String> = a
                        .fields
                        .iter()
                        .filter(|f| table.field(f).is_some())
                        .cloned()
                        .collect();
                    (!fields.is_empty()).then(|| Alteration {
                        fields,
                        ..a.clone()
                    })
                })
                .collect();

            // A table the host already created gets its new columns from an
            // alteration, never from its old create migration.
            if created.is_some()
                && let Some(previous) = previous
            {
                let fresh = new_columns(previous, table, &alterations);
                if !fresh.is_empty() {
                    tracing::debug!(table = %table.name, ?fresh, "columns added since last run");
                    alterations.push(Alteration {
                        table: table.name.clone(),
                        fields: fresh,
                        timestamp: self.clock.alteration(added),
                    });
                    added += 1;
                }
            }
            let timestamp = created.unwrap_or_else(|| self.clock.table(i));

            let migration = CreateTableMigration::new(ctx, table, timestamp.as_str()).without(
                alterations
                    .iter()
                    .flat_map(|a| a.fields.iter().map(String::as_str)),
            );
            registry.register(entry(&migration, FileCategory::Migration));
            for alteration in &alterations {
                let fields = alteration
                    .fields
                    .iter()
                    .filter_map(|f| table.field(f))
                    .collect();
                let migration =
                    AlterTableMigration::new(ctx, table, fields, alteration.timestamp.as_str());
                registry.register(entry(&migration, FileCategory::Migration));
            }

            ledger.tables.insert(table.name.clone(), timestamp);
            ledger.alterations.extend(alterations);
        }
        check_migration_order(&tables, &ledger)?;
        for (i, pivot) in self.analysis.pivots.iter().enumerate() {
            let timestamp = recorded
                .and_then(|l| l.pivots.get(&pivot.name))
                .cloned()
                .unwrap_or_else(|| self.clock.pivot(i));
            let migration = PivotMigration::new(pivot, timestamp.as_str());
            registry.register(entry(&migration, FileCategory::Migration));
            ledger.pivots.insert(pivot.name.clone(), timestamp);
        }

        for table in &tables {
            registry.register(entry(&Model::new(ctx, table), FileCategory::Model));
        }

        if features.admin_panel {
            for table in &tables {
                registry.register(entry(&Resource::new(ctx, table), FileCategory::AdminResource));
                for kind in PageKind::ALL {
                    let page = ResourcePage::new(ctx, table, kind);
                    registry.register(entry(&page, FileCategory::AdminResource));
                }
            }
        }

        if features.api {
            for table in &tables {
                registry.register(entry(&ApiController::new(ctx, table), FileCategory::Api));
            }
            registry.register(entry(&ApiRoutes::new(ctx), FileCategory::Api));
        }
        if features.web_routes {
            registry.register(entry(&WebRoutes::new(ctx), FileCategory::Api));
        }

        if features.factories {
            for table in &tables {
                registry.register(entry(&Factory::new(ctx, table), FileCategory::SeedData));
            }
        }
        if features.seeders {
            for table in &tables {
                registry.register(entry(&ModelSeeder::new(ctx, table), FileCategory::SeedData));
            }
            registry.register(entry(&DatabaseSeeder::new(ctx), FileCategory::SeedData));
        }

        if features.permissions {
            registry.register(entry(&PermissionSeeder::new(ctx), FileCategory::Permission));
        }

        let sidecar = Sidecar::new(&self.manifest, &self.module, self.clock.instant())
            .with_migrations(ledger)
            .with_files(owned_files(&registry));
        registry.register(FileEntry::registration(
            Sidecar::relative_path(),
            sidecar.to_json()?,
        ));

        tracing::debug!(files = registry.len(), "rendered module");
        Ok(registry)
    }
}

/// Fields of `table` that neither the previous snapshot nor a recorded
/// alteration knows about.
fn new_columns(previous: &Sidecar, table: &TableIR, alterations: &[Alteration]) -> Vec<String> {
    let Some(snapshot) = previous.manifest.tables.iter().find(|t| t.name == table.name) else {
        return Vec::new();
    };
    let known: HashSet<&str> = snapshot
        .fields
        .iter()
        .map(|f| f.name.as_str())
        .chain(alterations.iter().flat_map(|a| a.fields.iter().map(String::as_str)))
        .collect();
    table
        .fields
        .iter()
        .filter(|f| !known.contains(f.name.as_str()))
        .map(|f| f.name.clone())
        .collect()
}

/// Every constrained column must be added by a migration that sorts after
/// the create migration of the table it references.
fn check_migration_order(tables: &[&TableIR], ledger: &MigrationLedger) -> Result<()> {
    for table in tables {
        for field in &table.fields {
            let Some(fk) = field.foreign_key().filter(|fk| fk.in_module) else {
                continue;
            };
            if fk.table == table.name {
                continue;
            }
            let Some(target) = ledger.tables.get(&fk.table) else {
                continue;
            };
            let column = ledger
                .alterations
                .iter()
                .find(|a| a.table == table.name && a.fields.contains(&field.name))
                .map(|a| &a.timestamp)
                .or_else(|| ledger.tables.get(&table.name));
            if let Some(column) = column
                && column <= target
            {
                eyre::bail!(
                    "migration {} adding '{}.{}' would run before {}_create_{}_table",
                    column,
                    table.name,
                    field.name,
                    target,
                    fk.table
                );
            }
        }
    }
    Ok(())
}

/// Paths the generator overwrites on every run.
pub(crate) fn owned_files(registry: &FileRegistry) -> Vec<String> {
    registry
        .entries()
        .filter(|e| e.overwrite() == Overwrite::Always && e.category != FileCategory::Registration)
        .map(|e| e.path.clone())
        .collect()
}

/// Delete files a previous run wrote that the current registry no longer
/// produces, returning their paths.
fn remove_stale(
    previous: &Sidecar,
    registry: &FileRegistry,
    module_dir: &Path,
) -> Result<Vec<String>> {
    let current = owned_files(registry);
    let mut removed = Vec::new();
    for path in previous.stale_files(&current) {
        let full = module_dir.join(path);
        if !full.is_file() {
            continue;
        }
        std::fs::remove_file(&full)
            .wrap_err_with(|| format!("failed to remove {}", full.display()))?;
        tracing::info!(path, "removed stale file");
        removed.push(path.to_string());
    }
    Ok(removed)
}

impl LanguageCodegen for LaravelGenerator {
    fn target(&self) -> &'static str {
        "laravel"
    }

    fn preview(&self) -> Result<Vec<PreviewFile>> {
        Ok(self
            .registry()?
            .preview()
            .into_iter()
            .map(|e| PreviewFile {
                path: e.path,
                content: e.content,
            })
            .collect())
    }

    /// Write the module into `output_dir`. A snapshot left by an earlier
    /// run keeps its migration timestamps, and the files of that run that
    /// are no longer produced are deleted.
    fn generate(&self, output_dir: &Path) -> Result<GenerateResult> {
        let mut warnings = self.warnings.clone();
        let previous = Sidecar::load(output_dir).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "ignoring unreadable schema snapshot");
            warnings.push(format!("ignored the existing schema snapshot: {:#}", err));
            None
        });
        let registry = self.render(previous.as_ref())?;
        let stats = registry.write_all(output_dir)?;

        if let Some(previous) = &previous {
            for path in remove_stale(previous, &registry, output_dir)? {
                warnings.push(format!("removed stale file {}", path));
            }
        }

        tracing::info!(
            written = stats.written,
            skipped = stats.skipped,
            dir = %output_dir.display(),
            "generated module"
        );
        Ok(GenerateResult {
            written: stats.written_paths,
            skipped: stats.skipped_paths,
            warnings,
        })
    }
}

/// Outcome of a generation run as reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub success: bool,
    pub message: String,
    /// Files produced, relative to the module directory.
    pub files: Vec<String>,
    pub warnings: Vec<String>,
}

impl GenerationReport {
    pub fn succeeded(module: &str, result: GenerateResult) -> Self {
        let mut files = result.written;
        files.extend(result.skipped);
        Self {
            success: true,
            message: format!("Module {} generated ({} files)", module, files.len()),
            files,
            warnings: result.warnings,
        }
    }

    /// Failure with the proximate error text; `files` lists what was
    /// already on disk when the run stopped.
    pub fn failed(message: impl Into<String>, files: Vec<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            files,
            warnings: Vec::new(),
        }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}
