//! Edit flows against an already generated module.
//!
//! With a schema snapshot the affected files are re-rendered from the
//! updated snapshot. Without one, generated files are patched in place and
//! every region that cannot be located is reported as a warning.

mod patch;

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use eyre::{Result, WrapErr};
use modforge_codegen::{
    builder::CodeBuilder,
    generation::{FileCategory, FileEntry, FileRegistry},
    language::TypeMapper,
    pipeline::Pipeline,
    schema::ModuleAnalysis,
};
use modforge_core::php_string;
use modforge_ir::{FieldIR, ModuleIR, RelationIR, RelationKind, TableIR};
use modforge_manifest::{Field, Manifest, Relationship};
use regex::Regex;

pub use patch::{append_to_list, ensure_use, insert_before_class_end, matching_close};

use crate::{
    Alteration, LaravelTypeMapper, MigrationClock, MigrationLedger, RenderContext, Sidecar,
    generator::owned_files,
    files::{
        AlterTableMigration, ApiController, Factory, Model, PivotMigration, Resource, entry,
        relation_method, relative_path, renders_accessor,
    },
};

/// How an edit was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// Files re-rendered from `.modforge/schema.json`.
    Snapshot,
    /// Files patched in place.
    Patch,
}

/// Result of an edit flow.
#[derive(Debug, Clone, PartialEq)]
pub struct EditOutcome {
    pub mode: EditMode,
    /// Files written, relative to the module directory.
    pub written: Vec<String>,
    pub warnings: Vec<String>,
    /// Manifest after the edit.
    pub manifest: Manifest,
}

/// Applies schema deltas to a generated module.
pub struct ModuleEditor {
    module_dir: PathBuf,
    base: Manifest,
    mode: EditMode,
    ledger: MigrationLedger,
    files: Vec<String>,
    clock: MigrationClock,
}

/// A compiled manifest with its renderer inputs.
struct Compiled {
    manifest: Manifest,
    module: ModuleIR,
    analysis: ModuleAnalysis,
    mapper: LaravelTypeMapper,
}

impl Compiled {
    fn new(manifest: Manifest) -> Result<Self> {
        let mut ctx = Pipeline::new().run(manifest.clone())?;
        let module = ctx.take_ir()?;
        let analysis = ctx.take_analysis()?;
        let mapper = LaravelTypeMapper::new(module.meta.currency.clone());
        Ok(Self {
            manifest,
            module,
            analysis,
            mapper,
        })
    }

    fn ctx(&self) -> RenderContext<'_> {
        RenderContext::new(&self.module, &self.analysis, &self.mapper)
    }

    fn table(&self, reference: &str) -> Result<&TableIR> {
        self.module
            .table(reference)
            .ok_or_else(|| eyre::eyre!("table '{}' is not part of the module", reference))
    }
}

impl ModuleEditor {
    /// Open a generated module. The snapshot is used when present,
    /// otherwise `fallback` (normally the project's forge.toml) describes
    /// the module as it was generated.
    pub fn open(module_dir: impl Into<PathBuf>, fallback: Manifest) -> Result<Self> {
        let module_dir = module_dir.into();
        let (base, mode, ledger, files) = match Sidecar::load(&module_dir)? {
            Some(sidecar) => (
                sidecar.manifest,
                EditMode::Snapshot,
                sidecar.migrations,
                sidecar.files,
            ),
            None => (fallback, EditMode::Patch, MigrationLedger::default(), Vec::new()),
        };
        tracing::debug!(dir = %module_dir.display(), ?mode, "opened module for editing");
        Ok(Self {
            module_dir,
            base,
            mode,
            ledger,
            files,
            clock: MigrationClock::now(),
        })
    }

    pub fn clock(mut self, clock: MigrationClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// The manifest the module was generated from.
    pub fn manifest(&self) -> &Manifest {
        &self.base
    }

    /// Add fields to an existing table.
    ///
    /// Always writes an `add_<fields>_to_<table>_table` migration; the
    /// model, resource, factory and controller are re-rendered or patched.
    pub fn add_fields(&self, table: &str, fields: Vec<Field>) -> Result<EditOutcome> {
        let names: Vec<String> = fields.iter().map(|f| f.name.clone()).collect();
        let mut manifest = self.base.clone();
        manifest.add_fields(table, fields)?;
        let compiled = Compiled::new(manifest)?;
        let ctx = compiled.ctx();
        let table = compiled.table(table)?;
        let features = compiled.module.features;

        let added: Vec<&FieldIR> = table
            .fields
            .iter()
            .filter(|f| names.contains(&f.name))
            .collect();

        let mut registry = FileRegistry::new();
        let mut warnings = Vec::new();
        let migration = AlterTableMigration::new(ctx, table, added.clone(), self.clock.base());
        registry.register(entry(&migration, FileCategory::Migration));
        let mut ledger = self.ledger.clone();
        ledger.alterations.push(Alteration {
            table: table.name.clone(),
            fields: added.iter().map(|f| f.name.clone()).collect(),
            timestamp: self.clock.base(),
        });

        match self.mode {
            EditMode::Snapshot => {
                registry.register(entry(&Model::new(ctx, table), FileCategory::Model));
                if features.admin_panel {
                    registry.register(entry(&Resource::new(ctx, table), FileCategory::AdminResource));
                }
                if features.factories {
                    registry.register(entry(&Factory::new(ctx, table), FileCategory::SeedData));
                }
                if features.api {
                    registry.register(entry(&ApiController::new(ctx, table), FileCategory::Api));
                }
                self.register_sidecar(&mut registry, &compiled, ledger)?;
            }
            EditMode::Patch => {
                let mut patcher = Patcher::new(&self.module_dir, &mut registry, &mut warnings);
                patch_model_fields(&mut patcher, ctx, table, &added)?;
                if features.admin_panel {
                    patch_resource_fields(&mut patcher, ctx, table, &added)?;
                }
                if features.factories {
                    patch_factory_fields(&mut patcher, ctx, table, &added)?;
                }
                if features.api {
                    patch_controller_fields(&mut patcher, ctx, table, &added)?;
                }
            }
        }

        self.finish(registry, warnings, compiled.manifest)
    }

    /// Add a relationship to an existing model.
    ///
    /// The model gains the accessor; a belongsTo also re-renders the
    /// resource, and a new many-to-many pivot gets its own migration.
    pub fn add_relation(&self, relationship: Relationship) -> Result<EditOutcome> {
        let before = Compiled::new(self.base.clone())?;
        let mut manifest = self.base.clone();
        manifest.add_relationship(relationship)?;
        let compiled = Compiled::new(manifest)?;
        let ctx = compiled.ctx();

        let relation = compiled
            .module
            .relations
            .iter()
            .rfind(|r| !r.inferred)
            .ok_or_else(|| eyre::eyre!("relationship was not lowered"))?;
        let table = compiled.table(&relation.from)?;
        let features = compiled.module.features;

        let mut registry = FileRegistry::new();
        let mut warnings = Vec::new();

        let existing: HashSet<&str> = before.analysis.pivots.iter().map(|p| p.name.as_str()).collect();
        let mut ledger = self.ledger.clone();
        for (i, pivot) in compiled
            .analysis
            .pivots
            .iter()
            .filter(|p| !existing.contains(p.name.as_str()))
            .enumerate()
        {
            let migration = PivotMigration::new(pivot, self.clock.pivot(i));
            registry.register(entry(&migration, FileCategory::Migration));
            ledger.pivots.insert(pivot.name.clone(), self.clock.pivot(i));
        }

        if relation.related().is_none() && relation.kind != RelationKind::MorphTo {
            warnings.push(format!(
                "{}::{}() targets a model outside the module; a placeholder was rendered",
                table.model(),
                relation.method
            ));
        }

        let binds_column = relation.kind == RelationKind::BelongsTo
            && relation.owner_key_column().is_some_and(|column| {
                compiled
                    .analysis
                    .belongs_to_column(&table.name, &column)
                    .is_some()
            });

        match self.mode {
            EditMode::Snapshot => {
                registry.register(entry(&Model::new(ctx, table), FileCategory::Model));
                if binds_column && features.admin_panel {
                    registry.register(entry(&Resource::new(ctx, table), FileCategory::AdminResource));
                }
                self.register_sidecar(&mut registry, &compiled, ledger)?;
            }
            EditMode::Patch => {
                let mut patcher = Patcher::new(&self.module_dir, &mut registry, &mut warnings);
                patch_model_relation(&mut patcher, ctx, table, relation)?;
                if binds_column && features.admin_panel {
                    let column = relation.owner_key_column().unwrap_or_default();
                    let was_bound = before
                        .analysis
                        .belongs_to_column(&table.name, &column)
                        .is_some();
                    if !was_bound {
                        patcher.warnings.push(format!(
                            "{} keeps its '{}' input; regenerate the module to switch it to a relationship select",
                            relative_path(&Resource::new(ctx, table)),
                            column
                        ));
                    }
                }
            }
        }

        self.finish(registry, warnings, compiled.manifest)
    }

    /// Snapshot of the edited manifest; the files and migrations of earlier
    /// runs stay on record.
    fn register_sidecar(
        &self,
        registry: &mut FileRegistry,
        compiled: &Compiled,
        ledger: MigrationLedger,
    ) -> Result<()> {
        let files = self.files.iter().cloned().chain(owned_files(registry));
        let sidecar = Sidecar::new(&compiled.manifest, &compiled.module, self.clock.instant())
            .with_migrations(ledger)
            .with_files(files);
        registry.register(FileEntry::registration(
            Sidecar::relative_path(),
            sidecar.to_json()?,
        ));
        Ok(())
    }

    fn finish(
        &self,
        registry: FileRegistry,
        warnings: Vec<String>,
        manifest: Manifest,
    ) -> Result<EditOutcome> {
        let stats = registry.write_all(&self.module_dir)?;
        for warning in &warnings {
            tracing::warn!("{}", warning);
        }
        Ok(EditOutcome {
            mode: self.mode,
            written: stats.written_paths,
            warnings,
            manifest,
        })
    }
}

/// Reads generated files and registers their patched contents.
struct Patcher<'r> {
    module_dir: &'r Path,
    registry: &'r mut FileRegistry,
    warnings: &'r mut Vec<String>,
}

impl<'r> Patcher<'r> {
    fn new(
        module_dir: &'r Path,
        registry: &'r mut FileRegistry,
        warnings: &'r mut Vec<String>,
    ) -> Self {
        Self {
            module_dir,
            registry,
            warnings,
        }
    }

    /// Current content of a module file, or `None` with a warning.
    fn read(&mut self, relative: &str) -> Result<Option<String>> {
        if let Some(entry) = self.registry.get(relative) {
            return Ok(Some(entry.content.clone()));
        }
        let path = self.module_dir.join(relative);
        if !path.exists() {
            self.warnings
                .push(format!("{} does not exist; skipped", relative));
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .wrap_err_with(|| format!("failed to read {}", path.display()))
    }

    /// Splice `items` into the list at `anchor`; a missing anchor is a warning.
    fn append(
        &mut self,
        relative: &str,
        content: String,
        anchor: &Regex,
        region: &str,
        items: &[String],
    ) -> String {
        match append_to_list(&content, anchor, items) {
            Some(patched) => patched,
            None => {
                self.warnings
                    .push(format!("could not locate {} in {}; skipped", region, relative));
                content
            }
        }
    }

    fn save(&mut self, relative: String, content: String, category: FileCategory) {
        self.registry.register(FileEntry::new(relative, content, category));
    }
}

fn render_chain(chain: &modforge_codegen::builder::MethodChain) -> String {
    CodeBuilder::php().render(&chain.terminated(",")).build()
}

fn patch_model_fields(
    patcher: &mut Patcher,
    ctx: RenderContext,
    table: &TableIR,
    added: &[&FieldIR],
) -> Result<()> {
    let model = Model::new(ctx, table);
    let relative = relative_path(&model);
    let Some(content) = patcher.read(&relative)? else {
        return Ok(());
    };

    let fillable: Vec<String> = added.iter().map(|f| format!("{},", php_string(&f.name))).collect();
    let casts: Vec<String> = added
        .iter()
        .filter_map(|f| {
            ctx.mapper
                .cast(f)
                .map(|cast| format!("{} => {},", php_string(&f.name), php_string(&cast)))
        })
        .collect();

    let content = patcher.append(&relative, content, &patch::FILLABLE, "$fillable", &fillable);
    let content = if casts.is_empty() {
        content
    } else {
        patcher.append(&relative, content, &patch::CASTS, "$casts", &casts)
    };
    patcher.save(relative, content, FileCategory::Model);
    Ok(())
}

fn patch_resource_fields(
    patcher: &mut Patcher,
    ctx: RenderContext,
    table: &TableIR,
    added: &[&FieldIR],
) -> Result<()> {
    let resource = Resource::new(ctx, table);
    let relative = relative_path(&resource);
    let Some(content) = patcher.read(&relative)? else {
        return Ok(());
    };

    let (inputs, columns): (Vec<String>, Vec<String>) = added.iter().fold(
        (Vec::new(), Vec::new()),
        |(mut inputs, mut columns), field| {
            let (input, column) = resource.field_components(field);
            inputs.push(render_chain(&input));
            if let Some(column) = column {
                columns.push(render_chain(&column));
            }
            (inputs, columns)
        },
    );

    let content = patcher.append(&relative, content, &patch::FORM_SCHEMA, "the form schema", &inputs);
    let content =
        patcher.append(&relative, content, &patch::TABLE_COLUMNS, "the table columns", &columns);
    patcher.save(relative, content, FileCategory::AdminResource);
    Ok(())
}

fn patch_factory_fields(
    patcher: &mut Patcher,
    ctx: RenderContext,
    table: &TableIR,
    added: &[&FieldIR],
) -> Result<()> {
    let factory = Factory::new(ctx, table);
    let relative = relative_path(&factory);
    let Some(content) = patcher.read(&relative)? else {
        return Ok(());
    };

    let entries: Vec<String> = factory
        .definition()
        .into_iter()
        .filter(|(name, _)| added.iter().any(|f| &f.name == name))
        .map(|(name, value)| format!("{} => {},", php_string(&name), value))
        .collect();

    let content = patcher.append(
        &relative,
        content,
        &patch::FACTORY_DEFINITION,
        "the factory definition",
        &entries,
    );
    patcher.save(relative, content, FileCategory::SeedData);
    Ok(())
}

fn patch_controller_fields(
    patcher: &mut Patcher,
    ctx: RenderContext,
    table: &TableIR,
    added: &[&FieldIR],
) -> Result<()> {
    let controller = ApiController::new(ctx, table);
    let relative = relative_path(&controller);
    let Some(content) = patcher.read(&relative)? else {
        return Ok(());
    };

    let rules: Vec<(String, Vec<String>)> = controller
        .rules()
        .into_iter()
        .filter(|(name, _)| added.iter().any(|f| &f.name == name))
        .collect();
    let entries: Vec<String> = rules
        .iter()
        .map(|(name, rules)| format!("{} => [{}],", php_string(name), rules.join(", ")))
        .collect();

    let mut content = patcher.append(
        &relative,
        content,
        &patch::VALIDATION_RULES,
        "the validation rules",
        &entries,
    );
    if rules.iter().flat_map(|(_, r)| r).any(|r| r.starts_with("Rule::")) {
        content = ensure_use(&content, "Illuminate\\Validation\\Rule");
    }
    patcher.save(relative, content, FileCategory::Api);
    Ok(())
}

fn patch_model_relation(
    patcher: &mut Patcher,
    ctx: RenderContext,
    table: &TableIR,
    relation: &RelationIR,
) -> Result<()> {
    let model = Model::new(ctx, table);
    let relative = relative_path(&model);
    let Some(content) = patcher.read(&relative)? else {
        return Ok(());
    };

    let method = relation_method(CodeBuilder::php(), relation).build();
    let content = match insert_before_class_end(&content, &method) {
        Some(patched) if renders_accessor(relation) => ensure_use(
            &patched,
            &format!("Illuminate\\Database\\Eloquent\\Relations\\{}", relation.kind.class()),
        ),
        Some(patched) => patched,
        None => {
            patcher
                .warnings
                .push(format!("could not locate the class body in {}; skipped", relative));
            content
        }
    };
    patcher.save(relative, content, FileCategory::Model);
    Ok(())
}
