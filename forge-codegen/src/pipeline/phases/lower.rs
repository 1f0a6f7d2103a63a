//! Lower phase - transforms the manifest into the module IR.
//!
//! Lowering resolves every default (lengths, labels, derived names),
//! resolves foreign key targets and relationship endpoints, and synthesizes
//! belongsTo accessors for foreign key columns no relationship claims.

use eyre::{Result, bail};
use modforge_core::{
    headline, pluralize, singularize, to_camel_case, to_kebab_case, to_snake_case,
    to_studly_case,
};
use modforge_ir::{
    DEFAULT_PRECISION, DEFAULT_SCALE, DEFAULT_STRING_LENGTH, DefaultValue, EnumValues, FieldIR,
    FieldKind, ForeignAction, ForeignKeyIR, Features, ModuleIR, ModuleMeta, RelatedModel,
    RelationIR, RelationKind, RelationTarget, TableIR, TableNames,
};
use modforge_manifest::{Field, FieldType, Manifest, RelationType, Relationship, Table};

use crate::pipeline::{CompilationContext, Diagnostic, Phase};

const PHASE: &str = "lower";

/// Columns preferred as the display column of a table, in order.
const DISPLAY_CANDIDATES: &[&str] = &["name", "title", "label", "email", "code", "slug"];

/// Phase that transforms the manifest into the module IR.
pub struct LowerPhase;

impl Phase for LowerPhase {
    fn name(&self) -> &'static str {
        PHASE
    }

    fn description(&self) -> &'static str {
        "Transform the manifest into the module IR"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        let mut lowerer = Lowerer::new(&ctx.manifest);
        let module = lowerer.lower();
        let diagnostics = lowerer.diagnostics;
        ctx.diagnostics.extend(diagnostics);

        if ctx.has_errors() {
            bail!("lowering failed with {} error(s)", ctx.error_count());
        }
        for relation in module.relations.iter().filter(|r| r.inferred) {
            ctx.add_info(
                PHASE,
                format!(
                    "inferred belongsTo '{}.{}()' from an unclaimed foreign key",
                    relation.from, relation.method
                ),
            );
        }

        tracing::debug!(
            tables = module.tables.len(),
            relations = module.relations.len(),
            "lowered module"
        );
        ctx.ir = Some(module);
        Ok(())
    }
}

/// Lower a manifest into a module IR, returning the diagnostics produced.
pub fn lower_manifest(manifest: &Manifest) -> (ModuleIR, Vec<Diagnostic>) {
    let mut lowerer = Lowerer::new(manifest);
    let module = lowerer.lower();
    (module, lowerer.diagnostics)
}

struct Lowerer<'a> {
    manifest: &'a Manifest,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Lowerer<'a> {
    fn new(manifest: &'a Manifest) -> Self {
        Self {
            manifest,
            diagnostics: Vec::new(),
        }
    }

    fn error(&mut self, message: impl Into<String>, location: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::error(PHASE, message).at(location));
    }

    fn warning(&mut self, message: impl Into<String>, location: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::warning(PHASE, message).at(location));
    }

    fn lower(&mut self) -> ModuleIR {
        let manifest = self.manifest;
        let tables: Vec<TableIR> = manifest
            .tables
            .iter()
            .map(|table| self.lower_table(table))
            .collect();

        let mut relations: Vec<RelationIR> = Vec::new();
        for relationship in &manifest.relationships {
            if let Some(relation) = self.lower_relationship(relationship, &tables) {
                self.check_unique_method(&relation, &relations);
                relations.push(relation);
            }
        }
        self.check_owner_columns(&tables, &relations);
        let inferred = infer_belongs_to(&tables, &relations);
        relations.extend(inferred);

        ModuleIR {
            meta: lower_meta(manifest),
            features: lower_features(manifest),
            tables,
            relations,
        }
    }

    fn lower_table(&mut self, table: &Table) -> TableIR {
        let model = table.model_name();
        let fields = table
            .fields
            .iter()
            .filter_map(|field| self.lower_field(table, field))
            .collect::<Vec<_>>();

        TableIR {
            name: table.name.clone(),
            names: TableNames::derive(&table.name, &model),
            display: display_column(table),
            fields,
            timestamps: table.timestamps,
            soft_deletes: table.soft_deletes,
        }
    }

    fn lower_field(&mut self, table: &Table, field: &Field) -> Option<FieldIR> {
        let location = format!("tables.{}.fields.{}", table.name, field.name);
        let claimed_by = self.claiming_relationship(table, &field.name);

        let kind = match field.field_type {
            FieldType::String => FieldKind::String {
                length: field.length.unwrap_or(DEFAULT_STRING_LENGTH),
            },
            FieldType::Char => FieldKind::Char {
                length: field.length.unwrap_or(DEFAULT_STRING_LENGTH),
            },
            FieldType::Decimal => FieldKind::Decimal {
                precision: field.precision.or(field.length).unwrap_or(DEFAULT_PRECISION),
                scale: field.scale.unwrap_or(DEFAULT_SCALE),
            },
            FieldType::Enum => match EnumValues::new(&field.name, field.values.clone()) {
                Ok(values) => FieldKind::Enum(values),
                Err(err) => {
                    self.error(err.to_string(), location);
                    return None;
                }
            },
            FieldType::ForeignId => {
                FieldKind::ForeignId(self.resolve_foreign_key(table, field, claimed_by)?)
            }
            // A plain integer column claimed by a belongsTo is a foreign key.
            FieldType::Integer | FieldType::BigInteger if claimed_by.is_some() => {
                FieldKind::ForeignId(self.resolve_foreign_key(table, field, claimed_by)?)
            }
            FieldType::Text => FieldKind::Text,
            FieldType::MediumText => FieldKind::MediumText,
            FieldType::LongText => FieldKind::LongText,
            FieldType::Integer => FieldKind::Integer,
            FieldType::BigInteger => FieldKind::BigInteger,
            FieldType::SmallInteger => FieldKind::SmallInteger,
            FieldType::TinyInteger => FieldKind::TinyInteger,
            FieldType::Float => FieldKind::Float,
            FieldType::Double => FieldKind::Double,
            FieldType::Boolean => FieldKind::Boolean,
            FieldType::Date => FieldKind::Date,
            FieldType::DateTime => FieldKind::DateTime,
            FieldType::Timestamp => FieldKind::Timestamp,
            FieldType::Time => FieldKind::Time,
            FieldType::Year => FieldKind::Year,
            FieldType::Json => FieldKind::Json,
            FieldType::Uuid => FieldKind::Uuid,
            FieldType::File => FieldKind::File,
            FieldType::Image => FieldKind::Image,
            FieldType::RichText => FieldKind::RichText,
            FieldType::Email => FieldKind::Email,
            FieldType::Url => FieldKind::Url,
            FieldType::Password => FieldKind::Password,
            FieldType::Color => FieldKind::Color,
            FieldType::Slug => FieldKind::Slug,
        };

        let label = field.label.clone().unwrap_or_else(|| match &kind {
            FieldKind::ForeignId(_) => {
                headline(field.name.strip_suffix("_id").unwrap_or(&field.name))
            }
            _ => headline(&field.name),
        });

        Some(FieldIR {
            name: field.name.clone(),
            label,
            kind,
            required: field.required,
            nullable: field.is_nullable(),
            unique: field.unique,
            unsigned: field.unsigned,
            index: field.index,
            default: field.default.as_ref().map(lower_default),
        })
    }

    /// The belongsTo relationship declared on `table` whose key column is `column`.
    fn claiming_relationship(&self, table: &Table, column: &str) -> Option<&'a Relationship> {
        self.manifest.relationships.iter().find(|r| {
            r.kind == RelationType::BelongsTo
                && table.matches(&r.from)
                && declared_owner_column(r) == column
        })
    }

    fn resolve_foreign_key(
        &mut self,
        table: &Table,
        field: &Field,
        claimed_by: Option<&Relationship>,
    ) -> Option<ForeignKeyIR> {
        let reference = field
            .references
            .as_deref()
            .or(claimed_by.map(|r| r.to.as_str()));

        let (target, in_module) = match reference {
            Some(reference) => match self.manifest.table(reference) {
                Some(found) => (found.name.clone(), true),
                None => (external_table_name(reference), false),
            },
            None => {
                let stem = field.name.strip_suffix("_id").unwrap_or(&field.name);
                let candidate = pluralize(&to_snake_case(stem));
                match self.manifest.table(&candidate) {
                    Some(found) => (found.name.clone(), true),
                    None => {
                        self.error(
                            format!(
                                "cannot resolve foreign key '{}.{}': no table '{}' in module '{}'; \
                                 set `references` to point at a table outside the module",
                                table.name, field.name, candidate, self.manifest.module.name
                            ),
                            format!("tables.{}.fields.{}", table.name, field.name),
                        );
                        return None;
                    }
                }
            }
        };

        Some(ForeignKeyIR {
            table: target,
            column: field
                .references_column
                .clone()
                .unwrap_or_else(|| "id".to_string()),
            on_delete: field.on_delete.map(lower_action),
            on_update: field.on_update.map(lower_action),
            in_module,
        })
    }

    fn lower_relationship(
        &mut self,
        relationship: &Relationship,
        tables: &[TableIR],
    ) -> Option<RelationIR> {
        let location = format!("relationships.{}.{}", relationship.from, relationship.kind);
        let Some(from) = find_table(tables, &relationship.from) else {
            self.error(
                format!(
                    "relationship source '{}' is not a table in this module",
                    relationship.from
                ),
                location,
            );
            return None;
        };

        let kind = lower_kind(relationship.kind);
        let mut target = match find_table(tables, &relationship.to) {
            Some(table) => RelationTarget::Resolved(related_model(table)),
            None => RelationTarget::Unresolved {
                reference: relationship.to.clone(),
            },
        };

        let through = match &relationship.through {
            Some(reference) => match find_table(tables, reference) {
                Some(table) => Some(related_model(table)),
                None => {
                    target = RelationTarget::Unresolved {
                        reference: reference.clone(),
                    };
                    None
                }
            },
            None => None,
        };

        if let RelationTarget::Unresolved { reference } = &target
            && kind != RelationKind::MorphTo
        {
            self.warning(
                format!(
                    "'{}' referenced by {} {} is not in this module; rendering a placeholder",
                    reference,
                    from.model(),
                    relationship.kind
                ),
                location,
            );
        }

        let method = relationship
            .name
            .clone()
            .or_else(|| {
                (kind == RelationKind::MorphTo)
                    .then(|| relationship.morph_name.clone())
                    .flatten()
            })
            .unwrap_or_else(|| default_method(kind, &target));

        Some(RelationIR {
            from: from.name.clone(),
            kind,
            method,
            target,
            foreign_key: relationship.foreign_key.clone(),
            local_key: relationship.local_key.clone(),
            pivot_table: relationship.pivot_table.clone(),
            morph_name: relationship.morph_name.clone(),
            through,
            inferred: false,
        })
    }

    fn check_unique_method(&mut self, relation: &RelationIR, existing: &[RelationIR]) {
        if existing
            .iter()
            .any(|r| r.from == relation.from && r.method == relation.method)
        {
            self.error(
                format!(
                    "duplicate relationship method '{}' on table '{}'",
                    relation.method, relation.from
                ),
                format!("relationships.{}.{}", relation.from, relation.method),
            );
        }
    }

    /// Warn about resolved belongsTo relationships whose key column is missing.
    fn check_owner_columns(&mut self, tables: &[TableIR], relations: &[RelationIR]) {
        for relation in relations {
            if relation.kind != RelationKind::BelongsTo || relation.related().is_none() {
                continue;
            }
            let Some(column) = relation.owner_key_column() else {
                continue;
            };
            let Some(table) = tables.iter().find(|t| t.name == relation.from) else {
                continue;
            };
            if table.field(&column).is_none() {
                self.warning(
                    format!(
                        "belongsTo '{}' on '{}' expects column '{}', which is not declared",
                        relation.method, relation.from, column
                    ),
                    format!("tables.{}", relation.from),
                );
            }
        }
    }
}

/// Synthesize belongsTo accessors for in-module foreign keys that no
/// declared relationship claims.
fn infer_belongs_to(tables: &[TableIR], declared: &[RelationIR]) -> Vec<RelationIR> {
    let mut inferred: Vec<RelationIR> = Vec::new();

    for table in tables {
        for field in &table.fields {
            let Some(fk) = field.foreign_key() else {
                continue;
            };
            if !fk.in_module {
                continue;
            }
            let claimed = declared.iter().any(|r| {
                r.from == table.name
                    && r.kind == RelationKind::BelongsTo
                    && r.owner_key_column().as_deref() == Some(field.name.as_str())
            });
            if claimed {
                continue;
            }
            let Some(target) = tables.iter().find(|t| t.name == fk.table) else {
                continue;
            };

            let method = match field.name.strip_suffix("_id") {
                Some(stem) => to_camel_case(stem),
                None => to_camel_case(&singularize(&target.name)),
            };
            let taken = declared
                .iter()
                .chain(inferred.iter())
                .any(|r| r.from == table.name && r.method == method);
            if taken {
                continue;
            }

            let conventional = format!("{}_id", to_snake_case(&method));
            inferred.push(RelationIR {
                from: table.name.clone(),
                kind: RelationKind::BelongsTo,
                method,
                target: RelationTarget::Resolved(related_model(target)),
                foreign_key: (conventional != field.name).then(|| field.name.clone()),
                local_key: (fk.column != "id").then(|| fk.column.clone()),
                pivot_table: None,
                morph_name: None,
                through: None,
                inferred: true,
            });
        }
    }

    inferred
}

fn lower_meta(manifest: &Manifest) -> ModuleMeta {
    let module = &manifest.module;
    ModuleMeta {
        name: module.name.clone(),
        alias: to_kebab_case(&module.name),
        namespace: module.namespace(),
        description: module.description.clone(),
        version: module.version.to_string(),
        priority: module.priority,
        currency: module.currency.clone(),
    }
}

fn lower_features(manifest: &Manifest) -> Features {
    let module = &manifest.module;
    Features {
        api: module.api,
        web_routes: module.web_routes,
        admin_panel: module.admin_panel,
        permissions: module.permissions,
        factories: module.factories,
        seeders: module.seeders,
    }
}

/// Key column a belongsTo declaration binds, before lowering.
fn declared_owner_column(relationship: &Relationship) -> String {
    relationship.foreign_key.clone().unwrap_or_else(|| {
        let method = relationship
            .name
            .clone()
            .unwrap_or_else(|| to_camel_case(&to_studly_case(&singularize(&relationship.to))));
        format!("{}_id", to_snake_case(&method))
    })
}

/// Table name for a reference outside the module (`User` -> `users`).
fn external_table_name(reference: &str) -> String {
    if reference.chars().any(|c| c.is_uppercase()) {
        pluralize(&to_snake_case(reference))
    } else {
        reference.to_string()
    }
}

fn find_table<'t>(tables: &'t [TableIR], reference: &str) -> Option<&'t TableIR> {
    tables
        .iter()
        .find(|t| t.name == reference || t.names.model == reference)
}

fn related_model(table: &TableIR) -> RelatedModel {
    RelatedModel {
        table: table.name.clone(),
        model: table.names.model.clone(),
        display: table.display.clone(),
    }
}

fn display_column(table: &Table) -> String {
    if let Some(display) = &table.display {
        return display.clone();
    }
    DISPLAY_CANDIDATES
        .iter()
        .find(|c| table.field(c).is_some())
        .map(|c| c.to_string())
        .or_else(|| {
            table
                .fields
                .iter()
                .find(|f| matches!(f.field_type, FieldType::String | FieldType::Char))
                .map(|f| f.name.clone())
        })
        .unwrap_or_else(|| "id".to_string())
}

/// Accessor name when none is given: the target model, pluralized for
/// to-many kinds (`Category` -> `category`, `Tag` -> `tags`).
fn default_method(kind: RelationKind, target: &RelationTarget) -> String {
    let model = match target {
        RelationTarget::Resolved(model) => model.model.clone(),
        RelationTarget::Unresolved { reference } => to_studly_case(&singularize(reference)),
    };
    if kind.is_to_many() {
        to_camel_case(&pluralize(&model))
    } else {
        to_camel_case(&model)
    }
}

fn lower_default(value: &toml::Value) -> DefaultValue {
    match value {
        toml::Value::Boolean(b) => DefaultValue::Bool(*b),
        toml::Value::Integer(i) => DefaultValue::Int(*i),
        toml::Value::Float(f) => DefaultValue::Float(*f),
        other => DefaultValue::String(modforge_core::toml_value_to_string(other)),
    }
}

fn lower_action(action: modforge_manifest::ForeignAction) -> ForeignAction {
    match action {
        modforge_manifest::ForeignAction::Cascade => ForeignAction::Cascade,
        modforge_manifest::ForeignAction::Restrict => ForeignAction::Restrict,
        modforge_manifest::ForeignAction::SetNull => ForeignAction::SetNull,
        modforge_manifest::ForeignAction::NoAction => ForeignAction::NoAction,
    }
}

fn lower_kind(kind: RelationType) -> RelationKind {
    match kind {
        RelationType::HasOne => RelationKind::HasOne,
        RelationType::HasMany => RelationKind::HasMany,
        RelationType::BelongsTo => RelationKind::BelongsTo,
        RelationType::BelongsToMany => RelationKind::BelongsToMany,
        RelationType::MorphOne => RelationKind::MorphOne,
        RelationType::MorphMany => RelationKind::MorphMany,
        RelationType::MorphTo => RelationKind::MorphTo,
        RelationType::MorphToMany => RelationKind::MorphToMany,
        RelationType::MorphedByMany => RelationKind::MorphedByMany,
        RelationType::HasOneThrough => RelationKind::HasOneThrough,
        RelationType::HasManyThrough => RelationKind::HasManyThrough,
    }
}
