//! Filament resource: form schema, table view, actions and permission gates.

use std::path::{Path, PathBuf};

use modforge_codegen::{
    builder::{CodeBuilder, MethodChain},
    language::TypeMapper,
    schema::BelongsToColumn,
};
use modforge_core::{GeneratedFile, headline, php_string};
use modforge_ir::{FieldIR, FieldKind, TableIR};

use crate::{
    PhpFile, RenderContext,
    permissions::{PERMISSION_ACTIONS, permission_name},
};

/// Filament gate method checked against a permission action.
fn gate_signature(action: &str) -> Option<&'static str> {
    Some(match action {
        "view_any" => "canViewAny()",
        "view" => "canView(Model $record)",
        "create" => "canCreate()",
        "update" => "canEdit(Model $record)",
        "delete" => "canDelete(Model $record)",
        "delete_any" => "canDeleteAny()",
        "force_delete" => "canForceDelete(Model $record)",
        "force_delete_any" => "canForceDeleteAny()",
        "restore" => "canRestore(Model $record)",
        "restore_any" => "canRestoreAny()",
        "replicate" => "canReplicate(Model $record)",
        _ => return None,
    })
}

/// `app/Filament/Resources/<Model>Resource.php`
pub struct Resource<'a> {
    ctx: RenderContext<'a>,
    table: &'a TableIR,
}

impl<'a> Resource<'a> {
    pub fn new(ctx: RenderContext<'a>, table: &'a TableIR) -> Self {
        Self { ctx, table }
    }

    /// Form components: plain fields in declaration order, then one
    /// relationship select per belongsTo.
    pub fn form_components(&self) -> Vec<MethodChain> {
        let mut components: Vec<MethodChain> = self
            .ctx
            .plain_fields(self.table)
            .into_iter()
            .map(|f| self.ctx.mapper.form_input(f))
            .collect();
        components.extend(
            self.ctx
                .belongs_to(self.table)
                .into_iter()
                .filter_map(|b| Some(relationship_select(self.table.field(&b.column)?, b))),
        );
        components
    }

    /// Table columns: plain fields, belongsTo lookups, then timestamps.
    pub fn table_columns(&self) -> Vec<MethodChain> {
        let mut columns: Vec<MethodChain> = self
            .ctx
            .plain_fields(self.table)
            .into_iter()
            .filter_map(|f| self.ctx.mapper.table_column(f))
            .collect();
        columns.extend(
            self.ctx
                .belongs_to(self.table)
                .into_iter()
                .map(relationship_column),
        );
        if self.table.timestamps {
            columns.extend(timestamp_columns());
        }
        columns
    }

    /// Form component and table column of a single field, as the full
    /// form and table render them.
    pub fn field_components(&self, field: &FieldIR) -> (MethodChain, Option<MethodChain>) {
        let bound = self
            .ctx
            .belongs_to(self.table)
            .into_iter()
            .find(|b| b.column == field.name);
        match bound {
            Some(b) => (relationship_select(field, b), Some(relationship_column(b))),
            None => (
                self.ctx.mapper.form_input(field),
                self.ctx.mapper.table_column(field),
            ),
        }
    }

    /// Columns streamed by the CSV export action.
    pub fn export_columns(&self) -> Vec<&'a str> {
        self.table
            .fields
            .iter()
            .filter(|f| !matches!(f.kind, FieldKind::Json | FieldKind::Password))
            .map(|f| f.name.as_str())
            .collect()
    }

    fn class_name(&self) -> &str {
        &self.table.names.resource
    }

    fn render_form(&self, b: CodeBuilder) -> CodeBuilder {
        let components = self.form_components();
        b.brace_block("public static function form(Form $form): Form", |b| {
            b.line("return $form")
                .indent()
                .block_with_close("->schema([", "]);", |b| {
                    b.each(&components, |b, c| b.render(&c.terminated(",")))
                })
                .dedent()
        })
    }

    fn render_table(&self, b: CodeBuilder) -> CodeBuilder {
        let columns = self.table_columns();
        let soft_deletes = self.table.soft_deletes;

        let export = MethodChain::make("Tables\\Actions\\BulkAction", "'export'")
            .call_with("label", ["'Export CSV'"])
            .call_with("icon", ["'heroicon-o-arrow-down-tray'"])
            .call_with(
                "action",
                ["fn (Collection $records): StreamedResponse => static::exportCsv($records)"],
            );

        b.brace_block("public static function table(Table $table): Table", |b| {
            b.line("return $table")
                .indent()
                .block_with_close("->columns([", "])", |b| {
                    b.each(&columns, |b, c| b.render(&c.terminated(",")))
                })
                .when(soft_deletes, |b| {
                    b.block_with_close("->filters([", "])", |b| {
                        b.line("Tables\\Filters\\TrashedFilter::make(),")
                    })
                })
                .when(!soft_deletes, |b| b.line("->filters([])"))
                .block_with_close("->actions([", "])", |b| {
                    b.block_with_close("Tables\\Actions\\ActionGroup::make([", "]),", |b| {
                        b.line("Tables\\Actions\\ViewAction::make(),")
                            .line("Tables\\Actions\\EditAction::make(),")
                            .line("Tables\\Actions\\DeleteAction::make(),")
                            .when(soft_deletes, |b| {
                                b.line("Tables\\Actions\\RestoreAction::make(),")
                                    .line("Tables\\Actions\\ForceDeleteAction::make(),")
                            })
                    })
                })
                .block_with_close("->bulkActions([", "]);", |b| {
                    b.block_with_close("Tables\\Actions\\BulkActionGroup::make([", "]),", |b| {
                        b.render(
                            &MethodChain::new("Tables\\Actions\\DeleteBulkAction::make()")
                                .call("requiresConfirmation")
                                .terminated(","),
                        )
                        .render(&export.terminated(","))
                    })
                })
                .dedent()
        })
    }

    fn render_export(&self, b: CodeBuilder) -> CodeBuilder {
        let columns: Vec<String> = self.export_columns().into_iter().map(php_string).collect();
        let filename = php_string(&format!("{}.csv", self.table.name));

        b.brace_block(
            "protected static function exportCsv(Collection $records): StreamedResponse",
            |b| {
                b.line(&format!("$columns = [{}];", columns.join(", ")))
                    .blank()
                    .block_with_close(
                        "return response()->streamDownload(function () use ($records, $columns) {",
                        &format!("}}, {});", filename),
                        |b| {
                            b.line("$handle = fopen('php://output', 'w');")
                                .line("fputcsv($handle, $columns);")
                                .blank()
                                .block_with_close("foreach ($records as $record) {", "}", |b| {
                                    b.line("fputcsv($handle, array_map(fn (string $column) => $record->getAttribute($column), $columns));")
                                })
                                .blank()
                                .line("fclose($handle);")
                        },
                    )
            },
        )
    }

    fn render_gates(&self, b: CodeBuilder) -> CodeBuilder {
        let model = self.table.model();
        let gates = PERMISSION_ACTIONS
            .into_iter()
            .filter_map(|action| gate_signature(action).map(|signature| (action, signature)));
        b.each(gates, |b, (action, signature)| {
            b.brace_block(&format!("public static function {}: bool", signature), |b| {
                b.line(&format!(
                    "return static::userCan({});",
                    php_string(&permission_name(action, model))
                ))
            })
            .blank()
        })
        .brace_block("public static function shouldRegisterNavigation(): bool", |b| {
            b.line("return static::canViewAny();")
        })
        .blank()
        .brace_block(
            "protected static function userCan(string $permission): bool",
            |b| b.line("return auth()->user()?->can($permission) ?? false;"),
        )
    }

    fn render_pages(&self, b: CodeBuilder) -> CodeBuilder {
        let model = self.table.model();
        b.brace_block("public static function getPages(): array", |b| {
            b.block_with_close("return [", "];", |b| {
                b.line(&format!("'index' => Pages\\List{}::route('/'),", model))
                    .line(&format!("'create' => Pages\\Create{}::route('/create'),", model))
                    .line(&format!("'edit' => Pages\\Edit{}::route('/{{record}}/edit'),", model))
            })
        })
    }
}

impl GeneratedFile for Resource<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join("app")
            .join("Filament")
            .join("Resources")
            .join(format!("{}.php", self.class_name()))
    }

    fn render(&self) -> String {
        let model = self.table.model();
        let meta = self.ctx.meta();
        let permissions = self.ctx.module.features.permissions;
        let soft_deletes = self.table.soft_deletes;

        let body = CodeBuilder::php()
            .brace_block(
                &format!("class {} extends Resource", self.class_name()),
                |b| {
                    let b = b
                        .line(&format!("protected static ?string $model = {}::class;", model))
                        .blank()
                        .line("protected static ?string $navigationIcon = 'heroicon-o-rectangle-stack';")
                        .blank()
                        .line(&format!(
                            "protected static ?string $navigationGroup = {};",
                            php_string(&headline(&meta.name))
                        ))
                        .blank()
                        .line(&format!(
                            "protected static ?string $recordTitleAttribute = {};",
                            php_string(&self.table.display)
                        ))
                        .blank();
                    let b = self.render_form(b).blank();
                    let b = self.render_table(b).blank();
                    let b = self.render_export(b).blank();
                    let b = if permissions { self.render_gates(b).blank() } else { b };
                    let b = if soft_deletes {
                        b.brace_block("public static function getEloquentQuery(): Builder", |b| {
                            b.line("return parent::getEloquentQuery()")
                                .indent()
                                .line("->withoutGlobalScopes([SoftDeletingScope::class]);")
                                .dedent()
                        })
                        .blank()
                    } else {
                        b
                    };
                    self.render_pages(b)
                },
            )
            .build();

        PhpFile::new()
            .namespace(self.ctx.ns("Filament\\Resources"))
            .use_classes([
                "Filament\\Forms".to_string(),
                "Filament\\Forms\\Form".to_string(),
                "Filament\\Resources\\Resource".to_string(),
                "Filament\\Tables".to_string(),
                "Filament\\Tables\\Table".to_string(),
                "Illuminate\\Database\\Eloquent\\Collection".to_string(),
                "Symfony\\Component\\HttpFoundation\\StreamedResponse".to_string(),
                format!("{}\\{}\\Pages", self.ctx.ns("Filament\\Resources"), self.class_name()),
                self.ctx.model_class(model),
            ])
            .use_class_if(permissions, "Illuminate\\Database\\Eloquent\\Model")
            .use_class_if(soft_deletes, "Illuminate\\Database\\Eloquent\\Builder")
            .use_class_if(soft_deletes, "Illuminate\\Database\\Eloquent\\SoftDeletingScope")
            .add_code(&body)
            .render()
    }
}

/// Searchable select bound to the related table's display column.
fn relationship_select(field: &FieldIR, belongs_to: &BelongsToColumn) -> MethodChain {
    MethodChain::make("Forms\\Components\\Select", &php_string(&belongs_to.column))
        .call_with(
            "relationship",
            [
                php_string(&belongs_to.method),
                php_string(&belongs_to.related.display),
            ],
        )
        .call_with("label", [php_string(&field.label)])
        .call("searchable")
        .call("preload")
        .call_if(field.required, "required")
}

fn relationship_column(belongs_to: &BelongsToColumn) -> MethodChain {
    MethodChain::make(
        "Tables\\Columns\\TextColumn",
        &php_string(&format!("{}.{}", belongs_to.method, belongs_to.related.display)),
    )
    .call_with("label", [php_string(&headline(&belongs_to.method))])
    .call("searchable")
    .call("sortable")
}

fn timestamp_columns() -> [MethodChain; 2] {
    [
        MethodChain::make("Tables\\Columns\\TextColumn", "'created_at'")
            .call("dateTime")
            .call("sortable"),
        MethodChain::make("Tables\\Columns\\TextColumn", "'updated_at'")
            .call("dateTime")
            .call("sortable")
            .call_with("toggleable", ["isToggledHiddenByDefault: true"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_permission_action_has_a_gate() {
        for action in PERMISSION_ACTIONS {
            assert!(gate_signature(action).is_some(), "{action}");
        }
        assert_eq!(gate_signature("publish"), None);
    }
}
