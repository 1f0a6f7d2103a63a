use std::path::{Path, PathBuf};

use modforge_codegen::{builder::CodeBuilder, language::TypeMapper};
use modforge_core::{GeneratedFile, php_string};
use modforge_ir::{FieldIR, FieldKind, TableIR};

use crate::{PhpFile, RenderContext};

/// `database/factories/<Model>Factory.php`
pub struct Factory<'a> {
    ctx: RenderContext<'a>,
    table: &'a TableIR,
}

impl<'a> Factory<'a> {
    pub fn new(ctx: RenderContext<'a>, table: &'a TableIR) -> Self {
        Self { ctx, table }
    }

    /// Models of other module tables this factory builds through.
    fn related_models(&self) -> Vec<&'a str> {
        let mut models: Vec<&str> = Vec::new();
        for field in &self.table.fields {
            if let Some(model) = self.related_model(field)
                && !models.contains(&model)
            {
                models.push(model);
            }
        }
        models
    }

    /// In-module referenced model, excluding self references.
    fn related_model(&self, field: &FieldIR) -> Option<&'a str> {
        let FieldKind::ForeignId(fk) = &field.kind else {
            return None;
        };
        if !fk.in_module || fk.table == self.table.name {
            return None;
        }
        self.ctx.module.table(&fk.table).map(|t| t.model())
    }

    /// `definition()` entries, one per field in declaration order.
    pub fn definition(&self) -> Vec<(String, String)> {
        self.table
            .fields
            .iter()
            .map(|field| {
                let value = match self.related_model(field) {
                    Some(model) => format!("{}::factory()", model),
                    None => self.ctx.mapper.factory_value(field),
                };
                (field.name.clone(), value)
            })
            .collect()
    }
}

impl GeneratedFile for Factory<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join("database")
            .join("factories")
            .join(format!("{}.php", self.table.names.factory))
    }

    fn render(&self) -> String {
        let model = self.table.model();
        let definition = self.definition();

        let body = CodeBuilder::php()
            .doc_block(&[format!("@extends Factory<{}>", model)])
            .brace_block(
                &format!("class {} extends Factory", self.table.names.factory),
                |b| {
                    b.line(&format!("protected $model = {}::class;", model))
                        .blank()
                        .doc_block(&["@return array<string, mixed>"])
                        .brace_block("public function definition(): array", |b| {
                            b.block_with_close("return [", "];", |b| {
                                b.each(&definition, |b, (name, value)| {
                                    b.line(&format!("{} => {},", php_string(name), value))
                                })
                            })
                        })
                },
            )
            .build();

        let mut file = PhpFile::new()
            .namespace(self.ctx.ns("Database\\Factories"))
            .use_class("Illuminate\\Database\\Eloquent\\Factories\\Factory")
            .use_class(self.ctx.model_class(model));
        for related in self.related_models() {
            file = file.use_class(self.ctx.model_class(related));
        }
        file.add_code(&body).render()
    }
}
