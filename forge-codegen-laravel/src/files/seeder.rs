//! Per-table seeders and the module's umbrella seeder.

use std::path::{Path, PathBuf};

use modforge_codegen::builder::CodeBuilder;
use modforge_core::GeneratedFile;
use modforge_ir::TableIR;

use crate::{PhpFile, RenderContext};

/// Rows created per table by seeders and the test data action.
pub const SEED_COUNT: u32 = 10;

/// `database/seeders/<Model>Seeder.php`
pub struct ModelSeeder<'a> {
    ctx: RenderContext<'a>,
    table: &'a TableIR,
}

impl<'a> ModelSeeder<'a> {
    pub fn new(ctx: RenderContext<'a>, table: &'a TableIR) -> Self {
        Self { ctx, table }
    }
}

impl GeneratedFile for ModelSeeder<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join("database")
            .join("seeders")
            .join(format!("{}.php", self.table.names.seeder))
    }

    fn render(&self) -> String {
        let factories = self.ctx.module.features.factories;
        let model = self.table.model();

        let body = CodeBuilder::php()
            .brace_block(
                &format!("class {} extends Seeder", self.table.names.seeder),
                |b| {
                    b.brace_block("public function run(): void", |b| {
                        if factories {
                            b.line(&format!(
                                "{}::factory()->count({})->create();",
                                model, SEED_COUNT
                            ))
                        } else {
                            b.line("//")
                        }
                    })
                },
            )
            .build();

        PhpFile::new()
            .namespace(self.ctx.ns("Database\\Seeders"))
            .use_class("Illuminate\\Database\\Seeder")
            .use_class_if(factories, self.ctx.model_class(model))
            .add_code(&body)
            .render()
    }
}

/// `database/seeders/<Module>DatabaseSeeder.php`, calling every table
/// seeder in creation order.
pub struct DatabaseSeeder<'a> {
    ctx: RenderContext<'a>,
}

impl<'a> DatabaseSeeder<'a> {
    pub fn new(ctx: RenderContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn class_name(&self) -> String {
        format!("{}DatabaseSeeder", self.ctx.meta().name)
    }
}

impl GeneratedFile for DatabaseSeeder<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join("database")
            .join("seeders")
            .join(format!("{}.php", self.class_name()))
    }

    fn render(&self) -> String {
        let tables = self.ctx.analysis.ordered_tables(self.ctx.module);
        let permissions = self.ctx.module.features.permissions;
        let permission_seeder = super::PermissionSeeder::new(self.ctx).class_name();

        let body = CodeBuilder::php()
            .brace_block(&format!("class {} extends Seeder", self.class_name()), |b| {
                b.brace_block("public function run(): void", |b| {
                    b.block_with_close("$this->call([", "]);", |b| {
                        b.when(permissions, |b| {
                            b.line(&format!("{}::class,", permission_seeder))
                        })
                        .each(&tables, |b, t| b.line(&format!("{}::class,", t.names.seeder)))
                    })
                })
            })
            .build();

        PhpFile::new()
            .namespace(self.ctx.ns("Database\\Seeders"))
            .use_class("Illuminate\\Database\\Seeder")
            .add_code(&body)
            .render()
    }
}
