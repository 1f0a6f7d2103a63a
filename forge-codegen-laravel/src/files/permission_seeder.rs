use std::path::{Path, PathBuf};

use modforge_codegen::builder::CodeBuilder;
use modforge_core::{GeneratedFile, php_string};

use crate::{
    PhpFile, RenderContext,
    permissions::{GUARD, permissions_for},
};

/// `database/seeders/<Module>PermissionSeeder.php`
///
/// Creates the module's permissions with the spatie/laravel-permission
/// models; `firstOrCreate` keeps reseeding idempotent.
pub struct PermissionSeeder<'a> {
    ctx: RenderContext<'a>,
}

impl<'a> PermissionSeeder<'a> {
    pub fn new(ctx: RenderContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn class_name(&self) -> String {
        format!("{}PermissionSeeder", self.ctx.meta().name)
    }

    /// Every permission of the module, table by table.
    pub fn permissions(&self) -> Vec<String> {
        self.ctx
            .module
            .tables
            .iter()
            .flat_map(|t| permissions_for(t.model()))
            .collect()
    }
}

impl GeneratedFile for PermissionSeeder<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join("database")
            .join("seeders")
            .join(format!("{}.php", self.class_name()))
    }

    fn render(&self) -> String {
        let permissions = self.permissions();

        let body = CodeBuilder::php()
            .brace_block(&format!("class {} extends Seeder", self.class_name()), |b| {
                b.brace_block("public function run(): void", |b| {
                    b.line("app(PermissionRegistrar::class)->forgetCachedPermissions();")
                        .blank()
                        .block_with_close("$permissions = [", "];", |b| {
                            b.each(&permissions, |b, p| b.line(&format!("{},", php_string(p))))
                        })
                        .blank()
                        .brace_block("foreach ($permissions as $permission)", |b| {
                            b.line(&format!(
                                "Permission::firstOrCreate(['name' => $permission, 'guard_name' => {}]);",
                                php_string(GUARD)
                            ))
                        })
                })
            })
            .build();

        PhpFile::new()
            .namespace(self.ctx.ns("Database\\Seeders"))
            .use_classes([
                "Illuminate\\Database\\Seeder".to_string(),
                "Spatie\\Permission\\Models\\Permission".to_string(),
                "Spatie\\Permission\\PermissionRegistrar".to_string(),
            ])
            .add_code(&body)
            .render()
    }
}
