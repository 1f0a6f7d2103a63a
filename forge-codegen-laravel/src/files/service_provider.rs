use std::path::{Path, PathBuf};

use modforge_codegen::builder::{CodeBuilder, MethodChain};
use modforge_core::GeneratedFile;

use crate::{PhpFile, RenderContext};

/// `app/Providers/<Module>ServiceProvider.php`
///
/// Loads the module's migrations and route files.
pub struct ServiceProvider<'a> {
    ctx: RenderContext<'a>,
}

impl<'a> ServiceProvider<'a> {
    pub fn new(ctx: RenderContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn class_name(&self) -> String {
        format!("{}ServiceProvider", self.ctx.meta().name)
    }
}

impl GeneratedFile for ServiceProvider<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join("app")
            .join("Providers")
            .join(format!("{}.php", self.class_name()))
    }

    fn render(&self) -> String {
        let features = self.ctx.module.features;

        let api = MethodChain::new("Route::middleware('api')")
            .call_with("prefix", ["'api'"])
            .call_with("group", ["__DIR__ . '/../../routes/api.php'"]);
        let web = MethodChain::new("Route::middleware('web')")
            .call_with("group", ["__DIR__ . '/../../routes/web.php'"]);

        let body = CodeBuilder::php()
            .brace_block(
                &format!("class {} extends ServiceProvider", self.class_name()),
                |b| {
                    b.brace_block("public function boot(): void", |b| {
                        b.line("$this->loadMigrationsFrom(__DIR__ . '/../../database/migrations');")
                            .when(features.api, |b| b.blank().render(&api.terminated(";")))
                            .when(features.web_routes, |b| {
                                b.blank().render(&web.terminated(";"))
                            })
                    })
                },
            )
            .build();

        PhpFile::new()
            .namespace(self.ctx.ns("Providers"))
            .use_class("Illuminate\\Support\\ServiceProvider")
            .use_class_if(features.api || features.web_routes, "Illuminate\\Support\\Facades\\Route")
            .add_code(&body)
            .render()
    }
}
