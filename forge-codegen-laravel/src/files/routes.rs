//! Route files loaded by the service provider.

use std::path::{Path, PathBuf};

use modforge_codegen::builder::CodeBuilder;
use modforge_core::{FileRules, GeneratedFile, php_string};

use crate::{PhpFile, RenderContext};

/// `routes/api.php`, one `apiResource` per table.
pub struct ApiRoutes<'a> {
    ctx: RenderContext<'a>,
}

impl<'a> ApiRoutes<'a> {
    pub fn new(ctx: RenderContext<'a>) -> Self {
        Self { ctx }
    }
}

impl GeneratedFile for ApiRoutes<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join("routes").join("api.php")
    }

    fn render(&self) -> String {
        let alias = &self.ctx.meta().alias;
        let tables = self.ctx.analysis.ordered_tables(self.ctx.module);

        let body = CodeBuilder::php()
            .block_with_close(
                &format!(
                    "Route::prefix({})->name({})->group(function () {{",
                    php_string(alias),
                    php_string(&format!("{alias}."))
                ),
                "});",
                |b| {
                    b.each(&tables, |b, t| {
                        b.line(&format!(
                            "Route::apiResource({}, {}::class);",
                            php_string(&t.names.route),
                            t.names.controller
                        ))
                    })
                },
            )
            .build();

        let mut file = PhpFile::new().use_class("Illuminate\\Support\\Facades\\Route");
        for table in &tables {
            file = file.use_class(format!(
                "{}\\{}",
                self.ctx.ns("Http\\Controllers\\Api"),
                table.names.controller
            ));
        }
        file.add_code(&body).render()
    }
}

/// `routes/web.php`, an empty named group for module pages. Written once;
/// the host owns it afterwards.
pub struct WebRoutes<'a> {
    ctx: RenderContext<'a>,
}

impl<'a> WebRoutes<'a> {
    pub fn new(ctx: RenderContext<'a>) -> Self {
        Self { ctx }
    }
}

impl GeneratedFile for WebRoutes<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join("routes").join("web.php")
    }

    fn rules(&self) -> FileRules {
        FileRules::if_missing()
    }

    fn render(&self) -> String {
        let alias = &self.ctx.meta().alias;
        let body = CodeBuilder::php()
            .block_with_close(
                &format!(
                    "Route::prefix({})->name({})->group(function () {{",
                    php_string(alias),
                    php_string(&format!("{alias}."))
                ),
                "});",
                |b| b.line("//"),
            )
            .build();

        PhpFile::new()
            .use_class("Illuminate\\Support\\Facades\\Route")
            .add_code(&body)
            .render()
    }
}
