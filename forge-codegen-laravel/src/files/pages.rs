//! List, create and edit pages bound to a Filament resource.

use std::path::{Path, PathBuf};

use modforge_codegen::builder::{CodeBuilder, MethodChain};
use modforge_core::GeneratedFile;
use modforge_ir::TableIR;

use crate::{PhpFile, RenderContext};

/// Which page of the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    List,
    Create,
    Edit,
}

impl PageKind {
    pub const ALL: [PageKind; 3] = [PageKind::List, PageKind::Create, PageKind::Edit];

    fn prefix(&self) -> &'static str {
        match self {
            PageKind::List => "List",
            PageKind::Create => "Create",
            PageKind::Edit => "Edit",
        }
    }

    fn base_class(&self) -> &'static str {
        match self {
            PageKind::List => "ListRecords",
            PageKind::Create => "CreateRecord",
            PageKind::Edit => "EditRecord",
        }
    }
}

/// `app/Filament/Resources/<Model>Resource/Pages/<Kind><Model>.php`
pub struct ResourcePage<'a> {
    ctx: RenderContext<'a>,
    table: &'a TableIR,
    kind: PageKind,
}

impl<'a> ResourcePage<'a> {
    pub fn new(ctx: RenderContext<'a>, table: &'a TableIR, kind: PageKind) -> Self {
        Self { ctx, table, kind }
    }

    pub fn class_name(&self) -> String {
        format!("{}{}", self.kind.prefix(), self.table.model())
    }

    /// Header actions for the page's toolbar.
    fn header_actions(&self) -> Vec<MethodChain> {
        let features = self.ctx.module.features;
        match self.kind {
            PageKind::List => {
                let mut actions = vec![MethodChain::new("Actions\\CreateAction::make()")];
                if features.seeders {
                    actions.push(
                        MethodChain::make("Actions\\Action", "'runSeeder'")
                            .call_with("label", ["'Run seeder'"])
                            .call_with("icon", ["'heroicon-o-circle-stack'"])
                            .call("requiresConfirmation")
                            .call_with(
                                "action",
                                [format!(
                                    "fn () => Artisan::call('db:seed', ['--class' => {}::class, '--force' => true])",
                                    self.table.names.seeder
                                )],
                            ),
                    );
                }
                if features.factories {
                    actions.push(
                        MethodChain::make("Actions\\Action", "'createTestData'")
                            .call_with("label", ["'Create test data'"])
                            .call_with("icon", ["'heroicon-o-beaker'"])
                            .call_with(
                                "action",
                                [format!(
                                    "fn () => {}::factory()->count(10)->create()",
                                    self.table.model()
                                )],
                            ),
                    );
                }
                actions
            }
            PageKind::Create => Vec::new(),
            PageKind::Edit => {
                let mut actions = vec![MethodChain::new("Actions\\DeleteAction::make()")];
                if self.table.soft_deletes {
                    actions.push(MethodChain::new("Actions\\ForceDeleteAction::make()"));
                    actions.push(MethodChain::new("Actions\\RestoreAction::make()"));
                }
                actions
            }
        }
    }
}

impl GeneratedFile for ResourcePage<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join("app")
            .join("Filament")
            .join("Resources")
            .join(&self.table.names.resource)
            .join("Pages")
            .join(format!("{}.php", self.class_name()))
    }

    fn render(&self) -> String {
        let resource = &self.table.names.resource;
        let actions = self.header_actions();
        let features = self.ctx.module.features;
        let is_list = self.kind == PageKind::List;

        let body = CodeBuilder::php()
            .brace_block(
                &format!("class {} extends {}", self.class_name(), self.kind.base_class()),
                |b| {
                    b.line(&format!(
                        "protected static string $resource = {}::class;",
                        resource
                    ))
                    .when(!actions.is_empty(), |b| {
                        b.blank()
                            .brace_block("protected function getHeaderActions(): array", |b| {
                                b.block_with_close("return [", "];", |b| {
                                    b.each(&actions, |b, a| b.render(&a.terminated(",")))
                                })
                            })
                    })
                },
            )
            .build();

        PhpFile::new()
            .namespace(format!(
                "{}\\{}\\Pages",
                self.ctx.ns("Filament\\Resources"),
                resource
            ))
            .use_class(format!("{}\\{}", self.ctx.ns("Filament\\Resources"), resource))
            .use_class(format!(
                "Filament\\Resources\\Pages\\{}",
                self.kind.base_class()
            ))
            .use_class_if(!actions.is_empty(), "Filament\\Actions")
            .use_class_if(is_list && features.seeders, "Illuminate\\Support\\Facades\\Artisan")
            .use_class_if(
                is_list && features.seeders,
                format!("{}\\{}", self.ctx.ns("Database\\Seeders"), self.table.names.seeder),
            )
            .use_class_if(is_list && features.factories, self.ctx.model_class(self.table.model()))
            .add_code(&body)
            .render()
    }
}
