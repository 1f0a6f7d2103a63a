//! One renderer per generated artifact.
//!
//! Each renderer implements [`GeneratedFile`](modforge_core::GeneratedFile)
//! and is a pure function of the [`RenderContext`] it was built from.

mod api_controller;
mod factory;
mod migration;
mod model;
mod module_json;
mod pages;
mod permission_seeder;
mod resource;
mod routes;
mod seeder;
mod service_provider;

pub use api_controller::ApiController;
pub use factory::Factory;
pub use migration::{AlterTableMigration, CreateTableMigration, PivotMigration};
pub use model::{Model, relation_call, relation_method, renders_accessor};
pub use module_json::ModuleJson;
pub use pages::{PageKind, ResourcePage};
pub use permission_seeder::PermissionSeeder;
pub use resource::Resource;
pub use routes::{ApiRoutes, WebRoutes};
pub use seeder::{DatabaseSeeder, ModelSeeder, SEED_COUNT};
pub use service_provider::ServiceProvider;

use std::path::Path;

use modforge_codegen::generation::{FileCategory, FileEntry};
use modforge_core::GeneratedFile;

use crate::RenderContext;

/// Fully qualified service provider class listed in module.json and the
/// host provider list.
pub fn provider_class(ctx: &RenderContext) -> String {
    format!("{}\\{}ServiceProvider", ctx.ns("Providers"), ctx.meta().name)
}

/// Path of a generated file relative to the module directory, with `/`
/// separators on every platform.
pub fn relative_path(file: &impl GeneratedFile) -> String {
    file.path(Path::new(""))
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Registry entry for a rendered file.
pub fn entry(file: &impl GeneratedFile, category: FileCategory) -> FileEntry {
    FileEntry::from_generated(relative_path(file), file, category)
}
