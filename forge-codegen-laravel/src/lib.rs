//! Laravel and Filament target for modforge.
//!
//! Renders a lowered module into an nwidart-style Laravel module: Eloquent
//! models, schema migrations, Filament resources and pages, API controllers
//! and routes, factories, seeders and a permission seeder.
//!
//! ```ignore
//! let generator = LaravelGenerator::compile(manifest)?;
//! let result = generator.generate(&modules_dir.join("Shop"))?;
//! ```

mod context;
pub mod edit;
pub mod files;
mod generator;
mod permissions;
mod php_file;
mod sidecar;
mod timestamps;
mod type_mapper;

pub use context::RenderContext;
pub use edit::{EditMode, EditOutcome, ModuleEditor};
pub use generator::{GenerationReport, LaravelGenerator};
pub use permissions::{GUARD, PERMISSION_ACTIONS, permission_name, permissions_for};
pub use php_file::PhpFile;
pub use sidecar::{Alteration, MigrationLedger, SCHEMA_FILE, STATE_DIR, Sidecar};
pub use timestamps::{MigrationClock, TIMESTAMP_FORMAT};
pub use type_mapper::{LaravelTypeMapper, is_money_name, php_default, php_list, php_map};
