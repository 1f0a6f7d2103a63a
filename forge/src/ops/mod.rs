//! Core operations.
//!
//! This module contains the business logic for modforge commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod edit;
pub mod generate;
pub mod import;
pub mod info;
pub mod permissions;
pub mod status;

pub use check::check;
pub use edit::{EditTarget, RelationOptions, add_field, add_relation, parse_fields, relationship};
pub use generate::{GenerateOptions, compile, generate};
pub use import::import;
pub use info::info;
pub use permissions::permissions;
pub use status::set_status;
