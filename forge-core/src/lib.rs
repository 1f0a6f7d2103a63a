//! Core utilities and types for the modforge module generator.
//!
//! This crate provides fundamental types and utilities used across
//! the modforge crates: file writing rules, naming and inflection helpers,
//! and semantic versions.

mod file;
mod inflect;
mod utils;
mod version;

// File operations
pub use file::{File, FileRules, GeneratedFile, Overwrite, WriteResult, write_file};
// Inflection
pub use inflect::{pluralize, singularize};
// String utilities
pub use utils::{
    headline, php_string, to_camel_case, to_kebab_case, to_snake_case, to_studly_case,
    toml_value_to_string,
};
pub use version::Version;
