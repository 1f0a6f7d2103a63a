//! Schema description input for modforge.
//!
//! A module is described by a `forge.toml` manifest (or imported from a JSON
//! module description). Parsing reports errors as [`miette`] diagnostics that
//! point into the source file.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod import;
mod manifest;

pub use error::{Error, Result};
pub use import::{
    FieldDescription, ModelDescription, ModuleDescription, RelationshipDescription,
};
pub use manifest::{
    Field, FieldType, ForeignAction, ForgeToml, Manifest, ModuleConfig, ParseContext,
    RelationType, Relationship, Table, append_field_block, append_relationship_block,
    render_field_block,
};
