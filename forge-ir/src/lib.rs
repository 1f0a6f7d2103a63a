//! Intermediate representation types for the modforge module generator.
//!
//! This crate provides the lowered schema used across the modforge
//! generation pipeline: tables with their derived names cached, fields
//! with closed kinds, resolved relationships, and pivot tables.
//!
//! # Architecture
//!
//! ```text
//! forge.toml (TOML) → modforge-manifest (parsing) → modforge-ir (lowered) → codegen
//! ```
//!
//! The IR types are designed to be:
//! - Target-agnostic (no PHP-specific concerns)
//! - Closed (field kinds and relationship kinds are sum types)
//! - Serializable (for pipeline snapshots)

mod field;
mod module;
mod pivot;
mod relation;
mod table;

pub use field::{
    DEFAULT_PRECISION, DEFAULT_SCALE, DEFAULT_STRING_LENGTH, DefaultValue, EnumValues, FieldIR,
    FieldKind, ForeignAction, ForeignKeyIR, InvalidEnumValues,
};
pub use module::{Features, ModuleIR, ModuleMeta};
pub use pivot::{PivotIR, PivotShape, PivotSide, default_pivot_keys, plain_pivot_name};
pub use relation::{RelatedModel, RelationIR, RelationKind, RelationTarget};
pub use table::{TableIR, TableNames};
