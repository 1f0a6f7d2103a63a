//! Built-in pipeline phases.
//!
//! This module provides the standard phases that run in every pipeline:
//!
//! - [`ValidatePhase`] - runs lints over the manifest
//! - [`LowerPhase`] - transforms the manifest into a module IR
//! - [`AnalyzePhase`] - orders tables and collects pivots

mod analyze;
mod lower;
mod validate;

pub use analyze::AnalyzePhase;
pub use lower::{LowerPhase, lower_manifest};
pub use validate::{
    EmptyDescriptionLint, EnumValuesLint, ForeignKeyNamingLint, Lint, LintInfo,
    MissingLengthLint, TableNamingLint, ValidatePhase,
};
