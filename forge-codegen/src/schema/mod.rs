//! Schema analysis and display types.
//!
//! - [`ModuleAnalysis`] - Pre-computed ordering, pivots and belongsTo index
//! - [`SchemaDisplay`] - Declarative module schema formatting

mod analysis;
mod display;

pub use analysis::{BelongsToColumn, DependencyCycle, ModuleAnalysis, relation_pivot};
pub use display::{DisplayStyle, SchemaDisplay};
