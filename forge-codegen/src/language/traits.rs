//! Target-agnostic code generation traits.

use std::path::Path;

use eyre::Result;
use modforge_ir::FieldIR;

use crate::builder::MethodChain;

/// Trait for target-specific code generators.
///
/// Implement this trait to add support for generating a module for another
/// framework.
pub trait LanguageCodegen {
    /// Target identifier (e.g., "laravel")
    fn target(&self) -> &'static str;

    /// Preview generated files without writing to disk
    fn preview(&self) -> Result<Vec<PreviewFile>>;

    /// Generate all files into the specified output directory
    fn generate(&self, output_dir: &Path) -> Result<GenerateResult>;
}

/// Result of code generation
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerateResult {
    /// Files written, relative to the output directory
    pub written: Vec<String>,
    /// Files left untouched by their overwrite rule
    pub skipped: Vec<String>,
    /// Non-fatal issues found while generating
    pub warnings: Vec<String>,
}

impl GenerateResult {
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// A generated file for preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFile {
    /// Relative path from output directory
    pub path: String,
    /// File content
    pub content: String,
}

/// Maps a field to its three parallel projections.
///
/// Every projection matches exhaustively over [`FieldKind`](modforge_ir::FieldKind),
/// so adding a kind forces all of them to be updated together.
pub trait TypeMapper {
    fn target(&self) -> &'static str;

    /// Storage column definition, e.g. `$table->string('name', 255)->unique();`
    fn column(&self, field: &FieldIR) -> String;

    /// Admin form input component.
    fn form_input(&self, field: &FieldIR) -> MethodChain;

    /// Admin table column component; `None` keeps the field out of list views.
    fn table_column(&self, field: &FieldIR) -> Option<MethodChain>;

    /// Test data generator expression.
    fn factory_value(&self, field: &FieldIR) -> String;

    /// Model attribute cast, when the kind needs one.
    fn cast(&self, field: &FieldIR) -> Option<String>;
}
