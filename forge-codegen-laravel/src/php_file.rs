//! PhpFile abstraction for structured PHP file generation.
//!
//! Provides a high-level API for generating PHP class files with a
//! namespace, organized imports and body content.

use std::collections::BTreeSet;

use modforge_codegen::builder::{CodeBuilder, CodeFragment, Renderable};

/// A structured representation of a PHP file.
///
/// Imports are deduplicated and sorted, so renderers can add them in
/// whatever order they discover them.
///
/// # Example
///
/// ```
/// use modforge_codegen::builder::CodeFragment;
/// use modforge_codegen_laravel::PhpFile;
///
/// let file = PhpFile::new()
///     .namespace("Modules\\Shop\\Models")
///     .use_class("Illuminate\\Database\\Eloquent\\Model")
///     .add(CodeFragment::line("class Product extends Model {}"))
///     .render();
/// assert!(file.starts_with("<?php\n\nnamespace Modules\\Shop\\Models;\n\nuse Illuminate"));
/// ```
#[derive(Debug, Default)]
pub struct PhpFile {
    namespace: Option<String>,
    uses: BTreeSet<String>,
    body: Vec<Vec<CodeFragment>>,
}

impl PhpFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Add a `use` import (fully qualified, without leading backslash).
    pub fn use_class(mut self, class: impl Into<String>) -> Self {
        self.uses.insert(class.into());
        self
    }

    /// Add an import when `condition` holds.
    pub fn use_class_if(self, condition: bool, class: impl Into<String>) -> Self {
        if condition { self.use_class(class) } else { self }
    }

    /// Add several imports.
    pub fn use_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.uses.extend(classes.into_iter().map(Into::into));
        self
    }

    /// Add a body element (any Renderable).
    #[allow(clippy::should_implement_trait)]
    pub fn add<R: Renderable>(mut self, node: R) -> Self {
        self.body.push(node.to_fragments());
        self
    }

    /// Add body code produced by a [`CodeBuilder`].
    pub fn add_code(mut self, code: &str) -> Self {
        self.body.push(
            code.lines()
                .map(|l| {
                    if l.is_empty() {
                        CodeFragment::Blank
                    } else {
                        CodeFragment::line(l.to_string())
                    }
                })
                .collect(),
        );
        self
    }

    /// Render the file with PSR-12 layout.
    pub fn render(&self) -> String {
        let mut builder = CodeBuilder::php().line("<?php");

        if let Some(namespace) = &self.namespace {
            builder = builder.blank().line(&format!("namespace {};", namespace));
        }

        if !self.uses.is_empty() {
            builder = builder.blank();
            for class in &self.uses {
                builder = builder.line(&format!("use {};", class));
            }
        }

        for fragments in &self.body {
            builder = builder.blank().render(fragments);
        }

        builder.build()
    }
}
