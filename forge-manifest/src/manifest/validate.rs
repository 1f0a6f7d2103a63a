//! Validation context and utilities for manifest parsing.

use std::{collections::HashMap, sync::Arc};

use miette::SourceSpan;

use super::{FieldType, Manifest, RelationType};
use crate::{Result, error::SourceContext};

/// Columns every generated table manages itself.
pub const RESERVED_COLUMNS: &[&str] = &["id", "created_at", "updated_at", "deleted_at"];

/// Parsing and validation context that carries source information.
///
/// This struct encapsulates the source content, filename, and current path
/// through the manifest hierarchy, making it easier to pass validation
/// context through nested tables and fields.
///
/// # Example
///
/// ```ignore
/// let ctx = ParseContext::new(src, "forge.toml");
/// ctx.validate_name("products", "table")?;
///
/// let nested = ctx.push("products");
/// nested.validate_name("price", "field")?;
/// ```
#[derive(Debug, Clone)]
pub struct ParseContext<'a> {
    /// Source context for error reporting (shared across nested contexts)
    source: Arc<SourceContext>,
    /// Path segments for nested validation (e.g., ["products", "price"])
    path: Vec<&'a str>,
}

impl<'a> ParseContext<'a> {
    /// Create a new parse context with the given source and filename.
    pub fn new(src: &str, filename: &str) -> Self {
        Self {
            source: Arc::new(SourceContext::new(src, filename)),
            path: Vec::new(),
        }
    }

    /// Get the source context for error creation.
    pub fn source_context(&self) -> &SourceContext {
        &self.source
    }

    /// Push a path segment and return a new context.
    pub fn push(&self, segment: &'a str) -> Self {
        let mut new_path = self.path.clone();
        new_path.push(segment);
        Self {
            source: Arc::clone(&self.source),
            path: new_path,
        }
    }

    /// Get the current path as a dot-separated string.
    pub fn path_string(&self) -> String {
        self.path.join(".")
    }

    /// Get a context description for error messages, e.g. "field in 'products'".
    pub fn context_for(&self, kind: &str) -> String {
        if self.path.is_empty() {
            kind.to_string()
        } else {
            format!("{} in '{}'", kind, self.path_string())
        }
    }

    /// Find the span of a `name = "..."` declaration in the source.
    pub fn find_span(&self, name: &str) -> Option<SourceSpan> {
        find_value_span(self.source.src(), "name", name, 0)
    }

    /// Validate that a name is a valid identifier and not a PHP reserved word.
    pub fn validate_name(&self, name: &str, kind: &str) -> Result<()> {
        self.validate_value(name, kind, self.find_span(name))
    }

    fn validate_value(&self, name: &str, kind: &str, span: Option<SourceSpan>) -> Result<()> {
        if is_php_keyword(name) {
            return Err(self
                .source
                .reserved_keyword_error(name, self.context_for(kind), span));
        }

        if let Some(reason) = validate_identifier(name) {
            return Err(self.source.invalid_identifier_error(
                name,
                self.context_for(kind),
                reason,
                span,
            ));
        }

        Ok(())
    }

    /// Error unless the names are pairwise distinct.
    fn check_unique<'n>(&self, kind: &str, names: impl Iterator<Item = &'n str>) -> Result<()> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for name in names {
            let count = seen.entry(name).or_insert(0);
            *count += 1;
            if *count == 2 {
                let src = self.source.src();
                return Err(self.source.duplicate_error(
                    self.context_for(kind),
                    name,
                    find_value_span(src, "name", name, 0),
                    find_value_span(src, "name", name, 1),
                ));
            }
        }
        Ok(())
    }
}

/// Validate the manifest after parsing.
pub(crate) fn validate_manifest(manifest: &Manifest, src: &str, filename: &str) -> Result<()> {
    let ctx = ParseContext::new(src, filename);
    let sources = ctx.source_context();

    ctx.validate_name(&manifest.module.name, "module")?;
    for segment in manifest.module.namespace().split('\\') {
        ctx.validate_value(segment, "namespace segment", None)?;
    }

    ctx.check_unique("table", manifest.tables.iter().map(|t| t.name.as_str()))?;

    for table in &manifest.tables {
        ctx.validate_name(&table.name, "table")?;
        ctx.validate_value(&table.model_name(), "model", None)?;

        let table_ctx = ctx.push(&table.name);
        table_ctx.check_unique("field", table.fields.iter().map(|f| f.name.as_str()))?;

        for field in &table.fields {
            table_ctx.validate_name(&field.name, "field")?;

            if RESERVED_COLUMNS.contains(&field.name.as_str()) {
                return Err(sources.validation_error(
                    format!(
                        "field '{}' in '{}' is managed automatically and cannot be declared",
                        field.name, table.name
                    ),
                    table_ctx.find_span(&field.name),
                ));
            }

            if field.field_type == FieldType::Enum {
                if field.values.is_empty() {
                    return Err(sources.empty_enum_error(
                        &table.name,
                        &field.name,
                        table_ctx.find_span(&field.name),
                    ));
                }
                let mut seen = Vec::new();
                for value in field.values.iter().map(|v| v.trim()) {
                    if value.is_empty() {
                        return Err(sources.validation_error(
                            format!(
                                "enum field '{}.{}' has a blank value",
                                table.name, field.name
                            ),
                            table_ctx.find_span(&field.name),
                        ));
                    }
                    if seen.contains(&value) {
                        return Err(sources.validation_error(
                            format!(
                                "enum field '{}.{}' lists '{}' more than once",
                                table.name, field.name, value
                            ),
                            table_ctx.find_span(&field.name),
                        ));
                    }
                    seen.push(value);
                }
            }
        }
    }

    for rel in &manifest.relationships {
        let rel_ctx = ctx.push(&rel.from);
        let from_span = find_value_span(src, "from", &rel.from, 0);

        if manifest.table(&rel.from).is_none() {
            return Err(sources.validation_error(
                format!(
                    "relationship source '{}' is not a table of this module",
                    rel.from
                ),
                from_span,
            ));
        }
        rel_ctx.validate_value(&rel.to, "relationship target", None)?;

        if let Some(name) = &rel.name {
            rel_ctx.validate_value(name, "relationship", None)?;
        }
        if let Some(pivot) = &rel.pivot_table {
            rel_ctx.validate_value(pivot, "pivot table", None)?;
        }

        let needs_morph_name = rel.kind.is_morph() && rel.kind != RelationType::MorphTo;
        if needs_morph_name && rel.morph_name.is_none() {
            return Err(sources.validation_error(
                format!(
                    "{} relationship from '{}' to '{}' needs a morph_name",
                    rel.kind, rel.from, rel.to
                ),
                from_span,
            ));
        }
        if rel.kind == RelationType::MorphTo && rel.name.is_none() && rel.morph_name.is_none() {
            return Err(sources.validation_error(
                format!("morphTo relationship on '{}' needs a name", rel.from),
                from_span,
            ));
        }
        if rel.kind.needs_through() && rel.through.is_none() {
            return Err(sources.validation_error(
                format!(
                    "{} relationship from '{}' to '{}' needs a through table",
                    rel.kind, rel.from, rel.to
                ),
                from_span,
            ));
        }
    }

    Ok(())
}

/// PHP reserved words and reserved class names, compared case-insensitively
/// Source: https://www.php.net/manual/en/reserved.keywords.php
pub(crate) const PHP_KEYWORDS: &[&str] = &[
    "__halt_compiler", "abstract", "and", "array", "as", "break", "callable", "case", "catch",
    "class", "clone", "const", "continue", "declare", "default", "do", "echo", "else", "elseif",
    "empty", "enddeclare", "endfor", "endforeach", "endif", "endswitch", "endwhile", "enum",
    "eval", "exit", "extends", "final", "finally", "fn", "for", "foreach", "function", "global",
    "goto", "if", "implements", "include", "include_once", "instanceof", "insteadof",
    "interface", "isset", "list", "match", "namespace", "new", "or", "print", "private",
    "protected", "public", "readonly", "require", "require_once", "return", "static", "switch",
    "throw", "trait", "try", "unset", "use", "var", "while", "xor", "yield",
    // Reserved class names
    "bool", "false", "float", "int", "iterable", "mixed", "never", "null", "object", "parent",
    "self", "string", "true", "void",
];

/// Check if a name is a PHP reserved word
pub(crate) fn is_php_keyword(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    PHP_KEYWORDS.contains(&lower.as_str())
}

/// Find the span of the `nth` occurrence of `key = "value"` in the TOML source.
pub(crate) fn find_value_span(src: &str, key: &str, value: &str, nth: usize) -> Option<SourceSpan> {
    for quote in ['"', '\''] {
        let pattern = format!("{} = {}{}{}", key, quote, value, quote);
        if let Some((pos, _)) = src.match_indices(&pattern).nth(nth) {
            let start = pos + key.len() + 4;
            return Some(SourceSpan::from((start, value.len())));
        }
    }

    // No fallback - better to have no span than point to wrong location
    None
}

/// Validate that a name is a valid PHP identifier
/// Returns None if valid, Some(reason) if invalid
pub(crate) fn validate_identifier(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        Some(_) => return Some("name must start with a letter or underscore"),
        None => return Some("name cannot be empty"),
    }

    if chars.any(|c| !(c.is_ascii_alphanumeric() || c == '_')) {
        return Some("name must contain only letters, numbers, and underscores");
    }

    None
}
