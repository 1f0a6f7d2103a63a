//! Code builder utility for generating properly indented code.

use super::{CodeFragment, Indent, Renderable};

/// Fluent API for building code with proper indentation.
///
/// Supports both consuming methods (returning `Self`) for chaining and
/// mutable methods (returning `&mut Self`) for loops over schema items.
///
/// # Example (Consuming API)
///
/// ```
/// use modforge_codegen::builder::CodeBuilder;
///
/// let code = CodeBuilder::php()
///     .line("public function up(): void")
///     .line("{")
///     .indent()
///     .line("Schema::create('tags', function (Blueprint $table) {});")
///     .dedent()
///     .line("}")
///     .build();
///
/// assert_eq!(
///     code,
///     "public function up(): void\n{\n    Schema::create('tags', function (Blueprint $table) {});\n}\n"
/// );
/// ```
///
/// # Example (Mutable API)
///
/// ```
/// use modforge_codegen::builder::CodeBuilder;
///
/// let mut builder = CodeBuilder::php();
/// builder
///     .push_line("protected $fillable = [")
///     .push_indent()
///     .push_line("'name',")
///     .push_dedent()
///     .push_line("];");
/// assert_eq!(builder.build(), "protected $fillable = [\n    'name',\n];\n");
/// ```
#[derive(Debug, Clone)]
pub struct CodeBuilder {
    indent_level: usize,
    indent: Indent,
    buffer: String,
}

impl CodeBuilder {
    /// Create a new CodeBuilder with the specified indentation.
    pub fn new(indent: Indent) -> Self {
        Self {
            indent_level: 0,
            indent,
            buffer: String::new(),
        }
    }

    /// Create a new CodeBuilder with 4-space indentation (PHP default).
    pub fn php() -> Self {
        Self::new(Indent::PHP)
    }

    // =========================================================================
    // Mutable API - methods prefixed with `push_`
    // =========================================================================

    /// Add a line of code with current indentation (mutable).
    pub fn push_line(&mut self, s: &str) -> &mut Self {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self
    }

    /// Add a blank line (mutable).
    pub fn push_blank(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }

    /// Add raw text without indentation or newline (mutable).
    pub fn push_raw(&mut self, s: &str) -> &mut Self {
        self.buffer.push_str(s);
        self
    }

    /// Increase indentation level (mutable).
    pub fn push_indent(&mut self) -> &mut Self {
        self.indent_level += 1;
        self
    }

    /// Decrease indentation level (mutable).
    pub fn push_dedent(&mut self) -> &mut Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self
    }

    /// Add a PHP docblock (mutable).
    ///
    /// A single entry renders as `/** text */`.
    pub fn push_doc_block<S: AsRef<str>>(&mut self, lines: &[S]) -> &mut Self {
        match lines {
            [] => self,
            [only] => self.push_line(&format!("/** {} */", only.as_ref())),
            lines => {
                self.push_line("/**");
                for line in lines {
                    let line = line.as_ref();
                    if line.is_empty() {
                        self.push_line(" *");
                    } else {
                        self.push_line(&format!(" * {}", line));
                    }
                }
                self.push_line(" */")
            }
        }
    }

    /// Emit a Renderable node (mutable).
    pub fn emit(&mut self, node: &impl Renderable) -> &mut Self {
        for fragment in node.to_fragments() {
            self.apply_fragment(fragment);
        }
        self
    }

    /// Apply a single code fragment.
    pub fn apply_fragment(&mut self, fragment: CodeFragment) {
        match fragment {
            CodeFragment::Line(s) => {
                self.push_line(&s);
            }
            CodeFragment::Blank => {
                self.push_blank();
            }
            CodeFragment::Block {
                header,
                body,
                close,
            } => {
                self.push_line(&header);
                self.push_indent();
                for f in body {
                    self.apply_fragment(f);
                }
                self.push_dedent();
                if let Some(c) = close {
                    self.push_line(&c);
                }
            }
            CodeFragment::Indent(fragments) => {
                self.push_indent();
                for f in fragments {
                    self.apply_fragment(f);
                }
                self.push_dedent();
            }
            CodeFragment::Sequence(fragments) => {
                for f in fragments {
                    self.apply_fragment(f);
                }
            }
            CodeFragment::DocBlock(lines) => {
                self.push_doc_block(&lines);
            }
        }
    }

    // =========================================================================
    // Consuming API
    // =========================================================================

    /// Add a line of code with current indentation.
    pub fn line(mut self, s: &str) -> Self {
        self.push_line(s);
        self
    }

    /// Add a blank line (no indentation).
    pub fn blank(mut self) -> Self {
        self.push_blank();
        self
    }

    /// Add raw text without indentation or newline.
    pub fn raw(mut self, s: &str) -> Self {
        self.push_raw(s);
        self
    }

    /// Increase indentation level.
    pub fn indent(mut self) -> Self {
        self.push_indent();
        self
    }

    /// Decrease indentation level.
    pub fn dedent(mut self) -> Self {
        self.push_dedent();
        self
    }

    /// Add a block with automatic indentation.
    pub fn block<F>(self, header: &str, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        let builder = self.line(header).indent();
        f(builder).dedent()
    }

    /// Add a block with a closing line.
    ///
    /// # Example
    ///
    /// ```
    /// use modforge_codegen::builder::CodeBuilder;
    ///
    /// let code = CodeBuilder::php()
    ///     .block_with_close("return [", "];", |b: CodeBuilder| b.line("'name',"))
    ///     .build();
    /// assert_eq!(code, "return [\n    'name',\n];\n");
    /// ```
    pub fn block_with_close<F>(self, header: &str, close: &str, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        let builder = self.line(header).indent();
        f(builder).dedent().line(close)
    }

    /// Add a PSR-12 brace block: header line, `{` on its own line, body, `}`.
    ///
    /// Used for classes and methods.
    pub fn brace_block<F>(self, header: &str, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.line(header).block_with_close("{", "}", f)
    }

    /// Add a PHP docblock.
    pub fn doc_block<S: AsRef<str>>(mut self, lines: &[S]) -> Self {
        self.push_doc_block(lines);
        self
    }

    /// Emit a Renderable node.
    pub fn render(mut self, node: &impl Renderable) -> Self {
        self.emit(node);
        self
    }

    /// Conditionally add content.
    pub fn when<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition { f(self) } else { self }
    }

    /// Iterate and add content for each item.
    pub fn each<T, I, F>(mut self, items: I, f: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(Self, T) -> Self,
    {
        for item in items {
            self = f(self, item);
        }
        self
    }

    /// Consume the builder and return the generated code.
    pub fn build(self) -> String {
        self.buffer
    }

    /// Get a reference to the current buffer content.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(self.indent.as_str());
        }
    }
}

impl Default for CodeBuilder {
    fn default() -> Self {
        Self::php()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_line() {
        let code = CodeBuilder::php().line("$table->id();").build();
        assert_eq!(code, "$table->id();\n");
    }

    #[test]
    fn test_brace_block() {
        let code = CodeBuilder::php()
            .brace_block("class Tag extends Model", |b| b.line("use HasFactory;"))
            .build();

        assert_eq!(code, "class Tag extends Model\n{\n    use HasFactory;\n}\n");
    }

    #[test]
    fn test_doc_block() {
        let single = CodeBuilder::php().doc_block(&["Run the migrations."]).build();
        assert_eq!(single, "/** Run the migrations. */\n");

        let multi = CodeBuilder::php()
            .indent()
            .doc_block(&["The attributes that are mass assignable.", "", "@var array"])
            .build();
        assert_eq!(
            multi,
            "    /**\n     * The attributes that are mass assignable.\n     *\n     * @var array\n     */\n"
        );
    }

    #[test]
    fn test_blank_line_has_no_indent() {
        let code = CodeBuilder::php()
            .indent()
            .line("$a = 1;")
            .blank()
            .line("$b = 2;")
            .build();

        assert_eq!(code, "    $a = 1;\n\n    $b = 2;\n");
    }

    #[test]
    fn test_conditional() {
        let with_trait = CodeBuilder::php()
            .when(true, |b| b.line("use SoftDeletes;"))
            .build();
        let without_trait = CodeBuilder::php()
            .when(false, |b| b.line("use SoftDeletes;"))
            .build();

        assert_eq!(with_trait, "use SoftDeletes;\n");
        assert_eq!(without_trait, "");
    }

    #[test]
    fn test_emit_block_fragment() {
        let mut builder = CodeBuilder::php();
        builder.emit(&CodeFragment::block(
            "return [",
            vec![CodeFragment::line("'name' => 'string',")],
            Some("];".into()),
        ));
        assert_eq!(builder.build(), "return [\n    'name' => 'string',\n];\n");
    }

    #[test]
    fn test_dedent_saturates() {
        let code = CodeBuilder::php().dedent().line("x").build();
        assert_eq!(code, "x\n");
    }
}
