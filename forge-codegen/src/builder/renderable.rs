//! Renderable trait and CodeFragment for decoupled code generation.
//!
//! Fragments let a renderer compose pieces of a file (a form component, a
//! migration column) without holding the [`CodeBuilder`](super::CodeBuilder)
//! that eventually writes them.

/// Represents a fragment of generated code.
#[derive(Debug, Clone, PartialEq)]
pub enum CodeFragment {
    /// A single line of code (will have newline appended).
    Line(String),
    /// A blank line.
    Blank,
    /// A block with header, body fragments, and optional closing line.
    Block {
        header: String,
        body: Vec<CodeFragment>,
        close: Option<String>,
    },
    /// Indent the contained fragments.
    Indent(Vec<CodeFragment>),
    /// A sequence of fragments.
    Sequence(Vec<CodeFragment>),
    /// A PHP docblock, one fragment line per entry.
    DocBlock(Vec<String>),
}

impl CodeFragment {
    pub fn line(s: impl Into<String>) -> Self {
        Self::Line(s.into())
    }

    pub fn block(
        header: impl Into<String>,
        body: Vec<CodeFragment>,
        close: Option<String>,
    ) -> Self {
        Self::Block {
            header: header.into(),
            body,
            close,
        }
    }

    pub fn indent(fragments: Vec<CodeFragment>) -> Self {
        Self::Indent(fragments)
    }

    pub fn sequence(fragments: Vec<CodeFragment>) -> Self {
        Self::Sequence(fragments)
    }

    /// Append `suffix` to the last line of this fragment.
    ///
    /// Used to terminate a multi-line expression with `,` or `;`.
    pub fn terminate(mut self, suffix: &str) -> Self {
        self.push_suffix(suffix);
        self
    }

    fn push_suffix(&mut self, suffix: &str) -> bool {
        match self {
            CodeFragment::Line(s) => {
                s.push_str(suffix);
                true
            }
            CodeFragment::Blank | CodeFragment::DocBlock(_) => false,
            CodeFragment::Block { header, body, close } => match close {
                Some(c) => {
                    c.push_str(suffix);
                    true
                }
                None => {
                    if !push_suffix_last(body, suffix) {
                        header.push_str(suffix);
                    }
                    true
                }
            },
            CodeFragment::Indent(fragments) | CodeFragment::Sequence(fragments) => {
                push_suffix_last(fragments, suffix)
            }
        }
    }
}

fn push_suffix_last(fragments: &mut [CodeFragment], suffix: &str) -> bool {
    fragments
        .iter_mut()
        .rev()
        .any(|fragment| fragment.push_suffix(suffix))
}

/// Trait for types that can be rendered as code fragments.
pub trait Renderable {
    fn to_fragments(&self) -> Vec<CodeFragment>;
}

impl Renderable for CodeFragment {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        vec![self.clone()]
    }
}

impl<T: Renderable> Renderable for [T] {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        self.iter().flat_map(Renderable::to_fragments).collect()
    }
}

impl<T: Renderable> Renderable for Vec<T> {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        self.as_slice().to_fragments()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminate_line() {
        let fragment = CodeFragment::line("$table->id()").terminate(";");
        assert_eq!(fragment, CodeFragment::line("$table->id();"));
    }

    #[test]
    fn test_terminate_indented_sequence() {
        let fragment = CodeFragment::sequence(vec![
            CodeFragment::line("TextInput::make('name')"),
            CodeFragment::indent(vec![
                CodeFragment::line("->required()"),
                CodeFragment::Blank,
            ]),
        ])
        .terminate(",");

        let CodeFragment::Sequence(parts) = fragment else {
            panic!("expected sequence");
        };
        assert_eq!(
            parts[1],
            CodeFragment::indent(vec![
                CodeFragment::line("->required(),"),
                CodeFragment::Blank,
            ])
        );
    }

    #[test]
    fn test_terminate_block_uses_close() {
        let fragment = CodeFragment::block("[", vec![CodeFragment::line("'a',")], Some("]".into()))
            .terminate(",");
        let CodeFragment::Block { close, .. } = fragment else {
            panic!("expected block");
        };
        assert_eq!(close.as_deref(), Some("],"));
    }
}
