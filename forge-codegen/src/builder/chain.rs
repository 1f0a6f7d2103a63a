//! Method chains such as `TextInput::make('name')->required()->maxLength(255)`.

use super::{CodeFragment, Renderable};

/// A receiver expression followed by `->method(args)` calls.
///
/// Renders on one line with [`MethodChain::inline`] (migration columns) or
/// one call per line through [`Renderable`] (Filament components).
///
/// ```
/// use modforge_codegen::builder::MethodChain;
///
/// let column = MethodChain::new("$table->string('name', 255)")
///     .call("nullable")
///     .call_with("default", ["'draft'"]);
/// assert_eq!(column.inline(), "$table->string('name', 255)->nullable()->default('draft')");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodChain {
    head: String,
    calls: Vec<String>,
}

impl MethodChain {
    pub fn new(head: impl Into<String>) -> Self {
        Self {
            head: head.into(),
            calls: Vec::new(),
        }
    }

    /// `Class::make('arg')`
    pub fn make(class: &str, arg: &str) -> Self {
        Self::new(format!("{}::make({})", class, arg))
    }

    /// Append `->method()`.
    pub fn call(mut self, method: &str) -> Self {
        self.calls.push(format!("{}()", method));
        self
    }

    /// Append `->method(arg, ...)`.
    pub fn call_with<I, S>(mut self, method: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
        self.calls.push(format!("{}({})", method, args.join(", ")));
        self
    }

    /// Append `->method()` when `condition` holds.
    pub fn call_if(self, condition: bool, method: &str) -> Self {
        if condition { self.call(method) } else { self }
    }

    /// Apply `f` when `condition` holds.
    pub fn when<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition { f(self) } else { self }
    }

    pub fn head(&self) -> &str {
        &self.head
    }

    /// Rendered calls, without the leading `->`.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Single-line rendering.
    pub fn inline(&self) -> String {
        let mut out = self.head.clone();
        for call in &self.calls {
            out.push_str("->");
            out.push_str(call);
        }
        out
    }

    /// Multi-line rendering followed by `suffix` (`,` or `;`).
    pub fn terminated(&self, suffix: &str) -> CodeFragment {
        CodeFragment::sequence(self.to_fragments()).terminate(suffix)
    }
}

impl Renderable for MethodChain {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let mut fragments = vec![CodeFragment::line(self.head.clone())];
        if !self.calls.is_empty() {
            fragments.push(CodeFragment::indent(
                self.calls
                    .iter()
                    .map(|call| CodeFragment::line(format!("->{}", call)))
                    .collect(),
            ));
        }
        fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CodeBuilder;

    #[test]
    fn test_inline_without_calls() {
        assert_eq!(MethodChain::new("$table->id()").inline(), "$table->id()");
    }

    #[test]
    fn test_multiline_component() {
        let input = MethodChain::make("Forms\\Components\\TextInput", "'name'")
            .call("required")
            .call_with("maxLength", ["255"]);

        let code = CodeBuilder::php().render(&input.terminated(",")).build();
        insta::assert_snapshot!(code, @r"
        Forms\Components\TextInput::make('name')
            ->required()
            ->maxLength(255),
        ");
    }

    #[test]
    fn test_call_if() {
        let chain = MethodChain::new("$x")
            .call_if(false, "nullable")
            .call_if(true, "unique");
        assert_eq!(chain.inline(), "$x->unique()");
    }

    #[test]
    fn test_terminated_single_line() {
        let code = CodeBuilder::php()
            .render(&MethodChain::new("$table->timestamps()").terminated(";"))
            .build();
        assert_eq!(code, "$table->timestamps();\n");
    }
}
