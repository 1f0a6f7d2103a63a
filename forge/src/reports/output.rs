//! Output trait for rendering reports to different formats.

/// Target output for reports.
///
/// Reports describe *what* to output using these semantic methods.
/// Implementations decide *how* to render.
pub trait Output {
    /// Start a new section with a heading.
    fn section(&mut self, name: &str);

    /// Render a key-value pair.
    fn key_value(&mut self, key: &str, value: &str);

    /// Render a numbered list item.
    fn numbered_item(&mut self, index: usize, text: &str);

    /// Render a bullet list item.
    fn list_item(&mut self, text: &str);

    /// Render an added item (e.g., new file).
    fn added_item(&mut self, text: &str);

    /// Render a warning message.
    fn warning(&mut self, msg: &str);

    /// Render an error message.
    fn error(&mut self, msg: &str);

    /// Render a separator/divider with a label.
    fn divider(&mut self, label: &str);

    /// Render a block of preformatted text.
    fn preformatted(&mut self, text: &str);

    /// Render a blank line.
    fn newline(&mut self);
}

/// A report that can render itself to an output.
pub trait Report {
    /// Render this report to the given output.
    fn render(&self, out: &mut dyn Output);
}

/// Line formats shared by the terminal and buffered outputs.
mod format {
    pub fn section(name: &str) -> String {
        format!("{}:", name)
    }

    pub fn key_value(key: &str, value: &str) -> String {
        format!("{}: {}", key, value)
    }

    pub fn numbered_item(index: usize, text: &str) -> String {
        format!("  {}. {}", index, text)
    }

    pub fn list_item(text: &str) -> String {
        format!("  - {}", text)
    }

    pub fn added_item(text: &str) -> String {
        format!("  + {}", text)
    }

    pub fn warning(msg: &str) -> String {
        format!("warning: {}", msg)
    }

    pub fn error(msg: &str) -> String {
        format!("error: {}", msg)
    }

    pub fn divider(label: &str) -> String {
        format!("── {} ──", label)
    }
}

/// Terminal output implementation. Warnings go to stderr.
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Output for TerminalOutput {
    fn section(&mut self, name: &str) {
        println!("{}", format::section(name));
    }

    fn key_value(&mut self, key: &str, value: &str) {
        println!("{}", format::key_value(key, value));
    }

    fn numbered_item(&mut self, index: usize, text: &str) {
        println!("{}", format::numbered_item(index, text));
    }

    fn list_item(&mut self, text: &str) {
        println!("{}", format::list_item(text));
    }

    fn added_item(&mut self, text: &str) {
        println!("{}", format::added_item(text));
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("{}", format::warning(msg));
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", format::error(msg));
    }

    fn divider(&mut self, label: &str) {
        println!("{}", format::divider(label));
    }

    fn preformatted(&mut self, text: &str) {
        println!("{}", text);
    }

    fn newline(&mut self) {
        println!();
    }
}

/// Collects rendered lines, warnings included, into one string.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct BufferOutput(pub String);

#[cfg(test)]
impl BufferOutput {
    fn line(&mut self, line: String) {
        self.0.push_str(&line);
        self.0.push('\n');
    }

    pub(crate) fn render(report: &dyn Report) -> String {
        let mut out = Self::default();
        report.render(&mut out);
        out.0
    }
}

#[cfg(test)]
impl Output for BufferOutput {
    fn section(&mut self, name: &str) {
        self.line(format::section(name));
    }

    fn key_value(&mut self, key: &str, value: &str) {
        self.line(format::key_value(key, value));
    }

    fn numbered_item(&mut self, index: usize, text: &str) {
        self.line(format::numbered_item(index, text));
    }

    fn list_item(&mut self, text: &str) {
        self.line(format::list_item(text));
    }

    fn added_item(&mut self, text: &str) {
        self.line(format::added_item(text));
    }

    fn warning(&mut self, msg: &str) {
        self.line(format::warning(msg));
    }

    fn error(&mut self, msg: &str) {
        self.line(format::error(msg));
    }

    fn divider(&mut self, label: &str) {
        self.line(format::divider(label));
    }

    fn preformatted(&mut self, text: &str) {
        self.line(text.to_string());
    }

    fn newline(&mut self) {
        self.0.push('\n');
    }
}
