//! Check command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from manifest validation.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the config file.
    pub config_path: PathBuf,
    pub module: String,
    pub tables: usize,
    pub relationships: usize,
    /// Error messages.
    pub errors: Vec<String>,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Info messages.
    pub infos: Vec<String>,
    /// Phases and lints, when requested.
    pub pipeline: Option<PipelineOverview>,
}

/// Names and descriptions of what validation runs.
#[derive(Debug, Default)]
pub struct PipelineOverview {
    pub phases: Vec<(&'static str, &'static str)>,
    pub lints: Vec<(&'static str, &'static str)>,
}

impl CheckReport {
    /// Whether the check passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for error in &self.errors {
            out.error(error);
        }

        for warning in &self.warnings {
            out.warning(warning);
        }

        for info in &self.infos {
            out.preformatted(&format!("info: {}", info));
        }

        if !self.warnings.is_empty() || !self.errors.is_empty() {
            out.newline();
        }

        if self.is_valid() {
            out.preformatted(&format!("✓ {} is valid", self.config_path.display()));
            out.preformatted(&format!(
                "  module {}: {}, {}",
                self.module,
                plural(self.tables, "table"),
                plural(self.relationships, "relationship")
            ));
        }

        if let Some(pipeline) = &self.pipeline {
            out.newline();
            out.section("Phases");
            for (i, (name, description)) in pipeline.phases.iter().enumerate() {
                out.numbered_item(i + 1, &format!("{} - {}", name, description));
            }
            out.newline();
            out.section("Lints");
            for (name, description) in &pipeline.lints {
                out.list_item(&format!("{} - {}", name, description));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::BufferOutput;

    #[test]
    fn test_explain_section() {
        let report = CheckReport {
            config_path: PathBuf::from("forge.toml"),
            module: "Shop".into(),
            tables: 1,
            relationships: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
            infos: Vec::new(),
            pipeline: Some(PipelineOverview {
                phases: vec![("validate", "runs lints")],
                lints: vec![("table_naming", "table names are plural snake_case")],
            }),
        };
        let text = BufferOutput::render(&report);
        assert!(text.contains("validate - runs lints"));
        assert!(text.contains("table_naming - table names are plural snake_case"));
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "table"), "1 table");
        assert_eq!(plural(0, "relationship"), "0 relationships");
    }
}
