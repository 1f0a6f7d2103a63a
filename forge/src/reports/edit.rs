//! Edit command report data structures.

use modforge_codegen_laravel::EditMode;

use super::output::{Output, Report};

/// Report data from an add-field or add-relation run.
#[derive(Debug)]
pub struct EditReport {
    /// One-line description of the edit.
    pub action: String,
    pub mode: EditMode,
    /// Files written, relative to the module directory.
    pub written: Vec<String>,
    /// Skipped patch regions and forge.toml problems.
    pub warnings: Vec<String>,
    /// Whether forge.toml now carries the edit.
    pub config_updated: bool,
}

impl Report for EditReport {
    fn render(&self, out: &mut dyn Output) {
        for warning in &self.warnings {
            out.warning(warning);
        }

        out.preformatted(&self.action);
        out.key_value(
            "Mode",
            match self.mode {
                EditMode::Snapshot => "re-rendered from schema snapshot",
                EditMode::Patch => "patched in place",
            },
        );

        if !self.written.is_empty() {
            out.newline();
            out.section("Files written");
            for file in &self.written {
                out.added_item(file);
            }
        }

        if self.config_updated {
            out.newline();
            out.preformatted("forge.toml updated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::BufferOutput;

    #[test]
    fn test_render_patched_edit() {
        let report = EditReport {
            action: "Added weight to products".into(),
            mode: EditMode::Patch,
            written: vec!["app/Models/Product.php".into()],
            warnings: vec!["app/Filament/Resources/ProductResource.php does not exist; skipped".into()],
            config_updated: false,
        };
        insta::assert_snapshot!(BufferOutput::render(&report).trim_end(), @r"
        warning: app/Filament/Resources/ProductResource.php does not exist; skipped
        Added weight to products
        Mode: patched in place

        Files written:
          + app/Models/Product.php
        ");
    }
}
