//! Enable/disable command report data structures.

use modforge_host::{Change, InstallReport};

use super::output::{Output, Report};

#[derive(Debug)]
pub struct StatusReport {
    pub module: String,
    pub enabled: bool,
    pub install: InstallReport,
}

impl Report for StatusReport {
    fn render(&self, out: &mut dyn Output) {
        for warning in &self.install.warnings {
            out.warning(warning);
        }

        let state = if self.enabled { "enabled" } else { "disabled" };
        let unchanged = self
            .install
            .changes
            .iter()
            .all(|c| c.change == Change::Unchanged);
        if unchanged {
            out.preformatted(&format!("Module {} is already {}", self.module, state));
        } else {
            out.preformatted(&format!("Module {} {}", self.module, state));
        }
    }
}
