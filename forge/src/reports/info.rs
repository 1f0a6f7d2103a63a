//! Info command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from module info.
#[derive(Debug)]
pub struct InfoReport {
    /// Module name.
    pub name: String,
    /// Root PHP namespace.
    pub namespace: String,
    pub description: String,
    pub version: String,
    /// Config file path.
    pub config_path: PathBuf,
    /// Names of the generated artifact families.
    pub features: Vec<String>,
    /// Schema statistics.
    pub stats: Stats,
    /// State recorded in the host application.
    pub host: HostInfo,
    /// Table tree display.
    pub tree: Option<String>,
}

/// Schema statistics.
#[derive(Debug, Default)]
pub struct Stats {
    pub tables: usize,
    pub fields: usize,
    /// Declared relationships.
    pub relationships: usize,
    /// belongsTo accessors inferred from foreign keys.
    pub inferred: usize,
    pub pivots: usize,
    pub permissions: usize,
}

/// Project state in the host application.
#[derive(Debug, Default)]
pub struct HostInfo {
    pub status: Option<String>,
    pub message: Option<String>,
    pub updated_at: Option<String>,
    /// Flag in the module status registry.
    pub enabled: Option<bool>,
}

impl Report for InfoReport {
    fn render(&self, out: &mut dyn Output) {
        out.newline();

        // Header
        out.preformatted(&format!("  {}", self.name));
        out.preformatted(&format!("  {}", "─".repeat(self.name.len())));
        if !self.description.is_empty() {
            out.preformatted(&format!("  {}", self.description));
        }
        out.newline();

        // Metadata
        out.preformatted(&format!("  Version     {}", self.version));
        out.preformatted(&format!("  Namespace   {}", self.namespace));
        out.preformatted(&format!("  Config      {}", self.config_path.display()));
        if !self.features.is_empty() {
            out.preformatted(&format!("  Generates   {}", self.features.join(", ")));
        }
        out.newline();

        // Statistics
        out.preformatted("  Statistics");
        out.preformatted("  ──────────");
        out.preformatted(&format!("  Tables      {}", self.stats.tables));
        out.preformatted(&format!("  Fields      {}", self.stats.fields));
        let inferred = if self.stats.inferred > 0 {
            format!(" ({} inferred)", self.stats.inferred)
        } else {
            String::new()
        };
        out.preformatted(&format!(
            "  Relations   {}{}",
            self.stats.relationships + self.stats.inferred,
            inferred
        ));
        out.preformatted(&format!("  Pivots      {}", self.stats.pivots));
        out.preformatted(&format!("  Permissions {}", self.stats.permissions));
        out.newline();

        // Host
        if let Some(status) = &self.host.status {
            out.preformatted("  Host");
            out.preformatted("  ────");
            out.preformatted(&format!("  Status      {}", status));
            if let Some(message) = self.host.message.as_ref().filter(|m| !m.is_empty()) {
                out.preformatted(&format!("              └─ {}", message));
            }
            if let Some(updated_at) = &self.host.updated_at {
                out.preformatted(&format!("  Updated     {}", updated_at));
            }
            if let Some(enabled) = self.host.enabled {
                out.preformatted(&format!(
                    "  Enabled     {}",
                    if enabled { "yes" } else { "no" }
                ));
            }
            out.newline();
        }

        // Table tree
        if let Some(tree) = &self.tree {
            out.preformatted("  Tables");
            out.preformatted("  ──────");
            for line in tree.lines() {
                out.preformatted(&format!("  {}", line));
            }
        }
    }
}
