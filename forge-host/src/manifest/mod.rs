//! Host-level files a module is registered in.
//!
//! Every file follows the same contract: read the current content, check
//! whether the entry is already there, insert it, and write the result back.
//! [`HostManifest::ensure`] is the only way the integration layer edits a
//! host file, so an entry is never added twice.

mod composer;
mod panel;
mod providers;
mod status;

use std::path::{Path, PathBuf};

use eyre::Result;

pub use composer::ComposerAutoload;
pub use panel::PanelDiscovery;
pub use providers::ProviderList;
pub use status::StatusRegistry;

use crate::HostError;

/// Whether `ensure` had to touch the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Updated,
    Unchanged,
}

/// A host file holding one entry for a module.
pub trait HostManifest {
    /// Path of the file relative to the host root.
    fn relative_path(&self) -> &'static str;

    /// The entry this manifest ensures, for logs and reports.
    fn entry(&self) -> String;

    fn path(&self, root: &Path) -> PathBuf {
        root.join(self.relative_path())
    }

    fn read(&self, root: &Path) -> Result<String> {
        let path = self.path(root);
        if !path.exists() {
            return Err(HostError::MissingFile { path }.into());
        }
        Ok(std::fs::read_to_string(&path)?)
    }

    /// Whether `content` already carries the entry.
    fn contains(&self, content: &str) -> Result<bool>;

    /// `content` with the entry added.
    fn insert(&self, content: &str) -> Result<String>;

    fn write(&self, root: &Path, content: &str) -> Result<()> {
        modforge_core::write_file(&self.path(root), content)
    }

    /// Add the entry unless it is already present.
    fn ensure(&self, root: &Path) -> Result<Change> {
        let content = self.read(root)?;
        if self.contains(&content)? {
            tracing::debug!(file = self.relative_path(), entry = %self.entry(), "already registered");
            return Ok(Change::Unchanged);
        }
        let updated = self.insert(&content)?;
        self.write(root, &updated)?;
        tracing::info!(file = self.relative_path(), entry = %self.entry(), "registered");
        Ok(Change::Updated)
    }
}
