use std::path::{Path, PathBuf};

use super::Manifest;
use crate::{Error, Result};

/// Represents a forge.toml file with both raw content and parsed manifest.
#[derive(Debug)]
pub struct ForgeToml {
    path: PathBuf,
    content: String,
    manifest: Manifest,
}

impl ForgeToml {
    /// Open and parse a forge.toml file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Box::new(Error::Io {
                path: path.clone(),
                source: e,
            })
        })?;
        let filename = path.display().to_string();
        let manifest = Manifest::from_str_with_filename(&content, &filename)?;

        Ok(Self {
            path,
            content,
            manifest,
        })
    }

    /// Create a forge.toml from a manifest that has not been written yet.
    pub fn create(path: impl AsRef<Path>, manifest: Manifest) -> Result<Self> {
        let content = manifest.to_toml_string()?;
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            content,
            manifest,
        })
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the raw content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the parsed manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Update content and re-parse the manifest.
    pub fn set_content(&mut self, content: String) -> Result<()> {
        let filename = self.path.display().to_string();
        let manifest = Manifest::from_str_with_filename(&content, &filename)?;
        self.content = content;
        self.manifest = manifest;
        Ok(())
    }

    /// Save the current content to disk.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                Box::new(Error::Write {
                    path: parent.to_path_buf(),
                    source: e,
                })
            })?;
        }
        std::fs::write(&self.path, &self.content).map_err(|e| {
            Box::new(Error::Write {
                path: self.path.clone(),
                source: e,
            })
        })?;
        Ok(())
    }
}
