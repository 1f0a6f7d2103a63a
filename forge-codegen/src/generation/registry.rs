//! File registration pattern for declarative code generation.
//!
//! Renderers register every artifact in memory first; nothing touches the
//! disk until the whole module has rendered, so a renderer error leaves the
//! target directory untouched.
//!
//! # Example
//!
//! ```ignore
//! let mut registry = FileRegistry::new();
//!
//! registry.register(FileEntry::new(
//!     "module.json",
//!     module_json.render(),
//!     FileCategory::Structure,
//! ));
//! registry.register(FileEntry::from_generated(
//!     "database/migrations/2024_01_01_000000_create_tags_table.php",
//!     &migration,
//!     FileCategory::Migration,
//! ));
//!
//! registry.write_all(&module_dir)?;
//! ```

use std::path::{Path, PathBuf};

use eyre::Result;
use modforge_core::{File, FileRules, GeneratedFile, Overwrite, WriteResult};

/// Category of generated file, determining write order.
///
/// Variants are declared in dependency order: structure, migrations,
/// models, admin resources, API, seed data, permissions, registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileCategory {
    /// module.json, service provider.
    Structure,
    /// Schema creation and alteration migrations.
    Migration,
    /// Eloquent models.
    Model,
    /// Filament resources and their pages.
    AdminResource,
    /// API controllers and route files.
    Api,
    /// Factories and seeders.
    SeedData,
    /// Permission seeder.
    Permission,
    /// The `.modforge/schema.json` snapshot, written last.
    Registration,
}

impl FileCategory {
    /// Get the default overwrite behavior for this category.
    pub fn default_overwrite(&self) -> Overwrite {
        Overwrite::Always
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Structure => "structure",
            FileCategory::Migration => "migration",
            FileCategory::Model => "model",
            FileCategory::AdminResource => "admin",
            FileCategory::Api => "api",
            FileCategory::SeedData => "seed",
            FileCategory::Permission => "permission",
            FileCategory::Registration => "registration",
        }
    }
}

/// An entry in the file registry representing a file to be generated.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Relative path from the module directory.
    pub path: String,
    pub content: String,
    pub category: FileCategory,
    /// Override default overwrite behavior.
    pub overwrite: Option<Overwrite>,
}

impl FileEntry {
    /// Create a new file entry with the given category.
    pub fn new(
        path: impl Into<String>,
        content: impl Into<String>,
        category: FileCategory,
    ) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            category,
            overwrite: None,
        }
    }

    pub fn registration(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(path, content, FileCategory::Registration)
    }

    /// Create from a GeneratedFile, respecting its rules.
    pub fn from_generated<F: GeneratedFile>(
        path: impl Into<String>,
        file: &F,
        category: FileCategory,
    ) -> Self {
        Self::new(path, file.render(), category).with_overwrite(file.rules().overwrite)
    }

    /// Override the default overwrite behavior.
    pub fn with_overwrite(mut self, overwrite: Overwrite) -> Self {
        self.overwrite = Some(overwrite);
        self
    }

    /// Get the effective overwrite behavior.
    pub fn overwrite(&self) -> Overwrite {
        self.overwrite
            .unwrap_or_else(|| self.category.default_overwrite())
    }

    /// Get the file rules for this entry.
    pub fn rules(&self) -> FileRules {
        FileRules {
            overwrite: self.overwrite(),
        }
    }

    /// Get the full path for this entry.
    pub fn full_path(&self, base: &Path) -> PathBuf {
        base.join(&self.path)
    }

    /// Write this file to disk.
    pub fn write(&self, base: &Path) -> Result<WriteResult> {
        File::new(self.full_path(base), self.content.as_str())
            .with_rules(self.rules())
            .write()
    }
}

/// Registry for collecting and managing generated files.
///
/// Registering a path twice replaces the earlier entry. Entries come out
/// in category order and, within a category, in registration order.
#[derive(Debug, Default)]
pub struct FileRegistry {
    entries: Vec<FileEntry>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file entry.
    pub fn register(&mut self, entry: FileEntry) {
        match self.entries.iter_mut().find(|e| e.path == entry.path) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Get all registered entries, sorted by category.
    pub fn entries(&self) -> impl Iterator<Item = &FileEntry> {
        let mut sorted: Vec<_> = self.entries.iter().collect();
        sorted.sort_by_key(|e| e.category);
        sorted.into_iter()
    }

    pub fn get(&self, path: &str) -> Option<&FileEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Preview all files (returns path and content pairs).
    pub fn preview(&self) -> Vec<PreviewEntry> {
        self.entries()
            .map(|e| PreviewEntry {
                path: e.path.clone(),
                content: e.content.clone(),
                category: e.category,
            })
            .collect()
    }

    /// Write all files to the output directory.
    ///
    /// Files are written in category order. A failing write stops the run
    /// and leaves already written files in place.
    pub fn write_all(&self, base: &Path) -> Result<WriteStats> {
        let mut stats = WriteStats::default();

        for entry in self.entries() {
            match entry.write(base)? {
                WriteResult::Written => {
                    tracing::debug!(path = %entry.path, category = entry.category.as_str(), "wrote file");
                    stats.written += 1;
                    stats.written_paths.push(entry.path.clone());
                }
                WriteResult::Skipped => {
                    tracing::debug!(path = %entry.path, "skipped unchanged file");
                    stats.skipped += 1;
                    stats.skipped_paths.push(entry.path.clone());
                }
            }
        }

        Ok(stats)
    }
}

/// A preview entry for displaying what would be generated.
#[derive(Debug, Clone)]
pub struct PreviewEntry {
    pub path: String,
    pub content: String,
    pub category: FileCategory,
}

/// Statistics from a write operation.
#[derive(Debug, Default)]
pub struct WriteStats {
    /// Number of files written.
    pub written: usize,
    /// Number of files skipped (already existed or unchanged).
    pub skipped: usize,
    pub written_paths: Vec<String>,
    pub skipped_paths: Vec<String>,
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_registry_ordering() {
        let mut registry = FileRegistry::new();

        registry.register(FileEntry::new("database/seeders/TagSeeder.php", "", FileCategory::SeedData));
        registry.register(FileEntry::new("app/Models/Tag.php", "", FileCategory::Model));
        registry.register(FileEntry::new("module.json", "", FileCategory::Structure));
        registry.register(FileEntry::new("database/migrations/x.php", "", FileCategory::Migration));
        registry.register(FileEntry::registration(".modforge/schema.json", ""));

        let paths: Vec<_> = registry.entries().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "module.json",
                "database/migrations/x.php",
                "app/Models/Tag.php",
                "database/seeders/TagSeeder.php",
                ".modforge/schema.json",
            ]
        );
    }

    #[test]
    fn test_register_replaces_same_path() {
        let mut registry = FileRegistry::new();
        registry.register(FileEntry::new("app/Models/Tag.php", "old", FileCategory::Model));
        registry.register(FileEntry::new("app/Models/Tag.php", "new", FileCategory::Model));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("app/Models/Tag.php").unwrap().content, "new");
    }

    #[test]
    fn test_registry_write_all() {
        let temp = TempDir::new().unwrap();
        let mut registry = FileRegistry::new();

        registry.register(FileEntry::new("module.json", "{}", FileCategory::Structure));
        registry.register(FileEntry::new("app/Models/Tag.php", "<?php", FileCategory::Model));

        let stats = registry.write_all(temp.path()).unwrap();

        assert_eq!(stats.written, 2);
        assert_eq!(stats.skipped, 0);
        assert!(temp.path().join("app/Models/Tag.php").exists());
    }

    #[test]
    fn test_if_missing_preserves_existing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("routes/web.php");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "user routes").unwrap();

        let mut registry = FileRegistry::new();
        registry.register(
            FileEntry::new("routes/web.php", "generated", FileCategory::Api)
                .with_overwrite(Overwrite::IfMissing),
        );

        let stats = registry.write_all(temp.path()).unwrap();

        assert_eq!(stats.skipped, 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "user routes");
    }

    #[test]
    fn test_preview_does_not_touch_disk() {
        let mut registry = FileRegistry::new();
        registry.register(FileEntry::new("routes/api.php", "a", FileCategory::Api));
        registry.register(FileEntry::new("module.json", "b", FileCategory::Structure));

        let preview = registry.preview();

        assert_eq!(preview.len(), 2);
        assert_eq!(preview[0].path, "module.json");
        assert_eq!(preview[1].category, FileCategory::Api);
    }
}
