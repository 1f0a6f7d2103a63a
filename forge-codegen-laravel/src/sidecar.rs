//! The `.modforge/schema.json` snapshot stored beside a generated module.
//!
//! Edit flows re-render from this snapshot instead of patching generated
//! source, using the model names of the last generation. Generation itself
//! re-derives names from the manifest and reuses the recorded migration
//! timestamps, so a re-run rewrites the same migration files.

use std::{
    collections::BTreeMap,
    path::{Component, Path, PathBuf},
};

use chrono::NaiveDateTime;
use eyre::{Result, WrapErr};
use modforge_ir::ModuleIR;
use modforge_manifest::Manifest;
use serde::{Deserialize, Serialize};

/// Directory holding modforge state inside a module.
pub const STATE_DIR: &str = ".modforge";

/// Snapshot file name inside [`STATE_DIR`].
pub const SCHEMA_FILE: &str = "schema.json";

/// Snapshot format version.
pub const SIDECAR_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sidecar {
    pub version: u32,
    /// Tool version that rendered the module.
    pub generator: String,
    pub generated_at: NaiveDateTime,
    pub manifest: Manifest,
    #[serde(default)]
    pub migrations: MigrationLedger,
    /// Generator-owned files of the module, relative to its directory.
    #[serde(default)]
    pub files: Vec<String>,
}

/// Migration files already handed to the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationLedger {
    /// Create migration timestamp by table name.
    #[serde(default)]
    pub tables: BTreeMap<String, String>,
    /// Create migration timestamp by pivot name.
    #[serde(default)]
    pub pivots: BTreeMap<String, String>,
    /// Column additions written by edit flows.
    #[serde(default)]
    pub alterations: Vec<Alteration>,
}

/// One `add_<fields>_to_<table>_table` migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alteration {
    pub table: String,
    pub fields: Vec<String>,
    pub timestamp: String,
}

impl Sidecar {
    /// Snapshot of `manifest` with model and display names frozen from the
    /// lowered module.
    pub fn new(manifest: &Manifest, module: &ModuleIR, generated_at: NaiveDateTime) -> Self {
        let mut manifest = manifest.clone();
        for table in &mut manifest.tables {
            if let Some(lowered) = module.tables.iter().find(|t| t.name == table.name) {
                table.model = Some(lowered.names.model.clone());
                table.display = Some(lowered.display.clone());
            }
        }
        Self {
            version: SIDECAR_VERSION,
            generator: env!("CARGO_PKG_VERSION").to_string(),
            generated_at,
            manifest,
            migrations: MigrationLedger::default(),
            files: Vec::new(),
        }
    }

    pub fn with_migrations(mut self, migrations: MigrationLedger) -> Self {
        self.migrations = migrations;
        self
    }

    pub fn with_files(mut self, files: impl IntoIterator<Item = String>) -> Self {
        self.files = files.into_iter().collect();
        self.files.sort();
        self.files.dedup();
        self
    }

    /// Recorded files that `current` no longer produces.
    ///
    /// Only plain relative paths qualify, so a hand-edited snapshot cannot
    /// point outside the module.
    pub fn stale_files<'a>(&'a self, current: &'a [String]) -> impl Iterator<Item = &'a str> {
        self.files
            .iter()
            .filter(move |path| !current.contains(path))
            .filter(|path| {
                Path::new(path.as_str())
                    .components()
                    .all(|c| matches!(c, Component::Normal(_)))
            })
            .map(String::as_str)
    }

    /// `<module>/.modforge/schema.json`
    pub fn path(module_dir: &Path) -> PathBuf {
        module_dir.join(STATE_DIR).join(SCHEMA_FILE)
    }

    /// Path relative to the module directory, as registered for writing.
    pub fn relative_path() -> String {
        format!("{}/{}", STATE_DIR, SCHEMA_FILE)
    }

    /// Load the snapshot of a module, `None` when the module has none.
    pub fn load(module_dir: &Path) -> Result<Option<Self>> {
        let path = Self::path(module_dir);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        let sidecar: Sidecar = serde_json::from_str(&content)
            .wrap_err_with(|| format!("failed to parse {}", path.display()))?;
        if sidecar.version != SIDECAR_VERSION {
            eyre::bail!(
                "{} has snapshot version {}, expected {}",
                path.display(),
                sidecar.version,
                SIDECAR_VERSION
            );
        }
        Ok(Some(sidecar))
    }

    pub fn to_json(&self) -> Result<String> {
        let mut json =
            serde_json::to_string_pretty(self).wrap_err("failed to serialize schema snapshot")?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use modforge_codegen::pipeline::Pipeline;
    use tempfile::TempDir;

    use super::*;

    const SHOP: &str = r#"
[module]
name = "Shop"

[[tables]]
name = "categories"

[[tables.fields]]
name = "title"
type = "string"
"#;

    fn snapshot() -> Sidecar {
        let manifest: Manifest = SHOP.parse().unwrap();
        let mut ctx = Pipeline::new().run(manifest.clone()).unwrap();
        let module = ctx.take_ir().unwrap();
        let at = NaiveDateTime::parse_from_str("2024_01_15_093000", "%Y_%m_%d_%H%M%S").unwrap();
        Sidecar::new(&manifest, &module, at)
    }

    #[test]
    fn test_derived_names_are_frozen() {
        let sidecar = snapshot();
        let table = &sidecar.manifest.tables[0];
        assert_eq!(table.model.as_deref(), Some("Category"));
        assert_eq!(table.display.as_deref(), Some("title"));
    }

    #[test]
    fn test_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let sidecar = snapshot();
        let path = Sidecar::path(dir.path());
        modforge_core::write_file(&path, &sidecar.to_json().unwrap()).unwrap();

        assert_eq!(Sidecar::load(dir.path()).unwrap(), Some(sidecar));
    }

    #[test]
    fn test_snapshot_without_ledger_still_loads() {
        let dir = TempDir::new().unwrap();
        let mut json: serde_json::Value =
            serde_json::from_str(&snapshot().to_json().unwrap()).unwrap();
        let object = json.as_object_mut().unwrap();
        object.remove("migrations");
        object.remove("files");
        modforge_core::write_file(&Sidecar::path(dir.path()), &json.to_string()).unwrap();

        let loaded = Sidecar::load(dir.path()).unwrap().unwrap();
        assert_eq!(loaded.migrations, MigrationLedger::default());
        assert!(loaded.files.is_empty());
    }

    #[test]
    fn test_stale_files_stay_inside_the_module() {
        let sidecar = snapshot().with_files([
            "app/Models/Product.php".to_string(),
            "app/Models/Item.php".to_string(),
            "../outside.php".to_string(),
            "/etc/passwd".to_string(),
        ]);
        let current = vec!["app/Models/Item.php".to_string()];

        let stale: Vec<&str> = sidecar.stale_files(&current).collect();
        assert_eq!(stale, vec!["app/Models/Product.php"]);
    }

    #[test]
    fn test_missing_snapshot() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Sidecar::load(dir.path()).unwrap(), None);
    }
}
