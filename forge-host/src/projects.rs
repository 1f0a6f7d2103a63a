//! Persisted generation lifecycle of every project under a host root.
//!
//! ```text
//! draft ──▶ building ──▶ built
//!              ▲  └────▶ error
//!              └── built | error (re-run)
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use eyre::{Result, WrapErr};
use modforge_codegen_laravel::{GenerationReport, STATE_DIR};
use serde::{Deserialize, Serialize};

const PROJECTS_FILE: &str = "projects.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Draft,
    Building,
    Built,
    Error,
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::Building => "building",
            ProjectStatus::Built => "built",
            ProjectStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// One project's last known state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub name: String,
    pub status: ProjectStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub files: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProjectsDoc {
    projects: Vec<ProjectRecord>,
}

/// `.modforge/projects.json` under the host root.
#[derive(Debug)]
pub struct ProjectStore {
    path: PathBuf,
    doc: ProjectsDoc,
}

impl ProjectStore {
    pub fn path(root: &Path) -> PathBuf {
        root.join(STATE_DIR).join(PROJECTS_FILE)
    }

    /// Load the store, empty when the file does not exist yet.
    pub fn open(root: &Path) -> Result<Self> {
        let path = Self::path(root);
        let doc = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)
                .wrap_err_with(|| format!("failed to parse {}", path.display()))?
        } else {
            ProjectsDoc::default()
        };
        Ok(Self { path, doc })
    }

    pub fn get(&self, name: &str) -> Option<&ProjectRecord> {
        self.doc.projects.iter().find(|p| p.name == name)
    }

    pub fn projects(&self) -> &[ProjectRecord] {
        &self.doc.projects
    }

    fn record_mut(&mut self, name: &str) -> &mut ProjectRecord {
        let index = match self.doc.projects.iter().position(|p| p.name == name) {
            Some(index) => index,
            None => {
                self.doc.projects.push(ProjectRecord {
                    name: name.to_string(),
                    status: ProjectStatus::Draft,
                    message: String::new(),
                    files: Vec::new(),
                    updated_at: Utc::now(),
                });
                self.doc.projects.len() - 1
            }
        };
        &mut self.doc.projects[index]
    }

    /// Register a project in the draft state unless it is already known.
    pub fn draft(&mut self, name: &str) -> Result<&ProjectRecord> {
        self.record_mut(name);
        self.save()?;
        self.get(name)
            .ok_or_else(|| eyre::eyre!("project '{}' vanished from the store", name))
    }

    /// Transition to `building` at the start of a run.
    ///
    /// A project found in `building` is left over from a run that never
    /// finished; the new run takes it over.
    pub fn begin(&mut self, name: &str) -> Result<()> {
        let record = self.record_mut(name);
        if record.status == ProjectStatus::Building {
            tracing::warn!(project = name, "previous generation never finished");
        }
        record.status = ProjectStatus::Building;
        record.message.clear();
        record.updated_at = Utc::now();
        self.save()
    }

    /// Settle a run into `built` or `error` from its report.
    pub fn finish(&mut self, name: &str, report: &GenerationReport) -> Result<()> {
        let record = self.record_mut(name);
        record.status = if report.success {
            ProjectStatus::Built
        } else {
            ProjectStatus::Error
        };
        record.message = report.message.clone();
        record.files = report.files.clone();
        record.updated_at = Utc::now();
        tracing::debug!(project = name, status = %record.status, "project settled");
        self.save()
    }

    pub fn save(&self) -> Result<()> {
        let mut json = serde_json::to_string_pretty(&self.doc)?;
        json.push('\n');
        modforge_core::write_file(&self.path, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProjectStore::open(dir.path()).unwrap();
        assert_eq!(store.draft("Shop").unwrap().status, ProjectStatus::Draft);

        store.begin("Shop").unwrap();
        assert_eq!(store.get("Shop").unwrap().status, ProjectStatus::Building);

        let report = GenerationReport::failed("boom", vec!["module.json".into()]);
        store.finish("Shop", &report).unwrap();

        let reopened = ProjectStore::open(dir.path()).unwrap();
        let record = reopened.get("Shop").unwrap();
        assert_eq!(record.status, ProjectStatus::Error);
        assert_eq!(record.message, "boom");
        assert_eq!(record.files, vec!["module.json"]);
    }

    #[test]
    fn test_error_state_is_re_enterable() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProjectStore::open(dir.path()).unwrap();
        store.begin("Shop").unwrap();
        store
            .finish("Shop", &GenerationReport::failed("boom", vec![]))
            .unwrap();
        store.begin("Shop").unwrap();
        let record = store.get("Shop").unwrap();
        assert_eq!(record.status, ProjectStatus::Building);
        assert!(record.message.is_empty());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ProjectStatus::Built).unwrap(), "\"built\"");
    }
}
