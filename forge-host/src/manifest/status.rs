use std::path::Path;

use eyre::Result;
use serde_json::{Map, Value};

use super::{HostManifest, composer::to_composer_json};
use crate::HostError;

/// `modules_statuses.json`: one boolean per module name.
///
/// A missing registry reads as empty and is created on first write.
#[derive(Debug, Clone)]
pub struct StatusRegistry {
    module: String,
    enabled: bool,
}

impl StatusRegistry {
    pub const FILE: &'static str = "modules_statuses.json";

    pub fn new(module: impl Into<String>, enabled: bool) -> Self {
        Self {
            module: module.into(),
            enabled,
        }
    }

    fn parse(content: &str) -> Result<Map<String, Value>> {
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(eyre::eyre!("{} must contain a JSON object", Self::FILE)),
            Err(source) => Err(HostError::InvalidJson {
                path: Self::FILE.into(),
                source,
            }
            .into()),
        }
    }

    /// Status of every module in the registry at `root`.
    pub fn load(root: &Path) -> Result<Vec<(String, bool)>> {
        let registry = Self::new("", false);
        let map = Self::parse(&registry.read(root)?)?;
        Ok(map
            .into_iter()
            .map(|(name, value)| (name, value.as_bool().unwrap_or(false)))
            .collect())
    }
}

impl HostManifest for StatusRegistry {
    fn relative_path(&self) -> &'static str {
        Self::FILE
    }

    fn entry(&self) -> String {
        format!("{} = {}", self.module, self.enabled)
    }

    fn read(&self, root: &Path) -> Result<String> {
        let path = self.path(root);
        if !path.exists() {
            return Ok(String::new());
        }
        Ok(std::fs::read_to_string(path)?)
    }

    fn contains(&self, content: &str) -> Result<bool> {
        let map = Self::parse(content)?;
        Ok(map.get(&self.module).and_then(Value::as_bool) == Some(self.enabled))
    }

    fn insert(&self, content: &str) -> Result<String> {
        let mut map = Self::parse(content)?;
        map.insert(self.module.clone(), Value::Bool(self.enabled));
        to_composer_json(&map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Change;

    #[test]
    fn test_toggle_preserves_other_modules() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(StatusRegistry::FILE),
            "{\n    \"Blog\": true\n}\n",
        )
        .unwrap();

        let enable = StatusRegistry::new("Shop", true);
        assert_eq!(enable.ensure(dir.path()).unwrap(), Change::Updated);
        assert_eq!(enable.ensure(dir.path()).unwrap(), Change::Unchanged);

        StatusRegistry::new("Shop", false).ensure(dir.path()).unwrap();
        assert_eq!(
            StatusRegistry::load(dir.path()).unwrap(),
            vec![("Blog".to_string(), true), ("Shop".to_string(), false)]
        );
    }

    #[test]
    fn test_missing_registry_is_created() {
        let dir = tempfile::tempdir().unwrap();
        StatusRegistry::new("Shop", true).ensure(dir.path()).unwrap();
        let content = std::fs::read_to_string(dir.path().join(StatusRegistry::FILE)).unwrap();
        assert_eq!(content, "{\n    \"Shop\": true\n}\n");
    }
}
