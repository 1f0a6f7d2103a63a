use eyre::Result;
use serde::Serialize;
use serde_json::{Map, Value, ser::PrettyFormatter};

use super::HostManifest;
use crate::{HostError, HostModule};

/// PSR-4 mappings in `composer.json`.
///
/// Maps the module namespace to its `app/` directory and the factory and
/// seeder namespaces to their database directories. Existing keys keep their
/// order; new mappings are appended.
#[derive(Debug, Clone)]
pub struct ComposerAutoload {
    mappings: Vec<(String, String)>,
}

impl ComposerAutoload {
    pub const FILE: &'static str = "composer.json";

    pub fn new(module: &HostModule) -> Self {
        let mappings = [
            ("", "app"),
            ("Database\\Factories", "database/factories"),
            ("Database\\Seeders", "database/seeders"),
        ]
        .into_iter()
        .map(|(ns, dir)| {
            let namespace = if ns.is_empty() {
                format!("{}\\", module.namespace)
            } else {
                format!("{}\\", module.ns(ns))
            };
            (namespace, format!("{}/", module.dir(dir)))
        })
        .collect();
        Self { mappings }
    }

    pub fn mappings(&self) -> &[(String, String)] {
        &self.mappings
    }

    fn parse(&self, content: &str) -> Result<Map<String, Value>> {
        match serde_json::from_str(content) {
            Ok(Value::Object(doc)) => Ok(doc),
            Ok(_) => Err(eyre::eyre!("{} must contain a JSON object", Self::FILE)),
            Err(source) => Err(HostError::InvalidJson {
                path: Self::FILE.into(),
                source,
            }
            .into()),
        }
    }
}

/// `composer.json` formatting: four-space indent and a trailing newline.
pub(crate) fn to_composer_json(value: &impl Serialize) -> Result<String> {
    let mut out = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    let mut json = String::from_utf8(out)?;
    json.push('\n');
    Ok(json)
}

fn object_entry<'a>(
    map: &'a mut Map<String, Value>,
    key: &str,
) -> Result<&'a mut Map<String, Value>> {
    map.entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| eyre::eyre!("'{}' in {} is not an object", key, ComposerAutoload::FILE))
}

impl HostManifest for ComposerAutoload {
    fn relative_path(&self) -> &'static str {
        Self::FILE
    }

    fn entry(&self) -> String {
        self.mappings
            .iter()
            .map(|(ns, _)| ns.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn contains(&self, content: &str) -> Result<bool> {
        let doc = self.parse(content)?;
        let psr4 = doc
            .get("autoload")
            .and_then(|a| a.get("psr-4"))
            .and_then(Value::as_object);
        Ok(psr4.is_some_and(|map| {
            self.mappings
                .iter()
                .all(|(ns, dir)| map.get(ns).and_then(Value::as_str) == Some(dir.as_str()))
        }))
    }

    fn insert(&self, content: &str) -> Result<String> {
        let mut doc = self.parse(content)?;
        let psr4 = object_entry(object_entry(&mut doc, "autoload")?, "psr-4")?;
        for (ns, dir) in &self.mappings {
            psr4.insert(ns.clone(), Value::String(dir.clone()));
        }
        to_composer_json(&doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module() -> HostModule {
        HostModule::shop()
    }

    const COMPOSER: &str = r#"{
    "name": "laravel/laravel",
    "autoload": {
        "psr-4": {
            "App\\": "app/",
            "Database\\Factories\\": "database/factories/"
        }
    },
    "require": {
        "php": "^8.2"
    }
}
"#;

    #[test]
    fn test_insert_appends_after_existing_keys() {
        let autoload = ComposerAutoload::new(&module());
        assert!(!autoload.contains(COMPOSER).unwrap());

        let updated = autoload.insert(COMPOSER).unwrap();
        let doc: Value = serde_json::from_str(&updated).unwrap();
        let keys: Vec<_> = doc["autoload"]["psr-4"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(
            keys,
            vec![
                "App\\",
                "Database\\Factories\\",
                "Modules\\Shop\\",
                "Modules\\Shop\\Database\\Factories\\",
                "Modules\\Shop\\Database\\Seeders\\",
            ]
        );
        assert_eq!(doc["autoload"]["psr-4"]["Modules\\Shop\\"], "Modules/Shop/app/");
        assert!(updated.contains("    \"name\": \"laravel/laravel\""));
        assert!(updated.find("\"autoload\"").unwrap() < updated.find("\"require\"").unwrap());
        assert!(autoload.contains(&updated).unwrap());
    }

    #[test]
    fn test_insert_creates_missing_sections() {
        let autoload = ComposerAutoload::new(&module());
        let updated = autoload.insert("{\"name\": \"app\"}").unwrap();
        assert!(autoload.contains(&updated).unwrap());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let autoload = ComposerAutoload::new(&module());
        assert!(autoload.contains("{ not json").is_err());
    }
}
