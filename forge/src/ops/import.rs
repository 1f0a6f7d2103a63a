//! Import operation - turn a JSON module description into forge.toml.

use std::path::Path;

use eyre::{Result, eyre};
use modforge_manifest::{ForgeToml, Manifest};

/// Write `manifest` to `config_path`.
///
/// Refuses to overwrite an existing forge.toml or to target a module
/// directory that already exists unless `force` is set.
pub fn import(
    manifest: Manifest,
    config_path: &Path,
    module_dir: &Path,
    force: bool,
) -> Result<ForgeToml> {
    if !force {
        if config_path.exists() {
            return Err(eyre!(
                "{} already exists; pass --force to replace it",
                config_path.display()
            ));
        }
        if module_dir.exists() {
            return Err(eyre!(
                "module {} already exists at {}; pass --force to regenerate it",
                manifest.module.name,
                module_dir.display()
            ));
        }
    }

    let forge_toml = ForgeToml::create(config_path, manifest).map_err(|e| eyre!("{}", e))?;
    forge_toml.save().map_err(|e| eyre!("{}", e))?;
    tracing::info!(path = %config_path.display(), "imported module description");
    Ok(forge_toml)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use modforge_manifest::ModuleDescription;

    use super::*;

    const DESCRIPTION: &str = r#"{
    "module_name": "shop",
    "description": "Storefront",
    "models": [
        {
            "name": "Product",
            "fields": [
                {"name": "name", "type": "string", "required": true, "length": 200},
                {"name": "status", "type": "enum", "enum_options": ["draft", "live"]}
            ]
        }
    ],
    "relationships": [],
    "generate_factory": true,
    "generate_seeder": false
}"#;

    fn manifest() -> Manifest {
        ModuleDescription::from_json(DESCRIPTION, "shop.json")
            .unwrap()
            .into_manifest()
            .unwrap()
    }

    #[test]
    fn test_import_writes_parseable_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("forge.toml");
        let module_dir = dir.path().join("Modules/Shop");

        let forge_toml = import(manifest(), &config, &module_dir, false).unwrap();
        assert_eq!(forge_toml.manifest().module.name, "Shop");

        let reopened = ForgeToml::open(&config).unwrap();
        let products = reopened.manifest().table("products").unwrap();
        assert_eq!(products.fields.len(), 2);
        assert_eq!(products.fields[1].values, vec!["draft", "live"]);
    }

    #[test]
    fn test_import_refuses_existing_targets() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("forge.toml");
        let module_dir = dir.path().join("Modules/Shop");

        fs::create_dir_all(&module_dir).unwrap();
        let err = import(manifest(), &config, &module_dir, false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert!(!config.exists());

        import(manifest(), &config, &module_dir, true).unwrap();
        let err = import(manifest(), &config, &module_dir, false).unwrap_err();
        assert!(err.to_string().contains("forge.toml"));
    }
}
