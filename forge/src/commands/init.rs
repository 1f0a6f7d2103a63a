use std::path::Path;

use clap::Args;
use dialoguer::{Input, theme::ColorfulTheme};
use eyre::{Context, Result, eyre};
use modforge_core::{pluralize, to_snake_case, to_studly_case};
use modforge_manifest::Manifest;

use super::{GlobalArgs, UnwrapOrExit};

#[derive(Args)]
pub struct InitCommand {
    /// Module name (prompted for when omitted)
    pub name: Option<String>,

    /// Replace an existing forge.toml
    #[arg(long)]
    pub force: bool,
}

impl InitCommand {
    pub fn run(&self, global: &GlobalArgs) -> Result<()> {
        let config = &global.config;
        if config.exists() && !self.force {
            return Err(eyre!(
                "{} already exists; pass --force to replace it",
                config.display()
            ));
        }

        let name = match &self.name {
            Some(name) => name.clone(),
            None => Self::prompt_name()?,
        };
        let module = to_studly_case(&name);
        let content = starter_manifest(&module);

        // Reject names the manifest would not accept before writing anything
        Manifest::from_str_with_filename(&content, &config.display().to_string()).unwrap_or_exit();

        write_config(config, &content)?;

        println!("Created {} for module {}", config.display(), module);
        println!();
        println!("Next steps:");
        println!("  edit {} to describe your tables", config.display());
        println!("  modforge check");
        println!("  modforge generate --dry-run");
        Ok(())
    }

    fn prompt_name() -> Result<String> {
        Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Module name")
            .validate_with(|input: &String| -> std::result::Result<(), &str> {
                if input.trim().is_empty() {
                    Err("module name cannot be empty")
                } else {
                    Ok(())
                }
            })
            .interact_text()
            .wrap_err("Failed to read the module name")
    }
}

fn write_config(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).wrap_err_with(|| format!("failed to write {}", path.display()))
}

/// A forge.toml with one example table.
fn starter_manifest(module: &str) -> String {
    let table = pluralize(&to_snake_case(module));
    format!(
        r#"[module]
name = "{module}"
description = "The {module} module"
api = true
admin_panel = true
permissions = true
factories = true
seeders = true

[[tables]]
name = "{table}"

[[tables.fields]]
name = "name"
type = "string"
length = 255
required = true

[[tables.fields]]
name = "active"
type = "boolean"
default = true
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_manifest_parses() {
        let manifest: Manifest = starter_manifest("Blog").parse().unwrap();
        assert_eq!(manifest.module.name, "Blog");
        assert_eq!(manifest.tables[0].name, "blogs");
        assert_eq!(manifest.tables[0].fields.len(), 2);
    }

    #[test]
    fn test_write_config_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schemas/forge.toml");
        write_config(&path, &starter_manifest("Shop")).unwrap();
        assert!(path.exists());
    }
}
