//! Edit operations - add fields or relationships to a generated module.
//!
//! The module is edited first; forge.toml is then brought in line so a later
//! `generate` renders the same schema. A forge.toml that cannot be updated
//! only produces a warning since the module itself is already consistent.

use std::path::Path;

use eyre::{Result, WrapErr, eyre};
use modforge_codegen_laravel::{EditOutcome, MigrationClock, ModuleEditor};
use modforge_manifest::{
    Field, ForgeToml, RelationType, Relationship, append_field_block, append_relationship_block,
    render_field_block,
};

use crate::reports::EditReport;

/// Where an edit applies.
pub struct EditTarget<'a> {
    pub forge_toml: &'a mut ForgeToml,
    pub module_dir: &'a Path,
    pub clock: Option<MigrationClock>,
}

impl EditTarget<'_> {
    fn editor(&self) -> Result<ModuleEditor> {
        if !self.module_dir.exists() {
            return Err(eyre!(
                "module directory {} does not exist; run `modforge generate` first",
                self.module_dir.display()
            ));
        }
        let editor = ModuleEditor::open(self.module_dir, self.forge_toml.manifest().clone())?;
        Ok(match self.clock {
            Some(clock) => editor.clock(clock),
            None => editor,
        })
    }

    /// Replace forge.toml content, returning a warning on failure.
    fn update_config(&mut self, content: String) -> Option<String> {
        let path = self.forge_toml.path().display().to_string();
        if let Err(err) = self.forge_toml.set_content(content) {
            return Some(format!("{} was not updated: {}", path, err));
        }
        if let Err(err) = self.forge_toml.save() {
            return Some(format!("{} was not saved: {}", path, err));
        }
        None
    }
}

/// Parse `name:type[:modifier...]` specs.
pub fn parse_fields(specs: &[String]) -> Result<Vec<Field>> {
    if specs.is_empty() {
        return Err(eyre!("no fields given, expected name:type[:modifier...]"));
    }
    specs
        .iter()
        .map(|spec| Field::parse_compact(spec).map_err(|message| eyre!(message)))
        .collect()
}

/// Execute the add-field operation.
pub fn add_field(target: &mut EditTarget, table: &str, fields: Vec<Field>) -> Result<EditReport> {
    let names: Vec<String> = fields.iter().map(|f| f.name.clone()).collect();
    let _span = tracing::info_span!("add_field", table, fields = ?names).entered();

    let outcome = target
        .editor()?
        .add_fields(table, fields.clone())
        .wrap_err_with(|| format!("failed to add fields to '{}'", table))?;

    let config_warning = match target.forge_toml.manifest().table(table) {
        Some(declared) => {
            let table_name = declared.name.clone();
            let mut content = target.forge_toml.content().to_string();
            let mut missing = None;
            for field in &fields {
                let block = match render_field_block(field) {
                    Ok(block) => block,
                    Err(err) => {
                        missing = Some(format!("field '{}' could not be rendered: {}", field.name, err));
                        break;
                    }
                };
                match append_field_block(&content, &table_name, &block) {
                    Some(updated) => content = updated,
                    None => {
                        missing = Some(format!(
                            "{} has no [[tables]] entry named '{}'",
                            target.forge_toml.path().display(),
                            table_name
                        ));
                        break;
                    }
                }
            }
            match missing {
                Some(warning) => Some(warning),
                None => target.update_config(content),
            }
        }
        None => Some(format!(
            "{} does not declare table '{}'; add the fields by hand",
            target.forge_toml.path().display(),
            table
        )),
    };

    Ok(report(
        format!("Added {} to {}", names.join(", "), table),
        outcome,
        config_warning,
    ))
}

/// Options of an added relationship beyond its endpoints.
#[derive(Debug, Default, Clone)]
pub struct RelationOptions {
    pub name: Option<String>,
    pub foreign_key: Option<String>,
    pub local_key: Option<String>,
    pub pivot_table: Option<String>,
    pub morph_name: Option<String>,
    pub through: Option<String>,
}

/// Build a relationship from its command line parts.
pub fn relationship(from: &str, kind: &str, to: &str, opts: RelationOptions) -> Result<Relationship> {
    let kind: RelationType = kind.parse().map_err(|message: String| eyre!(message))?;
    let mut relationship = Relationship::new(from, kind, to);
    relationship.name = opts.name;
    relationship.foreign_key = opts.foreign_key;
    relationship.local_key = opts.local_key;
    relationship.pivot_table = opts.pivot_table;
    relationship.morph_name = opts.morph_name;
    relationship.through = opts.through;
    Ok(relationship)
}

/// Execute the add-relation operation.
pub fn add_relation(target: &mut EditTarget, relationship: Relationship) -> Result<EditReport> {
    let _span = tracing::info_span!(
        "add_relation",
        from = %relationship.from,
        kind = relationship.kind.as_str(),
        to = %relationship.to
    )
    .entered();
    let action = format!(
        "Added {} {} {}",
        relationship.from,
        relationship.kind.as_str(),
        relationship.to
    );

    let outcome = target
        .editor()?
        .add_relation(relationship.clone())
        .wrap_err_with(|| {
            format!(
                "failed to add relationship from '{}' to '{}'",
                relationship.from, relationship.to
            )
        })?;

    let config_warning = match append_relationship_block(target.forge_toml.content(), &relationship)
    {
        Ok(content) => target.update_config(content),
        Err(err) => Some(format!("relationship could not be rendered: {}", err)),
    };

    Ok(report(action, outcome, config_warning))
}

fn report(action: String, outcome: EditOutcome, config_warning: Option<String>) -> EditReport {
    let config_updated = config_warning.is_none();
    let mut warnings = outcome.warnings;
    warnings.extend(config_warning);
    EditReport {
        action,
        mode: outcome.mode,
        written: outcome.written,
        warnings,
        config_updated,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use modforge_codegen::language::LanguageCodegen;
    use modforge_codegen_laravel::{EditMode, LaravelGenerator};
    use modforge_manifest::Manifest;

    use super::*;

    const MANIFEST: &str = r#"[module]
name = "Shop"

[[tables]]
name = "categories"

[[tables.fields]]
name = "name"
type = "string"
length = 120

[[tables]]
name = "products"

[[tables.fields]]
name = "name"
type = "string"
length = 255
"#;

    fn clock() -> MigrationClock {
        MigrationClock::parse("2024_02_01_120000").unwrap()
    }

    /// A generated module next to its forge.toml.
    fn project() -> (tempfile::TempDir, ForgeToml) {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("forge.toml");
        fs::write(&config, MANIFEST).unwrap();
        let forge_toml = ForgeToml::open(&config).unwrap();

        let manifest: Manifest = MANIFEST.parse().unwrap();
        LaravelGenerator::compile(manifest)
            .unwrap()
            .clock(clock())
            .generate(&dir.path().join("Modules/Shop"))
            .unwrap();
        (dir, forge_toml)
    }

    #[test]
    fn test_parse_fields() {
        let fields = parse_fields(&["weight:decimal:precision=8:scale=2".into()]).unwrap();
        assert_eq!(fields[0].precision, Some(8));
        assert!(parse_fields(&[]).is_err());
        assert!(parse_fields(&["weight".into()]).is_err());
    }

    #[test]
    fn test_add_field_updates_module_and_config() {
        let (dir, mut forge_toml) = project();
        let module_dir = dir.path().join("Modules/Shop");
        let mut target = EditTarget {
            forge_toml: &mut forge_toml,
            module_dir: &module_dir,
            clock: Some(clock()),
        };

        let fields = parse_fields(&["weight:decimal".into()]).unwrap();
        let report = add_field(&mut target, "products", fields).unwrap();
        assert_eq!(report.mode, EditMode::Snapshot);
        assert!(report.config_updated);
        assert!(
            report
                .written
                .iter()
                .any(|f| f.ends_with("_add_weight_to_products_table.php"))
        );

        let config = fs::read_to_string(dir.path().join("forge.toml")).unwrap();
        let manifest: Manifest = config.parse().unwrap();
        assert!(manifest.table("products").unwrap().field("weight").is_some());
        assert!(manifest.table("categories").unwrap().field("weight").is_none());
    }

    #[test]
    fn test_add_relation_updates_config() {
        let (dir, mut forge_toml) = project();
        let module_dir = dir.path().join("Modules/Shop");
        let mut target = EditTarget {
            forge_toml: &mut forge_toml,
            module_dir: &module_dir,
            clock: Some(clock()),
        };

        let rel = relationship("categories", "hasMany", "products", RelationOptions::default())
            .unwrap();
        let report = add_relation(&mut target, rel).unwrap();
        assert!(report.written.iter().any(|f| f == "app/Models/Category.php"));
        assert!(target.forge_toml.content().contains("[[relationships]]"));
        assert!(
            fs::read_to_string(module_dir.join("app/Models/Category.php"))
                .unwrap()
                .contains("function products()")
        );
    }

    #[test]
    fn test_unknown_relation_type() {
        let err = relationship("a", "hasSome", "b", RelationOptions::default()).unwrap_err();
        assert!(err.to_string().contains("hasSome"));
    }

    #[test]
    fn test_missing_module_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("forge.toml");
        fs::write(&config, MANIFEST).unwrap();
        let mut forge_toml = ForgeToml::open(&config).unwrap();
        let module_dir = dir.path().join("Modules/Shop");
        let mut target = EditTarget {
            forge_toml: &mut forge_toml,
            module_dir: &module_dir,
            clock: None,
        };
        let err = add_field(&mut target, "products", parse_fields(&["sku:string".into()]).unwrap())
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
