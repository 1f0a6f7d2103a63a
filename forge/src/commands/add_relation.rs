use clap::Args;
use eyre::Result;
use modforge_manifest::ForgeToml;

use super::{GlobalArgs, UnwrapOrExit, generate::parse_clock};
use crate::{
    ops::{self, EditTarget, RelationOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct AddRelationCommand {
    /// Table (or model) declaring the relationship
    pub from: String,

    /// Relationship type, e.g. belongsTo, hasMany, belongsToMany
    #[arg(value_name = "TYPE")]
    pub kind: String,

    /// Related table (or model)
    pub to: String,

    /// Accessor method name
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub foreign_key: Option<String>,

    #[arg(long)]
    pub local_key: Option<String>,

    /// Pivot table for many-to-many relationships
    #[arg(long)]
    pub pivot_table: Option<String>,

    /// Morph name for polymorphic relationships
    #[arg(long)]
    pub morph_name: Option<String>,

    /// Intermediate table for has-through relationships
    #[arg(long)]
    pub through: Option<String>,

    /// Pin the pivot migration timestamp (YYYY_MM_DD_HHMMSS)
    #[arg(long)]
    pub timestamp: Option<String>,
}

impl AddRelationCommand {
    pub fn run(&self, global: &GlobalArgs) -> Result<()> {
        let mut forge_toml = ForgeToml::open(&global.config).unwrap_or_exit();
        let relationship = ops::relationship(
            &self.from,
            &self.kind,
            &self.to,
            RelationOptions {
                name: self.name.clone(),
                foreign_key: self.foreign_key.clone(),
                local_key: self.local_key.clone(),
                pivot_table: self.pivot_table.clone(),
                morph_name: self.morph_name.clone(),
                through: self.through.clone(),
            },
        )?;
        let module_dir = global.module_dir(&forge_toml.manifest().module.name);

        let mut target = EditTarget {
            forge_toml: &mut forge_toml,
            module_dir: &module_dir,
            clock: parse_clock(self.timestamp.as_deref())?,
        };
        let report = ops::add_relation(&mut target, relationship)?;
        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
