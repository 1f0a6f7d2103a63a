use clap::Args;
use eyre::Result;
use modforge_manifest::ForgeToml;

use super::{GlobalArgs, UnwrapOrExit, generate::parse_clock};
use crate::{
    ops::{self, EditTarget},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct AddFieldCommand {
    /// Table (or model) to extend
    pub table: String,

    /// Fields as name:type[:modifier...], e.g. weight:decimal:precision=8:scale=2
    #[arg(required = true)]
    pub fields: Vec<String>,

    /// Pin the migration timestamp (YYYY_MM_DD_HHMMSS)
    #[arg(long)]
    pub timestamp: Option<String>,
}

impl AddFieldCommand {
    pub fn run(&self, global: &GlobalArgs) -> Result<()> {
        let mut forge_toml = ForgeToml::open(&global.config).unwrap_or_exit();
        let fields = ops::parse_fields(&self.fields)?;
        let module_dir = global.module_dir(&forge_toml.manifest().module.name);

        let mut target = EditTarget {
            forge_toml: &mut forge_toml,
            module_dir: &module_dir,
            clock: parse_clock(self.timestamp.as_deref())?,
        };
        let report = ops::add_field(&mut target, &self.table, fields)?;
        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
