use clap::Args;
use eyre::Result;
use modforge_manifest::ForgeToml;

use super::{GlobalArgs, UnwrapOrExit};
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct InfoCommand;

impl InfoCommand {
    pub fn run(&self, global: &GlobalArgs) -> Result<()> {
        let forge_toml = ForgeToml::open(&global.config).unwrap_or_exit();

        let report = ops::info(forge_toml.manifest(), &global.config, &global.host)?;
        report.render(&mut TerminalOutput::new());

        Ok(())
    }
}
