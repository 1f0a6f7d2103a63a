use clap::Args;
use eyre::Result;
use modforge_manifest::ForgeToml;

use super::{GlobalArgs, UnwrapOrExit};
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// Also list the pipeline phases and lints
    #[arg(long)]
    pub explain: bool,
}

impl CheckCommand {
    pub fn run(&self, global: &GlobalArgs) -> Result<()> {
        let forge_toml = ForgeToml::open(&global.config).unwrap_or_exit();

        let report = ops::check(forge_toml.manifest(), &global.config, self.explain)?;
        report.render(&mut TerminalOutput::new());

        if !report.is_valid() {
            std::process::exit(1);
        }
        Ok(())
    }
}
