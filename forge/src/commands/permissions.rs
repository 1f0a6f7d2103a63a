use clap::Args;
use eyre::{Result, WrapErr};
use modforge_host::{ArtisanRunner, ProcessRunner};
use modforge_manifest::ForgeToml;

use super::{GlobalArgs, UnwrapOrExit};
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct PermissionsCommand {
    /// Register the permissions in the host by running the permission seeder
    #[arg(long)]
    pub sync: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl PermissionsCommand {
    pub fn run(&self, global: &GlobalArgs) -> Result<()> {
        let forge_toml = ForgeToml::open(&global.config).unwrap_or_exit();
        let runner = ProcessRunner::new(&global.host);
        let sync: Option<&dyn ArtisanRunner> = self.sync.then_some(&runner);

        let report = ops::permissions(forge_toml.manifest(), &global.modules_dir, sync)?;
        if self.json {
            let json = serde_json::to_string_pretty(&report)
                .wrap_err("Failed to serialize permissions")?;
            println!("{}", json);
        } else {
            report.render(&mut TerminalOutput::new());
        }
        Ok(())
    }
}
