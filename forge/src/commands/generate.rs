use clap::Args;
use eyre::{Result, WrapErr};
use modforge_codegen_laravel::MigrationClock;
use modforge_host::ProcessRunner;
use modforge_manifest::ForgeToml;

use super::{GlobalArgs, UnwrapOrExit};
use crate::{
    ops::{self, GenerateOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    /// Preview generated files without writing to disk
    #[arg(long)]
    pub dry_run: bool,

    /// Write the module without touching the host application
    #[arg(long)]
    pub skip_host: bool,

    /// Pin migration timestamps (YYYY_MM_DD_HHMMSS)
    #[arg(long)]
    pub timestamp: Option<String>,

    /// Write pipeline phase snapshots to .modforge/debug
    #[arg(long)]
    pub visualize: bool,
}

impl GenerateCommand {
    pub fn run(&self, global: &GlobalArgs) -> Result<()> {
        let forge_toml = ForgeToml::open(&global.config).unwrap_or_exit();
        let clock = parse_clock(self.timestamp.as_deref())?;
        let runner = ProcessRunner::new(&global.host);

        let opts = GenerateOptions {
            host_root: &global.host,
            modules_dir: &global.modules_dir,
            dry_run: self.dry_run,
            skip_host: self.skip_host,
            visualize: self.visualize,
            clock,
        };
        let report = ops::generate(forge_toml.manifest(), opts, &runner)?;
        report.render(&mut TerminalOutput::new());

        if !report.is_success() {
            std::process::exit(1);
        }
        Ok(())
    }
}

/// Parse a `--timestamp` value.
pub(crate) fn parse_clock(timestamp: Option<&str>) -> Result<Option<MigrationClock>> {
    timestamp
        .map(|t| {
            MigrationClock::parse(t)
                .wrap_err_with(|| format!("invalid timestamp '{}', expected YYYY_MM_DD_HHMMSS", t))
        })
        .transpose()
}
