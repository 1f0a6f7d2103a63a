use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use modforge_host::ProcessRunner;
use modforge_manifest::ModuleDescription;

use super::{GlobalArgs, UnwrapOrExit, generate::parse_clock};
use crate::{
    ops::{self, GenerateOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct ImportCommand {
    /// JSON module description
    pub file: PathBuf,

    /// Replace an existing forge.toml and module directory
    #[arg(long)]
    pub force: bool,

    /// Only write forge.toml
    #[arg(long)]
    pub no_generate: bool,

    /// Write the module without touching the host application
    #[arg(long)]
    pub skip_host: bool,

    /// Pin migration timestamps (YYYY_MM_DD_HHMMSS)
    #[arg(long)]
    pub timestamp: Option<String>,
}

impl ImportCommand {
    pub fn run(&self, global: &GlobalArgs) -> Result<()> {
        let manifest = ModuleDescription::from_file(&self.file)
            .unwrap_or_exit()
            .into_manifest()
            .unwrap_or_exit();
        let clock = parse_clock(self.timestamp.as_deref())?;
        let module_dir = global.module_dir(&manifest.module.name);

        let forge_toml = ops::import(manifest, &global.config, &module_dir, self.force)?;
        println!(
            "Imported {} into {}",
            self.file.display(),
            forge_toml.path().display()
        );
        if self.no_generate {
            return Ok(());
        }
        println!();

        let runner = ProcessRunner::new(&global.host);
        let opts = GenerateOptions {
            host_root: &global.host,
            modules_dir: &global.modules_dir,
            dry_run: false,
            skip_host: self.skip_host,
            visualize: false,
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
