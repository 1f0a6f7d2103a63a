use clap::Args;
use eyre::Result;
use modforge_host::ProcessRunner;

use super::GlobalArgs;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct EnableCommand {
    /// Module name
    pub module: String,
}

impl EnableCommand {
    pub fn run(&self, global: &GlobalArgs) -> Result<()> {
        set_status(global, &self.module, true)
    }
}

#[derive(Args)]
pub struct DisableCommand {
    /// Module name
    pub module: String,
}

impl DisableCommand {
    pub fn run(&self, global: &GlobalArgs) -> Result<()> {
        set_status(global, &self.module, false)
    }
}

fn set_status(global: &GlobalArgs, module: &str, enabled: bool) -> Result<()> {
    let runner = ProcessRunner::new(&global.host);
    let report = ops::set_status(&global.host, module, enabled, &runner)?;
    report.render(&mut TerminalOutput::new());
    Ok(())
}
