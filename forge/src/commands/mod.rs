mod add_field;
mod add_relation;
mod check;
mod completions;
mod generate;
mod import;
mod info;
mod init;
mod permissions;
mod status;

use std::path::PathBuf;

use add_field::AddFieldCommand;
use add_relation::AddRelationCommand;
use check::CheckCommand;
use clap::{ArgAction, Args, Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use generate::GenerateCommand;
use import::ImportCommand;
use info::InfoCommand;
use init::InitCommand;
use permissions::PermissionsCommand;
use status::{DisableCommand, EnableCommand};

/// Extension trait for exiting on manifest errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for modforge_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub(crate) struct GlobalArgs {
    /// Path to forge.toml
    #[arg(short, long, global = true, default_value = "forge.toml")]
    pub config: PathBuf,

    /// Root of the host Laravel application
    #[arg(long, global = true, default_value = ".")]
    pub host: PathBuf,

    /// Modules directory, relative to the host root
    #[arg(long, global = true, default_value = "Modules")]
    pub modules_dir: String,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

impl GlobalArgs {
    /// Directory a module is generated into.
    pub fn module_dir(&self, module: &str) -> PathBuf {
        self.host.join(&self.modules_dir).join(module)
    }
}

#[derive(Parser)]
#[command(name = "modforge")]
#[command(version)]
#[command(about = "Generate Laravel modules with Filament admin panels from TOML schemas")]
pub(crate) struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn verbose(&self) -> u8 {
        self.global.verbose
    }

    pub fn run(&self) -> Result<()> {
        let global = &self.global;
        match &self.command {
            Commands::Init(cmd) => cmd.run(global),
            Commands::Generate(cmd) => cmd.run(global),
            Commands::Check(cmd) => cmd.run(global),
            Commands::Import(cmd) => cmd.run(global),
            Commands::AddField(cmd) => cmd.run(global),
            Commands::AddRelation(cmd) => cmd.run(global),
            Commands::Enable(cmd) => cmd.run(global),
            Commands::Disable(cmd) => cmd.run(global),
            Commands::Permissions(cmd) => cmd.run(global),
            Commands::Info(cmd) => cmd.run(global),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter forge.toml
    Init(InitCommand),

    /// Generate the module from forge.toml and install it into the host
    Generate(GenerateCommand),

    /// Validate forge.toml without generating anything
    Check(CheckCommand),

    /// Convert a JSON module description into forge.toml and generate it
    Import(ImportCommand),

    /// Add fields to a table of a generated module
    AddField(AddFieldCommand),

    /// Add a relationship to a model of a generated module
    AddRelation(AddRelationCommand),

    /// Enable a module in the host status registry
    Enable(EnableCommand),

    /// Disable a module in the host status registry
    Disable(DisableCommand),

    /// List or register the module's permissions
    Permissions(PermissionsCommand),

    /// Show module information
    Info(InfoCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let cli = Cli::parse_from([
            "modforge",
            "generate",
            "--host",
            "/srv/app",
            "--modules-dir",
            "modules",
            "-vv",
        ]);
        assert_eq!(cli.verbose(), 2);
        assert_eq!(
            cli.global.module_dir("Shop"),
            PathBuf::from("/srv/app/modules/Shop")
        );
    }
}
