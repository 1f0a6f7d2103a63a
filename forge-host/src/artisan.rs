//! Commands run inside the host application.

use std::{
    path::PathBuf,
    process::Command,
    sync::{Mutex, PoisonError},
};

use eyre::{Result, WrapErr};

use crate::HostError;

/// Programs the integration layer shells out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Program {
    /// `php artisan`
    Artisan,
    /// `composer`
    Composer,
}

impl Program {
    fn command_line(&self, args: &[&str]) -> String {
        let program = match self {
            Program::Artisan => "php artisan",
            Program::Composer => "composer",
        };
        std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Output of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs artisan and composer commands for the host application.
///
/// A command that exits unsuccessfully is an error; callers decide whether
/// that error is fatal.
pub trait ArtisanRunner {
    fn run(&self, program: Program, args: &[&str]) -> Result<CommandOutput>;

    fn artisan(&self, args: &[&str]) -> Result<CommandOutput> {
        self.run(Program::Artisan, args)
    }

    fn composer(&self, args: &[&str]) -> Result<CommandOutput> {
        self.run(Program::Composer, args)
    }

    /// `php artisan migrate --force`
    fn migrate(&self) -> Result<CommandOutput> {
        self.artisan(&["migrate", "--force"])
    }

    /// `php artisan optimize:clear`
    fn clear_caches(&self) -> Result<CommandOutput> {
        self.artisan(&["optimize:clear"])
    }

    /// `composer dump-autoload`
    fn dump_autoload(&self) -> Result<CommandOutput> {
        self.composer(&["dump-autoload"])
    }
}

/// Spawns real processes in the host root.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    root: PathBuf,
    php: String,
    composer: String,
}

impl ProcessRunner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            php: "php".to_string(),
            composer: "composer".to_string(),
        }
    }
}

impl ArtisanRunner for ProcessRunner {
    fn run(&self, program: Program, args: &[&str]) -> Result<CommandOutput> {
        let command_line = program.command_line(args);
        let _span = tracing::info_span!("command", command = %command_line).entered();

        let mut command = match program {
            Program::Artisan => {
                let mut command = Command::new(&self.php);
                command.arg("artisan");
                command
            }
            Program::Composer => Command::new(&self.composer),
        };
        let output = command
            .args(args)
            .current_dir(&self.root)
            .output()
            .wrap_err_with(|| format!("failed to spawn `{}`", command_line))?;

        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        if !output.status.success() {
            return Err(HostError::CommandFailed {
                command: command_line,
                code: output.status.code().unwrap_or(-1),
                stderr: result.stderr.trim().to_string(),
            }
            .into());
        }
        tracing::debug!("command finished");
        Ok(result)
    }
}

/// Records commands instead of running them.
///
/// Commands matching a pattern registered with [`DryRunner::failing`] fail
/// with exit status 1.
#[derive(Debug, Default)]
pub struct DryRunner {
    commands: Mutex<Vec<String>>,
    failing: Vec<String>,
}

impl DryRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every command whose command line contains `pattern`.
    pub fn failing(mut self, pattern: impl Into<String>) -> Self {
        self.failing.push(pattern.into());
        self
    }

    /// Command lines seen so far, in order.
    pub fn commands(&self) -> Vec<String> {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ArtisanRunner for DryRunner {
    fn run(&self, program: Program, args: &[&str]) -> Result<CommandOutput> {
        let command_line = program.command_line(args);
        tracing::info!(command = %command_line, "dry run");
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command_line.clone());

        if self.failing.iter().any(|p| command_line.contains(p.as_str())) {
            return Err(HostError::CommandFailed {
                command: command_line,
                code: 1,
                stderr: "simulated failure".to_string(),
            }
            .into());
        }
        Ok(CommandOutput::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_runner_records_in_order() {
        let runner = DryRunner::new();
        runner.migrate().unwrap();
        runner.dump_autoload().unwrap();
        runner.artisan(&["db:seed", "--class=Foo"]).unwrap();
        assert_eq!(
            runner.commands(),
            vec![
                "php artisan migrate --force",
                "composer dump-autoload",
                "php artisan db:seed --class=Foo",
            ]
        );
    }

    #[test]
    fn test_dry_runner_failure() {
        let runner = DryRunner::new().failing("migrate");
        let err = runner.migrate().unwrap_err();
        let err = err.downcast_ref::<HostError>().unwrap();
        assert!(matches!(err, HostError::CommandFailed { code: 1, .. }));
        assert!(runner.clear_caches().is_ok());
    }
}
