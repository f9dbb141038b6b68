use crate::command::{CommandFactory, ExecutableCommand, ExitCode, Status, WaitMode};
use crate::env::Environment;
use crate::error::ShellError;
use crate::interpreter::Factory;
use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Built-in commands known to the shell at compile time.
///
/// Builtins run directly in-process without spawning a child process. Their
/// names match case-insensitively. Arguments are taken word for word: there
/// are no options, so `-x` or `--help` are plain arguments.
pub(crate) trait BuiltinCommand: Sized {
    /// Canonical name of the command, e.g. "cd" or "quit".
    fn name() -> &'static str;

    /// Builds the command from the words that follow its name.
    fn from_words(args: &[&str]) -> Self;

    /// Executes the command against the shell's own environment.
    ///
    /// An `Err` is reported as a builtin failure; it never stops the shell.
    fn execute(self, diag: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        _mode: WaitMode,
        diag: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<Status> {
        match <T as BuiltinCommand>::execute(*self, diag, env) {
            Ok(code) => Ok(Status::Exited(code)),
            Err(e) => {
                log::debug!("builtin {} failed: {:#}", T::name(), e);
                ShellError::Builtin {
                    name: T::name().to_string(),
                    message: format!("{:#}", e),
                }
                .report(diag)?;
                Ok(Status::Exited(1))
            }
        }
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if !name.eq_ignore_ascii_case(T::name()) {
            return None;
        }
        Some(Box::new(T::from_words(args)))
    }
}

/// Change the working directory of the shell.
/// If no target is provided, changes to the directory specified by the HOME environment variable.
pub struct Cd {
    /// Directory to switch to, absolute or relative to the current directory.
    /// Words after it are ignored.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn from_words(args: &[&str]) -> Self {
        Cd {
            target: args.first().map(|t| t.to_string()),
        }
    }

    fn execute(self, _diag: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let target = match self.target {
            Some(t) if !t.is_empty() => PathBuf::from(t),
            _ => match env.get_var("HOME") {
                Some(home) => PathBuf::from(home),
                None => return Err(anyhow::anyhow!("no target and HOME not set")),
            },
        };

        // `join` keeps absolute targets as they are.
        let new_dir = env.current_dir.join(target);

        let canonical = fs::canonicalize(&new_dir)
            .with_context(|| format!("can't canonicalize {}", new_dir.display()))?;

        env::set_current_dir(&canonical)
            .with_context(|| format!("can't chdir to {}", canonical.display()))?;
        log::debug!("working directory is now {}", canonical.display());
        env.current_dir = canonical;
        Ok(0)
    }
}

/// Exit the shell with success status. Any arguments are ignored.
pub struct Quit;

impl BuiltinCommand for Quit {
    fn name() -> &'static str {
        "quit"
    }

    fn from_words(_args: &[&str]) -> Self {
        Quit
    }

    fn execute(self, _diag: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        env.should_exit = true;
        Ok(0)
    }
}
