use crate::env::Environment;
use anyhow::Result;
use std::io::Write;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// How the executor treats a spawned process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitMode {
    /// Block until the process terminates.
    Foreground,
    /// Return immediately; the process is reaped asynchronously.
    Background,
}

/// What became of one executed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The command ran to completion with this exit code.
    Exited(ExitCode),
    /// The process with this pid was left running in the background.
    Detached(u32),
    /// The process terminated but was collected elsewhere before the executor
    /// could wait for it (`ECHILD`), so its exit code is unknown.
    Reaped,
}

/// Object-safe trait for any command that can be executed by the shell.
///
/// Implemented by builtins via a blanket impl and by external commands.
/// Failures local to the command are written to `diag` and turned into a
/// non-zero [`Status`]; an `Err` is reserved for the shell's own I/O failing.
pub trait ExecutableCommand {
    fn execute(
        self: Box<Self>,
        mode: WaitMode,
        diag: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<Status>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`.
pub trait CommandFactory {
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>>;
}
