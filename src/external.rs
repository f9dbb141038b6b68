use crate::command::{CommandFactory, ExecutableCommand, ExitCode, Status, WaitMode};
use crate::env::Environment;
use crate::error::ShellError;
use crate::interpreter::Factory;
use anyhow::{Context, Result};
use std::borrow::Cow;
use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ExitStatus};

/// Command that is not a builtin: a program run as a separate process.
pub struct ExternalCommand {
    /// Resolved location of the program image.
    program: PathBuf,
    /// Full argument vector, program name as typed first.
    argv: Vec<String>,
}

impl ExternalCommand {
    pub fn new(program: PathBuf, argv: Vec<String>) -> Self {
        Self { program, argv }
    }

    fn name(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or_default()
    }

    fn spawn(&self, env: &Environment) -> io::Result<Child> {
        let mut cmd = std::process::Command::new(&self.program);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.arg0(self.name());
        }
        // The process environment is inherited unchanged.
        cmd.args(self.argv.iter().skip(1))
            .current_dir(&env.current_dir)
            .spawn()
    }
}

/// Always produces a command: when `PATH` lookup fails the name is used as
/// given and the failure surfaces when spawning.
impl CommandFactory for Factory<ExternalCommand> {
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        let search_paths = env.get_var("PATH").unwrap_or_default();
        let program = find_command_path(OsStr::new(&search_paths), Path::new(name))
            .map(Cow::into_owned)
            .unwrap_or_else(|| PathBuf::from(name));

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push(name.to_string());
        argv.extend(args.iter().map(|a| a.to_string()));
        Some(Box::new(ExternalCommand::new(program, argv)))
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(
        self: Box<Self>,
        mode: WaitMode,
        diag: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<Status> {
        let child = match self.spawn(env) {
            Ok(child) => child,
            Err(source) => {
                log::debug!("spawning {} failed: {}", self.program.display(), source);
                ShellError::Spawn {
                    program: self.name().to_string(),
                    source,
                }
                .report(diag)?;
                // The status a child that failed to exec would have had.
                return Ok(Status::Exited(1));
            }
        };

        let pid = child.id();
        log::debug!("spawned {} as pid {} ({:?})", self.name(), pid, mode);
        match mode {
            WaitMode::Background => Ok(Status::Detached(pid)),
            WaitMode::Foreground => wait_for(child),
        }
    }
}

/// Blocks until `child` terminates.
///
/// Terminated children are only collected between lines, so the wait sees its
/// own child. Should something else collect it anyway, waiting fails with
/// `ECHILD`, which is reported as [`Status::Reaped`].
fn wait_for(mut child: Child) -> Result<Status> {
    let pid = child.id();
    match child.wait() {
        Ok(exit_status) => {
            let code = exit_code(exit_status);
            log::debug!("pid {} exited with {}", pid, code);
            Ok(Status::Exited(code))
        }
        Err(e) if already_reaped(&e) => {
            log::debug!("pid {} was reaped asynchronously", pid);
            Ok(Status::Reaped)
        }
        Err(e) => Err(e).with_context(|| format!("waiting for pid {}", pid)),
    }
}

#[cfg(unix)]
fn already_reaped(e: &io::Error) -> bool {
    e.raw_os_error() == Some(nix::errno::Errno::ECHILD as i32)
}

#[cfg(not(unix))]
fn already_reaped(_e: &io::Error) -> bool {
    false
}

fn exit_code(exit_status: ExitStatus) -> ExitCode {
    match exit_status.code() {
        Some(x) => x,
        None => terminated_by_signal(exit_status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = exit_status.signal() {
        128 + signal
    } else if exit_status.core_dumped() {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> ExitCode {
    -1
}

/// Resolve a command path the way a typical shell would.
///
/// - Absolute path: returned if it exists.
/// - `./foo`, or any relative path on non-Unix platforms: returned if it exists.
/// - Single component (no separators): the first existing match in the
///   directories of `search_paths` (a `PATH`-style list).
/// - Several components (e.g. `bin/sh`): returned if it exists.
/// - Empty path: `None`.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return existing(path).map(Cow::Borrowed);
    }

    let search_in_current_dir = cfg!(not(unix)) || path.starts_with("./");
    if search_in_current_dir && path.exists() {
        return Some(Cow::Borrowed(path));
    }

    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, _) => None,
        (Some(single), None) => find_in_path(search_paths, single.as_os_str()).map(Cow::Owned),
        _ => existing(path).map(Cow::Borrowed),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(cmd))
        .find(|candidate| candidate.is_file())
}

fn existing(path: &Path) -> Option<&Path> {
    if path.exists() { Some(path) } else { None }
}
