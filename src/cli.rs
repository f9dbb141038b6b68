//! Invocation modes: interactive, script file, or usage.

use crate::Interpreter;
use crate::config::{Limits, MAX_ARGS, MAX_COMMANDS, MAX_LINE_BYTES, MAX_TOKENS};
use crate::error::ShellError;
use anyhow::Result;
use argh::FromArgs;
use std::fs::File;
use std::io::{self, Write};

pub const USAGE: &str = "usage: minsh [filename]";

#[derive(FromArgs, Debug)]
/// A minimal command interpreter.
/// Reads commands interactively, or from the given script file.
pub struct Cli {
    #[argh(option, default = "MAX_TOKENS")]
    /// maximum number of tokens on one line
    pub max_tokens: usize,

    #[argh(option, default = "MAX_ARGS")]
    /// maximum number of arguments of one command
    pub max_args: usize,

    #[argh(option, default = "MAX_COMMANDS")]
    /// maximum number of piped commands on one line
    pub max_commands: usize,

    #[argh(option, default = "MAX_LINE_BYTES")]
    /// lines longer than this many bytes are truncated
    pub max_line_bytes: usize,

    #[argh(positional, greedy)]
    /// script file to run; interactive mode when omitted
    pub files: Vec<String>,
}

impl Cli {
    pub fn limits(&self) -> Limits {
        Limits {
            max_tokens: self.max_tokens,
            max_args: self.max_args,
            max_commands: self.max_commands,
            max_line_bytes: self.max_line_bytes,
        }
    }
}

fn welcome() -> String {
    format!(
        "\nminsh v{}\nTo escape type 'quit' and hit return.\n",
        env!("CARGO_PKG_VERSION")
    )
}

/// Runs the shell as selected by `cli` and returns the process exit status.
///
/// Diagnostics go to standard error; the banner, prompt and usage text go to
/// standard output.
pub fn run(cli: &Cli) -> Result<i32> {
    let mut sh = Interpreter::default().with_limits(cli.limits());
    let mut diag = io::stderr();

    match cli.files.as_slice() {
        [] => {
            log::info!("starting interactive session");
            println!("{}", welcome());
            sh.repl(&mut diag)?;
            Ok(0)
        }
        [path] => run_file(&mut sh, path, &mut diag),
        _ => {
            println!("{}", USAGE);
            Ok(0)
        }
    }
}

/// Runs the script at `path`. Returns 1 if it cannot be opened.
pub fn run_file(sh: &mut Interpreter, path: &str, diag: &mut dyn Write) -> Result<i32> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(source) => {
            ShellError::ScriptOpen {
                path: path.to_string(),
                source,
            }
            .report(diag)?;
            return Ok(1);
        }
    };
    log::info!("running script {}", path);
    sh.run_script(file, diag)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{lock_current_dir, make_unique_temp_dir};
    use std::fs;

    #[test]
    fn defaults_match_limits() {
        let cli = Cli::from_args(&["minsh"], &[]).unwrap();
        assert_eq!(cli.limits(), Limits::default());
        assert!(cli.files.is_empty());
    }

    #[test]
    fn options_override_limits() {
        let cli = Cli::from_args(&["minsh"], &["--max-tokens", "8", "script.sh"]).unwrap();
        assert_eq!(cli.limits().max_tokens, 8);
        assert_eq!(cli.files, vec!["script.sh".to_string()]);
    }

    #[test]
    fn more_than_one_file_prints_usage_only() {
        let cli = Cli::from_args(&["minsh"], &["a.sh", "b.sh"]).unwrap();
        assert_eq!(run(&cli).unwrap(), 0);
    }

    #[test]
    fn missing_script_exits_with_one() {
        let mut sh = Interpreter::default();
        let mut diag = Vec::new();
        let code = run_file(&mut sh, "/does/not/exist.minsh", &mut diag).unwrap();
        assert_eq!(code, 1);
        let diag = String::from_utf8(diag).unwrap();
        assert!(diag.starts_with("!minsh: Could not open file '/does/not/exist.minsh': "));
    }

    #[test]
    #[cfg(unix)]
    fn script_runs_until_quit() {
        let _lock = lock_current_dir();
        let temp = make_unique_temp_dir("cli_script").unwrap();
        let before = temp.join("before");
        let after = temp.join("after");
        let script = temp.join("script.minsh");
        fs::write(
            &script,
            format!(
                "touch {} # first\nQuit\ntouch {}\n",
                before.display(),
                after.display()
            ),
        )
        .unwrap();

        let mut sh = Interpreter::default();
        let mut diag = Vec::new();
        let code = run_file(&mut sh, &script.to_string_lossy(), &mut diag).unwrap();

        assert_eq!(code, 0);
        assert!(diag.is_empty(), "{}", String::from_utf8_lossy(&diag));
        assert!(before.exists());
        assert!(!after.exists());
        let _ = fs::remove_dir_all(&temp);
    }
}
