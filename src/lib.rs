//! A minimal command interpreter.
//!
//! A line of input is split on spaces into tokens ([`lexer`]), parsed into an
//! [`expression::Expression`] of `|`-separated commands with an optional
//! trailing `&` ([`parser`]), and executed by the [`Interpreter`]: the `cd`
//! and `quit` builtins run in-process, every other command runs as its own
//! process. Foreground expressions wait for each process in turn; background
//! expressions do not wait, and their children are reaped asynchronously
//! ([`signals`]).
//!
//! The pipe character only separates commands. No data flows between them.

mod builtin;
pub mod cli;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
pub mod expression;
mod external;
mod interpreter;
pub mod lexer;
pub mod parser;
pub mod reader;
pub mod signals;

/// Just a convenient re-export of the command interpreter.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::Interpreter;

#[cfg(test)]
pub(crate) mod test_support {
    use std::env as stdenv;
    use std::fs;
    use std::io;
    use std::path::PathBuf;
    use std::sync::{Mutex, MutexGuard, OnceLock};
    use std::time::{SystemTime, UNIX_EPOCH};

    /// Serialises tests that change the working directory, spawn children or
    /// touch the interrupt flag.
    pub fn lock_current_dir() -> MutexGuard<'static, ()> {
        static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
        MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn make_unique_temp_dir(tag: &str) -> io::Result<PathBuf> {
        let mut p = stdenv::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        p.push(format!("minsh_test_{}_{}_{}", tag, std::process::id(), nanos));
        fs::create_dir_all(&p)?;
        Ok(p)
    }
}
