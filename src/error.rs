//! Error types produced while turning a line of input into running processes.

use std::io::{self, Write};

/// Prefix of every diagnostic the shell prints.
pub const DIAGNOSTIC_PREFIX: &str = "!minsh:";

/// A push into a bounded container was refused because it is full.
///
/// The container is left exactly as it was before the push.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("too many {what} (limit is {capacity})")]
pub struct CapacityError {
    /// What the container holds, e.g. "tokens" or "arguments".
    pub what: &'static str,
    pub capacity: usize,
}

/// Errors that can occur while splitting a line into tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenizeError {
    /// The line holds more tokens than the configured maximum.
    #[error("more than {limit} tokens")]
    Overflow { limit: usize },
}

/// Errors that can occur while building an expression from tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParsingError {
    /// There was nothing to parse.
    #[error("cannot parse a line with 0 tokens")]
    EmptyInput,
    /// An empty command segment: a leading or doubled pipe, a dangling pipe,
    /// or a final command made only of the background marker.
    #[error("syntax error at token {index}: {token}")]
    Syntax { index: usize, token: String },
    /// A command or the expression ran out of room.
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    /// Parsing finished without producing a single command.
    #[error("expression contains no commands")]
    NoCommands,
}

/// Every failure the shell reports to the user.
///
/// None of these are fatal to the shell except [`ShellError::ScriptOpen`],
/// which only happens at startup.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("Could not tokenise input '{line}': {source}")]
    Tokenize {
        line: String,
        #[source]
        source: TokenizeError,
    },

    #[error("Could not parse input '{line}': {source}")]
    Parse {
        line: String,
        #[source]
        source: ParsingError,
    },

    /// A builtin such as `cd` failed; the message carries the OS error.
    #[error("{name} - {message}")]
    Builtin { name: String, message: String },

    /// An external program could not be started.
    #[error("{program} - {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Could not open file '{path}': {source}")]
    ScriptOpen {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl ShellError {
    /// Writes this error as a single prefixed diagnostic line.
    pub fn report(&self, diag: &mut dyn Write) -> io::Result<()> {
        writeln!(diag, "{} {}", DIAGNOSTIC_PREFIX, self)
    }
}
