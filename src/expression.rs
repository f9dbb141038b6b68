//! Data model produced by the parser: commands and pipe-chained expressions.

use crate::config::{MAX_ARGS, MAX_COMMANDS};
use crate::error::CapacityError;
use std::fmt;

/// An ordered sequence with a fixed capacity.
///
/// Unlike `Vec`, pushing into a full `BoundedVec` fails and leaves it unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedVec<T> {
    items: Vec<T>,
    capacity: usize,
    what: &'static str,
}

impl<T> BoundedVec<T> {
    /// Creates an empty container that holds at most `capacity` items.
    ///
    /// `what` names the items in capacity errors.
    pub fn new(what: &'static str, capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
            what,
        }
    }

    /// Appends an item, or fails if the container is full.
    pub fn push(&mut self, item: T) -> Result<(), CapacityError> {
        if self.items.len() >= self.capacity {
            return Err(CapacityError {
                what: self.what,
                capacity: self.capacity,
            });
        }
        self.items.push(item);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

/// One program invocation: the program name followed by its arguments.
///
/// A command owns its argument strings. A command handed to the executor
/// always has at least one argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    argv: BoundedVec<String>,
}

impl Command {
    /// Creates an empty command holding at most `max_args` arguments.
    pub fn new(max_args: usize) -> Self {
        Self {
            argv: BoundedVec::new("arguments", max_args),
        }
    }

    pub fn push_arg(&mut self, arg: impl Into<String>) -> Result<(), CapacityError> {
        self.argv.push(arg.into())
    }

    /// The full argument vector, program name first.
    pub fn args(&self) -> &[String] {
        self.argv.as_slice()
    }

    pub fn len(&self) -> usize {
        self.argv.len()
    }

    pub fn is_empty(&self) -> bool {
        self.argv.is_empty()
    }
}

impl Default for Command {
    fn default() -> Self {
        Self::new(MAX_ARGS)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args().join(" "))
    }
}

/// One or more pipe-separated commands parsed from a single line, plus the
/// background flag set by a trailing `&`.
///
/// The commands are not connected to each other: each one is executed as an
/// independent process in the order it appears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    commands: BoundedVec<Command>,
    background: bool,
}

impl Expression {
    /// Creates an empty foreground expression holding at most `max_commands` commands.
    pub fn new(max_commands: usize) -> Self {
        Self {
            commands: BoundedVec::new("commands", max_commands),
            background: false,
        }
    }

    pub fn push_command(&mut self, cmd: Command) -> Result<(), CapacityError> {
        self.commands.push(cmd)
    }

    pub fn commands(&self) -> &[Command] {
        self.commands.as_slice()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Whether the shell should return without waiting for the spawned processes.
    pub fn is_background(&self) -> bool {
        self.background
    }

    pub fn set_background(&mut self, background: bool) {
        self.background = background;
    }
}

impl Default for Expression {
    fn default() -> Self {
        Self::new(MAX_COMMANDS)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cmd) in self.commands.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}", cmd)?;
        }
        if self.background {
            write!(f, " &")?;
        }
        Ok(())
    }
}
