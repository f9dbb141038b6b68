use crate::command::{CommandFactory, Status, WaitMode};
use crate::config::Limits;
use crate::env::Environment;
use crate::error::{DIAGNOSTIC_PREFIX, ShellError};
use crate::expression::Expression;
use crate::lexer::split_into_tokens;
use crate::parser::construct_expression;
use crate::reader::LineReader;
use crate::signals;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, Read, Write};

/// Factory allows creating instances of ExecutableCommand.
///
/// Only builds commands defined in this crate: builtins and `ExternalCommand`.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A minimal command interpreter: builtins run in-process, everything else
/// runs as a separate process.
///
/// Each line goes through the same stages: it is split into tokens, parsed
/// into an [`Expression`] and executed command by command. A failure while
/// tokenizing or parsing discards the line after printing a diagnostic.
///
/// Example
/// ```
/// use minsh::Interpreter;
/// let mut sh = Interpreter::default();
/// let mut diag = Vec::new();
/// let statuses = sh.run_line("ls | | wc", &mut diag).unwrap();
/// assert!(statuses.is_empty());
/// let diag = String::from_utf8(diag).unwrap();
/// assert!(diag.starts_with("!minsh: Could not parse input 'ls | | wc'"));
/// ```
pub struct Interpreter {
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
    limits: Limits,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    ///
    /// Factories are queried in order; the first one that recognises a name wins.
    pub fn new(commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self {
            env: Environment::new(),
            commands,
            limits: Limits::default(),
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Whether `quit` has been executed.
    pub fn should_exit(&self) -> bool {
        self.env.should_exit
    }

    /// Executes the commands of `expr` in order, one status per command run.
    ///
    /// Foreground expressions wait for each process before starting the next;
    /// background expressions never wait. Commands are not connected to each
    /// other, and a failing command does not stop the ones after it. Only
    /// `quit` stops execution early.
    pub fn execute(&mut self, expr: &Expression, diag: &mut dyn Write) -> anyhow::Result<Vec<Status>> {
        let mode = if expr.is_background() {
            WaitMode::Background
        } else {
            WaitMode::Foreground
        };

        let mut statuses = Vec::with_capacity(expr.len());
        for cmd in expr.commands() {
            statuses.push(self.run_command(cmd.args(), mode, diag)?);
            if self.env.should_exit {
                log::debug!("quit requested, skipping the rest of the expression");
                break;
            }
        }
        Ok(statuses)
    }

    fn run_command(
        &mut self,
        argv: &[String],
        mode: WaitMode,
        diag: &mut dyn Write,
    ) -> anyhow::Result<Status> {
        let Some((name, rest)) = argv.split_first() else {
            anyhow::bail!("cannot execute a command without arguments");
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();

        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(&self.env, name, &args) {
                return cmd.execute(mode, diag, &mut self.env);
            }
        }
        writeln!(diag, "{} {} - command not found", DIAGNOSTIC_PREFIX, name)?;
        Ok(Status::Exited(127))
    }

    /// Tokenizes, parses and executes one line.
    ///
    /// Tokenizer and parser failures are reported to `diag` and yield no
    /// statuses; nothing from the line is executed.
    pub fn run_line(&mut self, line: &str, diag: &mut dyn Write) -> anyhow::Result<Vec<Status>> {
        let tokens = match split_into_tokens(line, self.limits.max_tokens) {
            Ok(tokens) => tokens,
            Err(source) => {
                ShellError::Tokenize {
                    line: line.to_string(),
                    source,
                }
                .report(diag)?;
                return Ok(Vec::new());
            }
        };
        log::debug!("{} tokens", tokens.len());

        let expr = match construct_expression(&tokens, self.limits) {
            Ok(expr) => expr,
            Err(source) => {
                ShellError::Parse {
                    line: line.to_string(),
                    source,
                }
                .report(diag)?;
                return Ok(Vec::new());
            }
        };
        log::debug!("parsed expression: {}", expr);

        self.execute(&expr, diag)
    }

    /// Runs every line of `input` until it is exhausted or `quit` is executed.
    ///
    /// Lines are split by [`LineReader`]: `;` ends a line like a newline does,
    /// `#` starts a comment and overlong lines are truncated. Background
    /// children that terminated meanwhile are collected before each line.
    pub fn run_script<R: Read>(&mut self, input: R, diag: &mut dyn Write) -> anyhow::Result<()> {
        for line in LineReader::new(input, self.limits.max_line_bytes) {
            let line = line?;
            // No foreground child is alive here, so collecting is safe.
            signals::reap_finished();
            if signals::take_interrupt() {
                io::stdout().flush()?;
            }
            if line.is_empty() {
                continue;
            }
            self.run_line(&line, diag)?;
            if self.env.should_exit {
                break;
            }
        }
        Ok(())
    }

    /// Interactive Read-Eval-Print Loop with the working directory as prompt.
    ///
    /// Ctrl-C discards the line being edited; end of input leaves the loop.
    pub fn repl(&mut self, diag: &mut dyn Write) -> anyhow::Result<()> {
        let mut rl = DefaultEditor::new()?;

        while !self.env.should_exit {
            match rl.readline(&self.env.prompt()) {
                Ok(line) => {
                    rl.add_history_entry(line.as_str())?;
                    self.run_script(line.as_bytes(), diag)?;
                }
                Err(ReadlineError::Interrupted) => {
                    io::stdout().flush()?;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the default set of commands:
    /// - built-ins: `cd`, `quit`
    /// - external command launcher
    fn default() -> Self {
        use crate::builtin::*;
        use crate::external::ExternalCommand;
        Self::new(vec![
            Box::new(Factory::<Cd>::default()),
            Box::new(Factory::<Quit>::default()),
            Box::new(Factory::<ExternalCommand>::default()),
        ])
    }
}
