//! Capacity limits applied while reading, tokenizing and parsing a line.

/// Maximum number of tokens accepted on one line.
pub const MAX_TOKENS: usize = 513;
/// Maximum number of arguments in one command (program name included).
pub const MAX_ARGS: usize = 513;
/// Maximum number of pipe-separated commands in one expression.
pub const MAX_COMMANDS: usize = 513;
/// Lines longer than this many bytes are truncated.
pub const MAX_LINE_BYTES: usize = 4096;

/// Bounds that keep overlong or malicious input from growing the shell's
/// containers without limit.
///
/// Every bounded container refuses a push past its limit instead of growing
/// or truncating; see [`crate::expression::BoundedVec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_tokens: usize,
    pub max_args: usize,
    pub max_commands: usize,
    pub max_line_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_tokens: MAX_TOKENS,
            max_args: MAX_ARGS,
            max_commands: MAX_COMMANDS,
            max_line_bytes: MAX_LINE_BYTES,
        }
    }
}
