//! Builds an [`Expression`] from the tokens of one line.
//!
//! Grammar: `command ('|' command)* ['&']`, where a command is one or more
//! tokens other than `|`. The background marker `&` is recognised only as the
//! last token of the last command, and only when that command has something
//! in front of it.

use crate::config::Limits;
use crate::error::ParsingError;
use crate::expression::{Command, Expression};
use crate::lexer::{Token, TokenArray};

const PIPE: &str = "|";
const BACKGROUND: &str = "&";

struct ExpressionBuilder<'t, 'a> {
    tokens: &'t [Token<'a>],
    pos: usize,
    limits: Limits,
    expr: Expression,
    current: Command,
}

impl<'t, 'a> ExpressionBuilder<'t, 'a> {
    fn new(tokens: &'t [Token<'a>], limits: Limits) -> Self {
        ExpressionBuilder {
            tokens,
            pos: 0,
            limits,
            expr: Expression::new(limits.max_commands),
            current: Command::new(limits.max_args),
        }
    }

    fn build_expression(mut self) -> Result<Expression, ParsingError> {
        if self.tokens.is_empty() {
            return Err(ParsingError::EmptyInput);
        }

        while let Some(token) = self.consume() {
            if token == PIPE {
                self.finish_segment()?;
            } else if token == BACKGROUND && self.at_end() && !self.current.is_empty() {
                // Never stored, so the marker does not count against `max_args`.
                self.expr.set_background(true);
            } else {
                self.current.push_arg(token)?;
            }
        }

        self.finish_last_command()?;

        if self.expr.is_empty() {
            return Err(ParsingError::NoCommands);
        }
        Ok(self.expr)
    }

    fn consume(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn at_end(&self) -> bool {
        self.pos == self.tokens.len()
    }

    /// Called on `|`: the command before it must not be empty.
    fn finish_segment(&mut self) -> Result<(), ParsingError> {
        if self.current.is_empty() {
            return Err(self.syntax_error_at(self.pos - 1));
        }
        let cmd = std::mem::replace(&mut self.current, Command::new(self.limits.max_args));
        self.expr.push_command(cmd)?;
        Ok(())
    }

    /// Appends the final command, which must not be empty.
    fn finish_last_command(&mut self) -> Result<(), ParsingError> {
        // A lone `&` lands here as the only argument: nothing would be left to run.
        let only_marker = self.current.args() == &[BACKGROUND] && !self.expr.is_background();
        if self.current.is_empty() || only_marker {
            return Err(self.syntax_error_at(self.pos - 1));
        }

        let cmd = std::mem::take(&mut self.current);
        self.expr.push_command(cmd)?;
        Ok(())
    }

    fn syntax_error_at(&self, index: usize) -> ParsingError {
        ParsingError::Syntax {
            index,
            token: self.tokens[index].to_string(),
        }
    }
}

/// Constructs an [`Expression`] from a token array.
///
/// Returns a [`ParsingError`] for empty input, an empty command segment
/// (leading, doubled or trailing `|`), a final command consisting only of
/// `&`, or when a command or the expression exceeds its capacity in `limits`.
///
/// ```
/// use minsh::config::Limits;
/// use minsh::lexer::split_into_tokens;
/// use minsh::parser::construct_expression;
///
/// let limits = Limits::default();
/// let tokens = split_into_tokens("sleep 5 &", limits.max_tokens).unwrap();
/// let expr = construct_expression(&tokens, limits).unwrap();
/// assert!(expr.is_background());
/// assert_eq!(expr.commands()[0].args(), &["sleep", "5"]);
/// ```
pub fn construct_expression(
    tokens: &TokenArray<'_>,
    limits: Limits,
) -> Result<Expression, ParsingError> {
    ExpressionBuilder::new(tokens.as_slice(), limits).build_expression()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::split_into_tokens;

    fn parse(line: &str) -> Result<Expression, ParsingError> {
        parse_with(line, Limits::default())
    }

    fn parse_with(line: &str, limits: Limits) -> Result<Expression, ParsingError> {
        let tokens = split_into_tokens(line, limits.max_tokens).unwrap();
        construct_expression(&tokens, limits)
    }

    fn argvs(expr: &Expression) -> Vec<Vec<String>> {
        expr.commands().iter().map(|c| c.args().to_vec()).collect()
    }

    #[test]
    fn pipeline_becomes_two_commands() {
        let expr = parse("ls -la | wc -l").unwrap();
        assert_eq!(argvs(&expr), vec![vec!["ls", "-la"], vec!["wc", "-l"]]);
        assert!(!expr.is_background());
    }

    #[test]
    fn trailing_ampersand_sets_background() {
        let expr = parse("sleep 5 &").unwrap();
        assert_eq!(argvs(&expr), vec![vec!["sleep", "5"]]);
        assert!(expr.is_background());
    }

    #[test]
    fn trailing_ampersand_applies_to_whole_pipeline() {
        let expr = parse("yes | head -n 1 &").unwrap();
        assert_eq!(argvs(&expr), vec![vec!["yes"], vec!["head", "-n", "1"]]);
        assert!(expr.is_background());
    }

    #[test]
    fn lone_ampersand_is_a_syntax_error() {
        assert_eq!(
            parse("&").unwrap_err(),
            ParsingError::Syntax {
                index: 0,
                token: "&".to_string()
            }
        );
    }

    #[test]
    fn ampersand_alone_after_pipe_is_a_syntax_error() {
        assert_eq!(
            parse("ls | &").unwrap_err(),
            ParsingError::Syntax {
                index: 2,
                token: "&".to_string()
            }
        );
    }

    #[test]
    fn ampersand_mid_expression_is_an_ordinary_argument() {
        let expr = parse("echo & | cat").unwrap();
        assert_eq!(argvs(&expr), vec![vec!["echo", "&"], vec!["cat"]]);
        assert!(!expr.is_background());
    }

    #[test]
    fn only_the_final_ampersand_is_stripped() {
        let expr = parse("echo & &").unwrap();
        assert_eq!(argvs(&expr), vec![vec!["echo", "&"]]);
        assert!(expr.is_background());

        let expr = parse("& &").unwrap();
        assert_eq!(argvs(&expr), vec![vec!["&"]]);
        assert!(expr.is_background());
    }

    #[test]
    fn empty_segment_between_pipes_reports_second_pipe() {
        assert_eq!(
            parse("ls | | wc").unwrap_err(),
            ParsingError::Syntax {
                index: 2,
                token: "|".to_string()
            }
        );
    }

    #[test]
    fn leading_pipe_is_a_syntax_error() {
        assert_eq!(
            parse("| wc").unwrap_err(),
            ParsingError::Syntax {
                index: 0,
                token: "|".to_string()
            }
        );
    }

    #[test]
    fn trailing_pipe_reports_last_token() {
        assert_eq!(
            parse("ls -la |").unwrap_err(),
            ParsingError::Syntax {
                index: 2,
                token: "|".to_string()
            }
        );
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(parse("").unwrap_err(), ParsingError::EmptyInput);
        assert_eq!(parse("   ").unwrap_err(), ParsingError::EmptyInput);
    }

    #[test]
    fn too_many_arguments_is_a_capacity_error() {
        let limits = Limits {
            max_args: 2,
            ..Limits::default()
        };
        assert!(matches!(
            parse_with("echo a b", limits),
            Err(ParsingError::Capacity(_))
        ));
        assert!(parse_with("echo a", limits).is_ok());
    }

    #[test]
    fn background_marker_does_not_use_an_argument_slot() {
        let limits = Limits {
            max_args: 2,
            ..Limits::default()
        };
        let expr = parse_with("echo a &", limits).unwrap();
        assert_eq!(argvs(&expr), vec![vec!["echo", "a"]]);
        assert!(expr.is_background());

        let expr = parse_with("echo & &", limits).unwrap();
        assert_eq!(argvs(&expr), vec![vec!["echo", "&"]]);
    }

    #[test]
    fn too_many_commands_is_a_capacity_error() {
        let limits = Limits {
            max_commands: 2,
            ..Limits::default()
        };
        assert!(parse_with("a | b", limits).is_ok());
        assert!(matches!(
            parse_with("a | b | c", limits),
            Err(ParsingError::Capacity(_))
        ));
    }

    #[test]
    fn parsing_the_same_line_twice_is_structurally_identical() {
        for line in ["ls -la | wc -l", "sleep 5 &", "cd /tmp", "a  b |  c d e &"] {
            assert_eq!(parse(line).unwrap(), parse(line).unwrap(), "line: {line}");
        }
    }
}
