//! Splits an input stream into command lines.
//!
//! A line ends at a newline, a `;` or the end of the stream. A `#` starts a
//! comment that runs to the end of the line. Bytes past the length limit are
//! dropped up to the end of the line without any error.

use std::io::{self, BufReader, Bytes, Read};

pub struct LineReader<R> {
    bytes: Bytes<BufReader<R>>,
    max_len: usize,
    exhausted: bool,
}

impl<R: Read> LineReader<R> {
    /// Reads lines of at most `max_len` bytes from `input`.
    pub fn new(input: R, max_len: usize) -> Self {
        Self {
            bytes: BufReader::new(input).bytes(),
            max_len,
            exhausted: false,
        }
    }
}

impl<R: Read> Iterator for LineReader<R> {
    type Item = io::Result<String>;

    /// Yields every line, empty ones included, until the stream ends.
    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let mut line = Vec::new();
        let mut in_comment = false;
        let mut truncated = false;
        loop {
            match self.bytes.next() {
                None => {
                    self.exhausted = true;
                    break;
                }
                Some(Err(e)) if e.kind() == io::ErrorKind::Interrupted => continue,
                Some(Err(e)) => return Some(Err(e)),
                Some(Ok(b'\n' | b';')) => break,
                Some(Ok(_)) if in_comment => {}
                Some(Ok(b'#')) => in_comment = true,
                Some(Ok(byte)) => {
                    if line.len() < self.max_len {
                        line.push(byte);
                    } else {
                        truncated = true;
                    }
                }
            }
        }

        if truncated {
            log::debug!("line truncated to {} bytes", self.max_len);
        }
        if self.exhausted && line.is_empty() {
            return None;
        }
        Some(Ok(String::from_utf8_lossy(&line).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(input: &str, max_len: usize) -> Vec<String> {
        LineReader::new(input.as_bytes(), max_len)
            .collect::<io::Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn newline_and_semicolon_both_end_a_line() {
        assert_eq!(lines("ls -la\ncd /tmp;pwd\n", 64), vec!["ls -la", "cd /tmp", "pwd"]);
    }

    #[test]
    fn last_line_without_newline_is_kept() {
        assert_eq!(lines("true\nquit", 64), vec!["true", "quit"]);
    }

    #[test]
    fn empty_lines_are_yielded() {
        assert_eq!(lines("a\n\n;b", 64), vec!["a", "", "", "b"]);
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        assert_eq!(
            lines("# header\necho hi # greet; ls\n", 64),
            vec!["", "echo hi ", " ls"]
        );
    }

    #[test]
    fn overlong_line_is_truncated_and_remainder_discarded() {
        assert_eq!(lines("abcdefgh\nxy\n", 4), vec!["abcd", "xy"]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(lines("", 64).is_empty());
    }
}
