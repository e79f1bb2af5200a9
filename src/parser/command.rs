use crate::ast::{CommandNode, Redirect, RedirectKind};
use crate::parser::ParseError;

/// Word & redirection parser for one operator-free segment.
pub struct CommandParser<'a> {
    input: &'a str,
    pos: usize,
    max_args: usize,
}

impl<'a> CommandParser<'a> {
    pub fn new(input: &'a str, max_args: usize) -> Self {
        Self { input, pos: 0, max_args }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn consume(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_blanks(&mut self) {
        while let Some(' ' | '\t') = self.peek() {
            self.pos += 1;
        }
    }

    fn read_word(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if matches!(ch, ' ' | '\t' | '<' | '>') {
                break;
            }
            self.pos += ch.len_utf8();
        }
        &self.input[start..self.pos]
    }

    fn expect_target(&mut self, kind: RedirectKind) -> Result<Redirect, ParseError> {
        self.skip_blanks();
        let file = self.read_word();
        if file.is_empty() {
            return Err(ParseError::MissingRedirectTarget(kind));
        }
        Ok(Redirect { kind, file: file.to_string() })
    }

    pub fn parse(mut self) -> Result<CommandNode, ParseError> {
        let mut cmd = CommandNode::default();
        loop {
            self.skip_blanks();
            match self.peek() {
                None => break,
                Some('<') => {
                    self.pos += 1;
                    cmd.input = Some(self.expect_target(RedirectKind::In)?);
                }
                Some('>') => {
                    self.pos += 1;
                    let kind = if self.consume('>') {
                        RedirectKind::Append
                    } else {
                        RedirectKind::Out
                    };
                    cmd.output = Some(self.expect_target(kind)?);
                }
                Some(_) => {
                    let word = self.read_word();
                    if cmd.argv.len() >= self.max_args {
                        return Err(ParseError::TooManyArgs { max: self.max_args });
                    }
                    cmd.argv.push(word.to_string());
                }
            }
        }
        Ok(cmd)
    }
}
