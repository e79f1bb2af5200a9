use crate::ast::AstNode;
use crate::parser::command::CommandParser;
use crate::parser::segment::{split_first, Operator, Segment};
use crate::parser::{Parser, DEFAULT_MAX_ARGS};

pub struct DefaultParser<'a> {
    line: &'a str,
    max_args: usize,
}

impl<'a> DefaultParser<'a> {
    pub fn new(line: &'a str) -> Self {
        Self { line, max_args: DEFAULT_MAX_ARGS }
    }

    pub fn with_max_args(mut self, max_args: usize) -> Self {
        self.max_args = max_args;
        self
    }

    fn parse_segment(&self, src: &str) -> AstNode {
        match split_first(src) {
            Segment::Simple(text) => self.parse_command(text),
            Segment::Split { left, op, right } => {
                let lhs = Box::new(self.parse_command(left));
                let rhs = Box::new(self.parse_segment(right));
                match op {
                    Operator::Pipe => AstNode::Pipeline(lhs, rhs),
                    Operator::Semicolon => AstNode::Sequence(lhs, rhs),
                }
            }
        }
    }

    fn parse_command(&self, text: &str) -> AstNode {
        match CommandParser::new(text, self.max_args).parse() {
            Ok(cmd) => AstNode::Command(cmd),
            Err(e) => AstNode::Invalid(e),
        }
    }
}

// First-match segmentation: the operator found first becomes the node,
// the remainder is segmented again as its right child.
impl<'a> Parser for DefaultParser<'a> {
    fn parse(&mut self) -> AstNode {
        self.parse_segment(self.line)
    }
}
