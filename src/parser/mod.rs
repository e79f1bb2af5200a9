pub mod command;
pub mod default;
pub mod segment;

use std::fmt;
use crate::ast::{AstNode, RedirectKind};

/// Historical argv cap: ten slots including the terminator.
pub const DEFAULT_MAX_ARGS: usize = 9;

pub trait Parser {
    /// Builds the operator tree for one line. Commands that fail to parse
    /// become `AstNode::Invalid` leaves instead of failing the whole line.
    fn parse(&mut self) -> AstNode;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    MissingRedirectTarget(RedirectKind),
    TooManyArgs { max: usize },
}
impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingRedirectTarget(kind) => {
                write!(f, "Error: no file name after '{}'", kind.symbol())
            }
            ParseError::TooManyArgs { max } => {
                write!(f, "Error: too many arguments (at most {} words)", max)
            }
        }
    }
}

impl std::error::Error for ParseError {}
