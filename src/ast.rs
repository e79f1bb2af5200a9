use crate::parser::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    Command(CommandNode),
    Pipeline(Box<AstNode>, Box<AstNode>),
    Sequence(Box<AstNode>, Box<AstNode>),
    // A command that failed to parse; only that command is lost
    Invalid(ParseError),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandNode {
    pub argv: Vec<String>,
    pub input: Option<Redirect>,
    pub output: Option<Redirect>,
}

impl CommandNode {
    pub fn name(&self) -> Option<&str> {
        self.argv.first().map(|s| s.as_str())
    }

    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or(&[])
    }

    /// An all-whitespace segment parses to a command with no words.
    pub fn is_empty(&self) -> bool {
        self.argv.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub kind: RedirectKind,
    pub file: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    In,
    Out,
    Append,
}

impl RedirectKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            RedirectKind::In => "<",
            RedirectKind::Out => ">",
            RedirectKind::Append => ">>",
        }
    }
}
