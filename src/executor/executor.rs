use std::{ffi, fmt, io};
use crate::ast::AstNode;

pub type ExecStatus = Result<ExecOutcome, ExecError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecOutcome {
    /// The line finished; the value is the wait status of its last command.
    Code(i32),
    /// `exit` ran in the interpreter itself.
    Exit(i32),
}

impl ExecOutcome {
    pub fn code(&self) -> i32 {
        match *self {
            ExecOutcome::Code(c) | ExecOutcome::Exit(c) => c,
        }
    }
}

#[derive(Debug)]
pub enum ExecError {
    CommandNotFound(String),
    Nix(nix::Error),
    Spawn(nix::Error),
    Exec { name: String, source: nix::Error },
    Redirect { file: String, source: io::Error, input: bool },
    InvalidArgument(String),
    NoSuchBuiltin(String),
}
impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::CommandNotFound(cmd) => write!(f, "Error: command not found: {}", cmd),
            ExecError::Nix(e) => write!(f, "System error: {}", e),
            ExecError::Spawn(e) => write!(f, "Error: Failure with fork: {}", e),
            ExecError::Exec { name, source } => write!(f, "Error: cannot execute {}: {}", name, source),
            ExecError::Redirect { file, input: true, .. } => {
                write!(f, "Error: cannot open input file {}", file)
            }
            ExecError::Redirect { file, input: false, .. } => {
                write!(f, "Error: cannot open output file {}", file)
            }
            ExecError::InvalidArgument(arg) => write!(f, "Invalid argument: {}", arg),
            ExecError::NoSuchBuiltin(name) => write!(f, "No such builtin command: {}", name),
        }
    }
}

impl std::error::Error for ExecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecError::Redirect { source, .. } => Some(source),
            ExecError::Nix(e) | ExecError::Spawn(e) => Some(e),
            ExecError::Exec { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<nix::Error> for ExecError {
    fn from(e: nix::Error) -> Self {
        ExecError::Nix(e)
    }
}

impl From<ffi::NulError> for ExecError {
    fn from(e: ffi::NulError) -> Self {
        ExecError::InvalidArgument(format!("embedded NUL byte at {}", e.nul_position()))
    }
}

pub trait Executor {
    fn exec(&mut self, node: &AstNode) -> ExecStatus;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CommandNode;
    use crate::parser::{default::DefaultParser, Parser};

    // Walks the tree in execution order without spawning anything.
    struct TraceExecutor {
        log: Vec<String>,
    }

    impl Executor for TraceExecutor {
        fn exec(&mut self, node: &AstNode) -> ExecStatus {
            match node {
                AstNode::Command(CommandNode { argv, .. }) => {
                    self.log.push(format!("command: {}", argv.join(" ")));
                    Ok(ExecOutcome::Code(0))
                }
                AstNode::Pipeline(lhs, rhs) => {
                    self.log.push("pipeline".to_string());
                    self.exec(lhs)?;
                    self.exec(rhs)
                }
                AstNode::Sequence(first, rest) => {
                    self.log.push("sequence".to_string());
                    self.exec(first)?;
                    self.exec(rest)
                }
                AstNode::Invalid(e) => {
                    self.log.push(format!("invalid: {}", e));
                    Ok(ExecOutcome::Code(1))
                }
            }
        }
    }

    #[test]
    fn test_walk_order() {
        let ast = DefaultParser::new("ls ; cat f | wc").parse();
        let mut exec = TraceExecutor { log: vec![] };
        assert!(matches!(exec.exec(&ast), Ok(ExecOutcome::Code(0))));
        assert_eq!(
            exec.log,
            vec!["sequence", "command: ls", "pipeline", "command: cat f", "command: wc"]
        );
    }

    #[test]
    fn test_outcome_code() {
        assert_eq!(ExecOutcome::Code(3).code(), 3);
        assert_eq!(ExecOutcome::Exit(7).code(), 7);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ExecError::CommandNotFound("nope".to_string()).to_string(),
            "Error: command not found: nope"
        );
        let err = ExecError::Redirect {
            file: "missing.txt".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
            input: true,
        };
        assert_eq!(err.to_string(), "Error: cannot open input file missing.txt");
    }

    #[test]
    fn test_error_conversions() {
        let nul = ffi::CString::new("a\0b").unwrap_err();
        assert_eq!(
            ExecError::from(nul).to_string(),
            "Invalid argument: embedded NUL byte at 1"
        );
        let nix = ExecError::from(nix::errno::Errno::EBADF);
        assert!(matches!(nix, ExecError::Nix(nix::errno::Errno::EBADF)));
        assert!(std::error::Error::source(&nix).is_some());
    }
}
