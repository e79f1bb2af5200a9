use std::fmt;
use std::io;
use crate::config::ConfigError;

/// Errors that end the interpreter itself. Anything a single command runs
/// into is reported and left behind at the prompt instead.
#[derive(Debug)]
pub enum ShellError {
    Config(ConfigError),
    Logging(String),
    Io(io::Error),
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::Config(e) => write!(f, "Config error: {}", e),
            ShellError::Logging(msg) => write!(f, "Logging error: {}", msg),
            ShellError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ShellError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShellError::Config(e) => Some(e),
            ShellError::Io(e) => Some(e),
            ShellError::Logging(_) => None,
        }
    }
}

impl From<ConfigError> for ShellError {
    fn from(e: ConfigError) -> Self {
        ShellError::Config(e)
    }
}

impl From<io::Error> for ShellError {
    fn from(e: io::Error) -> Self {
        ShellError::Io(e)
    }
}
