use std::{ io, fmt };
use std::fs;
use std::path::PathBuf;

use log::LevelFilter;

use crate::parser::DEFAULT_MAX_ARGS;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub prompt: String,
    /// Longest accepted line in bytes; anything beyond is dropped.
    pub max_line: usize,
    pub max_args: usize,
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn default_config() -> Config {
        Config {
            prompt: ">>> ".to_string(),
            max_line: 100,
            max_args: DEFAULT_MAX_ARGS,
            log_level: LevelFilter::Off,
            log_file: None,
        }
    }

    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Config, ConfigError> {
        let src = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::load_from_str(&src)
    }

    /// Parses `key=value` lines. Values are taken verbatim after the first
    /// `=`, so a prompt may end in a space.
    pub fn load_from_str(src: &str) -> Result<Config, ConfigError> {
        let mut config = ConfigLoader::default_config();

        for (lineno, line) in src.lines().enumerate() {
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::Parse(format!("Line {}: No '=' found: {}", lineno+1, line)));
            };

            match key.trim() {
                "prompt" => config.prompt = value.to_string(),
                "max_line" => config.max_line = parse_positive(value, lineno, line)?,
                "max_args" => config.max_args = parse_positive(value, lineno, line)?,
                "log_level" => match value.trim().parse::<LevelFilter>() {
                    Ok(level) => config.log_level = level,
                    Err(_) => return Err(ConfigError::Parse(format!("Line {}: Invalid log level: {}", lineno+1, line))),
                },
                "log_file" => {
                    let value = value.trim();
                    config.log_file = (!value.is_empty()).then(|| PathBuf::from(value));
                }
                k => return Err(ConfigError::Parse(format!("Line {}: Unknown key: {}", lineno+1, k))),
            }
        }

        Ok(config)
    }
}

fn parse_positive(value: &str, lineno: usize, line: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::Parse(format!("Line {}: Invalid positive number: {}", lineno+1, line))),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(String),
}
impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConfigLoader::load_from_str("").unwrap();
        assert_eq!(config, ConfigLoader::default_config());
        assert_eq!(config.prompt, ">>> ");
        assert_eq!(config.max_line, 100);
        assert_eq!(config.max_args, 9);
        assert_eq!(config.log_level, LevelFilter::Off);
    }

    #[test]
    fn test_all_keys() {
        let src = "# shell settings\n\
                   prompt=$ \n\
                   max_line = 512\n\
                   max_args=32\n\
                   log_level=debug\n\
                   log_file=/tmp/psh.log\n";
        let config = ConfigLoader::load_from_str(src).unwrap();
        assert_eq!(config.prompt, "$ ");
        assert_eq!(config.max_line, 512);
        assert_eq!(config.max_args, 32);
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/psh.log")));
    }

    #[test]
    fn test_empty_prompt() {
        let config = ConfigLoader::load_from_str("prompt=").unwrap();
        assert_eq!(config.prompt, "");
    }

    #[test]
    fn test_errors_carry_line_number() {
        let err = ConfigLoader::load_from_str("prompt=x\ncolour=red").unwrap_err();
        assert_eq!(err.to_string(), "Parse error: Line 2: Unknown key: colour");

        let err = ConfigLoader::load_from_str("max_args=0").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(msg) if msg.starts_with("Line 1: Invalid positive number")));

        let err = ConfigLoader::load_from_str("log_level=loud").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = ConfigLoader::load_from_str("just words").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(msg) if msg.contains("No '=' found")));
    }

    #[test]
    fn test_missing_file() {
        let err = ConfigLoader::load_from_file("/no/such/psh.conf").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
