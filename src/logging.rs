use std::fs::OpenOptions;
use std::path::Path;

use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode, WriteLogger};

/// Installs the global logger: a file logger when `log_file` is set,
/// otherwise stderr. Nothing is installed when `level` is `Off`.
pub fn init(level: LevelFilter, log_file: Option<&Path>) -> Result<(), String> {
    if level == LevelFilter::Off {
        return Ok(());
    }
    let installed = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| format!("cannot open log file {}: {}", path.display(), e))?;
            WriteLogger::init(level, Config::default(), file)
        }
        None => TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Never),
    };
    installed.map_err(|e| format!("cannot install logger: {}", e))
}
