use std::env;
use std::ffi::OsStr;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

pub struct PathResolver;

impl PathResolver {
    /// Finds the program for `command`. Names with a `/` are taken as paths,
    /// anything else is searched in `PATH`.
    pub fn resolve(&self, command: &str) -> Option<PathBuf> {
        if command.contains('/') {
            let path = Path::new(command);
            if path.is_file() {
                return Some(path.to_path_buf());
            } else {
                return None;
            }
        }

        let paths = env::var_os("PATH")?;
        self.resolve_in(command, &paths)
    }

    /// Searches the `:`-separated directory list `paths` for an executable
    /// named `command`.
    pub fn resolve_in(&self, command: &str, paths: &OsStr) -> Option<PathBuf> {
        env::split_paths(paths)
            .map(|dir| dir.join(command))
            .find(|full_path| is_executable(full_path))
    }
}

fn is_executable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}
