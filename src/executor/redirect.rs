use std::fs::OpenOptions;
use std::io::{self, Write};
use std::os::unix::io::{IntoRawFd, RawFd};

use nix::unistd::{close, dup, dup2};

use crate::ast::{CommandNode, Redirect, RedirectKind};
use crate::executor::ExecError;

pub const STDIN: RawFd = 0;
pub const STDOUT: RawFd = 1;

pub struct RedirectHandler;

impl RedirectHandler {
    /// Rewires descriptors 0 and 1 of the current process for `cmd`.
    ///
    /// The previous stdin/stdout are not saved; a process that outlives the
    /// command goes through [`RedirectHandler::scoped`] instead.
    pub fn apply(cmd: &CommandNode) -> Result<(), ExecError> {
        if let Some(input) = &cmd.input {
            Self::redirect(input)?;
        }
        if let Some(output) = &cmd.output {
            Self::redirect(output)?;
        }
        Ok(())
    }

    /// Runs `body` with `cmd`'s redirections in place, then puts the
    /// interpreter's own stdin and stdout back. `body` does not run when a
    /// redirection target cannot be opened.
    pub fn scoped<T, F>(cmd: &CommandNode, body: F) -> Result<T, ExecError>
    where
        F: FnOnce() -> T,
    {
        let saved = SavedStdio::save()?;
        let result = Self::apply(cmd).map(|()| body());
        let restored = saved.restore();
        let value = result?;
        restored?;
        Ok(value)
    }

    fn redirect(redirect: &Redirect) -> Result<(), ExecError> {
        let mut options = OpenOptions::new();
        let target = match redirect.kind {
            RedirectKind::In => {
                options.read(true);
                STDIN
            }
            RedirectKind::Out => {
                options.write(true).create(true).truncate(true);
                STDOUT
            }
            RedirectKind::Append => {
                options.append(true).create(true);
                STDOUT
            }
        };

        let file = options.open(&redirect.file).map_err(|source| ExecError::Redirect {
            file: redirect.file.clone(),
            source,
            input: redirect.kind == RedirectKind::In,
        })?;
        let fd = file.into_raw_fd();
        log::debug!("redirect {} {} -> fd {}", redirect.kind.symbol(), redirect.file, target);

        // The descriptor may already be the target if 0 or 1 was closed.
        if fd != target {
            dup2(fd, target)?;
            close(fd)?;
        }
        Ok(())
    }
}

/// Copies of descriptors 0 and 1 taken before a scoped redirection.
struct SavedStdio {
    stdin: RawFd,
    stdout: RawFd,
}

impl SavedStdio {
    fn save() -> Result<Self, ExecError> {
        let _ = io::stdout().flush();
        let stdin = dup(STDIN)?;
        let stdout = match dup(STDOUT) {
            Ok(fd) => fd,
            Err(e) => {
                let _ = close(stdin);
                return Err(e.into());
            }
        };
        Ok(SavedStdio { stdin, stdout })
    }

    fn restore(self) -> Result<(), ExecError> {
        // Buffered output belongs to the redirected descriptor.
        let _ = io::stdout().flush();
        let back_in = dup2(self.stdin, STDIN).map(drop);
        let back_out = dup2(self.stdout, STDOUT).map(drop);
        let _ = close(self.stdin);
        let _ = close(self.stdout);
        back_in.and(back_out)?;
        Ok(())
    }
}
