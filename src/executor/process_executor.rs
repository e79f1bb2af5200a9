use std::convert::Infallible;
use std::ffi::CString;
use std::io::{self, Write};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::{AsRawFd, RawFd};

use nix::errno::Errno;
use nix::sys::signal::{signal, SigHandler, Signal};
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{close, dup2, execv, fork, pipe, ForkResult, Pid};

use crate::ast::{AstNode, CommandNode};
use crate::executor::{
    builtins::BuiltinManager,
    path_resolver::PathResolver,
    redirect::{RedirectHandler, STDIN, STDOUT},
    ExecError, ExecOutcome, ExecStatus, Executor,
};

/// Turns an operator tree into processes.
///
/// `exec` is the entry point used by the REPL. A builtin that makes up the
/// whole line runs in the interpreter itself, with its redirections applied
/// around it and undone afterwards; anything else is forked once
/// and realized in that child, which then forks at every pipe and sequence
/// node below it. Every process forked here is waited for by the process
/// that forked it.
pub struct ProcessExecutor {
    builtins: BuiltinManager,
    resolver: PathResolver,
}

impl ProcessExecutor {
    pub fn new() -> Self {
        ProcessExecutor {
            builtins: BuiltinManager::new(),
            resolver: PathResolver,
        }
    }

    /// Forks a child that runs `stage` and leaves with its return value.
    fn spawn<F>(&mut self, stage: F) -> Result<Pid, ExecError>
    where
        F: FnOnce(&mut Self) -> i32,
    {
        flush_std();
        match unsafe { fork() } {
            Ok(ForkResult::Parent { child }) => {
                log::debug!("forked {}", child);
                Ok(child)
            }
            Ok(ForkResult::Child) => {
                let code = stage(self);
                terminate(code)
            }
            Err(e) => {
                log::warn!("fork failed: {}", e);
                Err(ExecError::Spawn(e))
            }
        }
    }

    /// Realizes `node` in the current process, which must be a child forked
    /// by this executor. The return value is the status the process should
    /// exit with; a successful external command never returns.
    fn realize(&mut self, node: &AstNode) -> i32 {
        match node {
            AstNode::Command(cmd) => self.realize_command(cmd),
            AstNode::Pipeline(lhs, rhs) => self.realize_pipeline(lhs, rhs),
            AstNode::Sequence(first, rest) => self.realize_sequence(first, rest),
            AstNode::Invalid(e) => {
                eprintln!("{}", e);
                1
            }
        }
    }

    fn realize_command(&mut self, cmd: &CommandNode) -> i32 {
        let Some(name) = cmd.name() else {
            return 0;
        };

        if let Err(e) = RedirectHandler::apply(cmd) {
            eprintln!("{}", e);
            return 1;
        }

        // Inside a forked subtree a builtin only affects this process.
        if self.builtins.is_builtin(name) {
            return match self.builtins.execute(name, cmd.args()) {
                Ok(outcome) => outcome.code(),
                Err(e) => {
                    eprintln!("{}", e);
                    1
                }
            };
        }

        match self.exec_program(cmd, name) {
            Ok(never) => match never {},
            Err(e @ ExecError::CommandNotFound(_)) => {
                eprintln!("{}", e);
                127
            }
            Err(e) => {
                eprintln!("{}", e);
                126
            }
        }
    }

    /// Replaces the process image with the program named by `cmd.argv[0]`.
    fn exec_program(&self, cmd: &CommandNode, name: &str) -> Result<Infallible, ExecError> {
        let path = self
            .resolver
            .resolve(name)
            .ok_or_else(|| ExecError::CommandNotFound(name.to_string()))?;
        let program = CString::new(path.as_os_str().as_bytes())?;
        let argv = cmd
            .argv
            .iter()
            .map(|arg| CString::new(arg.as_str()))
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!("exec {} {:?} in pid {}", path.display(), cmd.args(), std::process::id());
        // The Rust runtime ignores SIGPIPE and exec would keep it ignored.
        unsafe { signal(Signal::SIGPIPE, SigHandler::SigDfl)? };
        flush_std();
        execv(&program, &argv).map_err(|source| ExecError::Exec {
            name: name.to_string(),
            source,
        })
    }

    fn realize_pipeline(&mut self, lhs: &AstNode, rhs: &AstNode) -> i32 {
        let (read_end, write_end) = match pipe() {
            Ok(ends) => ends,
            Err(e) => {
                eprintln!("Error: cannot create pipe: {}", e);
                return 1;
            }
        };
        let (r, w) = (read_end.as_raw_fd(), write_end.as_raw_fd());

        let left = self.spawn(|exec| match connect(w, STDOUT, [r, w]) {
            Ok(()) => exec.realize(lhs),
            Err(e) => {
                eprintln!("Error: cannot connect pipe: {}", e);
                1
            }
        });
        let right = self.spawn(|exec| match connect(r, STDIN, [r, w]) {
            Ok(()) => exec.realize(rhs),
            Err(e) => {
                eprintln!("Error: cannot connect pipe: {}", e);
                1
            }
        });

        // Both ends must be gone from this process before waiting, or the
        // reader never sees end-of-file.
        drop(read_end);
        drop(write_end);

        if let Err(e) = left.and_then(wait_for) {
            eprintln!("{}", e);
        }
        match right.and_then(wait_for) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("{}", e);
                1
            }
        }
    }

    // `;` never short-circuits: the rest runs whatever `first` returned.
    fn realize_sequence(&mut self, first: &AstNode, rest: &AstNode) -> i32 {
        match self.spawn(|exec| exec.realize(first)).and_then(wait_for) {
            Ok(code) => log::debug!("sequence head exited with {}", code),
            Err(e) => eprintln!("{}", e),
        }
        self.realize(rest)
    }
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for ProcessExecutor {
    fn exec(&mut self, node: &AstNode) -> ExecStatus {
        match node {
            AstNode::Command(cmd) => match cmd.name() {
                None => Ok(ExecOutcome::Code(0)),
                Some(name) if self.builtins.is_builtin(name) => {
                    if cmd.input.is_none() && cmd.output.is_none() {
                        return self.builtins.execute(name, cmd.args());
                    }
                    let builtins = &self.builtins;
                    match RedirectHandler::scoped(cmd, || builtins.execute(name, cmd.args())) {
                        Ok(status) => status,
                        Err(e) => {
                            eprintln!("{}", e);
                            Ok(ExecOutcome::Code(1))
                        }
                    }
                }
                Some(_) => self.exec_forked(node),
            },
            AstNode::Invalid(e) => {
                eprintln!("{}", e);
                Ok(ExecOutcome::Code(1))
            }
            AstNode::Pipeline(..) | AstNode::Sequence(..) => self.exec_forked(node),
        }
    }
}

impl ProcessExecutor {
    fn exec_forked(&mut self, node: &AstNode) -> ExecStatus {
        let pid = self.spawn(|exec| exec.realize(node))?;
        let code = wait_for(pid)?;
        log::debug!("line finished with {}", code);
        Ok(ExecOutcome::Code(code))
    }
}

/// Moves `end` onto `target` and closes the original pipe descriptors.
fn connect(end: RawFd, target: RawFd, pipe_fds: [RawFd; 2]) -> nix::Result<()> {
    if end != target {
        dup2(end, target)?;
    }
    for fd in stale_pipe_fds(target, pipe_fds) {
        close(fd)?;
    }
    Ok(())
}

/// Pipe descriptors left to close once `target` is wired. `pipe` may hand
/// out 0 or 1 when the shell started with them closed, and `target` itself
/// must stay open.
fn stale_pipe_fds(target: RawFd, pipe_fds: [RawFd; 2]) -> impl Iterator<Item = RawFd> {
    pipe_fds.into_iter().filter(move |&fd| fd != target)
}

/// Blocks until `pid` exits and returns its status the way a shell reports it.
fn wait_for(pid: Pid) -> Result<i32, ExecError> {
    loop {
        match waitpid(pid, None) {
            Ok(WaitStatus::Exited(_, code)) => return Ok(code),
            Ok(WaitStatus::Signaled(_, sig, _)) => return Ok(128 + sig as i32),
            Ok(_) => continue,
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(ExecError::Nix(e)),
        }
    }
}

fn flush_std() {
    let _ = io::stdout().flush();
    let _ = io::stderr().flush();
}

/// Leaves a forked child without running the parent's cleanup.
fn terminate(code: i32) -> ! {
    flush_std();
    unsafe { libc::_exit(code) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_empty_line_is_noop() {
        let mut exec = ProcessExecutor::new();
        let empty = AstNode::Command(CommandNode::default());
        assert!(matches!(exec.exec(&empty), Ok(ExecOutcome::Code(0))));
    }

    #[test]
    fn test_top_level_exit_is_reported() {
        let mut exec = ProcessExecutor::new();
        let exit = AstNode::Command(CommandNode {
            argv: vec!["exit".to_string(), "4".to_string()],
            ..Default::default()
        });
        assert!(matches!(exec.exec(&exit), Ok(ExecOutcome::Exit(4))));
    }

    #[test]
    fn test_pipe_end_already_on_target_stays_open() {
        assert_eq!(stale_pipe_fds(STDIN, [0, 4]).collect::<Vec<_>>(), vec![4]);
        assert_eq!(stale_pipe_fds(STDOUT, [0, 1]).collect::<Vec<_>>(), vec![0]);
        assert_eq!(stale_pipe_fds(STDOUT, [3, 4]).collect::<Vec<_>>(), vec![3, 4]);
    }
}
