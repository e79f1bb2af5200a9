use std::collections::HashMap;

use crate::executor::{ExecError, ExecOutcome, ExecStatus};

/// Commands that must run inside the interpreter's own process.
pub trait BuiltinCommand {
    fn name(&self) -> &'static str;
    fn run(&self, args: &[String]) -> ExecOutcome;
}

pub struct BuiltinManager {
    commands: HashMap<String, Box<dyn BuiltinCommand>>,
}

impl BuiltinManager {
    pub fn new() -> Self {
        let mut mgr = BuiltinManager {
            commands: HashMap::new(),
        };
        mgr.register(Box::new(HelpCommand {}));
        mgr.register(Box::new(CdCommand {}));
        mgr.register(Box::new(ExitCommand {}));
        mgr
    }

    pub fn register(&mut self, cmd: Box<dyn BuiltinCommand>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn execute(&self, name: &str, args: &[String]) -> ExecStatus {
        match self.commands.get(name) {
            Some(cmd) => {
                log::debug!("builtin {} {:?} in pid {}", name, args, std::process::id());
                Ok(cmd.run(args))
            }
            None => Err(ExecError::NoSuchBuiltin(name.to_string())),
        }
    }
}

impl Default for BuiltinManager {
    fn default() -> Self {
        Self::new()
    }
}

pub struct HelpCommand;

impl BuiltinCommand for HelpCommand {
    fn name(&self) -> &'static str {
        "help"
    }
    fn run(&self, _args: &[String]) -> ExecOutcome {
        println!("Available built-in commands:");
        println!("  cd DIR     : Change directory");
        println!("  exit [N]   : Exit shell");
        println!("  help       : Show this help");
        println!("Operators: cmd < in, cmd > out, cmd >> out, a | b, a ; b");
        ExecOutcome::Code(0)
    }
}

pub struct CdCommand;

impl BuiltinCommand for CdCommand {
    fn name(&self) -> &'static str {
        "cd"
    }
    fn run(&self, args: &[String]) -> ExecOutcome {
        let target = match args {
            [target] => target,
            [] => {
                eprintln!("cd: Path argument is required");
                return ExecOutcome::Code(1);
            }
            _ => {
                eprintln!("cd: too many arguments");
                return ExecOutcome::Code(1);
            }
        };
        match std::env::set_current_dir(target) {
            Ok(_) => ExecOutcome::Code(0),
            Err(e) => {
                log::warn!("chdir {}: {}", target, e);
                eprintln!("cd error: failed to change directory to {}", target);
                ExecOutcome::Code(1)
            }
        }
    }
}

pub struct ExitCommand;

impl BuiltinCommand for ExitCommand {
    fn name(&self) -> &'static str {
        "exit"
    }
    fn run(&self, args: &[String]) -> ExecOutcome {
        match args.first().map(|s| s.parse::<i32>()) {
            None => ExecOutcome::Exit(0),
            Some(Ok(code)) => ExecOutcome::Exit(code),
            Some(Err(_)) => {
                eprintln!("exit: numeric argument required: {}", args[0]);
                ExecOutcome::Code(2)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_registry() {
        let mgr = BuiltinManager::new();
        assert!(mgr.is_builtin("cd"));
        assert!(mgr.is_builtin("exit"));
        assert!(mgr.is_builtin("help"));
        assert!(!mgr.is_builtin("ls"));
        assert!(matches!(
            mgr.execute("ls", &[]),
            Err(ExecError::NoSuchBuiltin(name)) if name == "ls"
        ));
    }

    #[test]
    fn test_cd_without_argument_keeps_directory() {
        let before = std::env::current_dir().unwrap();
        assert_eq!(CdCommand.run(&[]), ExecOutcome::Code(1));
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_cd_with_extra_argument_keeps_directory() {
        let before = std::env::current_dir().unwrap();
        let outcome = CdCommand.run(&strings(&["/", "/tmp"]));
        assert_eq!(outcome, ExecOutcome::Code(1));
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_cd_to_missing_directory_fails() {
        let before = std::env::current_dir().unwrap();
        let outcome = CdCommand.run(&strings(&["/definitely/not/a/dir"]));
        assert_eq!(outcome, ExecOutcome::Code(1));
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCommand.run(&[]), ExecOutcome::Exit(0));
        assert_eq!(ExitCommand.run(&strings(&["3"])), ExecOutcome::Exit(3));
        assert_eq!(ExitCommand.run(&strings(&["three"])), ExecOutcome::Code(2));
    }
}
