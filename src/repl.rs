use crate::config::Config;
use crate::error::ShellError;
use crate::executor::{ExecOutcome, Executor};
use crate::parser::{default::DefaultParser, Parser};
use crate::prompt::ShellPrompt;

pub struct Repl<E: Executor> {
    prompt: ShellPrompt,
    executor: E,
    max_args: usize,
}

impl<E: Executor> Repl<E> {
    pub fn new(config: &Config, executor: E) -> Self {
        Repl {
            prompt: ShellPrompt::new(&config.prompt, config.max_line),
            executor,
            max_args: config.max_args,
        }
    }

    /// Runs until end of input or a top-level `exit`, returning the status
    /// the interpreter should exit with.
    pub fn run(&mut self) -> Result<i32, ShellError> {
        loop {
            self.prompt.show_prompt()?;
            let Some(line) = self.prompt.read_line()? else {
                // End with EOF (e.g. Ctrl+D)
                return Ok(0);
            };
            if let Some(code) = self.run_line(&line) {
                return Ok(code);
            }
        }
    }

    /// Executes one line. Returns `Some(code)` when the interpreter should stop.
    pub fn run_line(&mut self, line: &str) -> Option<i32> {
        let ast = DefaultParser::new(line).with_max_args(self.max_args).parse();
        log::debug!("parsed {:?}", ast);

        match self.executor.exec(&ast) {
            Ok(ExecOutcome::Exit(code)) => Some(code),
            Ok(ExecOutcome::Code(code)) => {
                log::debug!("status {}", code);
                None
            }
            Err(e) => {
                eprintln!("{}", e);
                None
            }
        }
    }
}
