mod executor;
mod process_executor;
pub mod builtins;
pub mod path_resolver;
pub mod redirect;

pub use executor::{Executor, ExecError, ExecOutcome, ExecStatus};
pub use process_executor::ProcessExecutor;
