use std::path::PathBuf;

use argh::FromArgs;
use log::LevelFilter;

use pipeline_shell::config::ConfigLoader;
use pipeline_shell::error::ShellError;
use pipeline_shell::executor::ProcessExecutor;
use pipeline_shell::logging;
use pipeline_shell::repl::Repl;

/// A small shell: simple commands, `<`, `>`, `>>`, `|` and `;`.
#[derive(FromArgs)]
struct Args {
    /// path to a key=value configuration file
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// log at debug level
    #[argh(switch, short = 'v')]
    verbose: bool,
}

fn main() {
    let args: Args = argh::from_env();
    match run(args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("psh: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: Args) -> Result<i32, ShellError> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::default_config(),
    };
    if args.verbose {
        config.log_level = LevelFilter::Debug;
    }
    logging::init(config.log_level, config.log_file.as_deref()).map_err(ShellError::Logging)?;
    log::debug!("starting with {:?}", config);

    let mut repl = Repl::new(&config, ProcessExecutor::new());
    repl.run()
}
