mod commands;

use clap::Parser;
use gctit_core::domain::{GctitError, RunStage};

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().collect();
    match run(args) {
        Ok(code) => code,
        Err(error) => {
            let diagnostic = error.as_gctit_error();
            eprintln!("{}", diagnostic.diagnostic_line());
            if let Some(summary_line) = diagnostic.fatal_exit_line() {
                eprintln!("{}", summary_line);
            }
            diagnostic.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    match Cli::try_parse_from(&args) {
        Ok(cli) => dispatch_parsed(cli.command),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "gctit-sweep",
    about = "Parameter-sweep driver for the external gctit titration engine"
)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Sweep the activity/pH axes, invoking the engine per combination
    Sweep(commands::SweepArgs),
    /// Run a single calibration stage in the current directory
    Calibrate(commands::StageArgs),
    /// Run a single production stage in the current directory
    Produce(commands::StageArgs),
    /// Write the input document without launching the engine
    Input(commands::InputArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Sweep(args) => commands::run_sweep_command(args),
        CliCommand::Calibrate(args) => commands::run_stage_command(args, RunStage::Calibration),
        CliCommand::Produce(args) => commands::run_stage_command(args, RunStage::Production),
        CliCommand::Input(args) => commands::run_input_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Driver(GctitError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_gctit_error(&self) -> GctitError {
        match self {
            Self::Usage(message) => GctitError::input_validation("INPUT.CLI_USAGE", message.clone()),
            Self::Driver(error) => error.clone(),
            Self::Internal(error) => GctitError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}
