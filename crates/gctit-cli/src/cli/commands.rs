use super::CliError;
use gctit_core::domain::{BuildRequest, GctitError, RunStage};
use gctit_core::input;
use gctit_core::sweep::{
    self, EngineLauncher, GctitProcess, StageSchedule, SweepMode, SweepOutcome, SweepPlan,
};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(clap::Args)]
pub(super) struct SweepArgs {
    /// Engine executable path
    #[arg(long, default_value = sweep::DEFAULT_ENGINE_PATH)]
    engine: PathBuf,

    /// Bulk salt activity axis, outer loop (repeat for multiple values)
    #[arg(long = "activity", value_name = "ACTIVITY", default_values_t = vec![0.011])]
    activities: Vec<f64>,

    /// Solution pH axis, inner loop (repeat for multiple values)
    #[arg(long = "ph", value_name = "PH", default_values_t = vec![0.0])]
    ph_values: Vec<f64>,

    /// Calibration-stage micro step count
    #[arg(long, default_value_t = sweep::DEFAULT_CALIBRATION_MICRO)]
    calibration_micro: u64,

    /// Production-stage micro step count
    #[arg(long, default_value_t = sweep::DEFAULT_PRODUCTION_MICRO)]
    production_micro: u64,

    /// Run the production stage and the remaining combinations instead of
    /// stopping after the first calibration invocation
    #[arg(long)]
    full: bool,

    /// Seed the engine state file from a prior snapshot before the sweep
    #[arg(long)]
    seed_state: bool,
}

impl SweepArgs {
    fn into_plan(self) -> SweepPlan {
        SweepPlan {
            activities: self.activities,
            ph_values: self.ph_values,
            schedule: StageSchedule {
                calibration_micro: self.calibration_micro,
                production_micro: self.production_micro,
            },
            mode: if self.full {
                SweepMode::Full
            } else {
                SweepMode::CalibrationOnly
            },
            seed_state: self.seed_state,
        }
    }
}

#[derive(clap::Args)]
pub(super) struct StageArgs {
    /// Engine executable path
    #[arg(long, default_value = sweep::DEFAULT_ENGINE_PATH)]
    engine: PathBuf,

    /// Solution pH broadcast into every ladder reaction
    #[arg(long, default_value_t = 0.0)]
    ph: f64,

    /// Override the stage's micro step count
    #[arg(long)]
    micro: Option<u64>,
}

#[derive(clap::Args)]
pub(super) struct InputArgs {
    /// Solution pH broadcast into every ladder reaction
    #[arg(long, default_value_t = 0.0)]
    ph: f64,

    /// Inner MC step count per macro cycle
    #[arg(long, default_value_t = sweep::DEFAULT_CALIBRATION_MICRO)]
    micro: u64,

    /// Directory the document is written into
    #[arg(long, default_value = ".")]
    dir: PathBuf,
}

pub(super) fn run_sweep_command(args: SweepArgs) -> Result<i32, CliError> {
    let working_dir = current_working_dir()?;
    let launcher = GctitProcess::new(resolve_cli_path(&working_dir, &args.engine));
    let plan = args.into_plan();
    debug!(engine = %launcher.engine_path().display(), ?plan.mode, "sweep configured");

    match sweep::run_sweep(&plan, &launcher, &working_dir).map_err(CliError::Driver)? {
        SweepOutcome::EngineMissing => {
            println!(
                "Engine executable not found at '{}'; nothing to run.",
                launcher.engine_path().display()
            );
            Ok(0)
        }
        SweepOutcome::Completed {
            exit_code,
            invocations,
        } => {
            println!(
                "Sweep finished after {} engine invocation(s) with exit status {}.",
                invocations, exit_code
            );
            Ok(exit_code)
        }
    }
}

pub(super) fn run_stage_command(args: StageArgs, stage: RunStage) -> Result<i32, CliError> {
    let working_dir = current_working_dir()?;
    let launcher = GctitProcess::new(resolve_cli_path(&working_dir, &args.engine));
    if !launcher.is_available() {
        return Err(CliError::Driver(GctitError::input_validation(
            "INPUT.CLI_ENGINE",
            format!(
                "engine executable '{}' is missing or not executable",
                launcher.engine_path().display()
            ),
        )));
    }

    let micro = args
        .micro
        .unwrap_or_else(|| StageSchedule::default().micro_steps(stage));
    let request = BuildRequest::new(args.ph, micro);

    println!("Running {} stage at pH {}...", stage, request.ph);
    let exit_code = sweep::run_stage(&launcher, &working_dir, stage, &request)
        .map_err(CliError::Driver)?;
    println!("{} stage finished with exit status {}.", stage, exit_code);
    Ok(exit_code)
}

pub(super) fn run_input_command(args: InputArgs) -> Result<i32, CliError> {
    let working_dir = current_working_dir()?;
    let dir = resolve_cli_path(&working_dir, &args.dir);
    let request = BuildRequest::new(args.ph, args.micro);

    let path = input::write_input(&dir, &request).map_err(CliError::Driver)?;
    println!("Input document written to '{}'.", path.display());
    Ok(0)
}

fn current_working_dir() -> Result<PathBuf, CliError> {
    std::env::current_dir().map_err(|source| {
        CliError::Driver(GctitError::io_system(
            "IO.CLI_CURRENT_DIR",
            format!("failed to read current working directory: {}", source),
        ))
    })
}

fn resolve_cli_path(working_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        working_dir.join(path)
    }
}
