//! Sequential sweep execution: one engine process at a time, each handed the
//! freshly rewritten input document through the working directory.

use super::{SweepMode, SweepPlan};
use crate::domain::{BuildRequest, GctitError, RunStage, SweepResult};
use crate::input::{self, STATE_FILE, STATE_SNAPSHOT_FILE};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Seam between the sweep loop and the external engine process.
pub trait EngineLauncher {
    fn is_available(&self) -> bool;

    /// Blocks until the engine exits and returns its exit status verbatim.
    fn launch(&self, working_dir: &Path) -> SweepResult<i32>;
}

/// Launches the engine executable with no arguments; it picks up the input
/// document from the working directory by convention.
#[derive(Debug, Clone)]
pub struct GctitProcess {
    engine_path: PathBuf,
}

impl GctitProcess {
    pub fn new(engine_path: impl Into<PathBuf>) -> Self {
        Self {
            engine_path: engine_path.into(),
        }
    }

    pub fn engine_path(&self) -> &Path {
        &self.engine_path
    }
}

impl EngineLauncher for GctitProcess {
    fn is_available(&self) -> bool {
        is_executable_file(&self.engine_path)
    }

    fn launch(&self, working_dir: &Path) -> SweepResult<i32> {
        let status = Command::new(&self.engine_path)
            .current_dir(working_dir)
            .status()
            .map_err(|source| {
                GctitError::io_system(
                    "IO.ENGINE_EXEC",
                    format!(
                        "failed to execute engine '{}': {}",
                        self.engine_path.display(),
                        source
                    ),
                )
            })?;

        status.code().ok_or_else(|| {
            GctitError::engine_run(
                "RUN.ENGINE_SIGNAL",
                format!(
                    "engine '{}' was terminated by a signal",
                    self.engine_path.display()
                ),
            )
        })
    }
}

fn is_executable_file(path: &Path) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOutcome {
    /// The engine executable was absent; nothing was written or launched.
    EngineMissing,
    Completed {
        /// Status of the last engine invocation, which becomes the driver's
        /// own exit status.
        exit_code: i32,
        invocations: usize,
    },
}

impl SweepOutcome {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::EngineMissing => 0,
            Self::Completed { exit_code, .. } => exit_code,
        }
    }
}

/// Writes the stage's input document and launches the engine once.
pub fn run_stage(
    launcher: &dyn EngineLauncher,
    working_dir: &Path,
    stage: RunStage,
    request: &BuildRequest,
) -> SweepResult<i32> {
    let path = input::write_input(working_dir, request)?;
    debug!(
        stage = %stage,
        micro = request.micro_steps,
        path = %path.display(),
        "input document written"
    );

    let exit_code = launcher.launch(working_dir)?;
    info!(stage = %stage, exit_code, "engine invocation finished");
    Ok(exit_code)
}

/// Iterates the parameter axes in order, activity-major, running the stage
/// schedule for each combination. The first nonzero engine status terminates
/// the sweep; in calibration-only mode the very first invocation does.
pub fn run_sweep(
    plan: &SweepPlan,
    launcher: &dyn EngineLauncher,
    working_dir: &Path,
) -> SweepResult<SweepOutcome> {
    if !launcher.is_available() {
        warn!("engine executable not found; skipping the sweep");
        return Ok(SweepOutcome::EngineMissing);
    }

    if plan.seed_state {
        seed_state_snapshot(working_dir)?;
    }

    let mut exit_code = 0;
    let mut invocations = 0;

    for &activity in &plan.activities {
        for &ph in &plan.ph_values {
            info!(activity, ph, "starting parameter combination");

            let calibration = BuildRequest::new(ph, plan.schedule.calibration_micro);
            exit_code = run_stage(launcher, working_dir, RunStage::Calibration, &calibration)?;
            invocations += 1;

            if plan.mode == SweepMode::CalibrationOnly || exit_code != 0 {
                return Ok(SweepOutcome::Completed {
                    exit_code,
                    invocations,
                });
            }

            let production = BuildRequest::new(ph, plan.schedule.production_micro);
            exit_code = run_stage(launcher, working_dir, RunStage::Production, &production)?;
            invocations += 1;

            if exit_code != 0 {
                return Ok(SweepOutcome::Completed {
                    exit_code,
                    invocations,
                });
            }
        }
    }

    Ok(SweepOutcome::Completed {
        exit_code,
        invocations,
    })
}

fn seed_state_snapshot(working_dir: &Path) -> SweepResult<()> {
    let snapshot = working_dir.join(STATE_SNAPSHOT_FILE);
    if !snapshot.is_file() {
        debug!(
            snapshot = %snapshot.display(),
            "no state snapshot present; the engine starts from a fresh configuration"
        );
        return Ok(());
    }

    let target = working_dir.join(STATE_FILE);
    fs::copy(&snapshot, &target).map_err(|source| {
        GctitError::io_system(
            "IO.STATE_SEED",
            format!(
                "failed to copy state snapshot '{}' to '{}': {}",
                snapshot.display(),
                target.display(),
                source
            ),
        )
    })?;
    info!(snapshot = %snapshot.display(), "seeded engine state from snapshot");
    Ok(())
}
