// src/build/runner.rs
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::build::{Artifact, BuildContext};
use crate::error::RunError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// What happened when the run step was reached.
#[derive(Debug)]
pub enum RunOutcome {
    /// The artifact is a HEX image and cannot be executed.
    Skipped,
    Completed(RunResult),
    Failed(RunError),
}

/// Executes a freshly built program with no arguments.
pub struct ArtifactRunner<'a> {
    ctx: BuildContext<'a>,
}

impl<'a> ArtifactRunner<'a> {
    pub fn new(ctx: BuildContext<'a>) -> Self {
        ArtifactRunner { ctx }
    }

    pub fn run(&self, executable: &Path) -> Result<RunResult, RunError> {
        let output = self.ctx.commands.run(executable, &[]).map_err(|e| match e.kind() {
            io::ErrorKind::PermissionDenied => RunError::PermissionDenied(executable.to_path_buf()),
            _ => RunError::Launch(e),
        })?;

        if !output.success() {
            return Err(RunError::Failed {
                exit_code: output.exit_code,
                stderr: output.stderr,
            });
        }

        Ok(RunResult {
            exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    /// Runs `artifact` unless it is a HEX image, logging the outcome either
    /// way. Nothing here is fatal.
    pub fn run_artifact(&self, artifact: &Artifact) -> RunOutcome {
        let logger = self.ctx.logger;

        if artifact.is_hex() {
            logger.log("Note: a .hex file cannot be executed directly, skipping the run step");
            return RunOutcome::Skipped;
        }

        logger.log(format!("Running: {}", artifact.path.display()));

        match self.run(&artifact.path) {
            Ok(result) => {
                logger.log(format!("Finished: {}", artifact.path.display()));
                if !result.stdout.is_empty() {
                    logger.log(format!("Program output: {}", result.stdout));
                }
                RunOutcome::Completed(result)
            }
            Err(e @ RunError::PermissionDenied(_)) => {
                logger.log(format!("Permission error: {}", e));
                RunOutcome::Failed(e)
            }
            Err(e) => {
                logger.log(format!("Run failed: {}", e));
                RunOutcome::Failed(e)
            }
        }
    }
}
