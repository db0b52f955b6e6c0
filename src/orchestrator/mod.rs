// src/orchestrator/mod.rs
use std::fmt;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;

use crate::build::runner::{ArtifactRunner, RunOutcome, RunResult};
use crate::build::{Artifact, BuildContext};
use crate::compiler::Compiler;
use crate::converter::HexConverter;
use crate::logger::Logger;

/// Whether the built program is executed after the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunFlag {
    Skip,
    Run,
}

impl RunFlag {
    /// Accepts exactly `"1"` and `"0"`; a missing argument means `Skip`.
    pub fn parse(arg: Option<&str>) -> Result<Self, String> {
        match arg {
            None | Some("0") => Ok(RunFlag::Skip),
            Some("1") => Ok(RunFlag::Run),
            Some(other) => Err(other.to_string()),
        }
    }
}

impl fmt::Display for RunFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunFlag::Run => write!(f, "run"),
            RunFlag::Skip => write!(f, "do not run"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Start,
    Compiling,
    Converting,
    Running,
    Done,
}

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub source: PathBuf,
    pub run_flag: Option<String>,
    pub output: Option<PathBuf>,
    pub hex_output: Option<PathBuf>,
}

/// Outcome of one pipeline run, for callers and `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub source: PathBuf,
    pub run_flag: RunFlag,
    /// Last stage entered before `Done`.
    pub final_stage: Stage,
    pub executable: Option<PathBuf>,
    pub artifact: Option<Artifact>,
    pub run_result: Option<RunResult>,
    pub error: Option<String>,
    pub elapsed_secs: f64,
}

/// Sequences compile, HEX conversion and the optional run.
pub struct Orchestrator<'a> {
    ctx: BuildContext<'a>,
    stage: Stage,
}

impl<'a> Orchestrator<'a> {
    pub fn new(ctx: BuildContext<'a>) -> Self {
        Orchestrator { ctx, stage: Stage::Start }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn enter(&mut self, next: Stage) {
        log::debug!("pipeline {:?} -> {:?}", self.stage, next);
        self.stage = next;
    }

    /// Runs the whole pipeline. Failures are logged, never returned; the
    /// closing banner is always written.
    pub fn run(&mut self, options: &PipelineOptions) -> RunSummary {
        let logger = self.ctx.logger;

        let run_flag = RunFlag::parse(options.run_flag.as_deref()).unwrap_or_else(|bad| {
            logger.log(format!(
                "Error: the run flag only accepts '1' (run) or '0' (do not run), got '{}'; using '0'",
                bad
            ));
            RunFlag::Skip
        });

        logger.banner();
        logger.log("HexScript started: compile C/C++");
        logger.log(format!("Source file: {}", options.source.display()));
        logger.log(format!("Run flag: {}", run_flag));
        logger.banner();

        let started = Instant::now();
        let mut summary = RunSummary {
            source: options.source.clone(),
            run_flag,
            final_stage: Stage::Start,
            executable: None,
            artifact: None,
            run_result: None,
            error: None,
            elapsed_secs: 0.0,
        };

        self.build(options, run_flag, &mut summary);
        summary.final_stage = self.stage;
        self.enter(Stage::Done);

        summary.elapsed_secs = started.elapsed().as_secs_f64();
        logger.banner();
        logger.log("Done");
        logger.log(format!("Elapsed: {:.2}s", summary.elapsed_secs));
        logger.log(format!("Run log: {}", logger.log_path().display()));
        logger.banner();

        summary
    }

    fn build(&mut self, options: &PipelineOptions, run_flag: RunFlag, summary: &mut RunSummary) {
        let logger = self.ctx.logger;

        self.enter(Stage::Compiling);
        let executable = match Compiler::new(self.ctx).compile(&options.source, options.output.as_deref()) {
            Ok(path) => path,
            Err(e) => {
                logger.log(format!("Error: {}", e));
                summary.error = Some(e.to_string());
                return;
            }
        };
        logger.log(format!("Executable built: {}", executable.display()));
        summary.executable = Some(executable.clone());

        self.enter(Stage::Converting);
        let converted = HexConverter::new(self.ctx).convert(&executable, options.hex_output.as_deref());
        logger.log(format!("Final output: {}", converted.display()));
        let artifact = Artifact::from_conversion(&executable, converted);
        summary.artifact = Some(artifact.clone());

        if run_flag == RunFlag::Skip {
            logger.log(format!("{} was not run (default)", executable.display()));
            return;
        }

        self.enter(Stage::Running);
        match ArtifactRunner::new(self.ctx).run_artifact(&artifact) {
            RunOutcome::Completed(result) => summary.run_result = Some(result),
            RunOutcome::Failed(e) => summary.error = Some(e.to_string()),
            RunOutcome::Skipped => {}
        }
    }
}

/// Keeps a double-clicked console window open until a key is pressed.
pub fn wait_for_keypress(logger: &Logger) {
    logger.log("Press Enter to exit...");
    let mut byte = [0u8; 1];
    if let Err(e) = io::stdin().read(&mut byte) {
        log::debug!("stdin unavailable: {}", e);
    }
}
