// src/error.rs
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::discovery::ToolKind;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("no usable {kind} found on PATH (tried: {})", .candidates.join(", "))]
    ToolNotFound {
        kind: ToolKind,
        candidates: Vec<String>,
    },
}

/// Failures of the compile step. All of these end the pipeline.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("only .c/.cpp/.cxx sources can be compiled, got {extension:?} ({})", .path.display())]
    UnsupportedExtension { path: PathBuf, extension: String },
    #[error(transparent)]
    ToolNotFound(#[from] DiscoveryError),
    #[error("compilation failed: {stderr}")]
    CompileFailed { stderr: String },
    #[error("cannot determine the working directory: {0}")]
    WorkingDir(#[source] io::Error),
}

/// Failures of the HEX step. Never fatal; the converter falls back to the
/// executable.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("no objcopy tool available")]
    ToolNotFound,
    #[error("HEX conversion failed: {stderr}")]
    Failed { stderr: String },
    #[error("HEX conversion could not start: {0}")]
    Launch(#[source] io::Error),
    #[error("HEX file was not produced: {}", .0.display())]
    MissingOutput(PathBuf),
    #[error("HEX output would overwrite the executable: {}", .0.display())]
    SameAsInput(PathBuf),
}

/// Failures when executing the built program. Never fatal.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("program exited with {}: {stderr}", exit_status(.exit_code))]
    Failed { exit_code: Option<i32>, stderr: String },
    #[error("permission denied: cannot execute {}, it may need the execute bit", .0.display())]
    PermissionDenied(PathBuf),
    #[error("cannot start program: {0}")]
    Launch(#[source] io::Error),
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}
