//! Single-file C/C++ build helper: find a compiler on PATH, build the file,
//! convert the executable to Intel HEX with objcopy, optionally run it.

pub mod build;
pub mod compiler;
pub mod config;
pub mod converter;
pub mod discovery;
pub mod error;
pub mod logger;
pub mod orchestrator;
pub mod process;

pub use build::runner::{ArtifactRunner, RunOutcome, RunResult};
pub use build::{Artifact, ArtifactKind, BuildContext};
pub use compiler::{CompileJob, Compiler, CompilerFamily};
pub use config::{LogConfig, Platform};
pub use converter::{ConversionJob, HexConverter};
pub use discovery::{resolve_first, PathResolver, ResolvedTool, ToolResolver};
pub use error::{CompileError, ConvertError, DiscoveryError, RunError};
pub use logger::Logger;
pub use orchestrator::{Orchestrator, PipelineOptions, RunFlag, RunSummary, Stage};
pub use process::{CommandRunner, ProcessOutput, SystemCommandRunner};
