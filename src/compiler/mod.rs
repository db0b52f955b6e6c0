// src/compiler/mod.rs
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::build::{self, has_extension, BuildContext};
use crate::config::Platform;
use crate::discovery::{self, ResolvedTool};
use crate::error::CompileError;
use crate::process::command_line;

pub const SOURCE_EXTENSIONS: [&str; 3] = ["c", "cpp", "cxx"];

/// Invocation style, decided by the name of the discovered compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompilerFamily {
    Gnu,
    Llvm,
    Msvc,
    Generic,
}

impl CompilerFamily {
    pub fn from_tool_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        let stem = lower.strip_suffix(".exe").unwrap_or(&lower);
        match stem {
            "cl" => CompilerFamily::Msvc,
            "g++" | "gcc" => CompilerFamily::Gnu,
            "clang++" | "clang" => CompilerFamily::Llvm,
            _ => CompilerFamily::Generic,
        }
    }

    /// Arguments for an optimized single-file build of `source` into `output`.
    pub fn compile_args(self, source: &Path, output: &Path) -> Vec<OsString> {
        match self {
            CompilerFamily::Msvc => {
                let mut out_flag = OsString::from("/Fe:");
                out_flag.push(output);
                vec![out_flag, source.into(), "/O2".into(), "/nologo".into()]
            }
            CompilerFamily::Gnu | CompilerFamily::Llvm | CompilerFamily::Generic => {
                vec![source.into(), "-o".into(), output.into(), "-O2".into()]
            }
        }
    }
}

/// A validated source file and the executable it will become.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileJob {
    pub source: PathBuf,
    pub output: PathBuf,
}

impl CompileJob {
    /// Checks the source and works out the output path. Nothing is spawned.
    pub fn prepare(source: &Path, output: Option<&Path>, platform: Platform) -> Result<Self, CompileError> {
        let source = build::absolute(source).map_err(CompileError::WorkingDir)?;
        if !source.exists() {
            return Err(CompileError::SourceNotFound(source));
        }

        if !SOURCE_EXTENSIONS.iter().any(|ext| has_extension(&source, ext)) {
            let extension = source
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();
            return Err(CompileError::UnsupportedExtension { path: source, extension });
        }

        let output = match output {
            Some(path) => build::absolute(path).map_err(CompileError::WorkingDir)?,
            None => default_output(&source, platform),
        };

        Ok(CompileJob { source, output })
    }
}

/// Same stem as the source; `.exe` on Windows, bare elsewhere.
pub fn default_output(source: &Path, platform: Platform) -> PathBuf {
    let stem = source.file_stem().unwrap_or_else(|| source.as_os_str());
    let bare = source.with_file_name(stem);
    match platform.executable_extension() {
        Some(ext) => build::append_extension(&bare, ext),
        None => bare,
    }
}

pub struct Compiler<'a> {
    ctx: BuildContext<'a>,
}

impl<'a> Compiler<'a> {
    pub fn new(ctx: BuildContext<'a>) -> Self {
        Compiler { ctx }
    }

    /// Builds `source` into a native executable and returns its absolute path.
    pub fn compile(&self, source: &Path, output: Option<&Path>) -> Result<PathBuf, CompileError> {
        let job = CompileJob::prepare(source, output, self.ctx.platform)?;
        let compiler = discovery::find_compiler(self.ctx.resolver, self.ctx.logger)?;
        self.run_job(&compiler, &job)?;
        Ok(job.output)
    }

    fn run_job(&self, compiler: &ResolvedTool, job: &CompileJob) -> Result<(), CompileError> {
        let family = CompilerFamily::from_tool_name(&compiler.name);
        let args = family.compile_args(&job.source, &job.output);
        log::debug!("{} treated as {:?}", compiler.name, family);

        self.ctx
            .logger
            .log(format!("Compile command: {}", command_line(Path::new(&compiler.name), &args)));

        let output = self
            .ctx
            .commands
            .run(&compiler.path, &args)
            .map_err(|e| CompileError::CompileFailed {
                stderr: format!("could not run {}: {}", compiler.name, e),
            })?;

        if !output.success() {
            return Err(CompileError::CompileFailed { stderr: output.stderr });
        }

        if !output.stderr.trim().is_empty() {
            self.ctx.logger.log(format!("Compiler warnings: {}", output.stderr.trim_end()));
        }

        // some compilers report success without writing anything
        if !job.output.exists() {
            return Err(CompileError::CompileFailed {
                stderr: format!("no executable was produced at {}", job.output.display()),
            });
        }

        Ok(())
    }
}
