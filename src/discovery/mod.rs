// src/discovery/mod.rs
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use serde::Serialize;

use crate::config::Platform;
use crate::error::DiscoveryError;
use crate::logger::Logger;

lazy_static! {
    // Probed in order; the first hit wins.
    pub static ref COMPILER_CANDIDATES: Vec<&'static str> = vec![
        "g++",      // GNU
        "clang++",  // LLVM
        "cl",       // MSVC
        "c++",      // generic alias
    ];

    pub static ref CONVERTER_CANDIDATES: Vec<&'static str> = vec![
        "objcopy",
        "llvm-objcopy",
        "x86_64-w64-mingw32-objcopy",
    ];

    static ref WINDOWS_CONVERTER_CANDIDATES: Vec<&'static str> = vec![
        "objcopy.exe",
        "llvm-objcopy.exe",
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ToolKind {
    Compiler,
    Converter,
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolKind::Compiler => write!(f, "C/C++ compiler"),
            ToolKind::Converter => write!(f, "objcopy tool"),
        }
    }
}

/// A candidate name that resolved, and where it resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTool {
    pub name: String,
    pub path: PathBuf,
}

/// Maps an executable name to a runnable path.
pub trait ToolResolver {
    fn resolve(&self, name: &str) -> Option<PathBuf>;
}

/// Looks names up in the `PATH` environment variable.
#[derive(Debug, Clone)]
pub struct PathResolver {
    dirs: Vec<PathBuf>,
    suffixes: Vec<String>,
}

impl PathResolver {
    pub fn from_env() -> Self {
        let dirs = env::var_os("PATH")
            .map(|path| env::split_paths(&path).collect())
            .unwrap_or_default();

        let suffixes = if cfg!(windows) {
            env::var("PATHEXT")
                .unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string())
                .split(';')
                .filter(|ext| !ext.is_empty())
                .map(str::to_string)
                .collect()
        } else {
            Vec::new()
        };

        PathResolver { dirs, suffixes }
    }

    pub fn with_dirs(dirs: Vec<PathBuf>) -> Self {
        PathResolver { dirs, suffixes: Vec::new() }
    }

    fn check_candidate(&self, candidate: &Path) -> Option<PathBuf> {
        if is_executable(candidate) {
            return Some(candidate.to_path_buf());
        }

        self.suffixes.iter().find_map(|suffix| {
            let mut with_suffix = candidate.as_os_str().to_owned();
            with_suffix.push(suffix);
            let with_suffix = PathBuf::from(with_suffix);
            is_executable(&with_suffix).then_some(with_suffix)
        })
    }
}

impl ToolResolver for PathResolver {
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let as_path = Path::new(name);
        if as_path.components().count() > 1 {
            return self.check_candidate(as_path);
        }

        self.dirs.iter().find_map(|dir| self.check_candidate(&dir.join(name)))
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Returns the first candidate the resolver knows about.
pub fn resolve_first<S: AsRef<str>>(
    candidates: &[S],
    resolver: &dyn ToolResolver,
) -> Option<ResolvedTool> {
    candidates.iter().find_map(|name| {
        let name = name.as_ref();
        resolver.resolve(name).map(|path| ResolvedTool {
            name: name.to_string(),
            path,
        })
    })
}

pub fn converter_candidates(platform: Platform) -> Vec<&'static str> {
    let mut candidates = CONVERTER_CANDIDATES.clone();
    if platform.is_windows() {
        candidates.extend(WINDOWS_CONVERTER_CANDIDATES.iter());
    }
    candidates
}

/// Same as `resolve_first`, with every lookup and hit written to the
/// progress log.
fn search(candidates: &[&str], resolver: &dyn ToolResolver, logger: &Logger) -> Option<ResolvedTool> {
    for name in candidates {
        logger.log(format!("Probing: {}", name));
        if let Some(tool) = resolve_first(&[*name], resolver) {
            logger.log(format!("Found: {}", tool.name));
            log::debug!("{} resolved to {}", tool.name, tool.path.display());
            return Some(tool);
        }
    }
    None
}

pub fn find_compiler(resolver: &dyn ToolResolver, logger: &Logger) -> Result<ResolvedTool, DiscoveryError> {
    logger.log("Searching for a C/C++ compiler");
    search(&COMPILER_CANDIDATES[..], resolver, logger).ok_or_else(|| DiscoveryError::ToolNotFound {
        kind: ToolKind::Compiler,
        candidates: COMPILER_CANDIDATES.iter().map(|c| c.to_string()).collect(),
    })
}

/// A missing converter is not an error; the caller skips the HEX step.
pub fn find_converter(
    resolver: &dyn ToolResolver,
    platform: Platform,
    logger: &Logger,
) -> Option<ResolvedTool> {
    logger.log("Searching for an objcopy tool");
    let found = search(&converter_candidates(platform), resolver, logger);
    if found.is_none() {
        logger.log("Warning: no objcopy tool found, HEX conversion will be skipped");
    }
    found
}
