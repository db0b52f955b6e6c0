// src/build/mod.rs
pub mod runner;

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::Platform;
use crate::discovery::ToolResolver;
use crate::logger::Logger;
use crate::process::CommandRunner;

/// Everything a build step needs from the outside world.
#[derive(Clone, Copy)]
pub struct BuildContext<'a> {
    pub logger: &'a Logger,
    pub resolver: &'a dyn ToolResolver,
    pub commands: &'a dyn CommandRunner,
    pub platform: Platform,
}

impl<'a> BuildContext<'a> {
    pub fn new(
        logger: &'a Logger,
        resolver: &'a dyn ToolResolver,
        commands: &'a dyn CommandRunner,
        platform: Platform,
    ) -> Self {
        BuildContext { logger, resolver, commands, platform }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArtifactKind {
    Executable,
    IntelHex,
}

/// Final product of a build: the executable, or the HEX image made from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub path: PathBuf,
    pub kind: ArtifactKind,
}

impl Artifact {
    pub fn executable(path: PathBuf) -> Self {
        Artifact { path, kind: ArtifactKind::Executable }
    }

    pub fn intel_hex(path: PathBuf) -> Self {
        Artifact { path, kind: ArtifactKind::IntelHex }
    }

    /// `IntelHex` only when the converter produced a file other than the
    /// executable it was given.
    pub fn from_conversion(executable: &Path, converted: PathBuf) -> Self {
        if converted == executable {
            Artifact::executable(converted)
        } else {
            Artifact::intel_hex(converted)
        }
    }

    pub fn is_hex(&self) -> bool {
        self.kind == ArtifactKind::IntelHex
    }
}

/// Anchors a relative path at the current directory.
pub fn absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(env::current_dir()?.join(path))
    }
}

/// `path` with `.ext` added after the full file name, keeping any dots the
/// name already has.
pub fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// Case-insensitive extension check.
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case(ext))
}
