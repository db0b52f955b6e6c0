// src/converter/mod.rs
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::build::{self, has_extension, BuildContext};
use crate::config::Platform;
use crate::discovery;
use crate::error::ConvertError;
use crate::process::command_line;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionJob {
    pub executable: PathBuf,
    pub hex: PathBuf,
}

impl ConversionJob {
    pub fn new(executable: &Path, hex: Option<&Path>, platform: Platform) -> Result<Self, ConvertError> {
        let executable = build::absolute(executable).map_err(ConvertError::Launch)?;
        let hex = match hex {
            Some(path) => build::absolute(path).map_err(ConvertError::Launch)?,
            None => default_hex(&executable, platform),
        };
        if hex == executable {
            return Err(ConvertError::SameAsInput(hex));
        }
        Ok(ConversionJob { executable, hex })
    }

    pub fn args(&self) -> Vec<OsString> {
        vec![
            "-O".into(),
            "ihex".into(),
            self.executable.clone().into(),
            self.hex.clone().into(),
        ]
    }
}

/// Same stem as the executable with `.hex`. Only the platform's own
/// executable extension is dropped; a bare Unix name keeps all its dots.
pub fn default_hex(executable: &Path, platform: Platform) -> PathBuf {
    let stem = match platform.executable_extension() {
        Some(ext) if has_extension(executable, ext) => executable.with_extension(""),
        _ => executable.to_path_buf(),
    };
    build::append_extension(&stem, "hex")
}

/// Turns an executable into an Intel HEX image with objcopy.
pub struct HexConverter<'a> {
    ctx: BuildContext<'a>,
}

impl<'a> HexConverter<'a> {
    pub fn new(ctx: BuildContext<'a>) -> Self {
        HexConverter { ctx }
    }

    /// Path of the HEX file, or `executable` itself when conversion is not
    /// possible. Failures are logged as warnings and never returned.
    pub fn convert(&self, executable: &Path, hex: Option<&Path>) -> PathBuf {
        match self.try_convert(executable, hex) {
            Ok(hex) => hex,
            Err(ConvertError::ToolNotFound) => {
                self.ctx.logger.log("Skipping HEX conversion: no objcopy tool found");
                executable.to_path_buf()
            }
            Err(e) => {
                self.ctx.logger.log(format!("Warning: {}", e));
                executable.to_path_buf()
            }
        }
    }

    pub fn try_convert(&self, executable: &Path, hex: Option<&Path>) -> Result<PathBuf, ConvertError> {
        let tool = discovery::find_converter(self.ctx.resolver, self.ctx.platform, self.ctx.logger)
            .ok_or(ConvertError::ToolNotFound)?;

        let job = ConversionJob::new(executable, hex, self.ctx.platform)?;
        let args = job.args();
        self.ctx
            .logger
            .log(format!("Convert command: {}", command_line(Path::new(&tool.name), &args)));

        let output = self
            .ctx
            .commands
            .run(&tool.path, &args)
            .map_err(ConvertError::Launch)?;

        if !output.success() {
            return Err(ConvertError::Failed { stderr: output.stderr });
        }

        if !job.hex.exists() {
            return Err(ConvertError::MissingOutput(job.hex));
        }

        self.ctx.logger.log(format!("HEX file written: {}", job.hex.display()));
        Ok(job.hex)
    }
}
