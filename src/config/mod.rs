// src/config/mod.rs
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

/// Name of the persistent run log, created in the working directory.
pub const LOG_FILE_NAME: &str = "HexScript-run.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Windows,
    Unix,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(unix) {
            Platform::Unix
        } else {
            Platform::Other
        }
    }

    pub fn is_windows(self) -> bool {
        self == Platform::Windows
    }

    /// Extension given to native executables, without the dot.
    pub fn executable_extension(self) -> Option<&'static str> {
        match self {
            Platform::Windows => Some("exe"),
            Platform::Unix | Platform::Other => None,
        }
    }
}

/// Where and how the logger writes. Passed to `Logger::new` explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    pub platform: Platform,
    pub sink_enabled: bool,
    pub log_path: PathBuf,
    pub echo_stdout: bool,
}

impl LogConfig {
    /// The file sink is only on by default for Windows, where the tool is
    /// usually started by dropping a file onto it and the console disappears.
    pub fn for_platform(platform: Platform, cwd: &Path) -> Self {
        LogConfig {
            platform,
            sink_enabled: platform.is_windows(),
            log_path: cwd.join(LOG_FILE_NAME),
            echo_stdout: true,
        }
    }

    pub fn with_log_file(mut self, path: PathBuf) -> Self {
        self.sink_enabled = true;
        self.log_path = path;
        self
    }

    pub fn quiet(mut self) -> Self {
        self.echo_stdout = false;
        self
    }

    /// Whether the run ends with a "press any key" prompt.
    pub fn wants_pause(&self) -> bool {
        self.platform.is_windows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_defaults_follow_platform() {
        let cwd = Path::new("/work");
        let win = LogConfig::for_platform(Platform::Windows, cwd);
        assert!(win.sink_enabled);
        assert!(win.wants_pause());
        assert_eq!(win.log_path, cwd.join(LOG_FILE_NAME));

        let unix = LogConfig::for_platform(Platform::Unix, cwd);
        assert!(!unix.sink_enabled);
        assert!(!unix.wants_pause());
    }

    #[test]
    fn explicit_log_file_enables_sink() {
        let config = LogConfig::for_platform(Platform::Unix, Path::new("/work"))
            .with_log_file(PathBuf::from("/tmp/run.log"));
        assert!(config.sink_enabled);
        assert_eq!(config.log_path, PathBuf::from("/tmp/run.log"));
    }

    #[test]
    fn executable_extension_only_on_windows() {
        assert_eq!(Platform::Windows.executable_extension(), Some("exe"));
        assert_eq!(Platform::Unix.executable_extension(), None);
    }

    #[test]
    fn config_serializes_to_json() {
        let config = LogConfig::for_platform(Platform::Windows, Path::new("C:/work"));
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"platform\":\"Windows\""));
        let back: LogConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
