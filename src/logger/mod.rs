// src/logger/mod.rs
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use chrono::Local;
use parking_lot::Mutex;

use crate::config::LogConfig;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const BANNER_WIDTH: usize = 50;

/// Progress log shown to the user.
///
/// Each line is `<timestamp>::<message>`. Lines go to stdout right away and,
/// when the sink is enabled, are appended to the log file as well. Sink
/// failures are reported once through `log::warn!` and then the sink is
/// switched off; logging never fails the run.
pub struct Logger {
    config: LogConfig,
    sink: Mutex<SinkState>,
    history: Mutex<Vec<String>>,
}

enum SinkState {
    Closed,
    Open(File),
    Disabled,
}

impl Logger {
    pub fn new(config: LogConfig) -> Self {
        let sink = if config.sink_enabled {
            SinkState::Closed
        } else {
            SinkState::Disabled
        };

        Logger {
            config,
            sink: Mutex::new(sink),
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    pub fn log_path(&self) -> &Path {
        &self.config.log_path
    }

    pub fn log(&self, message: impl AsRef<str>) {
        let line = format_line(&Local::now().format(TIMESTAMP_FORMAT).to_string(), message.as_ref());

        if self.config.echo_stdout {
            let mut out = io::stdout().lock();
            // stdout going away is not something we can report anywhere
            let _ = writeln!(out, "{}", line);
            let _ = out.flush();
        }

        self.append_to_sink(&line);
        self.history.lock().push(line);
    }

    /// Border line used to frame the opening and closing banners.
    pub fn banner(&self) {
        self.log("=".repeat(BANNER_WIDTH));
    }

    /// Every line logged so far, timestamps included.
    pub fn lines(&self) -> Vec<String> {
        self.history.lock().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.history.lock().iter().any(|line| line.contains(needle))
    }

    fn append_to_sink(&self, line: &str) {
        let mut sink = self.sink.lock();

        if let SinkState::Closed = *sink {
            match OpenOptions::new().create(true).append(true).open(&self.config.log_path) {
                Ok(file) => *sink = SinkState::Open(file),
                Err(e) => {
                    log::warn!("cannot open log file {}: {}", self.config.log_path.display(), e);
                    *sink = SinkState::Disabled;
                }
            }
        }

        if let SinkState::Open(file) = &mut *sink {
            if let Err(e) = writeln!(file, "{}", line) {
                log::warn!("cannot write log file {}: {}", self.config.log_path.display(), e);
                *sink = SinkState::Disabled;
            }
        }
    }
}

fn format_line(timestamp: &str, message: &str) -> String {
    format!("{}::{}", timestamp, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Platform;
    use std::fs;

    fn quiet_config(dir: &Path, sink: bool) -> LogConfig {
        let mut config = LogConfig::for_platform(Platform::Unix, dir).quiet();
        config.sink_enabled = sink;
        config
    }

    #[test]
    fn line_has_timestamp_prefix() {
        assert_eq!(format_line("2024-01-01 10:00:00", "hi"), "2024-01-01 10:00:00::hi");

        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::new(quiet_config(dir.path(), false));
        logger.log("compiling");

        let lines = logger.lines();
        assert_eq!(lines.len(), 1);
        let (stamp, message) = lines[0].split_once("::").unwrap();
        assert_eq!(message, "compiling");
        assert_eq!(stamp.len(), "2024-01-01 10:00:00".len());
    }

    #[test]
    fn disabled_sink_writes_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::new(quiet_config(dir.path(), false));
        logger.log("nothing on disk");
        assert!(!logger.log_path().exists());
    }

    #[test]
    fn sink_appends_across_loggers() {
        let dir = tempfile::tempdir().unwrap();

        let first = Logger::new(quiet_config(dir.path(), true));
        first.log("first run");
        drop(first);

        let second = Logger::new(quiet_config(dir.path(), true));
        second.log("second run");
        second.banner();

        let text = fs::read_to_string(dir.path().join(crate::config::LOG_FILE_NAME)).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("::first run"));
        assert!(lines[1].ends_with("::second run"));
        assert!(lines[2].ends_with(&"=".repeat(BANNER_WIDTH)));
    }

    #[test]
    fn unwritable_sink_is_dropped_silently() {
        let dir = tempfile::tempdir().unwrap();
        let config = quiet_config(dir.path(), true)
            .with_log_file(dir.path().join("missing-dir").join("run.log"));
        let logger = Logger::new(config);

        logger.log("still logged");
        logger.log("twice");

        assert_eq!(logger.lines().len(), 2);
        assert!(logger.contains("still logged"));
    }
}
