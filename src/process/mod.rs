// src/process/mod.rs
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::Path;
use std::process::Command;

use serde::Serialize;

/// Captured result of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs a program to completion and captures its output as text.
///
/// Blocks until the child exits. There is no timeout.
pub trait CommandRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> io::Result<ProcessOutput>;
}

pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> io::Result<ProcessOutput> {
        log::debug!("spawning {}", command_line(program, args));

        let output = Command::new(program).args(args).output()?;

        Ok(ProcessOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Human-readable rendering of a command, for the progress log.
pub fn command_line(program: &Path, args: &[OsString]) -> String {
    std::iter::once(program.as_os_str())
        .chain(args.iter().map(OsString::as_os_str))
        .map(OsStr::to_string_lossy)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;

    type Handler = Box<dyn Fn(&Path, &[OsString]) -> io::Result<ProcessOutput>>;

    /// Records every invocation and answers with a scripted handler.
    pub(crate) struct FakeCommands {
        pub calls: RefCell<Vec<(PathBuf, Vec<OsString>)>>,
        handler: Handler,
    }

    impl FakeCommands {
        pub(crate) fn new(handler: impl Fn(&Path, &[OsString]) -> io::Result<ProcessOutput> + 'static) -> Self {
            FakeCommands {
                calls: RefCell::new(Vec::new()),
                handler: Box::new(handler),
            }
        }

        pub(crate) fn exiting(code: i32, stdout: &str, stderr: &str) -> Self {
            let output = ProcessOutput {
                exit_code: Some(code),
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            };
            FakeCommands::new(move |_, _| Ok(output.clone()))
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl CommandRunner for FakeCommands {
        fn run(&self, program: &Path, args: &[OsString]) -> io::Result<ProcessOutput> {
            self.calls.borrow_mut().push((program.to_path_buf(), args.to_vec()));
            (self.handler)(program, args)
        }
    }

    #[test]
    fn command_line_joins_with_spaces() {
        let args = vec![OsString::from("-O"), OsString::from("ihex"), OsString::from("a.out")];
        assert_eq!(command_line(Path::new("objcopy"), &args), "objcopy -O ihex a.out");
        assert_eq!(command_line(Path::new("cc"), &[]), "cc");
    }

    #[test]
    fn success_requires_zero_exit() {
        let mut output = ProcessOutput::default();
        assert!(!output.success());
        output.exit_code = Some(0);
        assert!(output.success());
        output.exit_code = Some(2);
        assert!(!output.success());
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_captures_streams() {
        let args = vec![
            OsString::from("-c"),
            OsString::from("echo out; echo err >&2; exit 3"),
        ];
        let output = SystemCommandRunner.run(Path::new("/bin/sh"), &args).unwrap();
        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[test]
    fn system_runner_reports_missing_program() {
        let err = SystemCommandRunner
            .run(Path::new("definitely-not-a-real-program-hexscript"), &[])
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
