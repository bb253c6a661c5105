//! Process launching seam.
//!
//! The manager never spawns processes directly; it goes through a
//! [`ProcessLauncher`] so bindings and tests can substitute their own.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use tokio::process::Command;

use crate::command::LintCommand;
use crate::types::LaunchError;

pub type LaunchFut<'a> =
    Pin<Box<dyn Future<Output = Result<ProcessOutput, LaunchError>> + Send + 'a>>;

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code; `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// The text the linter reported its problems in.
    ///
    /// `protoc` writes diagnostics to stderr; stdout is used only when stderr
    /// is empty.
    #[must_use]
    pub fn into_error_text(self) -> String {
        if self.stderr.trim().is_empty() {
            self.stdout
        } else {
            self.stderr
        }
    }
}

/// Runs one linter command to completion.
pub trait ProcessLauncher: Send + Sync {
    fn launch<'a>(&'a self, command: &'a LintCommand) -> LaunchFut<'a>;
}

/// Launcher backed by real OS processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn launch<'a>(&'a self, command: &'a LintCommand) -> LaunchFut<'a> {
        Box::pin(async move {
            let program = command.program();
            let resolved = which::which(program).map_err(|_| LaunchError::NotFound {
                binary: program.to_string(),
            })?;

            let output = Command::new(&resolved)
                .args(command.args())
                .stdin(Stdio::null())
                .kill_on_drop(true)
                .output()
                .await
                .map_err(|e| LaunchError::from_io(program, e))?;

            Ok(ProcessOutput {
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        })
    }
}
