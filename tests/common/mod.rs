//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use protolens_lint::{
    LaunchError, LaunchFut, LintCommand, LinterConfig, ProcessLauncher, ProcessOutput,
};

/// Launcher that records every command and answers with a fixed exit code and stderr.
pub struct RecordingLauncher {
    code: i32,
    stderr: String,
    missing: bool,
    commands: Mutex<Vec<LintCommand>>,
}

impl RecordingLauncher {
    pub fn exiting(code: i32, stderr: &str) -> Arc<Self> {
        Arc::new(Self {
            code,
            stderr: stderr.to_string(),
            missing: false,
            commands: Mutex::new(Vec::new()),
        })
    }

    /// Behaves as if the linter binary does not exist.
    pub fn missing() -> Arc<Self> {
        Arc::new(Self {
            code: 0,
            stderr: String::new(),
            missing: true,
            commands: Mutex::new(Vec::new()),
        })
    }

    pub fn commands(&self) -> Vec<LintCommand> {
        self.commands.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.commands.lock().unwrap().len()
    }
}

impl ProcessLauncher for RecordingLauncher {
    fn launch<'a>(&'a self, command: &'a LintCommand) -> LaunchFut<'a> {
        self.commands.lock().unwrap().push(command.clone());
        Box::pin(async move {
            if self.missing {
                return Err(LaunchError::NotFound {
                    binary: command.program().to_string(),
                });
            }
            Ok(ProcessOutput {
                code: Some(self.code),
                stdout: String::new(),
                stderr: self.stderr.clone(),
            })
        })
    }
}

/// Write a shell script standing in for `protoc` and return a config that
/// runs it through `sh`.
///
/// The script receives `--proto_path=<dir> <basename> --lint_out=<out>`.
pub fn fake_linter(dir: &Path, body: &str) -> LinterConfig {
    let script = dir.join("fake-protoc.sh");
    std::fs::write(&script, body).unwrap();
    LinterConfig {
        binary: "sh".to_string(),
        args: vec![script.display().to_string()],
        ..LinterConfig::default()
    }
}

/// Create an empty `.proto` file in `dir`.
pub fn proto_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, "syntax = \"proto3\";\n").unwrap();
    path
}
