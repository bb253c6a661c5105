//! Command-line construction for one linter invocation.

use std::path::{Path, PathBuf};

use crate::types::{LaunchError, LinterConfig};

/// A fully resolved linter command for a single target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintCommand {
    program: String,
    args: Vec<String>,
    target: PathBuf,
}

impl LintCommand {
    /// Build `<binary> [args..] --proto_path=<dir> <basename> --lint_out=<out>`.
    ///
    /// The target's directory becomes the import search path and its base
    /// name the file to compile. A bare file name searches `.`.
    pub fn for_file(config: &LinterConfig, path: &Path) -> Result<Self, LaunchError> {
        let Some(file_name) = path.file_name() else {
            return Err(LaunchError::InvalidTarget {
                path: path.to_path_buf(),
            });
        };
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut args = config.args.clone();
        args.push(format!("--proto_path={}", dir.display()));
        args.push(file_name.to_string_lossy().into_owned());
        args.push(format!("--lint_out={}", config.lint_out));

        Ok(Self {
            program: config.binary.clone(),
            args,
            target: path.to_path_buf(),
        })
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The file this command lints.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Shell-like rendering for logs.
    #[must_use]
    pub fn display(&self) -> String {
        let mut out = self.program.clone();
        for arg in &self.args {
            out.push(' ');
            out.push_str(arg);
        }
        out
    }
}
