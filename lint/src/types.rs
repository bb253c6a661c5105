//! Public types consumed by editor bindings.
//!
//! These types define the interface between `protolens-lint` and its callers.
//! A binding constructs [`LinterConfig`], triggers lint passes, and reads
//! [`DiagnosticsSnapshot`]s, [`LintCompletion`]s and [`LintNotice`]s.

use std::io;
use std::path::{Path, PathBuf};

use protolens_types::{DiagnosticRecord, DiagnosticSeverity};
use serde::Deserialize;

/// Configuration for the external linter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LinterConfig {
    /// Whether linting runs at all. Default: true.
    pub enabled: bool,
    /// Linter executable, resolved through `PATH` (e.g. "protoc").
    pub binary: String,
    /// Extra arguments placed before `--proto_path`.
    pub args: Vec<String>,
    /// Value passed as `--lint_out`, relative to the working directory.
    pub lint_out: String,
    /// Substring a document's language id must contain to be linted.
    pub language_marker: String,
    /// Severity attached to every reported diagnostic.
    pub severity: DiagnosticSeverity,
    /// Number of trailing output lines to discard before parsing.
    pub trailer_lines: usize,
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            binary: "protoc".to_string(),
            args: Vec::new(),
            lint_out: ".".to_string(),
            language_marker: "proto".to_string(),
            severity: DiagnosticSeverity::Warning,
            trailer_lines: 0,
        }
    }
}

/// Why the linter process could not be run.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("linter binary '{binary}' was not found")]
    NotFound { binary: String },
    #[error("permission denied running linter binary '{binary}'")]
    PermissionDenied { binary: String },
    #[error("failed to run linter binary '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: io::Error,
    },
    #[error("cannot lint {}: path has no file name", path.display())]
    InvalidTarget { path: PathBuf },
}

impl LaunchError {
    /// Classify a spawn-time io error.
    pub(crate) fn from_io(binary: &str, source: io::Error) -> Self {
        let binary = binary.to_string();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { binary },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { binary },
            _ => Self::Spawn { binary, source },
        }
    }

    /// Whether the failure means the tool itself is unavailable, as opposed
    /// to a problem with one particular target file.
    #[must_use]
    pub fn is_tool_unavailable(&self) -> bool {
        !matches!(self, Self::InvalidTarget { .. })
    }

    #[must_use]
    pub fn binary(&self) -> Option<&str> {
        match self {
            Self::NotFound { binary }
            | Self::PermissionDenied { binary }
            | Self::Spawn { binary, .. } => Some(binary),
            Self::InvalidTarget { .. } => None,
        }
    }
}

/// Outcome of one linter invocation.
#[derive(Debug)]
pub enum InvocationOutcome {
    /// The linter exited with status zero.
    Success,
    /// The linter ran and exited non-zero; `raw` is its error text verbatim.
    LintFindings { raw: String },
    /// The linter could not be run.
    LaunchFailure(LaunchError),
}

/// Outcome plus the diagnostics parsed from it.
#[derive(Debug)]
pub struct LintReport {
    outcome: InvocationOutcome,
    records: Vec<DiagnosticRecord>,
}

impl LintReport {
    #[must_use]
    pub fn success() -> Self {
        Self {
            outcome: InvocationOutcome::Success,
            records: Vec::new(),
        }
    }

    #[must_use]
    pub fn findings(raw: String, records: Vec<DiagnosticRecord>) -> Self {
        Self {
            outcome: InvocationOutcome::LintFindings { raw },
            records,
        }
    }

    #[must_use]
    pub fn launch_failure(error: LaunchError) -> Self {
        Self {
            outcome: InvocationOutcome::LaunchFailure(error),
            records: Vec::new(),
        }
    }

    #[must_use]
    pub fn outcome(&self) -> &InvocationOutcome {
        &self.outcome
    }

    #[must_use]
    pub fn records(&self) -> &[DiagnosticRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<DiagnosticRecord> {
        self.records
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, InvocationOutcome::Success)
    }

    #[must_use]
    pub fn launch_error(&self) -> Option<&LaunchError> {
        match &self.outcome {
            InvocationOutcome::LaunchFailure(err) => Some(err),
            _ => None,
        }
    }

    pub(crate) fn status(&self) -> CompletionStatus {
        match &self.outcome {
            InvocationOutcome::Success => CompletionStatus::Clean,
            InvocationOutcome::LintFindings { .. } => CompletionStatus::Findings {
                count: self.records.len(),
            },
            InvocationOutcome::LaunchFailure(_) => CompletionStatus::LaunchFailed,
        }
    }
}

/// Event sent from an invocation task back to the manager.
#[derive(Debug)]
pub(crate) enum LintEvent {
    Completed {
        path: PathBuf,
        sequence: u64,
        report: LintReport,
    },
}

/// Result of asking the manager to lint a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerDecision {
    /// The document is not a lint target; nothing was launched.
    Declined,
    /// An invocation was started and tagged with `sequence`.
    Scheduled { sequence: u64 },
}

/// Condensed result of one finished invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    Clean,
    /// The linter exited non-zero; `count` diagnostics were parsed.
    Findings { count: usize },
    LaunchFailed,
}

/// A finished invocation, as observed by the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintCompletion {
    path: PathBuf,
    sequence: u64,
    status: CompletionStatus,
    stale: bool,
}

impl LintCompletion {
    pub(crate) fn new(path: PathBuf, sequence: u64, status: CompletionStatus, stale: bool) -> Self {
        Self {
            path,
            sequence,
            status,
            stale,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    #[must_use]
    pub fn status(&self) -> CompletionStatus {
        self.status
    }

    /// A newer invocation for the same file was issued before this one
    /// finished, so its result was discarded.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale
    }
}

/// User-facing notice raised by the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintNotice {
    /// The linter binary could not be run. Raised once per manager.
    ToolUnavailable { binary: String, message: String },
}

/// Immutable snapshot of all diagnostics, suitable for rendering.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsSnapshot {
    /// Per-file diagnostics, sorted with error-containing files first.
    files: Vec<(PathBuf, Vec<DiagnosticRecord>)>,
}

impl DiagnosticsSnapshot {
    pub(crate) fn new(files: Vec<(PathBuf, Vec<DiagnosticRecord>)>) -> Self {
        Self { files }
    }

    #[must_use]
    pub fn files(&self) -> &[(PathBuf, Vec<DiagnosticRecord>)] {
        &self.files
    }

    /// Diagnostics for one file; empty when the file has none.
    #[must_use]
    pub fn for_file(&self, path: &Path) -> &[DiagnosticRecord] {
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, items)| items.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.files.iter().map(|(_, items)| items.len()).sum()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.files
            .iter()
            .flat_map(|(_, items)| items)
            .filter(|d| d.severity().is_error())
            .count()
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.files
            .iter()
            .flat_map(|(_, items)| items)
            .filter(|d| d.severity() == DiagnosticSeverity::Warning)
            .count()
    }

    /// Format a compact status string like "E:0 W:3".
    #[must_use]
    pub fn status_string(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        format!("E:{} W:{}", self.error_count(), self.warning_count())
    }
}
