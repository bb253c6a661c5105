//! Diagnostic records produced from linter output.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Severity attached to a diagnostic when it is rendered.
///
/// The linter itself has no notion of severity; every finding is reported at
/// the configured level, `Warning` unless overridden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    #[default]
    Warning,
    Information,
    Hint,
}

impl DiagnosticSeverity {
    #[must_use]
    pub fn is_error(self) -> bool {
        self == Self::Error
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Information => "info",
            Self::Hint => "hint",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown diagnostic severity: {0}")]
pub struct UnknownSeverityError(String);

impl FromStr for DiagnosticSeverity {
    type Err = UnknownSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warning" | "warn" => Ok(Self::Warning),
            "info" | "information" => Ok(Self::Information),
            "hint" => Ok(Self::Hint),
            _ => Err(UnknownSeverityError(s.to_string())),
        }
    }
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("column range end ({end}) must be greater than start ({start})")]
pub struct InvalidRangeError {
    start: u32,
    end: u32,
}

/// Half-open span of 1-based columns on a single line.
///
/// `end > start` always holds; a range covers at least one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ColumnRange {
    start: u32,
    end: u32,
}

impl ColumnRange {
    pub fn new(start: u32, end: u32) -> Result<Self, InvalidRangeError> {
        if end <= start {
            return Err(InvalidRangeError { start, end });
        }
        Ok(Self { start, end })
    }

    /// Range starting at `start` spanning `width` columns.
    ///
    /// Returns `None` for a zero width or when the end would overflow.
    #[must_use]
    pub fn spanning(start: u32, width: u32) -> Option<Self> {
        let end = start.checked_add(width)?;
        Self::new(start, end).ok()
    }

    /// 1-based start column.
    #[must_use]
    pub fn start(self) -> u32 {
        self.start
    }

    /// 1-based end column (exclusive).
    #[must_use]
    pub fn end(self) -> u32 {
        self.end
    }

    #[must_use]
    pub fn width(self) -> u32 {
        self.end - self.start
    }
}

/// A single linting finding: one line, one column range, one message.
///
/// Fields are private; records are immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticRecord {
    /// 1-based line number.
    line: u32,
    range: ColumnRange,
    reason: String,
    severity: DiagnosticSeverity,
}

impl DiagnosticRecord {
    /// Construct a warning-level record.
    #[must_use]
    pub fn new(line: u32, range: ColumnRange, reason: String) -> Self {
        Self {
            line,
            range,
            reason,
            severity: DiagnosticSeverity::Warning,
        }
    }

    #[must_use]
    pub fn with_severity(mut self, severity: DiagnosticSeverity) -> Self {
        self.severity = severity;
        self
    }

    /// 1-based line number.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[must_use]
    pub fn range(&self) -> ColumnRange {
        self.range
    }

    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    #[must_use]
    pub fn severity(&self) -> DiagnosticSeverity {
        self.severity
    }

    /// Format as `path:line:col: severity: reason`.
    #[must_use]
    pub fn display_with_path(&self, path: &Path) -> String {
        format!(
            "{}:{}:{}: {}: {}",
            path.display(),
            self.line,
            self.range.start,
            self.severity.label(),
            self.reason,
        )
    }
}
