//! Protobuf lint core: runs the external linter on one file and turns its
//! error text into diagnostics.

pub mod command;
pub mod launcher;
pub mod parser;
pub mod types;

pub(crate) mod diagnostics;

mod invoke;
mod manager;

pub use command::LintCommand;
pub use invoke::run_lint;
pub use launcher::{LaunchFut, ProcessLauncher, ProcessOutput, SystemLauncher};
pub use manager::{LintManager, paths_with_findings, unlocated_findings};
pub use parser::{ParseOptions, parse_diagnostics};
pub use types::{
    CompletionStatus, DiagnosticsSnapshot, InvocationOutcome, LaunchError, LintCompletion,
    LintNotice, LintReport, LinterConfig, TriggerDecision,
};
