//! One lint pass: build the command, run it, classify and parse the result.

use std::path::Path;

use crate::command::LintCommand;
use crate::launcher::ProcessLauncher;
use crate::parser::{self, ParseOptions};
use crate::types::{LintReport, LinterConfig};

/// Lint a single file.
///
/// Never fails: launch problems are reported inside the [`LintReport`].
/// The parser only runs when the linter exits non-zero.
pub async fn run_lint(
    launcher: &dyn ProcessLauncher,
    config: &LinterConfig,
    path: &Path,
) -> LintReport {
    let command = match LintCommand::for_file(config, path) {
        Ok(command) => command,
        Err(e) => return LintReport::launch_failure(e),
    };

    tracing::debug!(command = %command.display(), "Running linter");

    match launcher.launch(&command).await {
        Ok(output) if output.success() => LintReport::success(),
        Ok(output) => {
            let raw = output.into_error_text();
            let options = ParseOptions {
                trailer_lines: config.trailer_lines,
                severity: config.severity,
            };
            let records = parser::parse_diagnostics(&raw, options);
            LintReport::findings(raw, records)
        }
        Err(e) => LintReport::launch_failure(e),
    }
}
