//! Diagnostic output for the terminal.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Serialize;

use protolens_lint::DiagnosticsSnapshot;
use protolens_types::DiagnosticRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `path:line:col: severity: reason`, one per line.
    Text,
    /// A JSON array with one entry per linted file.
    Json,
}

#[derive(Serialize)]
struct FileReport<'a> {
    path: &'a Path,
    diagnostics: &'a [DiagnosticRecord],
}

/// Write diagnostics for `targets` in argument order.
pub fn write_report(
    out: &mut impl Write,
    format: OutputFormat,
    targets: &[PathBuf],
    snapshot: &DiagnosticsSnapshot,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => {
            for path in targets {
                for record in snapshot.for_file(path) {
                    writeln!(out, "{}", record.display_with_path(path))?;
                }
            }
        }
        OutputFormat::Json => {
            let reports: Vec<FileReport<'_>> = targets
                .iter()
                .map(|path| FileReport {
                    path,
                    diagnostics: snapshot.for_file(path),
                })
                .collect();
            serde_json::to_writer_pretty(&mut *out, &reports).map_err(io::Error::from)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
