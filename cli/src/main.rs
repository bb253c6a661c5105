//! protolens CLI - command-line stand-in for an editor binding.
//!
//! Each file argument is treated as a freshly opened document: it is handed
//! to [`LintManager`], which declines non-protobuf files and runs the linter
//! on the rest. Diagnostics go to stdout, notices and logs to stderr.
//!
//! Exit codes: 0 = clean, 1 = the linter reported problems, 2 = the linter
//! could not be run.

mod render;

use std::io::{self, Write};
use std::path::{self, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use protolens_config::ProtolensConfig;
use protolens_lint::{
    CompletionStatus, LintCompletion, LintManager, LintNotice, TriggerDecision,
    paths_with_findings, unlocated_findings,
};
use protolens_types::DocumentLanguage;

use crate::render::OutputFormat;

/// The linter ran and reported problems.
const VIOLATIONS_FOUND: u8 = 1;

/// The linter could not be run.
const TOOL_ERROR: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "protolens", version, about)]
struct Cli {
    /// Files to lint.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Config file (default: ~/.protolens/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Language id reported for every file instead of guessing from the extension.
    #[arg(long)]
    language_id: Option<String>,

    /// Linter binary, overriding the config file.
    #[arg(long)]
    linter: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout carries diagnostics; logs go to stderr.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = ProtolensConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(linter) = cli.linter {
        config.linter.binary = linter;
    }
    tracing::debug!(
        binary = %config.linter.binary,
        files = cli.files.len(),
        "Starting lint run"
    );

    let mut manager = LintManager::new(config.linter);
    let mut targets = Vec::new();

    for file in &cli.files {
        let path =
            path::absolute(file).with_context(|| format!("resolving path {}", file.display()))?;
        let language = cli
            .language_id
            .as_deref()
            .map_or_else(
                || DocumentLanguage::from_path(&path),
                DocumentLanguage::from,
            );

        match manager.on_document_opened(&path, &language) {
            TriggerDecision::Scheduled { .. } => targets.push(path),
            TriggerDecision::Declined => {
                eprintln!(
                    "protolens: skipping {} (language '{}' is not linted)",
                    path.display(),
                    language.as_str()
                );
            }
        }
    }

    manager.wait_for_idle().await;

    for notice in manager.take_notices() {
        match notice {
            LintNotice::ToolUnavailable { message, .. } => eprintln!("protolens: {message}"),
        }
    }

    let completions = manager.take_completions();
    for path in unlocated_findings(&completions) {
        eprintln!(
            "protolens: {}: linter reported problems without locatable diagnostics",
            path.display()
        );
    }

    let snapshot = manager.snapshot();
    let mut stdout = io::stdout().lock();
    render::write_report(&mut stdout, cli.format, &targets, &snapshot)
        .context("writing diagnostics")?;
    stdout.flush().context("writing diagnostics")?;

    Ok(exit_code(&completions))
}

fn exit_code(completions: &[LintCompletion]) -> ExitCode {
    if completions
        .iter()
        .any(|c| c.status() == CompletionStatus::LaunchFailed)
    {
        return ExitCode::from(TOOL_ERROR);
    }
    if paths_with_findings(completions).is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(VIOLATIONS_FOUND)
    }
}
