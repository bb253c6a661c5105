//! LintManager facade: public API consumed by editor bindings.
//!
//! A binding forwards document lifecycle events (opened, saved, closed) to
//! this type. Each accepted trigger runs one linter process on a Tokio task;
//! completions come back over a channel and are applied by `poll_events`.
//!
//! Every trigger is tagged with a per-file sequence number. A completion is
//! applied only if no newer trigger for the same file has been issued, so a
//! slow early run can never overwrite a fresh result.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use protolens_types::{DiagnosticRecord, DocumentLanguage};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::diagnostics::DiagnosticsStore;
use crate::invoke;
use crate::launcher::{ProcessLauncher, SystemLauncher};
use crate::types::{
    CompletionStatus, DiagnosticsSnapshot, LaunchError, LintCompletion, LintEvent, LintNotice,
    LinterConfig, TriggerDecision,
};

#[derive(Debug, Clone, Copy)]
enum Trigger {
    Opened,
    Saved,
}

impl Trigger {
    fn label(self) -> &'static str {
        match self {
            Self::Opened => "opened",
            Self::Saved => "saved",
        }
    }
}

/// Public facade for the lint subsystem.
pub struct LintManager {
    config: Arc<LinterConfig>,
    launcher: Arc<dyn ProcessLauncher>,
    diagnostics: DiagnosticsStore,
    event_rx: mpsc::UnboundedReceiver<LintEvent>,
    event_tx: mpsc::UnboundedSender<LintEvent>,
    in_flight: JoinSet<()>,
    completions: Vec<LintCompletion>,
    notices: Vec<LintNotice>,
    /// Set once the tool-unavailable notice has been raised.
    tool_failure_reported: bool,
}

impl LintManager {
    /// Manager that runs the configured linter as a real process.
    #[must_use]
    pub fn new(config: LinterConfig) -> Self {
        Self::with_launcher(config, Arc::new(SystemLauncher))
    }

    #[must_use]
    pub fn with_launcher(config: LinterConfig, launcher: Arc<dyn ProcessLauncher>) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            config: Arc::new(config),
            launcher,
            diagnostics: DiagnosticsStore::new(),
            event_rx,
            event_tx,
            in_flight: JoinSet::new(),
            completions: Vec::new(),
            notices: Vec::new(),
            tool_failure_reported: false,
        }
    }

    #[must_use]
    pub fn config(&self) -> &LinterConfig {
        &self.config
    }

    /// A document was opened. Must be called from within a Tokio runtime.
    pub fn on_document_opened(
        &mut self,
        path: &Path,
        language: &DocumentLanguage,
    ) -> TriggerDecision {
        self.trigger(path, language, Trigger::Opened)
    }

    /// A document was saved. Must be called from within a Tokio runtime.
    pub fn on_document_saved(
        &mut self,
        path: &Path,
        language: &DocumentLanguage,
    ) -> TriggerDecision {
        self.trigger(path, language, Trigger::Saved)
    }

    /// A document was closed: drop its diagnostics and invalidate any
    /// invocation still running for it.
    pub fn on_document_closed(&mut self, path: &Path) {
        self.diagnostics.close(path);
    }

    /// Whether a document with this language would be linted.
    #[must_use]
    pub fn accepts(&self, language: &DocumentLanguage) -> bool {
        self.config.enabled && language.matches_marker(&self.config.language_marker)
    }

    fn trigger(
        &mut self,
        path: &Path,
        language: &DocumentLanguage,
        trigger: Trigger,
    ) -> TriggerDecision {
        if !self.accepts(language) {
            tracing::debug!(
                path = %path.display(),
                language = language.as_str(),
                "Not a lint target, skipping"
            );
            return TriggerDecision::Declined;
        }

        let path = path.to_path_buf();
        let sequence = self.diagnostics.next_sequence(&path);
        tracing::info!(
            path = %path.display(),
            sequence,
            trigger = trigger.label(),
            "Linting"
        );

        let launcher = Arc::clone(&self.launcher);
        let config = Arc::clone(&self.config);
        let event_tx = self.event_tx.clone();
        self.in_flight.spawn(async move {
            let report = invoke::run_lint(launcher.as_ref(), &config, &path).await;
            let _ = event_tx.send(LintEvent::Completed {
                path,
                sequence,
                report,
            });
        });

        TriggerDecision::Scheduled { sequence }
    }

    /// Drain pending completions, up to `budget`.
    ///
    /// Non-blocking: returns immediately if nothing has finished.
    pub fn poll_events(&mut self, budget: usize) -> usize {
        self.reap_finished_tasks();

        let mut count = 0;
        while count < budget {
            match self.event_rx.try_recv() {
                Ok(event) => {
                    self.handle_event(event);
                    count += 1;
                }
                Err(mpsc::error::TryRecvError::Empty | mpsc::error::TryRecvError::Disconnected) => {
                    break;
                }
            }
        }
        count
    }

    /// Wait until every started invocation has finished, then apply them all.
    pub async fn wait_for_idle(&mut self) {
        while let Some(result) = self.in_flight.join_next().await {
            if let Err(e) = result {
                tracing::warn!("Lint task failed: {e}");
            }
        }
        self.poll_events(usize::MAX);
    }

    /// Number of invocations that have not finished yet.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.in_flight.len()
    }

    fn reap_finished_tasks(&mut self) {
        while let Some(result) = self.in_flight.try_join_next() {
            if let Err(e) = result {
                tracing::warn!("Lint task failed: {e}");
            }
        }
    }

    fn handle_event(&mut self, event: LintEvent) {
        match event {
            LintEvent::Completed {
                path,
                sequence,
                report,
            } => {
                let status = report.status();

                if let Some(err) = report.launch_error() {
                    self.note_launch_failure(&path, err);
                }

                let stale = if report.launch_error().is_some() {
                    // No verdict from the tool: keep whatever the file had.
                    !self.diagnostics.is_current(&path, sequence)
                } else {
                    let items = report.into_records();
                    let count = items.len();
                    let applied = self.diagnostics.apply(path.clone(), sequence, items);
                    if applied {
                        tracing::debug!(
                            path = %path.display(),
                            sequence,
                            count,
                            "Diagnostics updated"
                        );
                    }
                    !applied
                };
                self.diagnostics.settle(&path);

                if stale {
                    tracing::debug!(
                        path = %path.display(),
                        sequence,
                        "Discarding stale lint result"
                    );
                }

                self.completions
                    .push(LintCompletion::new(path, sequence, status, stale));
            }
        }
    }

    fn note_launch_failure(&mut self, path: &Path, err: &LaunchError) {
        if !err.is_tool_unavailable() {
            tracing::warn!(path = %path.display(), "Cannot lint: {err}");
            return;
        }
        if self.tool_failure_reported {
            tracing::debug!(path = %path.display(), "Linter still unavailable: {err}");
            return;
        }
        tracing::warn!("Linter unavailable: {err}");
        self.tool_failure_reported = true;
        self.notices.push(LintNotice::ToolUnavailable {
            binary: err.binary().unwrap_or(&self.config.binary).to_string(),
            message: err.to_string(),
        });
    }

    /// Get an immutable snapshot of all diagnostics.
    #[must_use]
    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        self.diagnostics.snapshot()
    }

    /// Current diagnostics for one file.
    #[must_use]
    pub fn diagnostics_for(&self, path: &Path) -> &[DiagnosticRecord] {
        self.diagnostics.get(path)
    }

    /// Take completions observed since the last call, in arrival order.
    pub fn take_completions(&mut self) -> Vec<LintCompletion> {
        std::mem::take(&mut self.completions)
    }

    /// Take notices raised since the last call.
    pub fn take_notices(&mut self) -> Vec<LintNotice> {
        std::mem::take(&mut self.notices)
    }

    /// Issue a sequence number without launching anything (for testing).
    #[cfg(test)]
    pub(crate) fn reserve_sequence(&mut self, path: &Path) -> u64 {
        self.diagnostics.next_sequence(path)
    }

    /// Get a reference to the event sender (for testing).
    #[cfg(test)]
    pub(crate) fn event_tx(&self) -> &mpsc::UnboundedSender<LintEvent> {
        &self.event_tx
    }
}

/// Paths whose current run failed without any parseable diagnostic.
///
/// Stale completions are ignored: a newer run has the final word.
#[must_use]
pub fn unlocated_findings(completions: &[LintCompletion]) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = completions
        .iter()
        .filter(|c| !c.is_stale() && c.status() == (CompletionStatus::Findings { count: 0 }))
        .map(|c| c.path().to_path_buf())
        .collect();
    paths.sort();
    paths.dedup();
    paths
}

/// Paths in a completion list that finished with findings, deduplicated.
#[must_use]
pub fn paths_with_findings(completions: &[LintCompletion]) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = completions
        .iter()
        .filter(|c| !c.is_stale() && matches!(c.status(), CompletionStatus::Findings { .. }))
        .map(|c| c.path().to_path_buf())
        .collect();
    paths.sort();
    paths.dedup();
    paths
}
