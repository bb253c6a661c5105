//! Diagnostics store: per-file diagnostics plus per-file invocation sequence numbers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use protolens_types::DiagnosticRecord;

use crate::types::DiagnosticsSnapshot;

/// Sequence bookkeeping for one file.
#[derive(Debug, Default)]
struct FileSequence {
    latest: u64,
    /// Issued sequences whose completion has not been settled yet.
    outstanding: usize,
    closed: bool,
}

/// Per-file diagnostics plus sequence state.
///
/// Sequence entries live while the file is open or has invocations
/// outstanding, so the map is bounded by the files currently in use.
pub(crate) struct DiagnosticsStore {
    data: HashMap<PathBuf, Vec<DiagnosticRecord>>,
    sequences: HashMap<PathBuf, FileSequence>,
}

impl DiagnosticsStore {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            sequences: HashMap::new(),
        }
    }

    /// Issue the next sequence number for `path`. Starts at 1.
    ///
    /// Every issued number must later be passed to [`Self::settle`].
    pub fn next_sequence(&mut self, path: &Path) -> u64 {
        let state = self.sequences.entry(path.to_path_buf()).or_default();
        state.latest += 1;
        state.outstanding += 1;
        state.closed = false;
        state.latest
    }

    /// Whether `sequence` is the newest one issued for `path`.
    pub fn is_current(&self, path: &Path, sequence: u64) -> bool {
        self.sequences
            .get(path)
            .is_some_and(|state| state.latest == sequence)
    }

    /// Replace the diagnostics for `path` if `sequence` is current.
    ///
    /// Only that file's slice changes. Returns `false` for stale results.
    pub fn apply(&mut self, path: PathBuf, sequence: u64, items: Vec<DiagnosticRecord>) -> bool {
        if !self.is_current(&path, sequence) {
            return false;
        }
        if items.is_empty() {
            self.data.remove(&path);
        } else {
            self.data.insert(path, items);
        }
        true
    }

    /// Record that one issued sequence for `path` has completed.
    ///
    /// A closed file's entry is dropped once nothing is outstanding.
    pub fn settle(&mut self, path: &Path) {
        let Some(state) = self.sequences.get_mut(path) else {
            return;
        };
        state.outstanding = state.outstanding.saturating_sub(1);
        if state.outstanding == 0 && state.closed {
            self.sequences.remove(path);
        }
    }

    /// Drop the diagnostics for `path` and invalidate its outstanding runs.
    pub fn close(&mut self, path: &Path) {
        self.data.remove(path);
        match self.sequences.get_mut(path) {
            None => {}
            Some(state) if state.outstanding == 0 => {
                self.sequences.remove(path);
            }
            Some(state) => {
                // Nothing issued before the close may land afterwards.
                state.latest += 1;
                state.closed = true;
            }
        }
    }

    #[cfg(test)]
    pub fn tracked_files(&self) -> usize {
        self.sequences.len()
    }

    pub fn get(&self, path: &Path) -> &[DiagnosticRecord] {
        self.data.get(path).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        let mut files: Vec<(PathBuf, Vec<DiagnosticRecord>)> = self
            .data
            .iter()
            .map(|(path, items)| (path.clone(), items.clone()))
            .collect();

        // Sort: files with errors first, then alphabetically
        files.sort_by(|a, b| {
            let a_has_errors = a.1.iter().any(|d| d.severity().is_error());
            let b_has_errors = b.1.iter().any(|d| d.severity().is_error());
            b_has_errors.cmp(&a_has_errors).then_with(|| a.0.cmp(&b.0))
        });

        DiagnosticsSnapshot::new(files)
    }
}
