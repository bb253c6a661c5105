//! Parser for the linter's human-readable error text.
//!
//! Each diagnostic line looks like `path:LINE:COL: message with 'token' ...`.
//! Anything else (banners, trailers, wrapped text) is skipped silently; the
//! parser never fails.

use std::sync::LazyLock;

use protolens_types::{ColumnRange, DiagnosticRecord, DiagnosticSeverity};
use regex::Regex;

/// First single-quoted word in a message; its length sets the range width.
static QUOTED_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'(\w+)'").expect("quoted token pattern is valid"));

/// Knobs for [`parse_diagnostics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Trailing lines dropped before parsing. Zero relies on per-line
    /// shape matching alone to skip the tool's footer.
    pub trailer_lines: usize,
    /// Severity given to every record.
    pub severity: DiagnosticSeverity,
}

/// Parse raw linter output into diagnostics, in input order.
#[must_use]
pub fn parse_diagnostics(raw: &str, options: ParseOptions) -> Vec<DiagnosticRecord> {
    let lines: Vec<&str> = raw
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    let keep = lines.len().saturating_sub(options.trailer_lines);

    lines[..keep]
        .iter()
        .filter_map(|line| {
            let record = parse_line(line);
            if record.is_none() && !line.is_empty() {
                tracing::trace!(line, "Skipping non-diagnostic linter output");
            }
            record
        })
        .map(|record| record.with_severity(options.severity))
        .collect()
}

/// Parse one line, or `None` if it does not have diagnostic shape.
#[must_use]
pub fn parse_line(line: &str) -> Option<DiagnosticRecord> {
    let (location, rest) = line.split_once(' ')?;
    let (line_no, column) = parse_location(location)?;
    let reason = rest.trim();

    let token = QUOTED_TOKEN.captures(reason)?.get(1)?.as_str();
    let width = u32::try_from(token.chars().count()).ok()?;
    let range = ColumnRange::spanning(column, width)?;

    Some(DiagnosticRecord::new(line_no, range, reason.to_string()))
}

/// Extract `(line, column)` from a prefix containing `:LINE:COL:`.
///
/// The rightmost colon-delimited pair of numbers wins, so colons inside the
/// path are harmless and trailing fields such as `warning:` are allowed.
fn parse_location(location: &str) -> Option<(u32, u32)> {
    let fields: Vec<&str> = location.split(':').collect();
    // The pair needs a field on each side to be enclosed by colons.
    let (line_no, column) = (1..fields.len().saturating_sub(2))
        .rev()
        .find_map(|i| Some((parse_number(fields[i])?, parse_number(fields[i + 1])?)))?;

    (line_no > 0).then_some((line_no, column))
}

fn parse_number(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
