//! Whitespace normalization applied uniformly after any format-specific
//! extraction. Format-specific repairs (letter-spacing, paragraph layout)
//! happen inside each extractor before this runs.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::{MAX_CONSECUTIVE_NEWLINES, TAB_WIDTH};

static NEWLINE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\n{{{},}}", MAX_CONSECUTIVE_NEWLINES + 1)).unwrap()
});

/// Normalize extracted screenplay text. Deterministic and total:
/// line endings to `\n`, tabs to spaces, blank runs capped at three
/// newlines, leading/trailing whitespace trimmed.
pub fn normalize_text(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    let expanded = unified.replace('\t', &" ".repeat(TAB_WIDTH));
    let capped = NEWLINE_RUN.replace_all(&expanded, "\n".repeat(MAX_CONSECUTIVE_NEWLINES));
    capped.trim().to_string()
}
