// src/parse/unmask.rs

//! Comment-unmasking preprocessor.
//!
//! The reference site wraps several data tables in HTML comments so naive
//! scrapers miss them. Stripping the comment delimiters before structural
//! parsing puts those tables back into the parse tree. This is a blunt
//! textual transform and must run before any selector work.

/// Marker substrings that indicate a page carries comment-hidden tables.
const HIDDEN_TABLE_MARKERS: &[&str] = &["div_schedule", "box-", "line_score", "four_factors"];

/// Strip comment delimiters when the page carries hidden tables.
///
/// Idempotent: input without any marker is returned unchanged, and output
/// never contains a delimiter to strip twice.
pub fn unmask(raw: &str) -> String {
    let hidden = HIDDEN_TABLE_MARKERS
        .iter()
        .any(|marker| raw.contains(marker));
    if !hidden {
        return raw.to_string();
    }
    raw.replace("<!--", "").replace("-->", "")
}
