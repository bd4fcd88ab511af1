/// Regex patterns for the dictionary line grammars
///
/// All patterns are compiled once at startup using `LazyLock`.
///
/// Unlike most line formats, casing is significant here: the headword casing
/// is what distinguishes the classic and new-style grammars, so none of these
/// patterns are case-insensitive.
use std::sync::LazyLock;

use regex::Regex;

/// Build a regex from a compile-time constant pattern.
///
/// # Panics
///
/// Panics if the pattern is invalid. This is acceptable because all patterns
/// in this module are compile-time constants that are verified by tests.
/// The panic occurs at first access of the `LazyLock` static.
fn build_re(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|_| panic!("Invalid regex pattern: {pattern}"))
}

// ===== COMMENT LINES =====

/// Standalone comment line: `##` (wade) or `;;;` (classic/new) prefix.
/// Group 2 captures the comment text, leading whitespace included.
pub static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"^(##|;;;)(.*)$"));

// ===== ENTRY LINES =====

/// Classic entry: uppercase headword, optional `(1-9)` context, a single
/// literal space, then the phoneme run (group 4). The run keeps any further
/// leading spaces, which is how the two-space convention is checked later.
pub static ENTRY_CLASSIC_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r"^([^ ][A-Z0-9'.\-_]*)(\(([1-9])\))? ([A-Z012 ]+)$"));

/// New-style entry: lowercase headword, optional `(1-9)` context, the phoneme
/// run with its leading space inside group 4, and an optional ` #comment`
/// suffix (comment text in group 6).
pub static ENTRY_NEW_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r"^([^ ][a-z0-9'.\-_]*)(\(([1-9])\))?( [A-Z012 ]+)( #(.*))?$"));

// ===== PHONEME TOKENIZATION =====

/// Boundary before each phoneme token: a space immediately followed by a
/// token of the shape `[A-Z][A-Z]?[0-9]?`. The run is cut at the start of
/// each match, dropping only the separator space, which reproduces a
/// zero-width lookahead split (the `regex` crate has no look-around).
pub static PHONEME_BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r" [A-Z][A-Z]?[0-9]?"));
