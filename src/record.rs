//! The intermediate record shape shared by the parser and the formatter.
//!
//! Every input line parses to exactly one [`Record`] (a malformed spacing line
//! produces an extra [`Record::Error`] before its entry). Records are
//! ephemeral: the parser yields them one at a time and the formatter consumes
//! them immediately, so nothing is ever materialized beyond the current line.

/// One parsed dictionary line.
///
/// The four cases are mutually exclusive by construction; a line is either
/// blank, a standalone comment, a dictionary entry, or unparseable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// An empty input line, preserved as an empty output line.
    Blank,

    /// A standalone comment line. The payload is everything after the comment
    /// prefix (`##` or `;;;`), with leading whitespace preserved.
    Comment(String),

    /// A dictionary entry.
    Entry {
        /// The headword as it appeared in the input.
        word: String,
        /// Homograph context marker, e.g. the `2` in `BASS(2)`. Always 1-9.
        context: Option<u8>,
        /// Phoneme tokens in order. Never empty for a parsed entry.
        phonemes: Vec<String>,
        /// Inline trailing comment (new-style dialect only). `Some("")` means
        /// the line carried an empty comment, which is distinct from none.
        comment: Option<String>,
    },

    /// The line could not be parsed. The message embeds the raw line verbatim
    /// and is routed to the diagnostics sink, never to the primary output.
    Error(String),
}
