//! Dialect descriptor tables.
//!
//! Each supported dictionary dialect is described by a fixed set of line
//! templates plus a word-casing rule and a phoneme separator. The tables are
//! process-wide static data; rendering logic lives in [`crate::format`].
//!
//! Template placeholders are `{word}`, `{context}`, `{phonemes}` and
//! `{comment}`. A template without a placeholder drops that component: the
//! classic dialects have no inline-comment syntax, so their `entry-comment`
//! templates are identical to the comment-less ones.

/// Casing applied to headwords on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordCase {
    Upper,
    Lower,
}

impl WordCase {
    /// Apply this casing rule to a headword.
    #[must_use]
    pub fn apply(self, word: &str) -> String {
        match self {
            WordCase::Upper => word.to_uppercase(),
            WordCase::Lower => word.to_lowercase(),
        }
    }
}

/// A dictionary dialect: line templates plus output transforms.
#[derive(Debug)]
pub struct Dialect {
    /// Configuration key naming this dialect.
    pub name: &'static str,
    /// Template for standalone comment lines.
    pub comment: &'static str,
    /// Template for a plain entry.
    pub entry: &'static str,
    /// Template for an entry with a homograph context marker.
    pub entry_context: &'static str,
    /// Template for an entry with an inline comment.
    pub entry_comment: &'static str,
    /// Template for an entry with both context and inline comment.
    pub entry_context_comment: &'static str,
    /// Casing applied to headwords.
    pub word_case: WordCase,
    /// Separator used to join phoneme tokens.
    pub phoneme_separator: &'static str,
}

impl Dialect {
    /// Select the entry template variant for the given optional components.
    #[must_use]
    pub fn entry_template(&self, has_context: bool, has_comment: bool) -> &'static str {
        match (has_context, has_comment) {
            (false, false) => self.entry,
            (true, false) => self.entry_context,
            (false, true) => self.entry_comment,
            (true, true) => self.entry_context_comment,
        }
    }

    /// Join phoneme tokens into the dialect's single-string representation.
    #[must_use]
    pub fn join_phonemes(&self, phonemes: &[String]) -> String {
        phonemes.join(self.phoneme_separator)
    }
}

/// All supported dialects.
///
/// `cmudict-wade` is the historical format with `##` comments; `cmudict` is
/// the plain classic format with `;;;` comments; `cmudict-new` uses lowercase
/// headwords, single-space separators and ` #` inline comments.
pub static DIALECTS: &[Dialect] = &[
    Dialect {
        name: "cmudict-wade",
        comment: "##{comment}",
        entry: "{word}  {phonemes}",
        entry_context: "{word}({context})  {phonemes}",
        entry_comment: "{word}  {phonemes}",
        entry_context_comment: "{word}({context})  {phonemes}",
        word_case: WordCase::Upper,
        phoneme_separator: " ",
    },
    Dialect {
        name: "cmudict",
        comment: ";;;{comment}",
        entry: "{word}  {phonemes}",
        entry_context: "{word}({context})  {phonemes}",
        entry_comment: "{word}  {phonemes}",
        entry_context_comment: "{word}({context})  {phonemes}",
        word_case: WordCase::Upper,
        phoneme_separator: " ",
    },
    Dialect {
        name: "cmudict-new",
        comment: ";;;{comment}",
        entry: "{word} {phonemes}",
        entry_context: "{word}({context}) {phonemes}",
        entry_comment: "{word} {phonemes} #{comment}",
        entry_context_comment: "{word}({context}) {phonemes} #{comment}",
        word_case: WordCase::Lower,
        phoneme_separator: " ",
    },
];

/// Look up a dialect by its configuration key.
#[must_use]
pub fn find_dialect(name: &str) -> Option<&'static Dialect> {
    DIALECTS.iter().find(|dialect| dialect.name == name)
}

/// The recognized dialect names, for help and error messages.
#[must_use]
pub fn dialect_names() -> Vec<&'static str> {
    DIALECTS.iter().map(|dialect| dialect.name).collect()
}
