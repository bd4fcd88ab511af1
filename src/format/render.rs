//! Template-driven record rendering
//!
//! Renders one record to one output line using a dialect's templates. The
//! templates are plain strings with `{word}`, `{context}`, `{phonemes}` and
//! `{comment}` placeholders; which entry template applies is decided by which
//! optional components the record carries.

use crate::dialect::Dialect;
use crate::record::Record;

/// Render a record to its output line in the target dialect.
///
/// Returns `None` for error records, which produce no output line (their
/// message belongs on the diagnostics channel). Blank records render to an
/// empty line.
#[must_use]
pub fn render_record(record: &Record, dialect: &Dialect) -> Option<String> {
    match record {
        Record::Blank => Some(String::new()),
        Record::Comment(text) => Some(expand(dialect.comment, "", None, "", text)),
        Record::Entry {
            word,
            context,
            phonemes,
            comment,
        } => {
            let word = dialect.word_case.apply(word);
            let phonemes = dialect.join_phonemes(phonemes);
            // An empty inline comment still counts as present; only its
            // absence selects the comment-less template.
            let template = dialect.entry_template(context.is_some(), comment.is_some());
            Some(expand(
                template,
                &word,
                *context,
                &phonemes,
                comment.as_deref().unwrap_or_default(),
            ))
        }
        Record::Error(_) => None,
    }
}

/// Substitute the four placeholders into a template.
///
/// The comment is substituted last: it is the only component that may contain
/// arbitrary text, and nothing is re-scanned after its insertion.
fn expand(
    template: &str,
    word: &str,
    context: Option<u8>,
    phonemes: &str,
    comment: &str,
) -> String {
    let context = context.map(|digit| digit.to_string()).unwrap_or_default();
    template
        .replace("{word}", word)
        .replace("{context}", &context)
        .replace("{phonemes}", phonemes)
        .replace("{comment}", comment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::find_dialect;

    fn entry(
        word: &str,
        context: Option<u8>,
        phonemes: &[&str],
        comment: Option<&str>,
    ) -> Record {
        Record::Entry {
            word: word.to_string(),
            context,
            phonemes: phonemes.iter().map(|p| (*p).to_string()).collect(),
            comment: comment.map(String::from),
        }
    }

    #[test]
    fn test_render_blank() {
        let dialect = find_dialect("cmudict").unwrap();
        assert_eq!(render_record(&Record::Blank, dialect), Some(String::new()));
    }

    #[test]
    fn test_render_comment_plain() {
        let dialect = find_dialect("cmudict").unwrap();
        let record = Record::Comment(" hello".to_string());
        assert_eq!(render_record(&record, dialect).unwrap(), ";;; hello");
    }

    #[test]
    fn test_render_comment_wade() {
        let dialect = find_dialect("cmudict-wade").unwrap();
        let record = Record::Comment(" hello".to_string());
        assert_eq!(render_record(&record, dialect).unwrap(), "## hello");
    }

    #[test]
    fn test_render_error_is_suppressed() {
        let dialect = find_dialect("cmudict").unwrap();
        let record = Record::Error("Unsupported entry: \"abc\"".to_string());
        assert_eq!(render_record(&record, dialect), None);
    }

    #[test]
    fn test_render_classic_entry() {
        let dialect = find_dialect("cmudict").unwrap();
        let record = entry("abacus", None, &["AH0", "B", "AE1"], None);
        assert_eq!(
            render_record(&record, dialect).unwrap(),
            "ABACUS  AH0 B AE1"
        );
    }

    #[test]
    fn test_render_entry_with_context() {
        let dialect = find_dialect("cmudict").unwrap();
        let record = entry("bass", Some(2), &["B", "EY1", "S"], None);
        assert_eq!(render_record(&record, dialect).unwrap(), "BASS(2)  B EY1 S");
    }

    #[test]
    fn test_render_new_style_lowercases() {
        let dialect = find_dialect("cmudict-new").unwrap();
        let record = entry("ABACUS", None, &["AH0", "B", "AE1"], None);
        assert_eq!(render_record(&record, dialect).unwrap(), "abacus AH0 B AE1");
    }

    #[test]
    fn test_render_new_style_inline_comment() {
        let dialect = find_dialect("cmudict-new").unwrap();
        let record = entry("bass", Some(2), &["B", "EY1", "S"], Some("the fish"));
        assert_eq!(
            render_record(&record, dialect).unwrap(),
            "bass(2) B EY1 S #the fish"
        );
    }

    #[test]
    fn test_render_new_style_empty_comment() {
        let dialect = find_dialect("cmudict-new").unwrap();
        let record = entry("word", None, &["AH"], Some(""));
        assert_eq!(render_record(&record, dialect).unwrap(), "word AH #");
    }

    #[test]
    fn test_render_classic_drops_inline_comment() {
        let dialect = find_dialect("cmudict").unwrap();
        let record = entry("word", None, &["AH"], Some("gone"));
        assert_eq!(render_record(&record, dialect).unwrap(), "WORD  AH");
    }

    #[test]
    fn test_expand_leaves_placeholder_like_comments_alone() {
        // A comment containing placeholder syntax must not be re-expanded.
        let dialect = find_dialect("cmudict-new").unwrap();
        let record = entry("word", None, &["AH"], Some("{word} {phonemes}"));
        assert_eq!(
            render_record(&record, dialect).unwrap(),
            "word AH #{word} {phonemes}"
        );
    }
}
