/// `RecordStream` - converts physical dictionary lines to parsed records
///
/// This module handles:
/// - Reading lines from any `BufRead` source (newline and CRLF stripped)
/// - Sticky grammar detection (classic vs new-style, decided once per stream)
/// - Splitting phoneme runs into tokens
/// - Enforcing the two-space word/phoneme separator convention
use std::collections::VecDeque;
use std::io::{BufRead, BufReader};

use regex::Regex;

use super::patterns::{COMMENT_RE, ENTRY_CLASSIC_RE, ENTRY_NEW_RE, PHONEME_BOUNDARY_RE};
use crate::error::Result;
use crate::record::Record;

/// The two entry-line grammars a dictionary file may use.
///
/// Both grammars match many lines, so detection is per-stream, not per-line:
/// the first non-blank, non-comment line decides, and the choice is sticky
/// for the remainder of the stream. Mixed-grammar files are not supported;
/// lines that only satisfy the other grammar become parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// Uppercase headwords, two-space separator, no inline comments.
    Classic,
    /// Lowercase headwords, single-space separator, optional ` #` comments.
    NewStyle,
}

impl Grammar {
    fn entry_regex(self) -> &'static Regex {
        match self {
            Grammar::Classic => &ENTRY_CLASSIC_RE,
            Grammar::NewStyle => &ENTRY_NEW_RE,
        }
    }
}

/// `RecordStream` reads parsed dictionary records from a reader
///
/// Yields exactly one record per input line, except for entries with a
/// malformed word/phoneme separator, which yield an error record followed by
/// the recovered entry.
pub struct RecordStream<R: BufRead> {
    reader: R,
    /// Records produced for the current line but not yet yielded.
    pending: VecDeque<Record>,
    line_number: usize,
    /// Entry grammar locked on the first candidate entry line.
    grammar: Option<Grammar>,
}

impl<R: BufRead> RecordStream<R> {
    /// Create a new `RecordStream`
    ///
    /// # Arguments
    /// * `reader` - The underlying reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
            line_number: 0,
            grammar: None,
        }
    }

    /// Get the current input line number
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// The grammar locked for this stream, if a candidate entry line has
    /// been seen yet
    pub fn detected_grammar(&self) -> Option<Grammar> {
        self.grammar
    }

    /// Read the next parsed record
    ///
    /// Returns None at EOF
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        if let Some(record) = self.pending.pop_front() {
            return Ok(Some(record));
        }
        match self.read_raw_line()? {
            Some(line) => Ok(Some(self.parse_line(&line))),
            None => Ok(None),
        }
    }

    /// Read one physical line, stripping the trailing newline (and `\r`)
    fn read_raw_line(&mut self) -> Result<Option<String>> {
        let mut raw_line = String::new();
        match self.reader.read_line(&mut raw_line) {
            Ok(0) => Ok(None),
            Ok(_) => {
                self.line_number += 1;
                if raw_line.ends_with('\n') {
                    raw_line.pop();
                    if raw_line.ends_with('\r') {
                        raw_line.pop();
                    }
                }
                Ok(Some(raw_line))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Classify one line and parse it with the locked grammar
    fn parse_line(&mut self, line: &str) -> Record {
        if line.is_empty() {
            return Record::Blank;
        }

        if let Some(caps) = COMMENT_RE.captures(line) {
            let text = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
            return Record::Comment(text.to_string());
        }

        // The first candidate entry line decides the grammar for the whole
        // stream. New-style is tried first; anything else locks classic,
        // even when the line matches neither grammar.
        let grammar = *self.grammar.get_or_insert_with(|| {
            if ENTRY_NEW_RE.is_match(line) {
                Grammar::NewStyle
            } else {
                Grammar::Classic
            }
        });

        let Some(caps) = grammar.entry_regex().captures(line) else {
            return Record::Error(format!("Unsupported entry: \"{line}\""));
        };

        let word = caps
            .get(1)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let context = caps.get(3).and_then(|m| m.as_str().parse::<u8>().ok());
        let comment = caps.get(6).map(|m| m.as_str().to_string());
        let run = caps.get(4).map(|m| m.as_str()).unwrap_or_default();

        // A well-spaced entry leaves an empty token before the first
        // boundary: two spaces in classic, one in new-style (whose run group
        // swallows its leading space).
        let mut phonemes = split_phoneme_run(run);
        let separator_ok = phonemes.first().is_some_and(|token| token.is_empty());
        if separator_ok {
            phonemes.remove(0);
        }

        let entry = Record::Entry {
            word,
            context,
            phonemes,
            comment,
        };
        if separator_ok {
            entry
        } else {
            // The entry is still usable; report the spacing problem first
            // and queue the entry behind it.
            self.pending.push_back(entry);
            Record::Error(format!(
                "Entry needs 2 spaces between word and phoneme: \"{line}\""
            ))
        }
    }
}

/// Split a phoneme run at every boundary preceding a phoneme-shaped token.
///
/// Cuts before each ` [A-Z][A-Z]?[0-9]?` match and drops only the separator
/// space, so the token list keeps whatever malformed prefix the run had.
fn split_phoneme_run(run: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut start = 0;
    for boundary in PHONEME_BOUNDARY_RE.find_iter(run) {
        tokens.push(run[start..boundary.start()].to_string());
        start = boundary.start() + 1;
    }
    tokens.push(run[start..].to_string());
    tokens
}

/// Helper to create `RecordStream` from a string (for testing)
impl<'a> RecordStream<BufReader<&'a [u8]>> {
    #[must_use]
    pub fn from_string(s: &'a str) -> Self {
        let reader = BufReader::new(s.as_bytes());
        Self::new(reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_records(input: &str) -> Vec<Record> {
        let mut stream = RecordStream::from_string(input);
        let mut records = Vec::new();
        while let Some(record) = stream.next_record().unwrap() {
            records.push(record);
        }
        records
    }

    #[test]
    fn test_empty_file() {
        let mut stream = RecordStream::from_string("");
        assert!(stream.next_record().unwrap().is_none());
    }

    #[test]
    fn test_blank_line() {
        let records = collect_records("\n");
        assert_eq!(records, vec![Record::Blank]);
    }

    #[test]
    fn test_comment_lines() {
        let records = collect_records(";;; hello\n## wade note\n");
        assert_eq!(
            records,
            vec![
                Record::Comment(" hello".to_string()),
                Record::Comment(" wade note".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_comment() {
        let records = collect_records(";;;\n");
        assert_eq!(records, vec![Record::Comment(String::new())]);
    }

    #[test]
    fn test_classic_entry() {
        let records = collect_records("ABACUS  AH0 B AE1 K AH0 S\n");
        assert_eq!(
            records,
            vec![Record::Entry {
                word: "ABACUS".to_string(),
                context: None,
                phonemes: vec!["AH0", "B", "AE1", "K", "AH0", "S"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
                comment: None,
            }]
        );
    }

    #[test]
    fn test_classic_entry_with_context() {
        let records = collect_records("ABACUS(2)  AH B AE K AH S\n");
        match &records[0] {
            Record::Entry { word, context, .. } => {
                assert_eq!(word, "ABACUS");
                assert_eq!(*context, Some(2));
            }
            other => panic!("expected entry, got {other:?}"),
        }
    }

    #[test]
    fn test_new_entry_with_comment() {
        let records = collect_records("bass(2) B EY1 S #the fish\n");
        assert_eq!(
            records,
            vec![Record::Entry {
                word: "bass".to_string(),
                context: Some(2),
                phonemes: vec!["B".to_string(), "EY1".to_string(), "S".to_string()],
                comment: Some("the fish".to_string()),
            }]
        );
    }

    #[test]
    fn test_new_entry_empty_comment_is_present() {
        let records = collect_records("word AH #\n");
        match &records[0] {
            Record::Entry { comment, .. } => assert_eq!(comment.as_deref(), Some("")),
            other => panic!("expected entry, got {other:?}"),
        }
    }

    #[test]
    fn test_classic_entry_has_no_comment_field() {
        let records = collect_records("WORD  AH\n");
        match &records[0] {
            Record::Entry { comment, .. } => assert!(comment.is_none()),
            other => panic!("expected entry, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_entry() {
        let records = collect_records("abc\n");
        assert_eq!(
            records,
            vec![Record::Error("Unsupported entry: \"abc\"".to_string())]
        );
    }

    #[test]
    fn test_single_space_separator_recovers() {
        // Grammar-valid but missing the two-space convention: one error
        // record, then the recovered entry.
        let records = collect_records("WORD AH\n");
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            Record::Error(
                "Entry needs 2 spaces between word and phoneme: \"WORD AH\"".to_string()
            )
        );
        assert_eq!(
            records[1],
            Record::Entry {
                word: "WORD".to_string(),
                context: None,
                phonemes: vec!["AH".to_string()],
                comment: None,
            }
        );
    }

    #[test]
    fn test_new_style_double_space_keeps_malformed_token() {
        // New-style wants a single space; the extra space survives as a
        // bogus leading token, matching the reference behavior.
        let records = collect_records("word  AH\n");
        assert_eq!(records.len(), 2);
        assert!(matches!(records[0], Record::Error(_)));
        assert_eq!(
            records[1],
            Record::Entry {
                word: "word".to_string(),
                context: None,
                phonemes: vec![" ".to_string(), "AH".to_string()],
                comment: None,
            }
        );
    }

    #[test]
    fn test_detection_locks_new_style() {
        let input = "hello HH AH0 L OW1\nWORLD  W ER1 L D\n";
        let mut stream = RecordStream::from_string(input);

        let first = stream.next_record().unwrap().unwrap();
        assert!(matches!(first, Record::Entry { .. }));
        assert_eq!(stream.detected_grammar(), Some(Grammar::NewStyle));

        // The classic-only line no longer parses.
        let second = stream.next_record().unwrap().unwrap();
        assert_eq!(
            second,
            Record::Error("Unsupported entry: \"WORLD  W ER1 L D\"".to_string())
        );
    }

    #[test]
    fn test_detection_locks_classic() {
        let input = "WORLD  W ER1 L D\nhello HH AH0 L OW1\n";
        let mut stream = RecordStream::from_string(input);

        let first = stream.next_record().unwrap().unwrap();
        assert!(matches!(first, Record::Entry { .. }));
        assert_eq!(stream.detected_grammar(), Some(Grammar::Classic));

        let second = stream.next_record().unwrap().unwrap();
        assert_eq!(
            second,
            Record::Error("Unsupported entry: \"hello HH AH0 L OW1\"".to_string())
        );
    }

    #[test]
    fn test_detection_skips_comments_and_blanks() {
        let input = ";;; header\n\nhello HH AH0\n";
        let mut stream = RecordStream::from_string(input);

        stream.next_record().unwrap();
        stream.next_record().unwrap();
        assert_eq!(stream.detected_grammar(), None);

        stream.next_record().unwrap();
        assert_eq!(stream.detected_grammar(), Some(Grammar::NewStyle));
    }

    #[test]
    fn test_unparseable_first_line_locks_classic() {
        // Detection happens before matching, so a garbage first line still
        // locks the classic grammar.
        let input = "???\nhello HH AH0\n";
        let mut stream = RecordStream::from_string(input);

        let first = stream.next_record().unwrap().unwrap();
        assert!(matches!(first, Record::Error(_)));
        assert_eq!(stream.detected_grammar(), Some(Grammar::Classic));

        let second = stream.next_record().unwrap().unwrap();
        assert!(matches!(second, Record::Error(_)));
    }

    #[test]
    fn test_line_number_tracking() {
        let input = "ABACUS  AH\n\n;;; note\n";
        let mut stream = RecordStream::from_string(input);

        stream.next_record().unwrap();
        assert_eq!(stream.line_number(), 1);
        stream.next_record().unwrap();
        assert_eq!(stream.line_number(), 2);
        stream.next_record().unwrap();
        assert_eq!(stream.line_number(), 3);
    }

    #[test]
    fn test_crlf_line_endings() {
        let records = collect_records("ABACUS  AH B\r\n");
        assert_eq!(
            records,
            vec![Record::Entry {
                word: "ABACUS".to_string(),
                context: None,
                phonemes: vec!["AH".to_string(), "B".to_string()],
                comment: None,
            }]
        );
    }

    #[test]
    fn test_missing_trailing_newline() {
        let records = collect_records("ABACUS  AH B");
        assert_eq!(records.len(), 1);
        assert!(matches!(records[0], Record::Entry { .. }));
    }

    #[test]
    fn test_split_phoneme_run() {
        assert_eq!(
            split_phoneme_run(" AH0 B AE1 K"),
            vec!["", "AH0", "B", "AE1", "K"]
        );
        assert_eq!(split_phoneme_run("AH"), vec!["AH"]);
        assert_eq!(split_phoneme_run(" AH  B"), vec!["", "AH ", "B"]);
    }
}
