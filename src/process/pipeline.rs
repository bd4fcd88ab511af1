//! Single-pass conversion pipeline
//!
//! Wires the parser to the formatter: records are pulled from the stream one
//! at a time and rendered immediately, so conversion runs in constant memory
//! regardless of dictionary size. Error records are routed to a separate
//! diagnostics sink and contribute no output line.

use std::io::{BufRead, Write};

use crate::dialect::Dialect;
use crate::format::render_record;
use crate::parser::RecordStream;
use crate::record::Record;
use crate::Result;

/// Counters for one conversion run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConvertStats {
    /// Physical input lines read.
    pub lines: usize,
    /// Dictionary entries written.
    pub entries: usize,
    /// Standalone comment lines written.
    pub comments: usize,
    /// Blank lines preserved.
    pub blanks: usize,
    /// Malformed lines reported to the diagnostics sink.
    pub errors: usize,
}

/// Convert one dictionary stream into the target dialect.
///
/// Reads lines from `input`, auto-detects the source grammar, and writes one
/// re-formatted line per non-error record to `output`. Each parse error
/// writes its message to `diagnostics` instead; a spacing error additionally
/// lets the recovered entry through to `output`.
pub fn convert_file<R: BufRead, W: Write, D: Write>(
    input: R,
    output: &mut W,
    diagnostics: &mut D,
    dialect: &Dialect,
) -> Result<ConvertStats> {
    let mut stream = RecordStream::new(input);
    let mut stats = ConvertStats::default();

    while let Some(record) = stream.next_record()? {
        match &record {
            Record::Error(message) => {
                stats.errors += 1;
                writeln!(diagnostics, "{message}")?;
                continue;
            }
            Record::Blank => stats.blanks += 1,
            Record::Comment(_) => stats.comments += 1,
            Record::Entry { .. } => stats.entries += 1,
        }
        if let Some(line) = render_record(&record, dialect) {
            writeln!(output, "{line}")?;
        }
    }

    stats.lines = stream.line_number();
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    use crate::dialect::find_dialect;

    fn convert(input: &str, dialect_name: &str) -> (String, String, ConvertStats) {
        let reader = BufReader::new(Cursor::new(input.as_bytes()));
        let mut output = Vec::new();
        let mut diagnostics = Vec::new();
        let dialect = find_dialect(dialect_name).unwrap();
        let stats = convert_file(reader, &mut output, &mut diagnostics, dialect).unwrap();
        (
            String::from_utf8(output).unwrap(),
            String::from_utf8(diagnostics).unwrap(),
            stats,
        )
    }

    #[test]
    fn test_convert_classic_to_new() {
        let (output, diagnostics, stats) =
            convert("ABACUS  AH0 B AE1 K AH0 S\n", "cmudict-new");
        assert_eq!(output, "abacus AH0 B AE1 K AH0 S\n");
        assert!(diagnostics.is_empty());
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.errors, 0);
    }

    #[test]
    fn test_convert_errors_skip_output() {
        let (output, diagnostics, stats) = convert("abc\n", "cmudict");
        assert!(output.is_empty());
        assert_eq!(diagnostics, "Unsupported entry: \"abc\"\n");
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.entries, 0);
    }

    #[test]
    fn test_convert_spacing_error_keeps_entry() {
        let (output, diagnostics, stats) = convert("WORD AH\n", "cmudict");
        assert_eq!(output, "WORD  AH\n");
        assert_eq!(
            diagnostics,
            "Entry needs 2 spaces between word and phoneme: \"WORD AH\"\n"
        );
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.errors, 1);
    }

    #[test]
    fn test_convert_preserves_blanks_and_comments() {
        let input = ";;; header\n\nABACUS  AH B\n\n";
        let (output, _, stats) = convert(input, "cmudict");
        assert_eq!(output, ";;; header\n\nABACUS  AH B\n\n");
        assert_eq!(stats.blanks, 2);
        assert_eq!(stats.comments, 1);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.lines, 4);
    }

    #[test]
    fn test_convert_counts_lines() {
        let (_, _, stats) = convert("ABACUS  AH B\nWORD AH\n", "cmudict");
        // Two physical lines, even though the second yields two records.
        assert_eq!(stats.lines, 2);
    }
}
