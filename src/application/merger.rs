//! Test merger: splits annotated test files into the two output streams.

use std::io::{self, BufRead, Write};

use tracing::trace;

use crate::domain::{LineRules, TestLine};

/// How test blocks are laid out in the two streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    pub rules: LineRules,
    /// Also separate blocks with a blank line in the expected-output stream
    pub expected_block_separator: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            rules: LineRules::default(),
            expected_block_separator: false,
        }
    }
}

/// Line counts for one merged test block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub input_lines: usize,
    pub annotation_lines: usize,
    pub skipped_lines: usize,
}

impl std::ops::AddAssign for MergeStats {
    fn add_assign(&mut self, other: Self) {
        self.input_lines += other.input_lines;
        self.annotation_lines += other.annotation_lines;
        self.skipped_lines += other.skipped_lines;
    }
}

/// Append one test block to both streams.
///
/// Input lines go to both streams, annotation lines only to `expected`,
/// blank and comment-only lines nowhere. The input stream always gets a
/// blank line after the block.
pub fn merge_test<R, I, E>(
    reader: R,
    input: &mut I,
    expected: &mut E,
    options: &MergeOptions,
) -> io::Result<MergeStats>
where
    R: BufRead,
    I: Write + ?Sized,
    E: Write + ?Sized,
{
    let mut stats = MergeStats::default();
    for line in reader.lines() {
        let line = line?;
        match options.rules.classify(&line) {
            TestLine::Input(text) => {
                writeln!(input, "{}", text)?;
                writeln!(expected, "{}", text)?;
                stats.input_lines += 1;
            }
            TestLine::Annotation(text) => {
                writeln!(expected, "{}", text)?;
                stats.annotation_lines += 1;
            }
            TestLine::Blank => stats.skipped_lines += 1,
        }
    }
    writeln!(input)?;
    if options.expected_block_separator {
        writeln!(expected)?;
    }
    trace!("merged block: {:?}", stats);
    Ok(stats)
}

/// Write the closing token to a stream. No newline follows it.
pub fn write_terminator<W: Write + ?Sized>(out: &mut W, terminator: &str) -> io::Result<()> {
    write!(out, "{}", terminator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merge(text: &str, options: &MergeOptions) -> (String, String, MergeStats) {
        let mut input = Vec::new();
        let mut expected = Vec::new();
        let stats = merge_test(text.as_bytes(), &mut input, &mut expected, options).unwrap();
        (
            String::from_utf8(input).unwrap(),
            String::from_utf8(expected).unwrap(),
            stats,
        )
    }

    #[test]
    fn test_annotation_goes_to_expected_only() {
        let (inp, cor, stats) = merge("  foo ; bar\n", &MergeOptions::default());
        assert_eq!(inp, "\n");
        assert_eq!(cor, "  foo\n");
        assert_eq!(stats.annotation_lines, 1);
    }

    #[test]
    fn test_input_goes_to_both() {
        let (inp, cor, stats) = merge("foo ; bar\n", &MergeOptions::default());
        assert_eq!(inp, "foo\n\n");
        assert_eq!(cor, "foo\n");
        assert_eq!(stats.input_lines, 1);
    }

    #[test]
    fn test_comment_and_blank_lines_are_dropped() {
        let (inp, cor, stats) = merge("; just a note\n\n   \n", &MergeOptions::default());
        assert_eq!(inp, "\n");
        assert_eq!(cor, "");
        assert_eq!(stats.skipped_lines, 3);
    }

    #[test]
    fn test_interleaved_block() {
        let text = "; header comment\nponer_prod 1\n  error ; rejected\ninventario\n";
        let (inp, cor, _) = merge(text, &MergeOptions::default());
        assert_eq!(inp, "poner_prod 1\ninventario\n\n");
        assert_eq!(cor, "poner_prod 1\n  error\ninventario\n");
    }

    #[test]
    fn test_expected_separator_option() {
        let options = MergeOptions {
            expected_block_separator: true,
            ..Default::default()
        };
        let (_, cor, _) = merge("a\n", &options);
        assert_eq!(cor, "a\n\n");
    }

    #[test]
    fn test_stats_accumulate() {
        let mut total = MergeStats::default();
        total += MergeStats {
            input_lines: 2,
            annotation_lines: 1,
            skipped_lines: 0,
        };
        total += MergeStats {
            input_lines: 1,
            annotation_lines: 0,
            skipped_lines: 4,
        };
        assert_eq!(total.input_lines, 3);
        assert_eq!(total.annotation_lines, 1);
        assert_eq!(total.skipped_lines, 4);
    }
}
