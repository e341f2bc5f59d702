//! Line-oriented segmentation
//!
//! A line whose trimmed form starts with `#` opens a header block that keeps
//! collecting lines until the next blank line or header. Blank lines close
//! the current block. Everything else accumulates verbatim into the open
//! block, which is a paragraph unless a header opened it.
//!
//! Ranges are half-open character (not byte) offsets into the input. Lines are
//! split on `\n` only, so a trailing `\r` stays part of its line and offsets
//! remain exact for CRLF input.

use cognita_core::types::{BlockKind, TextRange};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// One semantic block of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: BlockKind,
    pub range: TextRange,
    /// Block lines joined with `\n`
    pub text: String,
}

struct Buffer<'a> {
    kind: BlockKind,
    start: usize,
    lines: Vec<&'a str>,
}

impl<'a> Buffer<'a> {
    fn new() -> Self {
        Self {
            kind: BlockKind::Paragraph,
            start: 0,
            lines: Vec::new(),
        }
    }

    fn push(&mut self, line: &'a str, offset: usize) {
        if self.lines.is_empty() {
            self.start = offset;
        }
        self.lines.push(line);
    }

    fn flush(&mut self, out: &mut Vec<Segment>) {
        if self.lines.is_empty() {
            return;
        }
        let text = self.lines.join("\n");
        let end = self.start + text.chars().count();
        out.push(Segment {
            kind: self.kind,
            range: TextRange::new(self.start, end),
            text,
        });
        self.lines.clear();
    }
}

/// Split `text` into semantic blocks in document order
pub fn segment(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut buffer = Buffer::new();
    let mut offset = 0usize;

    for line in text.split('\n') {
        let trimmed = line.trim();

        if trimmed.starts_with('#') {
            buffer.flush(&mut segments);
            buffer.kind = BlockKind::Header;
            buffer.push(line, offset);
        } else if trimmed.is_empty() {
            buffer.flush(&mut segments);
            buffer.kind = BlockKind::Paragraph;
        } else {
            buffer.push(line, offset);
        }

        offset += line.chars().count() + 1;
    }
    buffer.flush(&mut segments);

    trace!(blocks = segments.len(), "Segmented text");
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_and_texts(text: &str) -> Vec<(BlockKind, String)> {
        segment(text)
            .into_iter()
            .map(|s| (s.kind, s.text))
            .collect()
    }

    #[test]
    fn test_header_with_body_then_paragraph() {
        let segments = segment("# Title\nBody line.\n\nSecond paragraph.");
        assert_eq!(segments.len(), 2);

        assert_eq!(segments[0].kind, BlockKind::Header);
        assert_eq!(segments[0].text, "# Title\nBody line.");
        assert_eq!(segments[0].range, TextRange::new(0, 18));

        assert_eq!(segments[1].kind, BlockKind::Paragraph);
        assert_eq!(segments[1].text, "Second paragraph.");
        assert_eq!(segments[1].range, TextRange::new(20, 37));
    }

    #[test]
    fn test_empty_and_blank_inputs() {
        assert!(segment("").is_empty());
        assert!(segment("\n\n   \n\t\n").is_empty());
    }

    #[test]
    fn test_single_paragraph() {
        assert_eq!(
            kinds_and_texts("one\ntwo\nthree"),
            vec![(BlockKind::Paragraph, "one\ntwo\nthree".to_string())]
        );
    }

    #[test]
    fn test_consecutive_blank_lines_make_no_empty_blocks() {
        assert_eq!(
            kinds_and_texts("a\n\n\n\nb"),
            vec![
                (BlockKind::Paragraph, "a".to_string()),
                (BlockKind::Paragraph, "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_header_interrupts_paragraph() {
        assert_eq!(
            kinds_and_texts("intro\n## Section\nbody"),
            vec![
                (BlockKind::Paragraph, "intro".to_string()),
                (BlockKind::Header, "## Section\nbody".to_string()),
            ]
        );
    }

    #[test]
    fn test_indented_header_and_lines_kept_verbatim() {
        let segments = segment("  # Indented\n    code-ish line");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind, BlockKind::Header);
        assert_eq!(segments[0].text, "  # Indented\n    code-ish line");
    }

    #[test]
    fn test_leading_blank_lines_offset_start() {
        let text = "\n\nHello";
        let segments = segment(text);
        assert_eq!(segments[0].range, TextRange::new(2, 7));
    }

    #[test]
    fn test_crlf_offsets_are_exact() {
        let text = "# T\r\nbody\r\n\r\nnext";
        let chars: Vec<char> = text.chars().collect();
        for segment in segment(text) {
            let slice: String = chars[segment.range.start..segment.range.end].iter().collect();
            assert_eq!(slice, segment.text);
        }
    }

    #[test]
    fn test_multibyte_ranges_count_chars() {
        let segments = segment("résumé\n\nnaïve");
        assert_eq!(segments[0].range, TextRange::new(0, 6));
        assert_eq!(segments[1].range, TextRange::new(8, 13));
    }
}
