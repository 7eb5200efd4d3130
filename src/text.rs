//! Character-offset bookkeeping and sentence segmentation.
//!
//! All public offsets in this crate are character-based (not byte-based) so
//! they stay meaningful for Japanese script. Regex matching works on byte
//! offsets, so checkers translate through a `CharMap` built once per pass.

/// Byte <-> character offset translation for one immutable text snapshot.
pub struct CharMap {
    /// `starts[i]` is the byte offset where character `i` begins.
    starts: Vec<usize>,
    total_bytes: usize,
}

impl CharMap {
    pub fn new(text: &str) -> CharMap {
        CharMap {
            starts: text.char_indices().map(|(b, _)| b).collect(),
            total_bytes: text.len(),
        }
    }

    pub fn char_len(&self) -> usize {
        self.starts.len()
    }

    /// Character index of the char starting at `byte`. `byte` must lie on a
    /// char boundary (regex match boundaries always do).
    pub fn to_char(&self, byte: usize) -> usize {
        self.starts.partition_point(|&b| b < byte)
    }

    /// Byte offset where character `ch` begins; `char_len()` maps to the
    /// end of the text.
    pub fn to_byte(&self, ch: usize) -> usize {
        if ch >= self.starts.len() {
            self.total_bytes
        } else {
            self.starts[ch]
        }
    }
}

/// 1-based (line, column) for a character offset, counting columns in
/// characters.
pub fn line_col(text: &str, char_pos: usize) -> (usize, usize) {
    let mut line = 1usize;
    let mut col = 1usize;
    for c in text.chars().take(char_pos) {
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Coarse character class used by the duplicate-run heuristic.
pub enum CharKind {
    Kana,
    Latin,
    Other,
}

pub fn char_kind(c: char) -> CharKind {
    match c {
        '\u{3041}'..='\u{3096}' | '\u{30A1}'..='\u{30FA}' => CharKind::Kana,
        'a'..='z' | 'A'..='Z' => CharKind::Latin,
        _ => CharKind::Other,
    }
}

/// Sentence terminators recognized by the segmenter.
pub fn is_sentence_terminator(c: char) -> bool {
    matches!(c, '。' | '！' | '？')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Half-open character span of one sentence, terminator included.
pub struct Sentence {
    pub start: usize,
    pub end: usize,
}

/// Split `text` into sentences on 。！？ terminators.
///
/// A trailing fragment without a terminator becomes the last sentence.
/// Whitespace-only fragments are dropped. The caller decides how to treat
/// a result with no terminator at all (degraded mode).
pub fn split_sentences(text: &str) -> Vec<Sentence> {
    let mut out = Vec::new();
    let mut start = 0usize;
    let mut pos = 0usize;
    let mut saw_content = false;
    for c in text.chars() {
        if is_sentence_terminator(c) {
            if saw_content {
                out.push(Sentence {
                    start,
                    end: pos + 1,
                });
            }
            start = pos + 1;
            saw_content = false;
        } else if !c.is_whitespace() {
            if !saw_content {
                start = pos;
            }
            saw_content = true;
        }
        pos += 1;
    }
    if saw_content {
        out.push(Sentence { start, end: pos });
    }
    out
}
