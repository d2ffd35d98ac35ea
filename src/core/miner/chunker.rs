//! Paragraph-greedy, token-bounded text chunking.
//!
//! Text is split on blank-line paragraph boundaries and paragraphs
//! are packed greedily into chunks. A token is a whitespace-delimited
//! word; every non-empty paragraph counts as at least one token.
//!
//! For each paragraph:
//!
//! - if it fits (buffer + paragraph <= `tokens_max`) it joins the buffer
//! - else if the buffer already holds `tokens_min` tokens, the buffer
//!   is emitted and the paragraph starts a new one
//! - else the buffer and the paragraph are emitted together as one
//!   (possibly oversized) chunk and the buffer is reset
//!
//! Paragraphs are never split, so one paragraph larger than
//! `tokens_max` becomes one oversized chunk.
//!
//! Offsets are character positions into the input, `end` exclusive,
//! and `chunk.text` is exactly that slice of the input. The gaps
//! between consecutive chunks are blank-line separators only.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::config::ChunkingConfig;
use crate::core::types::TextSpan;

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Number of whitespace tokens in a non-empty paragraph (minimum 1)
pub fn count_tokens(text: &str) -> usize {
    text.split_whitespace().count().max(1)
}

/// A trimmed paragraph located in the source text
#[derive(Debug, Clone, Copy)]
struct Paragraph {
    start_byte: usize,
    end_byte: usize,
    start_char: usize,
    end_char: usize,
    tokens: usize,
}

/// Converts increasing byte offsets into character offsets in one pass
struct CharCursor<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            byte: 0,
            chars: 0,
        }
    }

    fn char_offset(&mut self, byte: usize) -> usize {
        debug_assert!(byte >= self.byte);
        self.chars += self.text[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}

fn paragraphs(text: &str) -> Vec<Paragraph> {
    let mut segments = Vec::new();
    let mut seg_start = 0;
    for sep in PARAGRAPH_BREAK.find_iter(text) {
        segments.push((seg_start, sep.start()));
        seg_start = sep.end();
    }
    segments.push((seg_start, text.len()));

    let mut cursor = CharCursor::new(text);
    let mut paras = Vec::new();

    for (seg_start, seg_end) in segments {
        let segment = &text[seg_start..seg_end];
        let trimmed = segment.trim();
        if trimmed.is_empty() {
            continue;
        }

        let start_byte = seg_start + (segment.len() - segment.trim_start().len());
        let end_byte = start_byte + trimmed.len();
        let start_char = cursor.char_offset(start_byte);
        let end_char = cursor.char_offset(end_byte);

        paras.push(Paragraph {
            start_byte,
            end_byte,
            start_char,
            end_char,
            tokens: count_tokens(trimmed),
        });
    }

    paras
}

/// Token-bounded paragraph chunker
#[derive(Debug, Clone)]
pub struct Chunker {
    tokens_min: usize,
    tokens_max: usize,
}

impl Default for Chunker {
    fn default() -> Self {
        Self::from_config(&ChunkingConfig::default())
    }
}

impl Chunker {
    /// Create a new chunker.
    ///
    /// # Panics
    ///
    /// Panics if `tokens_max` is 0 or `tokens_min > tokens_max`.
    /// `Config::validate` rejects both before a pipeline is built.
    pub fn new(tokens_min: usize, tokens_max: usize) -> Self {
        assert!(tokens_max > 0, "tokens_max must be > 0");
        assert!(tokens_min <= tokens_max, "tokens_min must be <= tokens_max");

        Self {
            tokens_min,
            tokens_max,
        }
    }

    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.tokens_min, config.tokens_max)
    }

    pub fn tokens_min(&self) -> usize {
        self.tokens_min
    }

    pub fn tokens_max(&self) -> usize {
        self.tokens_max
    }

    /// Split normalized text into ordered spans.
    ///
    /// Deterministic; empty or whitespace-only input yields no spans.
    pub fn chunk(&self, text: &str) -> Vec<TextSpan> {
        let paras = paragraphs(text);
        let mut spans = Vec::new();
        let mut buf: Vec<Paragraph> = Vec::new();
        let mut buf_tokens = 0;

        for para in paras {
            if buf_tokens + para.tokens <= self.tokens_max {
                buf.push(para);
                buf_tokens += para.tokens;
            } else if buf_tokens >= self.tokens_min {
                emit(text, &buf, &mut spans);
                buf.clear();
                buf.push(para);
                buf_tokens = para.tokens;
            } else {
                buf.push(para);
                emit(text, &buf, &mut spans);
                buf.clear();
                buf_tokens = 0;
            }
        }

        emit(text, &buf, &mut spans);
        spans
    }
}

fn emit(text: &str, buf: &[Paragraph], spans: &mut Vec<TextSpan>) {
    let (first, last) = match (buf.first(), buf.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return,
    };

    spans.push(TextSpan {
        start: first.start_char,
        end: last.end_char,
        text: text[first.start_byte..last.end_byte].to_string(),
    });
}
