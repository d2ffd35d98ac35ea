//! Text extraction and normalization.
//!
//! Turns raw file bytes into canonical text:
//!
//! 1. Sniff a bounded prefix: NUL bytes mean binary, otherwise guess
//!    the charset statistically (UTF-8 when inconclusive)
//! 2. Decode lossily, dropping undecodable sequences
//! 3. Strip `<script>`/`<style>` blocks and tags for markup files
//! 4. NFC-normalize, collapse 3+ newlines to 2, trim
//!
//! Anything that cannot yield text comes back as `None` so the caller
//! can quarantine the document as non-text.

use chardetng::EncodingDetector;
use encoding_rs::{DecoderResult, Encoding, UTF_8};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

use crate::core::config::NormalizeConfig;

static SCRIPT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b.*?</script\s*>").unwrap());

static STYLE_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<style\b.*?</style\s*>").unwrap());

static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

static NEWLINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Normalized text plus the charset it was decoded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub text: String,
    /// Lowercase WHATWG encoding label, e.g. `utf-8`
    pub charset: String,
}

/// Charset-aware text extractor
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    sniff_bytes: usize,
    markup_extensions: Vec<String>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::from_config(&NormalizeConfig::default())
    }
}

impl TextNormalizer {
    pub fn new(sniff_bytes: usize, markup_extensions: Vec<String>) -> Self {
        Self {
            sniff_bytes: sniff_bytes.max(1),
            markup_extensions: markup_extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &NormalizeConfig) -> Self {
        Self::new(config.sniff_bytes, config.markup_extensions.clone())
    }

    /// Extract normalized text from a file's bytes.
    ///
    /// Returns `None` for binary content or when nothing but
    /// whitespace survives normalization.
    pub fn extract(&self, path: &Path, bytes: &[u8]) -> Option<NormalizedText> {
        let prefix = &bytes[..bytes.len().min(self.sniff_bytes)];
        if looks_binary(prefix) {
            tracing::debug!("Binary content detected in {:?}", path);
            return None;
        }

        let encoding = detect_encoding(prefix, prefix.len() == bytes.len());
        let (mut text, actual, dropped) = decode_dropping_malformed(encoding, bytes);
        if dropped > 0 {
            tracing::debug!(
                "Dropped {} undecodable sequences in {:?} ({})",
                dropped,
                path,
                actual.name()
            );
        }

        if self.is_markup(path) {
            text = strip_markup(&text);
        }

        let text = normalize_text(&text);
        if text.is_empty() {
            return None;
        }

        Some(NormalizedText {
            text,
            charset: actual.name().to_lowercase(),
        })
    }

    fn is_markup(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                let ext = e.to_lowercase();
                self.markup_extensions.iter().any(|m| *m == ext)
            })
            .unwrap_or(false)
    }
}

/// NUL bytes do not occur in text in any single-byte or UTF-8
/// encoding we decode; UTF-16 is caught by its BOM first.
fn looks_binary(prefix: &[u8]) -> bool {
    if prefix.starts_with(&[0xFF, 0xFE]) || prefix.starts_with(&[0xFE, 0xFF]) {
        return false;
    }
    prefix.contains(&0)
}

/// Decode `bytes`, skipping malformed sequences instead of replacing
/// them. A BOM overrides `encoding`. U+FFFD present in well-formed
/// input is kept. Returns the text, the encoding actually used and
/// the number of malformed sequences dropped.
fn decode_dropping_malformed(
    encoding: &'static Encoding,
    bytes: &[u8],
) -> (String, &'static Encoding, usize) {
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((encoding, 0));
    let mut input = &bytes[bom_len..];
    let mut decoder = encoding.new_decoder_without_bom_handling();
    let mut text = String::with_capacity(
        decoder
            .max_utf8_buffer_length_without_replacement(input.len())
            .unwrap_or(input.len()),
    );
    let mut dropped = 0;

    loop {
        let (result, read) = decoder.decode_to_string_without_replacement(input, &mut text, true);
        input = &input[read..];
        match result {
            DecoderResult::InputEmpty => break,
            DecoderResult::Malformed(_, _) => dropped += 1,
            DecoderResult::OutputFull => text.reserve(input.len().max(4) * 3),
        }
    }

    (text, encoding, dropped)
}

/// Best-guess encoding of a byte prefix
fn detect_encoding(prefix: &[u8], is_whole_input: bool) -> &'static Encoding {
    if let Some((bom_encoding, _)) = Encoding::for_bom(prefix) {
        return bom_encoding;
    }

    if prefix.is_empty() || std::str::from_utf8(trim_partial_utf8(prefix)).is_ok() {
        return UTF_8;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(prefix, is_whole_input);
    detector.guess(None, true)
}

/// A bounded prefix may cut a multi-byte UTF-8 sequence in half;
/// drop up to three trailing continuation bytes before validating.
fn trim_partial_utf8(prefix: &[u8]) -> &[u8] {
    match std::str::from_utf8(prefix) {
        Ok(_) => prefix,
        Err(e) if e.error_len().is_none() => &prefix[..e.valid_up_to()],
        Err(_) => prefix,
    }
}

/// Remove script/style blocks, then every remaining tag
pub fn strip_markup(text: &str) -> String {
    let text = SCRIPT_BLOCK.replace_all(text, " ");
    let text = STYLE_BLOCK.replace_all(&text, " ");
    ANY_TAG.replace_all(&text, " ").into_owned()
}

/// NFC, newline-run collapse and trim
pub fn normalize_text(text: &str) -> String {
    let composed: String = text.replace("\r\n", "\n").nfc().collect();
    NEWLINE_RUN
        .replace_all(&composed, "\n\n")
        .trim()
        .to_string()
}
