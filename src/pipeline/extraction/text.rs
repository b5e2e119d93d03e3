//! Plain-text extraction: UTF-8 decode with Latin-1 fallback.

use super::normalize::normalize_text;
use super::types::ScreenplayExtractor;
use super::{ensure_min_length, ExtractionError};

/// Extractor for raw `.txt` uploads. Decoding never fails: any byte
/// sequence that is not valid UTF-8 is read as Latin-1 instead, so the only
/// failure mode left is content that is too short.
pub struct PlainTextExtractor;

impl ScreenplayExtractor for PlainTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let decoded = decode_utf8_or_latin1(bytes);
        ensure_min_length(normalize_text(&decoded))
    }
}

/// Decode bytes as UTF-8, falling back to Latin-1. Latin-1 maps every byte
/// to a char, so this is total.
pub(crate) fn decode_utf8_or_latin1(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            tracing::debug!(len = bytes.len(), "UTF-8 decode failed, reading as Latin-1");
            bytes.iter().map(|&b| b as char).collect()
        }
    }
}
