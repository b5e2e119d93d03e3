pub mod fdx;
pub mod normalize;
pub mod pdf;
pub mod text;
pub mod types;

pub use fdx::*;
pub use normalize::*;
pub use pdf::*;
pub use text::*;
pub use types::*;

use thiserror::Error;

use crate::config::MIN_TEXT_LENGTH;

/// Extractor-stage failures. Every variant maps to a stable wire code via
/// `code()`; display messages are remediation hints safe to show users.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Could not decode file contents as text — the file may be corrupt")]
    DecodeError,

    #[error("File does not look like a Final Draft document — re-export it from Final Draft as .fdx")]
    NotFdxFormat,

    #[error("Final Draft file is not valid XML — re-export it from Final Draft")]
    MalformedXml(String),

    #[error("No paragraphs found in Final Draft file — re-export it, or export the screenplay as plain text")]
    NoParagraphs,

    #[error("Could not open PDF — remove password protection or re-export the file, then try again")]
    InvalidOrEncrypted,

    #[error("No extractable text found in PDF — this looks like a scanned document; export the screenplay as plain text or .fdx instead")]
    NoExtractableText,

    #[error("Extracted text is too short ({length} characters) — check that the source file contains the full screenplay")]
    InsufficientContent { length: usize },
}

impl ExtractionError {
    /// Stable error code for the §7 taxonomy; collaborators match on these,
    /// never on message text.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DecodeError => "DECODE_ERROR",
            Self::NotFdxFormat => "NOT_FDX_FORMAT",
            Self::MalformedXml(_) => "MALFORMED_XML",
            Self::NoParagraphs => "NO_PARAGRAPHS",
            Self::InvalidOrEncrypted => "INVALID_OR_ENCRYPTED",
            Self::NoExtractableText => "NO_EXTRACTABLE_TEXT",
            Self::InsufficientContent { .. } => "INSUFFICIENT_CONTENT",
        }
    }
}

/// Shared validity gate: normalized output under the minimum length is a
/// failure, never an empty success.
pub(crate) fn ensure_min_length(text: String) -> Result<String, ExtractionError> {
    let length = text.chars().count();
    if length < MIN_TEXT_LENGTH {
        return Err(ExtractionError::InsufficientContent { length });
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_rejected() {
        let result = ensure_min_length("too short".to_string());
        assert!(matches!(
            result,
            Err(ExtractionError::InsufficientContent { length: 9 })
        ));
    }

    #[test]
    fn long_text_passes_through() {
        let text = "x".repeat(MIN_TEXT_LENGTH);
        assert_eq!(ensure_min_length(text.clone()).unwrap(), text);
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(ExtractionError::DecodeError.code(), "DECODE_ERROR");
        assert_eq!(ExtractionError::NotFdxFormat.code(), "NOT_FDX_FORMAT");
        assert_eq!(
            ExtractionError::MalformedXml("x".into()).code(),
            "MALFORMED_XML"
        );
        assert_eq!(ExtractionError::NoParagraphs.code(), "NO_PARAGRAPHS");
        assert_eq!(
            ExtractionError::InvalidOrEncrypted.code(),
            "INVALID_OR_ENCRYPTED"
        );
        assert_eq!(
            ExtractionError::NoExtractableText.code(),
            "NO_EXTRACTABLE_TEXT"
        );
        assert_eq!(
            ExtractionError::InsufficientContent { length: 3 }.code(),
            "INSUFFICIENT_CONTENT"
        );
    }
}
