pub mod dispatcher;
pub mod request;

pub use dispatcher::*;
pub use request::*;

use thiserror::Error;

use crate::config::MIN_TEXT_LENGTH;
use crate::pipeline::extraction::ExtractionError;

/// Dispatch-stage failures, plus extractor failures carried through. This
/// is the complete set of upload outcomes the HTTP layer can observe; raw
/// parser error text never crosses this boundary.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Unsupported file type \"{tag}\" — upload a .txt, .fdx, or .pdf file")]
    UnsupportedFileType { tag: String },

    #[error("File data is not valid base64 — please resubmit the upload")]
    InvalidFileData,

    #[error("Uploaded file is empty — please resubmit the upload")]
    EmptyFile,

    #[error("File too large: {size_mb:.1}MB exceeds {max_mb}MB limit — split the screenplay or compress the file")]
    FileTooLarge { size_mb: f64, max_mb: u64 },

    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    #[error("No scenes found — the screenplay needs INT. or EXT. scene headings to be broken down")]
    NoScenesFound,
}

impl UploadError {
    /// Stable wire code for the §7 taxonomy.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedFileType { .. } => "UNSUPPORTED_FILE_TYPE",
            Self::InvalidFileData => "INVALID_FILE_DATA",
            Self::EmptyFile => "EMPTY_FILE",
            Self::FileTooLarge { .. } => "FILE_TOO_LARGE",
            Self::Extraction(err) => err.code(),
            Self::NoScenesFound => "NO_SCENES_FOUND",
        }
    }

    /// Render as the §6 failure response body.
    pub fn to_failure(&self) -> UploadFailure {
        UploadFailure {
            error: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

/// Defense-in-depth length gate applied by the dispatcher after a
/// successful extraction.
pub(crate) fn ensure_upload_min_length(text: &str) -> Result<(), UploadError> {
    let length = text.chars().count();
    if length < MIN_TEXT_LENGTH {
        return Err(ExtractionError::InsufficientContent { length }.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        let err = UploadError::UnsupportedFileType { tag: "docx".into() };
        assert_eq!(err.code(), "UNSUPPORTED_FILE_TYPE");
        assert_eq!(UploadError::InvalidFileData.code(), "INVALID_FILE_DATA");
        assert_eq!(UploadError::EmptyFile.code(), "EMPTY_FILE");
        let err = UploadError::FileTooLarge { size_mb: 12.0, max_mb: 10 };
        assert_eq!(err.code(), "FILE_TOO_LARGE");
        assert_eq!(UploadError::NoScenesFound.code(), "NO_SCENES_FOUND");
    }

    #[test]
    fn extraction_codes_carried_through() {
        let err: UploadError = ExtractionError::NoExtractableText.into();
        assert_eq!(err.code(), "NO_EXTRACTABLE_TEXT");
        let err: UploadError = ExtractionError::InsufficientContent { length: 5 }.into();
        assert_eq!(err.code(), "INSUFFICIENT_CONTENT");
    }

    #[test]
    fn failure_body_has_code_and_message() {
        let failure = UploadError::EmptyFile.to_failure();
        assert_eq!(failure.error, "EMPTY_FILE");
        assert!(failure.message.contains("empty"));
    }

    #[test]
    fn messages_carry_remediation_hints() {
        let err: UploadError = ExtractionError::InvalidOrEncrypted.into();
        assert!(err.to_string().contains("password"));
        let err: UploadError = ExtractionError::NoExtractableText.into();
        assert!(err.to_string().contains("scanned"));
    }
}
