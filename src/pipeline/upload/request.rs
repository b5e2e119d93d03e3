//! Wire DTOs for the upload boundary: the shapes the HTTP layer hands in
//! and gets back. Field names are camelCase to match the collaborator
//! contract.

use serde::{Deserialize, Serialize};

use crate::pipeline::scenes::Scene;

/// The three screenplay formats the pipeline accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenplayFormat {
    #[serde(rename = "txt")]
    Text,
    #[serde(rename = "fdx")]
    FinalDraft,
    #[serde(rename = "pdf")]
    Pdf,
}

impl ScreenplayFormat {
    /// Parse a declared file-type tag. Unknown tags are the caller's
    /// `UnsupportedFileType` case, not a panic or a default.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "txt" => Some(Self::Text),
            "fdx" => Some(Self::FinalDraft),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::FinalDraft => "fdx",
            Self::Pdf => "pdf",
        }
    }
}

/// One upload as received from the HTTP layer. The declared type is kept as
/// a raw string so an unknown tag surfaces as a typed dispatch failure
/// instead of a deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// Base64-encoded file contents
    pub file_data: String,
    pub file_name: String,
    pub file_type: String,
}

/// Metadata echoed back alongside extracted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadMeta {
    pub file_name: String,
    pub file_type: ScreenplayFormat,
    pub text_length: usize,
}

/// Successful extraction response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedScreenplay {
    pub screenplay_text: String,
    pub meta: UploadMeta,
}

/// Failure response body: stable code plus remediation-oriented message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadFailure {
    pub error: String,
    pub message: String,
}

/// Extraction and segmentation in one result, for callers that want the
/// scene list directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenplayBreakdown {
    pub meta: UploadMeta,
    pub scenes: Vec<Scene>,
}

/// Sanitize a declared filename — strip path components, limit length
pub fn sanitize_filename(original: &str) -> String {
    let name = std::path::Path::new(original)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("screenplay");

    let clean: String = name
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | '\0'))
        .take(255)
        .collect();

    if clean.is_empty() {
        "screenplay".to_string()
    } else {
        clean
    }
}
