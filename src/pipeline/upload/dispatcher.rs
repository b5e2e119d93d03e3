//! Upload dispatch: validate the declared upload, route the decoded bytes
//! to the matching extractor, and re-express every failure as a stable
//! error code with a remediation hint.

use base64::Engine;
use uuid::Uuid;

use super::request::{
    sanitize_filename, ParsedScreenplay, ScreenplayBreakdown, ScreenplayFormat, UploadMeta,
    UploadRequest,
};
use super::{ensure_upload_min_length, UploadError};
use crate::config::MAX_UPLOAD_BYTES;
use crate::pipeline::extraction::{
    FdxExtractor, PdfTextExtractor, PlainTextExtractor, ScreenplayExtractor,
};
use crate::pipeline::scenes::segment_scenes;

/// Parse one screenplay upload into normalized text.
///
/// Validation happens in a fixed order so each failure gets its own
/// user-facing reason: declared type, base64 payload, emptiness, size
/// ceiling, then format-specific extraction.
pub fn parse_upload(request: &UploadRequest) -> Result<ParsedScreenplay, UploadError> {
    let upload_id = Uuid::new_v4();
    let file_name = sanitize_filename(&request.file_name);

    let format = ScreenplayFormat::from_tag(&request.file_type).ok_or_else(|| {
        UploadError::UnsupportedFileType {
            tag: request.file_type.clone(),
        }
    })?;

    tracing::info!(
        upload_id = %upload_id,
        file = %file_name,
        file_type = format.as_str(),
        "starting screenplay upload parse"
    );

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(request.file_data.as_bytes())
        .map_err(|_| UploadError::InvalidFileData)?;

    if bytes.is_empty() {
        return Err(UploadError::EmptyFile);
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(UploadError::FileTooLarge {
            size_mb: bytes.len() as f64 / (1024.0 * 1024.0),
            max_mb: (MAX_UPLOAD_BYTES / (1024 * 1024)) as u64,
        });
    }

    let text = extractor_for(format).extract_text(&bytes)?;

    // Defense in depth: extractors enforce this too, but the boundary never
    // hands short text downstream regardless of which extractor ran.
    ensure_upload_min_length(&text)?;

    let text_length = text.chars().count();
    tracing::info!(
        upload_id = %upload_id,
        file = %file_name,
        text_length,
        "screenplay upload parsed"
    );

    Ok(ParsedScreenplay {
        screenplay_text: text,
        meta: UploadMeta {
            file_name,
            file_type: format,
            text_length,
        },
    })
}

/// Parse an upload and segment it into scenes in one call. A screenplay
/// with no recognizable sluglines surfaces here as `NoScenesFound`.
pub fn process_upload(request: &UploadRequest) -> Result<ScreenplayBreakdown, UploadError> {
    let parsed = parse_upload(request)?;
    let scenes = segment_scenes(&parsed.screenplay_text);
    if scenes.is_empty() {
        return Err(UploadError::NoScenesFound);
    }
    tracing::info!(
        file = %parsed.meta.file_name,
        scene_count = scenes.len(),
        "screenplay segmented"
    );
    Ok(ScreenplayBreakdown {
        meta: parsed.meta,
        scenes,
    })
}

fn extractor_for(format: ScreenplayFormat) -> &'static dyn ScreenplayExtractor {
    match format {
        ScreenplayFormat::Text => &PlainTextExtractor,
        ScreenplayFormat::FinalDraft => &FdxExtractor,
        ScreenplayFormat::Pdf => &PdfTextExtractor,
    }
}
