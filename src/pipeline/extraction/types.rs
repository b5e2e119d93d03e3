use super::ExtractionError;

/// Screenplay text extraction abstraction: one implementation per supported
/// file format, selected by the upload dispatcher. Implementations return
/// fully normalized text that already meets the minimum-length gate.
pub trait ScreenplayExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}
