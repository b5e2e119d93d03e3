/// Application-level constants
pub const APP_NAME: &str = "Slugline";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is not set
pub fn default_log_filter() -> &'static str {
    "info"
}

/// Upload size ceiling enforced by the dispatcher (10 MiB)
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Minimum character count for extracted text to count as a screenplay.
/// Anything shorter is a failure, never an empty success.
pub const MIN_TEXT_LENGTH: usize = 100;

/// Fragments shorter than this are discarded during scene segmentation
/// (title-page remnants, parsing artifacts). Tunable, not a fixed law —
/// see `segment_scenes_with_threshold`.
pub const SCENE_NOISE_THRESHOLD: usize = 20;

/// PDF runs whose y-coordinates differ by less than this are treated as
/// the same line when reconstructing reading order.
pub const SAME_LINE_TOLERANCE: f32 = 5.0;

/// Whitespace fraction above which PDF text is assumed letter-spaced
/// (one glyph per run) and the spacing repair kicks in.
pub const SPACED_TEXT_WHITESPACE_RATIO: f32 = 0.4;

/// Tab expansion width during normalization
pub const TAB_WIDTH: usize = 4;

/// Normalization caps blank runs at this many consecutive newlines
pub const MAX_CONSECUTIVE_NEWLINES: usize = 3;
