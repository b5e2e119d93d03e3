//! Slugline — screenplay extraction and scene-segmentation core.
//!
//! Turns one uploaded screenplay file (plain text, Final Draft XML, or PDF)
//! into normalized text and an ordered list of scenes for downstream
//! creative/production analysis. The HTTP layer, document store, billing,
//! and the per-scene LLM call are external collaborators; this crate only
//! speaks their wire shapes (`UploadRequest` in, `ParsedScreenplay` /
//! `ScreenplayBreakdown` or a coded `UploadFailure` out).

pub mod config;
pub mod pipeline;

use tracing_subscriber::EnvFilter;

pub use pipeline::extraction::{normalize_text, ExtractionError, ScreenplayExtractor};
pub use pipeline::scenes::{segment_scenes, segment_scenes_with_threshold, Scene};
pub use pipeline::upload::{
    parse_upload, process_upload, ParsedScreenplay, ScreenplayBreakdown, ScreenplayFormat,
    UploadError, UploadFailure, UploadMeta, UploadRequest,
};

/// Install the process-wide tracing subscriber. Meant for binaries and
/// integration harnesses; the library itself only emits events.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
