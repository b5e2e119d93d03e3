//! Scene segmentation: split normalized screenplay text at slugline
//! boundaries into an ordered scene list.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::SCENE_NOISE_THRESHOLD;

/// A line starting (case-insensitively) with `INT.` or `EXT.`, optional
/// leading indentation allowed. `I/E.` and other locale conventions are not
/// recognized.
static SLUGLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)^[ \t]*(?:INT|EXT)\.").unwrap());

/// One scene of a screenplay: everything from its slugline up to, but not
/// including, the next slugline or end of document. Immutable once
/// produced; re-segmentation replaces the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// 1-based position in the document, contiguous
    pub number: usize,
    /// The scene-heading line itself, for scene-list browsing
    pub slugline: String,
    /// Raw scene text, slugline included
    pub text: String,
}

/// Split screenplay text into scenes using the default noise threshold.
///
/// Total and pure: no sluglines means an empty list, reported by callers as
/// a distinct "no scenes found" condition rather than an error here.
pub fn segment_scenes(text: &str) -> Vec<Scene> {
    segment_scenes_with_threshold(text, SCENE_NOISE_THRESHOLD)
}

/// Split at every slugline line start, keeping the slugline attached to the
/// scene it opens. Fragments shorter than `noise_threshold` (title-page
/// remnants, parsing artifacts) and any leading fragment before the first
/// slugline are discarded; survivors are renumbered from 1 in document
/// order.
pub fn segment_scenes_with_threshold(text: &str, noise_threshold: usize) -> Vec<Scene> {
    let starts: Vec<usize> = SLUGLINE.find_iter(text).map(|m| m.start()).collect();
    if starts.is_empty() {
        tracing::debug!(text_length = text.chars().count(), "no sluglines found");
        return Vec::new();
    }

    let mut scenes = Vec::with_capacity(starts.len());
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        let fragment = text[start..end].trim_end();
        if fragment.chars().count() < noise_threshold {
            tracing::debug!(fragment_length = fragment.chars().count(), "discarding noise fragment");
            continue;
        }
        let slugline = fragment.lines().next().unwrap_or_default().trim().to_string();
        scenes.push(Scene {
            number: scenes.len() + 1,
            slugline,
            text: fragment.to_string(),
        });
    }
    scenes
}
