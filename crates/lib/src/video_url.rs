//! # Video-ID Extraction
//!
//! Pulls the canonical video identifier out of the platform's URL shapes:
//! the watch-page query marker (`watch?v=ID`), the short-link path
//! (`youtu.be/ID`), and the embeddable player path (`embed/ID`). Matching is
//! first-match-wins in that priority order. A URL matching none of the
//! patterns is expected user input, so the result is an `Option`, not an
//! error.

use regex::Regex;
use std::sync::LazyLock;

static PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"v=([\w-]+)").expect("invalid watch pattern"),
        Regex::new(r"be/([\w-]+)").expect("invalid short-link pattern"),
        Regex::new(r"embed/([\w-]+)").expect("invalid embed pattern"),
    ]
});

/// Extracts the video identifier from a platform URL, if any pattern matches.
///
/// The identifier is the longest run of URL-safe characters (letters, digits,
/// hyphen, underscore) immediately following the marker.
pub fn extract_video_id(url: &str) -> Option<&str> {
    PATTERNS
        .iter()
        .find_map(|re| re.captures(url))
        .map(|caps| caps.get(1).map_or("", |m| m.as_str()))
        .filter(|id| !id.is_empty())
}
