//! Replace the feed block of the page between two literal markers.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use thiserror::Error;

/// Opening boundary of the feed block in `ai-pulse.html`.
pub const START_MARKER: &str = "<!-- Feed posts -->\n                <div class=\"feed\">";
/// Closing boundary; it and everything after it is kept verbatim.
pub const END_MARKER: &str = "</div>\n\n                <!-- Load more -->";

const STAMP_INDENT: &str = "                    ";
const TAIL_INDENT: &str = "                ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    pub start: String,
    pub end: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            start: START_MARKER.to_string(),
            end: END_MARKER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Start,
    End,
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Start => f.write_str("start"),
            Marker::End => f.write_str("end"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SpliceError {
    #[error("could not find the feed {marker} marker in the page")]
    MarkerNotFound { marker: Marker },
}

/// Rebuild `document` with `fragments` between the markers.
///
/// The output keeps everything before the start marker, re-emits the start
/// marker, adds a `Last updated` comment stamped with `generated_at`, the
/// fragments, and then the original end marker and the rest of the page.
/// The end marker is searched only after the start marker. Pure: the caller
/// decides whether to persist the result.
pub fn splice(
    document: &str,
    markers: &Markers,
    fragments: &str,
    generated_at: DateTime<Utc>,
) -> Result<String, SpliceError> {
    let start = document
        .find(&markers.start)
        .ok_or(SpliceError::MarkerNotFound {
            marker: Marker::Start,
        })?;
    let after_start = start + markers.start.len();
    let end = document[after_start..]
        .find(&markers.end)
        .map(|offset| after_start + offset)
        .ok_or(SpliceError::MarkerNotFound {
            marker: Marker::End,
        })?;

    let stamp = generated_at.to_rfc3339_opts(SecondsFormat::Millis, true);
    let mut out = String::with_capacity(document.len() + fragments.len() + 64);
    out.push_str(&document[..start]);
    out.push_str(&markers.start);
    out.push('\n');
    out.push_str(&format!("{STAMP_INDENT}<!-- Last updated: {stamp} -->\n"));
    out.push_str(fragments);
    out.push('\n');
    out.push_str(TAIL_INDENT);
    out.push_str(&document[end..]);
    Ok(out)
}
