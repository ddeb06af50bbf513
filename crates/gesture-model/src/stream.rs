//! Recorded landmark streams.
//!
//! A landmark stream is JSONL with one record per camera frame, in frame
//! order. Frames where the detector found no hand carry `"hand": null`.
//! Blank lines and `#` comment lines are ignored so fixtures can carry notes.
//!
//! ```text
//! # swipe right then rest
//! {"frame":0,"hand":[{"x":0.30,"y":0.80,"z":0.0}, ...21 points]}
//! {"frame":1,"hand":null}
//! ```

use serde::{Deserialize, Serialize};

use crate::landmark::LandmarkSet;
use crate::ModelError;

/// Detector output for one camera frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Frame sequence number.
    pub frame: u64,

    /// The detected hand, if any.
    #[serde(default)]
    pub hand: Option<LandmarkSet>,
}

impl LandmarkFrame {
    pub fn new(frame: u64, hand: Option<LandmarkSet>) -> Self {
        Self { frame, hand }
    }
}

/// Parse a landmark stream from JSONL content.
///
/// Errors carry the 1-based line number of the offending record.
pub fn parse_landmark_stream(jsonl: &str) -> Result<Vec<LandmarkFrame>, ModelError> {
    jsonl
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| {
            serde_json::from_str(line).map_err(|source| ModelError::StreamParse {
                line: line_no,
                source,
            })
        })
        .collect()
}

/// Serialize frames to JSONL format.
pub fn serialize_landmark_stream(frames: &[LandmarkFrame]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for frame in frames {
        output.push_str(&serde_json::to_string(frame)?);
        output.push('\n');
    }
    Ok(output)
}
