//! Handwave Gesture Model
//!
//! Defines the data contracts shared by the vision pipeline, the gesture
//! interpreter, and the transport:
//! - **Landmarks:** The 21-point hand skeleton produced by a detector
//! - **Events:** Outbound `CURSOR` / `SCROLL` / `GESTURE` messages
//! - **Streams:** Recorded per-frame landmark sets in JSONL form
//!
//! All coordinates are normalized to `[0.0, 1.0]` with the origin at the
//! top-left of the (mirrored) camera frame.

pub mod event;
pub mod landmark;
pub mod stream;

pub use event::*;
pub use landmark::*;
pub use stream::*;

/// Errors raised while building or parsing model values.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("expected {expected} landmarks, got {actual}")]
    LandmarkCount { expected: usize, actual: usize },

    #[error("landmark stream line {line}: {source}")]
    StreamParse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
