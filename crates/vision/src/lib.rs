//! Handwave Vision
//!
//! Runs the per-session frame loop: read a camera frame, mirror it, hand it
//! to the landmark detector, interpret the result, forward events, and show
//! an annotated preview.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    FramePipeline                      │
//! │  ┌─────────────┐  ┌──────────────────┐  ┌──────────┐ │
//! │  │ FrameSource │─▶│ LandmarkDetector │─▶│Interpreter│ │
//! │  └─────────────┘  └──────────────────┘  └────┬─────┘ │
//! │         │                                     │       │
//! │         ▼                                     ▼       │
//! │  ┌─────────────┐                       ┌───────────┐ │
//! │  │ PreviewSink │                       │ EventSink │ │
//! │  └─────────────┘                       └───────────┘ │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Every collaborator sits behind a trait so the loop runs headless in tests
//! with synthetic frames and a replayed landmark stream. Live landmarks come
//! from an external process speaking the recording format (see [`sidecar`]).

pub mod backend;
pub mod detector;
pub mod frame;
pub mod overlay;
pub mod pipeline;
pub mod preview;
pub mod sidecar;
pub mod source;

pub use detector::{detect_best_detector, LandmarkDetector, NullDetector, ReplayDetector};
pub use frame::{ChannelOrder, Frame};
pub use pipeline::{EventSink, FramePipeline, PipelineConfig, PipelineExit, PipelineStats};
pub use preview::{NullPreview, PreviewSink};
pub use sidecar::{ProcessDetector, StreamDetector};
pub use source::{FrameSource, SyntheticSource};
