//! Hand landmark detectors.

use std::collections::VecDeque;
use std::path::Path;

use handwave_common::config::DetectorConfig;
use handwave_common::error::{HandwaveError, HandwaveResult};
use handwave_gesture_model::{parse_landmark_stream, LandmarkFrame, LandmarkSet};

use crate::frame::Frame;
use crate::sidecar::ProcessDetector;

/// Finds at most one hand in an RGB frame.
pub trait LandmarkDetector: Send {
    /// Detect the primary hand. `Ok(None)` means no hand in this frame.
    fn detect(&mut self, frame: &Frame) -> HandwaveResult<Option<LandmarkSet>>;

    /// Detector name for logs.
    fn name(&self) -> &str;
}

/// Detector that never sees a hand.
#[derive(Debug, Default)]
pub struct NullDetector;

impl LandmarkDetector for NullDetector {
    fn detect(&mut self, _frame: &Frame) -> HandwaveResult<Option<LandmarkSet>> {
        Ok(None)
    }

    fn name(&self) -> &str {
        "null"
    }
}

/// Detector that plays back a recorded landmark stream, one record per frame.
///
/// Once the recording runs out every further frame reports no hand.
pub struct ReplayDetector {
    frames: VecDeque<LandmarkFrame>,
    total: usize,
    exhausted_logged: bool,
}

impl ReplayDetector {
    /// Create a detector from in-memory records.
    pub fn from_frames(frames: Vec<LandmarkFrame>) -> Self {
        let total = frames.len();
        Self {
            frames: frames.into(),
            total,
            exhausted_logged: false,
        }
    }

    /// Load a JSONL landmark recording.
    pub fn from_file(path: &Path) -> HandwaveResult<Self> {
        if !path.exists() {
            return Err(HandwaveError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let frames = parse_landmark_stream(&content).map_err(|e| {
            HandwaveError::detection(format!("{}: {e}", path.display()))
        })?;
        tracing::info!(
            path = %path.display(),
            frames = frames.len(),
            "Loaded landmark recording"
        );
        Ok(Self::from_frames(frames))
    }

    /// Number of records in the recording.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Records not yet played back.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkDetector for ReplayDetector {
    fn detect(&mut self, _frame: &Frame) -> HandwaveResult<Option<LandmarkSet>> {
        match self.frames.pop_front() {
            Some(record) => Ok(record.hand),
            None => {
                if !self.exhausted_logged {
                    tracing::debug!(frames = self.total, "Landmark recording exhausted");
                    self.exhausted_logged = true;
                }
                Ok(None)
            }
        }
    }

    fn name(&self) -> &str {
        "replay"
    }
}

/// Pick a detector for the given configuration.
///
/// A configured landmark process wins over a recording. Either one failing to
/// start is an error. With nothing configured the null detector is used so
/// the server still starts.
pub fn detect_best_detector(config: &DetectorConfig) -> HandwaveResult<Box<dyn LandmarkDetector>> {
    if !config.command.is_empty() {
        return Ok(Box::new(ProcessDetector::spawn(config)?));
    }

    if let Some(path) = &config.replay_path {
        let detector = ReplayDetector::from_file(path)?;
        tracing::info!(
            max_hands = config.max_hands,
            min_detection_confidence = config.min_detection_confidence,
            min_tracking_confidence = config.min_tracking_confidence,
            "Using replay detector"
        );
        return Ok(Box::new(detector));
    }

    tracing::warn!("No landmark detector configured; using null detector, no hands will be reported");
    Ok(Box::new(NullDetector))
}
