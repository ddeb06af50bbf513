//! Building a fresh pipeline for each client session.

use std::path::PathBuf;

use handwave_common::config::AppConfig;
use handwave_common::error::HandwaveResult;
use handwave_gesture_core::{GestureInterpreter, InterpreterConfig};
use handwave_vision::backend::{open_camera, open_preview};
use handwave_vision::{
    detect_best_detector, FramePipeline, FrameSource, LandmarkDetector, PipelineConfig,
    ReplayDetector, SyntheticSource,
};

/// Frame size used when replaying without a camera.
const REPLAY_FRAME_SIZE: (u32, u32) = (640, 480);

/// Opens the resources for one client session.
///
/// Called on a blocking thread once per accepted connection.
pub trait SessionFactory: Send + Sync + 'static {
    fn open_session(&self, session_id: u64) -> HandwaveResult<FramePipeline>;
}

/// Where session frames come from.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameInput {
    /// Live camera with the configured detector.
    Camera,
    /// Synthetic frames paired with a recorded landmark stream.
    Replay(PathBuf),
}

/// The standard factory: camera or replay input, configured preview and
/// gesture thresholds.
pub struct PipelineFactory {
    config: AppConfig,
    input: FrameInput,
}

impl PipelineFactory {
    pub fn new(config: AppConfig, input: FrameInput) -> Self {
        Self { config, input }
    }

    /// Pick replay input when the config names a recording, else the camera.
    pub fn from_config(config: AppConfig) -> Self {
        let input = match &config.detector.replay_path {
            Some(path) => FrameInput::Replay(path.clone()),
            None => FrameInput::Camera,
        };
        Self::new(config, input)
    }

    pub fn input(&self) -> &FrameInput {
        &self.input
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn open_input(&self) -> HandwaveResult<(Box<dyn FrameSource>, Box<dyn LandmarkDetector>)> {
        match &self.input {
            FrameInput::Camera => {
                let source = open_camera(&self.config.camera)?;
                let detector = detect_best_detector(&self.config.detector)?;
                Ok((source, detector))
            }
            FrameInput::Replay(path) => {
                let detector = ReplayDetector::from_file(path)?;
                let (width, height) = REPLAY_FRAME_SIZE;
                let source = SyntheticSource::with_limit(width, height, detector.len() as u64);
                Ok((Box::new(source), Box::new(detector)))
            }
        }
    }
}

impl SessionFactory for PipelineFactory {
    fn open_session(&self, session_id: u64) -> HandwaveResult<FramePipeline> {
        let (source, detector) = self.open_input()?;
        let preview = open_preview(&self.config.camera)?;
        let interpreter = GestureInterpreter::new(InterpreterConfig::from(&self.config.gesture));

        tracing::debug!(
            session = session_id,
            source = %source.name(),
            detector = %detector.name(),
            "Session pipeline opened"
        );

        Ok(FramePipeline::new(
            source,
            detector,
            preview,
            interpreter,
            PipelineConfig::from(&self.config.camera),
        ))
    }
}
