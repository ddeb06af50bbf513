//! Device backends for camera capture and preview.
//!
//! Live capture is provided by OpenCV behind the `opencv` feature. Without it
//! the camera cannot be opened and the preview runs headless.

use handwave_common::config::CameraConfig;
use handwave_common::error::{HandwaveError, HandwaveResult};

use crate::preview::{NullPreview, PreviewSink};
use crate::source::FrameSource;

#[cfg(feature = "opencv")]
pub mod opencv_camera;

#[cfg(feature = "opencv")]
pub use opencv_camera::{OpenCvCamera, OpenCvPreview};

/// Whether this build can open a live camera.
pub fn camera_supported() -> bool {
    cfg!(feature = "opencv")
}

/// Open the configured camera.
pub fn open_camera(config: &CameraConfig) -> HandwaveResult<Box<dyn FrameSource>> {
    #[cfg(feature = "opencv")]
    {
        Ok(Box::new(OpenCvCamera::open(config)?))
    }
    #[cfg(not(feature = "opencv"))]
    {
        Err(HandwaveError::unsupported(format!(
            "camera {} cannot be opened: built without the `opencv` feature",
            config.index
        )))
    }
}

/// Open the preview window, or a headless stand-in when it is disabled.
pub fn open_preview(config: &CameraConfig) -> HandwaveResult<Box<dyn PreviewSink>> {
    if !config.preview {
        return Ok(Box::new(NullPreview::new()));
    }

    #[cfg(feature = "opencv")]
    {
        Ok(Box::new(OpenCvPreview::open(config)?))
    }
    #[cfg(not(feature = "opencv"))]
    {
        tracing::warn!("Preview requested but built without the `opencv` feature; running headless");
        Ok(Box::new(NullPreview::new()))
    }
}

/// Map an OpenCV failure into a capture error.
#[cfg(feature = "opencv")]
pub(crate) fn capture_error(context: &str, err: impl std::fmt::Display) -> HandwaveError {
    HandwaveError::capture(format!("{context}: {err}"))
}
