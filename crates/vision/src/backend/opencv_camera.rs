//! OpenCV webcam capture and HighGUI preview window.

use handwave_common::config::CameraConfig;
use handwave_common::error::{HandwaveError, HandwaveResult};
use opencv::core::{Mat, Scalar, CV_8UC3};
use opencv::highgui;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};

use super::capture_error;
use crate::frame::{ChannelOrder, Frame};
use crate::preview::PreviewSink;
use crate::source::FrameSource;

const WINDOW_TITLE: &str = "Handwave";

/// A webcam opened through `VideoCapture`. Frames arrive in BGR order.
pub struct OpenCvCamera {
    capture: VideoCapture,
    name: String,
    frames_read: u64,
    released: bool,
}

impl OpenCvCamera {
    pub fn open(config: &CameraConfig) -> HandwaveResult<Self> {
        tracing::info!(index = config.index, "Opening camera");
        let mut capture = VideoCapture::new(config.index, videoio::CAP_ANY)
            .map_err(|e| capture_error("VideoCapture::new", e))?;

        let opened = capture
            .is_opened()
            .map_err(|e| capture_error("VideoCapture::is_opened", e))?;
        if !opened {
            return Err(HandwaveError::capture(format!(
                "camera {} could not be opened",
                config.index
            )));
        }

        if let Some(width) = config.width {
            capture
                .set(videoio::CAP_PROP_FRAME_WIDTH, f64::from(width))
                .map_err(|e| capture_error("set frame width", e))?;
        }
        if let Some(height) = config.height {
            capture
                .set(videoio::CAP_PROP_FRAME_HEIGHT, f64::from(height))
                .map_err(|e| capture_error("set frame height", e))?;
        }

        Ok(Self {
            capture,
            name: format!("camera:{}", config.index),
            frames_read: 0,
            released: false,
        })
    }
}

impl FrameSource for OpenCvCamera {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_open(&self) -> bool {
        !self.released && self.capture.is_opened().unwrap_or(false)
    }

    fn read(&mut self) -> HandwaveResult<Option<Frame>> {
        let mut mat = Mat::default();
        let ok = self
            .capture
            .read(&mut mat)
            .map_err(|e| capture_error("VideoCapture::read", e))?;
        if !ok || mat.empty() {
            return Ok(None);
        }
        if mat.typ() != CV_8UC3 {
            return Err(HandwaveError::capture(format!(
                "unsupported pixel format (type {})",
                mat.typ()
            )));
        }

        let width = mat.cols() as u32;
        let height = mat.rows() as u32;
        let data = if mat.is_continuous() {
            mat.data_bytes()
                .map_err(|e| capture_error("Mat::data_bytes", e))?
                .to_vec()
        } else {
            let packed = mat
                .try_clone()
                .map_err(|e| capture_error("Mat::try_clone", e))?;
            packed
                .data_bytes()
                .map_err(|e| capture_error("Mat::data_bytes", e))?
                .to_vec()
        };

        let frame = Frame::from_raw(self.frames_read, ChannelOrder::Bgr, width, height, data)?;
        self.frames_read += 1;
        Ok(Some(frame))
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.capture.release() {
            tracing::warn!(error = %e, "Failed to release camera");
        }
        self.released = true;
        tracing::info!(camera = %self.name, frames = self.frames_read, "Camera released");
    }
}

impl Drop for OpenCvCamera {
    fn drop(&mut self) {
        self.release();
    }
}

/// A HighGUI window showing the annotated, mirrored feed.
pub struct OpenCvPreview {
    quit_key: i32,
    open: bool,
}

impl OpenCvPreview {
    pub fn open(config: &CameraConfig) -> HandwaveResult<Self> {
        highgui::named_window(WINDOW_TITLE, highgui::WINDOW_AUTOSIZE)
            .map_err(|e| HandwaveError::preview(format!("named_window: {e}")))?;
        Ok(Self {
            quit_key: config.quit_key as i32,
            open: true,
        })
    }
}

impl PreviewSink for OpenCvPreview {
    fn show(&mut self, frame: &Frame) -> HandwaveResult<()> {
        let bgr = frame.converted(ChannelOrder::Bgr);
        let mut mat = Mat::new_rows_cols_with_default(
            bgr.height() as i32,
            bgr.width() as i32,
            CV_8UC3,
            Scalar::all(0.0),
        )
        .map_err(|e| HandwaveError::preview(format!("Mat allocation: {e}")))?;
        mat.data_bytes_mut()
            .map_err(|e| HandwaveError::preview(format!("Mat::data_bytes_mut: {e}")))?
            .copy_from_slice(bgr.as_bytes());

        highgui::imshow(WINDOW_TITLE, &mat)
            .map_err(|e| HandwaveError::preview(format!("imshow: {e}")))
    }

    fn quit_requested(&mut self) -> HandwaveResult<bool> {
        let key = highgui::wait_key(1)
            .map_err(|e| HandwaveError::preview(format!("wait_key: {e}")))?;
        Ok(key >= 0 && (key & 0xFF) == self.quit_key)
    }

    fn close(&mut self) {
        if !self.open {
            return;
        }
        if let Err(e) = highgui::destroy_window(WINDOW_TITLE) {
            tracing::warn!(error = %e, "Failed to close preview window");
        }
        self.open = false;
    }
}

impl Drop for OpenCvPreview {
    fn drop(&mut self) {
        self.close();
    }
}
