//! Frame sources.

use handwave_common::error::HandwaveResult;

use crate::frame::{ChannelOrder, Frame};

/// A producer of video frames, typically a webcam.
///
/// `read` returning `Ok(None)` means this particular read failed or had no
/// data; the caller decides whether to retry. An `Err` means the device is
/// unusable and ends the session, as does `is_open` going false.
pub trait FrameSource: Send {
    /// Human-readable source name for logs.
    fn name(&self) -> &str;

    /// Whether the source can still deliver frames.
    fn is_open(&self) -> bool;

    /// Read the next frame.
    fn read(&mut self) -> HandwaveResult<Option<Frame>>;

    /// Release the underlying device. Must be idempotent.
    fn release(&mut self);
}

/// Source that produces black BGR frames.
///
/// Pairs with [`crate::ReplayDetector`] to drive the pipeline without a
/// camera.
pub struct SyntheticSource {
    width: u32,
    height: u32,
    limit: Option<u64>,
    produced: u64,
    released: bool,
}

impl SyntheticSource {
    /// Produce frames until released.
    pub fn unbounded(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            limit: None,
            produced: 0,
            released: false,
        }
    }

    /// Produce exactly `limit` frames, then report closed.
    pub fn with_limit(width: u32, height: u32, limit: u64) -> Self {
        Self {
            limit: Some(limit),
            ..Self::unbounded(width, height)
        }
    }

    pub fn frames_produced(&self) -> u64 {
        self.produced
    }
}

impl FrameSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn is_open(&self) -> bool {
        !self.released && self.limit.map_or(true, |limit| self.produced < limit)
    }

    fn read(&mut self) -> HandwaveResult<Option<Frame>> {
        if !self.is_open() {
            return Ok(None);
        }
        let frame = Frame::blank(self.produced, ChannelOrder::Bgr, self.width, self.height);
        self.produced += 1;
        Ok(Some(frame))
    }

    fn release(&mut self) {
        if !self.released {
            tracing::debug!(frames = self.produced, "Synthetic source released");
        }
        self.released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limited_source_closes() {
        let mut source = SyntheticSource::with_limit(4, 3, 2);
        assert!(source.is_open());

        let first = source.read().unwrap().unwrap();
        assert_eq!(first.index(), 0);
        assert_eq!((first.width(), first.height()), (4, 3));
        assert_eq!(first.order(), ChannelOrder::Bgr);

        source.read().unwrap().unwrap();
        assert!(!source.is_open());
        assert!(source.read().unwrap().is_none());
        assert_eq!(source.frames_produced(), 2);
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut source = SyntheticSource::unbounded(2, 2);
        source.release();
        source.release();
        assert!(!source.is_open());
    }
}
