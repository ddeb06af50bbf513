//! Camera frames.
//!
//! Frames carry 8-bit, 3-channel pixels. Cameras deliver BGR; detectors
//! expect RGB. The channel order travels with the frame so conversions are
//! explicit and overlay colors can be written in the right order.

use handwave_common::error::{HandwaveError, HandwaveResult};
use image::{imageops, Rgb, RgbImage};

/// Byte order of the three color channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    Bgr,
    Rgb,
}

/// One captured video frame.
#[derive(Debug, Clone)]
pub struct Frame {
    index: u64,
    order: ChannelOrder,
    // Pixel bytes in `order`; the `Rgb` pixel type is only a container.
    pixels: RgbImage,
}

impl Frame {
    pub fn new(index: u64, order: ChannelOrder, pixels: RgbImage) -> Self {
        Self {
            index,
            order,
            pixels,
        }
    }

    /// Wrap raw interleaved pixel bytes.
    pub fn from_raw(
        index: u64,
        order: ChannelOrder,
        width: u32,
        height: u32,
        data: Vec<u8>,
    ) -> HandwaveResult<Self> {
        let expected = width as usize * height as usize * 3;
        let actual = data.len();
        let pixels = RgbImage::from_raw(width, height, data).ok_or_else(|| {
            HandwaveError::capture(format!(
                "Frame buffer holds {actual} bytes, expected {expected} for {width}x{height}"
            ))
        })?;
        Ok(Self::new(index, order, pixels))
    }

    /// An all-black frame.
    pub fn blank(index: u64, order: ChannelOrder, width: u32, height: u32) -> Self {
        Self::new(index, order, RgbImage::new(width, height))
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Raw interleaved bytes in [`Frame::order`].
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut RgbImage {
        &mut self.pixels
    }

    /// Flip left-right in place so the preview behaves like a mirror.
    pub fn mirror(&mut self) {
        imageops::flip_horizontal_in_place(&mut self.pixels);
    }

    /// A copy of this frame in the requested channel order.
    pub fn converted(&self, order: ChannelOrder) -> Frame {
        let mut out = self.clone();
        if order != self.order {
            for pixel in out.pixels.pixels_mut() {
                pixel.0.swap(0, 2);
            }
            out.order = order;
        }
        out
    }

    /// A copy in the RGB order detectors expect.
    pub fn to_rgb(&self) -> Frame {
        self.converted(ChannelOrder::Rgb)
    }

    /// Pixel value for an RGB color, in this frame's channel order.
    pub fn color(&self, rgb: [u8; 3]) -> Rgb<u8> {
        match self.order {
            ChannelOrder::Rgb => Rgb(rgb),
            ChannelOrder::Bgr => Rgb([rgb[2], rgb[1], rgb[0]]),
        }
    }
}
