//! Hand skeleton overlay for the preview window.

use handwave_gesture_model::{LandmarkSet, HAND_CONNECTIONS};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

use crate::frame::Frame;

/// Colors are RGB; they are converted to the frame's channel order on draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub landmark_color: [u8; 3],
    pub landmark_radius: i32,
    pub connection_color: [u8; 3],
    pub connection_thickness: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            landmark_color: [0, 255, 0],
            landmark_radius: 2,
            connection_color: [0, 0, 255],
            connection_thickness: 2,
        }
    }
}

/// Draw the skeleton connections, then the landmark dots on top.
pub fn draw_landmarks(frame: &mut Frame, hand: &LandmarkSet, style: &OverlayStyle) {
    let (width, height) = (frame.width(), frame.height());
    let line_color = frame.color(style.connection_color);
    let dot_color = frame.color(style.landmark_color);

    for &(from, to) in HAND_CONNECTIONS.iter() {
        let (x0, y0) = hand[from].to_pixel(width, height);
        let (x1, y1) = hand[to].to_pixel(width, height);
        for offset in 0..style.connection_thickness.max(1) {
            let d = offset as f32;
            draw_line_segment_mut(frame.pixels_mut(), (x0 + d, y0), (x1 + d, y1), line_color);
            draw_line_segment_mut(frame.pixels_mut(), (x0, y0 + d), (x1, y1 + d), line_color);
        }
    }

    for point in hand.points() {
        let (x, y) = point.to_pixel(width, height);
        draw_filled_circle_mut(
            frame.pixels_mut(),
            (x.round() as i32, y.round() as i32),
            style.landmark_radius,
            dot_color,
        );
    }
}
