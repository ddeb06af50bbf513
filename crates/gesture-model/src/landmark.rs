//! Hand landmark types.
//!
//! A detector reports one [`LandmarkSet`] per detected hand: 21 keypoints in a
//! fixed order (wrist, then four joints per digit from thumb to pinky).
//! Sets are validated on construction, so consumers can index any named
//! landmark without a bounds failure.

use serde::{Deserialize, Serialize};
use std::ops::Index;

use crate::ModelError;

/// Number of keypoints in a hand landmark set.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Skeleton edges drawn between landmarks in the preview overlay.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    // Palm
    (WRIST, THUMB_CMC),
    (WRIST, INDEX_MCP),
    (INDEX_MCP, MIDDLE_MCP),
    (MIDDLE_MCP, RING_MCP),
    (RING_MCP, PINKY_MCP),
    (WRIST, PINKY_MCP),
    // Thumb
    (THUMB_CMC, THUMB_MCP),
    (THUMB_MCP, THUMB_IP),
    (THUMB_IP, THUMB_TIP),
    // Index
    (INDEX_MCP, INDEX_PIP),
    (INDEX_PIP, INDEX_DIP),
    (INDEX_DIP, INDEX_TIP),
    // Middle
    (MIDDLE_MCP, MIDDLE_PIP),
    (MIDDLE_PIP, MIDDLE_DIP),
    (MIDDLE_DIP, MIDDLE_TIP),
    // Ring
    (RING_MCP, RING_PIP),
    (RING_PIP, RING_DIP),
    (RING_DIP, RING_TIP),
    // Pinky
    (PINKY_MCP, PINKY_PIP),
    (PINKY_PIP, PINKY_DIP),
    (PINKY_DIP, PINKY_TIP),
];

/// A single hand keypoint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Normalized X coordinate [0.0, 1.0], left to right.
    pub x: f64,
    /// Normalized Y coordinate [0.0, 1.0], top to bottom.
    pub y: f64,
    /// Relative depth estimate (smaller is closer to the camera).
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Pixel position inside a `width` x `height` frame.
    pub fn to_pixel(&self, width: u32, height: u32) -> (f32, f32) {
        ((self.x * width as f64) as f32, (self.y * height as f64) as f32)
    }
}

/// The 21 landmarks of one detected hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct LandmarkSet {
    points: [Landmark; LANDMARK_COUNT],
}

impl LandmarkSet {
    /// Build a set from detector output, rejecting anything but 21 points.
    pub fn new(points: Vec<Landmark>) -> Result<Self, ModelError> {
        let actual = points.len();
        let points: [Landmark; LANDMARK_COUNT] =
            points.try_into().map_err(|_| ModelError::LandmarkCount {
                expected: LANDMARK_COUNT,
                actual,
            })?;
        Ok(Self { points })
    }

    /// A set with every landmark at the same position.
    pub fn splat(x: f64, y: f64) -> Self {
        Self {
            points: [Landmark::new(x, y, 0.0); LANDMARK_COUNT],
        }
    }

    /// Return a copy with one landmark moved.
    pub fn with(mut self, index: usize, x: f64, y: f64) -> Self {
        self.points[index].x = x;
        self.points[index].y = y;
        self
    }

    /// All landmarks in detector order.
    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    pub fn wrist(&self) -> Landmark {
        self.points[WRIST]
    }

    pub fn index_tip(&self) -> Landmark {
        self.points[INDEX_TIP]
    }
}

impl Index<usize> for LandmarkSet {
    type Output = Landmark;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl TryFrom<Vec<Landmark>> for LandmarkSet {
    type Error = ModelError;

    fn try_from(points: Vec<Landmark>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<LandmarkSet> for Vec<Landmark> {
    fn from(set: LandmarkSet) -> Self {
        set.points.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(n: usize) -> Vec<Landmark> {
        (0..n)
            .map(|i| Landmark::new(i as f64 / 20.0, 0.5, 0.0))
            .collect()
    }

    #[test]
    fn test_accepts_exactly_21_points() {
        let set = LandmarkSet::new(points(21)).unwrap();
        assert_eq!(set.points().len(), LANDMARK_COUNT);
        assert_eq!(set[INDEX_TIP].x, 8.0 / 20.0);
    }

    #[test]
    fn test_rejects_wrong_count() {
        let err = LandmarkSet::new(points(20)).unwrap_err();
        assert!(matches!(
            err,
            ModelError::LandmarkCount {
                expected: 21,
                actual: 20
            }
        ));
        assert!(LandmarkSet::new(points(22)).is_err());
        assert!(LandmarkSet::new(vec![]).is_err());
    }

    #[test]
    fn test_deserialize_validates_count() {
        let short = serde_json::to_string(&points(5)).unwrap();
        assert!(serde_json::from_str::<LandmarkSet>(&short).is_err());

        let full = serde_json::to_string(&points(21)).unwrap();
        let set: LandmarkSet = serde_json::from_str(&full).unwrap();
        assert_eq!(set.wrist().x, 0.0);
    }

    #[test]
    fn test_depth_defaults_to_zero() {
        let raw = r#"{"x":0.25,"y":0.75}"#;
        let landmark: Landmark = serde_json::from_str(raw).unwrap();
        assert_eq!(landmark, Landmark::new(0.25, 0.75, 0.0));
    }

    #[test]
    fn test_with_moves_single_landmark() {
        let set = LandmarkSet::splat(0.5, 0.5).with(WRIST, 0.1, 0.9);
        assert_eq!(set.wrist(), Landmark::new(0.1, 0.9, 0.0));
        assert_eq!(set.index_tip(), Landmark::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn test_connections_reference_valid_landmarks() {
        for (a, b) in HAND_CONNECTIONS {
            assert!(a < LANDMARK_COUNT && b < LANDMARK_COUNT);
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_to_pixel() {
        let landmark = Landmark::new(0.5, 0.25, 0.0);
        assert_eq!(landmark.to_pixel(640, 480), (320.0, 120.0));
    }
}
