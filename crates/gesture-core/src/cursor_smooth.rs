//! Cursor motion smoothing.
//!
//! The raw index-fingertip position jitters by a few pixels from frame to
//! frame. The smoother keeps one running position per session and blends
//! each new sample into it.

use handwave_common::config::{GestureConfig, SmoothingMode};

/// Available smoothing algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SmoothingAlgorithm {
    /// Exponential moving average.
    ///
    /// `alpha` is the weight of the new sample in [0.0, 1.0]:
    /// `smoothed = alpha * sample + (1 - alpha) * previous`.
    Ema { alpha: f64 },

    /// No smoothing. Raw samples pass through.
    None,
}

/// Stateful cursor smoother. Starts at the origin `(0, 0)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorSmoother {
    algorithm: SmoothingAlgorithm,
    x: f64,
    y: f64,
}

impl CursorSmoother {
    /// Create a smoother with the given algorithm.
    pub fn new(algorithm: SmoothingAlgorithm) -> Self {
        let algorithm = match algorithm {
            SmoothingAlgorithm::Ema { alpha } => SmoothingAlgorithm::Ema {
                alpha: clamp01(alpha),
            },
            SmoothingAlgorithm::None => SmoothingAlgorithm::None,
        };
        Self {
            algorithm,
            x: 0.0,
            y: 0.0,
        }
    }

    /// Create a smoother with the stock weighting (EMA, alpha=0.2).
    pub fn default_ema() -> Self {
        Self::new(SmoothingAlgorithm::Ema { alpha: 0.2 })
    }

    /// Build a smoothing algorithm from gesture config.
    pub fn algorithm_from_config(config: &GestureConfig) -> SmoothingAlgorithm {
        match config.smoothing {
            SmoothingMode::Ema => SmoothingAlgorithm::Ema {
                alpha: clamp01(config.smoothing_alpha),
            },
            SmoothingMode::None => SmoothingAlgorithm::None,
        }
    }

    /// The algorithm in use.
    pub fn algorithm(&self) -> SmoothingAlgorithm {
        self.algorithm
    }

    /// Blend a new sample into the running position and return it.
    pub fn update(&mut self, x: f64, y: f64) -> (f64, f64) {
        match self.algorithm {
            SmoothingAlgorithm::Ema { alpha } => {
                self.x = ema_step(self.x, x, alpha);
                self.y = ema_step(self.y, y, alpha);
            }
            SmoothingAlgorithm::None => {
                self.x = x;
                self.y = y;
            }
        }
        (self.x, self.y)
    }

    /// Current smoothed position.
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Smooth a whole sample sequence from a fresh origin state.
    pub fn smooth_samples(algorithm: SmoothingAlgorithm, samples: &[(f64, f64)]) -> Vec<(f64, f64)> {
        let mut smoother = Self::new(algorithm);
        samples.iter().map(|&(x, y)| smoother.update(x, y)).collect()
    }
}

impl Default for CursorSmoother {
    fn default() -> Self {
        Self::default_ema()
    }
}

fn ema_step(previous: f64, sample: f64, alpha: f64) -> f64 {
    let blended = alpha * sample + (1.0 - alpha) * previous;
    // Rounding can land one ulp outside the segment; pin it back.
    blended.clamp(previous.min(sample), previous.max(sample))
}

fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
