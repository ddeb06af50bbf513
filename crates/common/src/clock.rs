//! Session timing utilities.
//!
//! Each gesture session is anchored to a monotonic epoch recorded when the
//! client connects. Frame-rate measurement uses nanosecond offsets from that
//! epoch so it can be driven deterministically in tests.

use std::time::Instant;

/// A session clock that provides monotonic timestamps relative to
/// the moment a client connected.
#[derive(Debug, Clone)]
pub struct SessionClock {
    /// The instant the session started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Nanoseconds elapsed since the session started.
    pub fn elapsed_ns(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }

    /// Seconds elapsed since the session started.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }
}

/// Counts frames and reports the observed rate once per window.
#[derive(Debug)]
pub struct FrameRateMeter {
    window_ns: u64,
    window_start_ns: Option<u64>,
    frames_in_window: u64,
}

impl FrameRateMeter {
    /// Create a meter that reports once every `window_ns` nanoseconds.
    pub fn new(window_ns: u64) -> Self {
        Self {
            window_ns: window_ns.max(1),
            window_start_ns: None,
            frames_in_window: 0,
        }
    }

    /// A meter reporting once per second.
    pub fn per_second() -> Self {
        Self::new(1_000_000_000)
    }

    /// Record one frame at `now_ns`.
    ///
    /// Returns the frames-per-second of the window that just closed, if any.
    /// The first call only opens a window.
    pub fn tick(&mut self, now_ns: u64) -> Option<f64> {
        let start = match self.window_start_ns {
            None => {
                self.window_start_ns = Some(now_ns);
                self.frames_in_window = 1;
                return None;
            }
            Some(start) => start,
        };

        self.frames_in_window += 1;
        let span = now_ns.saturating_sub(start);
        if span < self.window_ns {
            return None;
        }

        // The frame that closes the window opens the next one.
        let fps = (self.frames_in_window - 1) as f64 / (span as f64 / 1_000_000_000.0);
        self.window_start_ns = Some(now_ns);
        self.frames_in_window = 1;
        Some(fps)
    }
}
