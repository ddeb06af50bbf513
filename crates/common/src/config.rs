//! Application configuration.
//!
//! Every section falls back to defaults that reproduce the stock behavior:
//! serve on `localhost:8080`, camera 0 with a preview window, a single-hand
//! detector at 0.7/0.5 confidence, and the fixed gesture thresholds.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// WebSocket server settings.
    pub server: ServerConfig,

    /// Camera capture and preview settings.
    pub camera: CameraConfig,

    /// Landmark detector settings.
    pub detector: DetectorConfig,

    /// Gesture interpretation thresholds.
    pub gesture: GestureConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Where and how the event server listens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host name or address to bind.
    pub host: String,

    /// TCP port to bind.
    pub port: u16,

    /// Bounded capacity of each session's outbound event queue.
    pub send_queue_capacity: usize,
}

/// Camera capture parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Zero-based capture device index.
    pub index: i32,

    /// Requested frame width, if any.
    pub width: Option<u32>,

    /// Requested frame height, if any.
    pub height: Option<u32>,

    /// Delay after a failed frame read (ms).
    pub idle_delay_ms: u64,

    /// Delay after every processed frame (ms).
    pub frame_delay_ms: u64,

    /// Whether to open a local preview window.
    pub preview: bool,

    /// Key that closes the preview and ends the session.
    pub quit_key: char,
}

/// Landmark detector parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Maximum number of hands to track.
    pub max_hands: u32,

    /// Minimum confidence for a fresh palm detection.
    pub min_detection_confidence: f32,

    /// Minimum confidence to keep tracking between frames.
    pub min_tracking_confidence: f32,

    /// Landmark stream to replay instead of running a live model.
    pub replay_path: Option<PathBuf>,

    /// External landmark process for live capture: program followed by its
    /// arguments. Empty means none.
    pub command: Vec<String>,
}

/// Smoothing mode applied to the cursor signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingMode {
    /// Exponential moving average with `smoothing_alpha`.
    #[default]
    Ema,
    /// Pass the fingertip position through untouched.
    None,
}

/// Thresholds for cursor, scroll, and swipe interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Cursor smoothing mode.
    pub smoothing: SmoothingMode,

    /// EMA weight of each new fingertip sample.
    pub smoothing_alpha: f64,

    /// Thumb tip must sit this far below the thumb IP joint to scroll down.
    pub scroll_thumb_margin: f64,

    /// Index tip must sit this far above the index MCP joint to stop scrolling.
    pub scroll_stop_margin: f64,

    /// Minimum wrist travel between two hand frames to count as a swipe.
    pub swipe_threshold: f64,

    /// Hand frames to ignore swipes after one fires.
    pub swipe_cooldown_frames: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "handwave=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            send_queue_capacity: 64,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// WebSocket URL clients connect to.
    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.bind_address())
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: None,
            height: None,
            idle_delay_ms: 10,
            frame_delay_ms: 10,
            preview: true,
            quit_key: 'q',
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_hands: 1,
            min_detection_confidence: 0.7,
            min_tracking_confidence: 0.5,
            replay_path: None,
            command: Vec::new(),
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            smoothing: SmoothingMode::Ema,
            smoothing_alpha: 0.2,
            scroll_thumb_margin: 0.05,
            scroll_stop_margin: 0.05,
            swipe_threshold: 0.15,
            swipe_cooldown_frames: 25,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &std::path::Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&config_file_path())
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("handwave").join("config.json")
}
