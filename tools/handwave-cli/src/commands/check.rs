//! Show configuration and system capabilities.

use std::path::Path;

use anyhow::Context;
use handwave_common::config::{config_file_path, AppConfig};
use handwave_vision::backend::camera_supported;
use handwave_vision::detect_best_detector;

pub fn run(
    config: &AppConfig,
    explicit_path: Option<&Path>,
    write_config: bool,
) -> anyhow::Result<()> {
    println!("Handwave System Check");
    println!("{}", "=".repeat(50));

    let path = explicit_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path);
    if write_config {
        match explicit_path {
            Some(path) => config.save_to(path),
            None => config.save(),
        }
        .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("[OK] Config file: {} (written)", path.display());
    } else if path.exists() {
        println!("[OK] Config file: {}", path.display());
    } else {
        println!("[INFO] Config file: {} (not found, using defaults)", path.display());
    }

    println!("[OK] Server address: {}", config.server.ws_url());

    let camera = camera_supported();
    if camera {
        println!("[OK] Camera capture: OpenCV (device {})", config.camera.index);
    } else {
        println!("[WARN] Camera capture: unavailable (built without the `opencv` feature)");
        println!("       Use `handwave serve --replay <FILE>` to run from a recording");
    }

    let detector = match detect_best_detector(&config.detector) {
        Ok(detector) => {
            println!("[OK] Landmark detector: {}", detector.name());
            if detector.name() == "null" {
                println!("       No detector configured; no hands will be reported");
                println!("       Set `detector.command` or use `serve --detector <COMMAND>`");
            }
            Some(detector.name().to_string())
        }
        Err(e) => {
            println!("[FAIL] Landmark detector: {e}");
            None
        }
    };

    let gesture = &config.gesture;
    println!(
        "[OK] Gestures: smoothing {:?} (alpha {}), swipe threshold {}, cooldown {} frames",
        gesture.smoothing,
        gesture.smoothing_alpha,
        gesture.swipe_threshold,
        gesture.swipe_cooldown_frames
    );

    println!();
    if is_ready(camera, detector.as_deref()) {
        println!("Handwave is ready.");
    } else {
        println!("Some capabilities are missing. See above for fixes.");
    }

    Ok(())
}

/// Whether a session would produce events. A recording needs no camera; any
/// other working detector needs one.
fn is_ready(camera_available: bool, detector: Option<&str>) -> bool {
    match detector {
        None | Some("null") => false,
        Some("replay") => true,
        Some(_) => camera_available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_detector_is_never_ready() {
        assert!(!is_ready(true, Some("null")));
        assert!(!is_ready(false, Some("null")));
    }

    #[test]
    fn test_live_detector_needs_a_camera() {
        assert!(is_ready(true, Some("process")));
        assert!(!is_ready(false, Some("process")));
        assert!(!is_ready(true, None));
    }

    #[test]
    fn test_replay_is_ready_without_camera() {
        assert!(is_ready(false, Some("replay")));
    }

    #[test]
    fn test_write_config_to_explicit_path() {
        let dir = std::env::temp_dir().join(format!("handwave-check-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("config.json");

        let mut config = AppConfig::default();
        config.server.port = 9002;
        run(&config, Some(&path), true).unwrap();

        assert_eq!(AppConfig::load_from(&path), config);
        std::fs::remove_dir_all(&dir).ok();
    }
}
