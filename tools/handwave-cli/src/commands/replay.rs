//! Interpret a landmark recording offline.

use std::path::Path;

use anyhow::Context;
use handwave_common::config::AppConfig;
use handwave_gesture_core::{GestureInterpreter, InterpreterConfig};
use handwave_gesture_model::{parse_landmark_stream, GestureEvent, LandmarkFrame};

#[derive(Debug, Default, PartialEq)]
struct ReplaySummary {
    frames: usize,
    hand_frames: usize,
    cursor: usize,
    scroll: usize,
    gesture: usize,
}

impl ReplaySummary {
    fn record(&mut self, event: &GestureEvent) {
        match event {
            GestureEvent::Cursor { .. } => self.cursor += 1,
            GestureEvent::Scroll { .. } => self.scroll += 1,
            GestureEvent::Gesture { .. } => self.gesture += 1,
        }
    }

    fn events(&self) -> usize {
        self.cursor + self.scroll + self.gesture
    }
}

pub fn run(config: &AppConfig, path: &Path, quiet: bool) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let frames = parse_landmark_stream(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let mut interpreter = GestureInterpreter::new(InterpreterConfig::from(&config.gesture));
    let summary = replay(&mut interpreter, &frames, |event| {
        if !quiet {
            println!("{}", event.to_json()?);
        }
        Ok(())
    })?;

    eprintln!();
    eprintln!("Replayed {}", path.display());
    eprintln!(
        "  Frames: {} ({} with a hand)",
        summary.frames, summary.hand_frames
    );
    eprintln!(
        "  Events: {} (cursor {}, scroll {}, gesture {})",
        summary.events(),
        summary.cursor,
        summary.scroll,
        summary.gesture
    );
    let state = interpreter.state();
    eprintln!(
        "  Final cursor: ({:.4}, {:.4}), swipe cooldown {}",
        state.cursor().0,
        state.cursor().1,
        state.cooldown()
    );

    Ok(())
}

fn replay(
    interpreter: &mut GestureInterpreter,
    frames: &[LandmarkFrame],
    mut emit: impl FnMut(&GestureEvent) -> anyhow::Result<()>,
) -> anyhow::Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();
    for frame in frames {
        summary.frames += 1;
        if frame.hand.is_some() {
            summary.hand_frames += 1;
        }
        for event in interpreter.process_frame(frame.hand.as_ref()) {
            summary.record(&event);
            emit(&event)?;
        }
    }
    tracing::debug!(frames = summary.frames, events = summary.events(), "Replay finished");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use handwave_gesture_model::{LandmarkSet, WRIST};

    #[test]
    fn test_replay_counts_events_by_kind() {
        let frames = vec![
            LandmarkFrame::new(0, Some(LandmarkSet::splat(0.5, 0.5).with(WRIST, 0.3, 0.9))),
            LandmarkFrame::new(1, None),
            LandmarkFrame::new(2, Some(LandmarkSet::splat(0.5, 0.5).with(WRIST, 0.5, 0.9))),
        ];
        let mut interpreter = GestureInterpreter::with_defaults();
        let mut lines = Vec::new();
        let summary = replay(&mut interpreter, &frames, |event| {
            lines.push(event.to_json()?);
            Ok(())
        })
        .unwrap();

        assert_eq!(
            summary,
            ReplaySummary {
                frames: 3,
                hand_frames: 2,
                cursor: 2,
                scroll: 0,
                gesture: 1,
            }
        );
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], r#"{"type":"GESTURE","action":"NEXT"}"#);
    }
}
