//! Live landmark detection through an external process.
//!
//! The process is spawned once per session and talks a line protocol over its
//! standard streams. For every camera frame it receives a JSON header line
//! followed by the raw RGB pixels, row by row:
//!
//! ```text
//! {"frame":0,"width":640,"height":480,"format":"rgb24"}
//! <640 * 480 * 3 bytes>
//! ```
//!
//! and answers with exactly one record in the landmark recording format:
//!
//! ```text
//! {"frame":0,"hand":[{"x":0.41,"y":0.63,"z":-0.02}, ...21 points]}
//! {"frame":1,"hand":null}
//! ```
//!
//! The detector settings follow the configured command as
//! `--max-hands N --min-detection-confidence C --min-tracking-confidence C`.
//! Anything the process writes to stderr goes straight to ours.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use handwave_common::config::DetectorConfig;
use handwave_common::error::{HandwaveError, HandwaveResult};
use handwave_gesture_model::{LandmarkFrame, LandmarkSet};
use serde::Serialize;

use crate::detector::LandmarkDetector;
use crate::frame::Frame;

#[derive(Debug, Serialize)]
struct FrameHeader {
    frame: u64,
    width: u32,
    height: u32,
    format: &'static str,
}

/// Arguments appended to the configured command.
pub fn detector_args(config: &DetectorConfig) -> Vec<String> {
    vec![
        "--max-hands".to_string(),
        config.max_hands.to_string(),
        "--min-detection-confidence".to_string(),
        config.min_detection_confidence.to_string(),
        "--min-tracking-confidence".to_string(),
        config.min_tracking_confidence.to_string(),
    ]
}

/// The frame/landmark protocol over a pair of byte streams.
///
/// Frames are numbered from zero in the order they are sent, and every
/// answer must carry the number of the frame it belongs to.
pub struct StreamDetector<W, R> {
    writer: W,
    reader: R,
    next_frame: u64,
    line: String,
}

impl<W: Write + Send, R: BufRead + Send> StreamDetector<W, R> {
    pub fn new(writer: W, reader: R) -> Self {
        Self {
            writer,
            reader,
            next_frame: 0,
            line: String::new(),
        }
    }

    /// Bytes sent so far end up here.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    fn send_frame(&mut self, sequence: u64, frame: &Frame) -> std::io::Result<()> {
        let header = FrameHeader {
            frame: sequence,
            width: frame.width(),
            height: frame.height(),
            format: "rgb24",
        };
        serde_json::to_writer(&mut self.writer, &header)?;
        self.writer.write_all(b"\n")?;
        self.writer.write_all(frame.as_bytes())?;
        self.writer.flush()
    }

    fn read_record(&mut self) -> HandwaveResult<LandmarkFrame> {
        loop {
            self.line.clear();
            let read = self.reader.read_line(&mut self.line).map_err(|e| {
                HandwaveError::detection(format!("Failed reading landmark record: {e}"))
            })?;
            if read == 0 {
                return Err(HandwaveError::detection("Landmark process closed its output"));
            }

            let trimmed = self.line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return serde_json::from_str(trimmed).map_err(|e| {
                HandwaveError::detection(format!("Malformed landmark record {trimmed:?}: {e}"))
            });
        }
    }
}

impl<W: Write + Send, R: BufRead + Send> LandmarkDetector for StreamDetector<W, R> {
    fn detect(&mut self, frame: &Frame) -> HandwaveResult<Option<LandmarkSet>> {
        let sequence = self.next_frame;
        self.next_frame += 1;

        self.send_frame(sequence, frame).map_err(|e| {
            HandwaveError::detection(format!("Failed sending frame {sequence}: {e}"))
        })?;

        let record = self.read_record()?;
        if record.frame != sequence {
            return Err(HandwaveError::detection(format!(
                "Landmark process answered frame {} while frame {sequence} was pending",
                record.frame
            )));
        }
        Ok(record.hand)
    }

    fn name(&self) -> &str {
        "stream"
    }
}

/// A landmark process owned by one session.
///
/// The process is killed when the detector is dropped, which happens when
/// the session's pipeline is torn down.
pub struct ProcessDetector {
    child: Child,
    link: StreamDetector<BufWriter<ChildStdin>, BufReader<ChildStdout>>,
}

impl ProcessDetector {
    /// Spawn the configured command with the detector settings appended.
    pub fn spawn(config: &DetectorConfig) -> HandwaveResult<Self> {
        let (program, args) = config
            .command
            .split_first()
            .ok_or_else(|| HandwaveError::config("Detector command is empty"))?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .args(detector_args(config))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        let mut child = cmd.spawn().map_err(|e| {
            HandwaveError::detection(format!("Failed to start landmark process {program}: {e}"))
        })?;

        tracing::info!(
            pid = child.id(),
            program = %program,
            max_hands = config.max_hands,
            min_detection_confidence = config.min_detection_confidence,
            min_tracking_confidence = config.min_tracking_confidence,
            "Landmark process started"
        );

        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(HandwaveError::detection(
                    "Failed to capture landmark process stdio",
                ));
            }
        };

        Ok(Self {
            child,
            link: StreamDetector::new(BufWriter::new(stdin), BufReader::new(stdout)),
        })
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }
}

impl LandmarkDetector for ProcessDetector {
    fn detect(&mut self, frame: &Frame) -> HandwaveResult<Option<LandmarkSet>> {
        self.link.detect(frame)
    }

    fn name(&self) -> &str {
        "process"
    }
}

impl Drop for ProcessDetector {
    fn drop(&mut self) {
        match self.child.try_wait() {
            Ok(Some(status)) => {
                tracing::debug!(pid = self.child.id(), %status, "Landmark process already exited");
            }
            _ => {
                let _ = self.child.kill();
                let _ = self.child.wait();
                tracing::debug!(pid = self.child.id(), "Landmark process stopped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ChannelOrder;
    use std::io::Cursor;

    fn rgb_frame() -> Frame {
        Frame::from_raw(7, ChannelOrder::Rgb, 2, 1, vec![10, 20, 30, 40, 50, 60]).unwrap()
    }

    fn hand_record(frame: u64) -> String {
        serde_json::to_string(&LandmarkFrame::new(frame, Some(LandmarkSet::splat(0.25, 0.5))))
            .unwrap()
    }

    #[test]
    fn test_args_carry_detector_settings() {
        assert_eq!(
            detector_args(&DetectorConfig::default()),
            vec![
                "--max-hands",
                "1",
                "--min-detection-confidence",
                "0.7",
                "--min-tracking-confidence",
                "0.5",
            ]
        );
    }

    #[test]
    fn test_frames_are_sent_with_header_and_answered_in_order() {
        let answers = format!("{}\n# warming up\n\n{{\"frame\":1,\"hand\":null}}\n", hand_record(0));
        let mut detector = StreamDetector::new(Vec::new(), Cursor::new(answers.into_bytes()));

        let hand = detector.detect(&rgb_frame()).unwrap();
        assert_eq!(hand, Some(LandmarkSet::splat(0.25, 0.5)));
        assert_eq!(detector.detect(&rgb_frame()).unwrap(), None);

        let header = b"{\"frame\":0,\"width\":2,\"height\":1,\"format\":\"rgb24\"}\n";
        let sent = detector.writer();
        assert!(sent.starts_with(header));
        assert_eq!(&sent[header.len()..header.len() + 6], &[10, 20, 30, 40, 50, 60]);
        assert_eq!(sent.len(), 2 * (header.len() + 6));
    }

    #[test]
    fn test_out_of_step_answer_is_an_error() {
        let answers = format!("{}\n", hand_record(3));
        let mut detector = StreamDetector::new(Vec::new(), Cursor::new(answers.into_bytes()));
        let err = detector.detect(&rgb_frame()).unwrap_err();
        assert!(matches!(err, HandwaveError::Detection { .. }));
        assert!(err.to_string().contains("frame 3"), "{err}");
    }

    #[test]
    fn test_closed_output_is_an_error() {
        let mut detector = StreamDetector::new(Vec::new(), Cursor::new(Vec::new()));
        let err = detector.detect(&rgb_frame()).unwrap_err();
        assert!(err.to_string().contains("closed its output"), "{err}");
    }

    #[test]
    fn test_short_hand_is_rejected() {
        let answers = "{\"frame\":0,\"hand\":[{\"x\":0.1,\"y\":0.2,\"z\":0.0}]}\n";
        let mut detector =
            StreamDetector::new(Vec::new(), Cursor::new(answers.as_bytes().to_vec()));
        assert!(detector.detect(&rgb_frame()).is_err());
    }

    #[test]
    fn test_empty_command_is_a_config_error() {
        let err = ProcessDetector::spawn(&DetectorConfig::default()).err().unwrap();
        assert!(matches!(err, HandwaveError::Config { .. }));
    }

    #[test]
    fn test_missing_program_fails_to_start() {
        let config = DetectorConfig {
            command: vec!["/nonexistent/handwave-landmarks".to_string()],
            ..DetectorConfig::default()
        };
        let err = ProcessDetector::spawn(&config).err().unwrap();
        assert!(matches!(err, HandwaveError::Detection { .. }));
    }
}
