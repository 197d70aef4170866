use anyhow::{anyhow, Result};
use std::path::Path;

use crate::detect::backend::LandmarkDetector;
use crate::detect::result::Landmarks;
use crate::geometry::FrameDescriptor;

/// Replays recorded plugin output, one payload per frame.
///
/// The recording holds one JSON payload per line: a landmark dictionary or
/// `null`. Blank lines are skipped. Playback loops once the end is reached.
/// A malformed line surfaces as an error for that frame only.
pub struct JsonReplayDetector {
    payloads: Vec<String>,
    cursor: usize,
}

impl JsonReplayDetector {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("failed to read replay file {}: {}", path.display(), e))?;
        Self::from_lines(raw.lines())
            .map_err(|e| anyhow!("invalid replay file {}: {}", path.display(), e))
    }

    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let payloads: Vec<String> = lines
            .into_iter()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        if payloads.is_empty() {
            return Err(anyhow!("replay recording is empty"));
        }
        Ok(Self {
            payloads,
            cursor: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

impl LandmarkDetector for JsonReplayDetector {
    fn name(&self) -> &'static str {
        "json-replay"
    }

    fn detect(&mut self, _pixels: &[u8], _frame: FrameDescriptor) -> Result<Option<Landmarks>> {
        let index = self.cursor % self.payloads.len();
        self.cursor = self.cursor.wrapping_add(1);
        Landmarks::from_json(&self.payloads[index])
            .map_err(|e| anyhow!("replay line {}: {}", index + 1, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SensorPoint;
    use crate::landmark::LandmarkKey;
    use std::io::Write;

    const FRAME: FrameDescriptor = FrameDescriptor::new(1920, 1080);

    #[test]
    fn replays_lines_in_order_and_loops() {
        let mut detector = JsonReplayDetector::from_lines([
            r#"{"nosePosition": {"x": 1, "y": 2}}"#,
            "",
            "null",
            "not json",
        ])
        .unwrap();
        assert_eq!(detector.len(), 3);

        let first = detector.detect(&[], FRAME).unwrap().expect("pose");
        assert_eq!(first.get(LandmarkKey::Nose), Some(SensorPoint::new(1.0, 2.0)));
        assert!(detector.detect(&[], FRAME).unwrap().is_none());
        assert!(detector.detect(&[], FRAME).is_err());
        assert!(detector.detect(&[], FRAME).unwrap().is_some());
    }

    #[test]
    fn empty_recording_is_rejected() {
        assert!(JsonReplayDetector::from_lines(["", "  "]).is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, r#"{{"leftHipPosition": {{"x": 10.5, "y": 20}}}}"#).unwrap();
        writeln!(file, "null").unwrap();

        let mut detector = JsonReplayDetector::from_path(file.path()).unwrap();
        let hit = detector.detect(&[], FRAME).unwrap().expect("pose");
        assert_eq!(hit.get(LandmarkKey::LeftHip), Some(SensorPoint::new(10.5, 20.0)));
        assert!(JsonReplayDetector::from_path(Path::new("/nonexistent/replay.jsonl")).is_err());
    }
}
