use anyhow::Result;
use sha2::{Digest, Sha256};

use crate::detect::backend::LandmarkDetector;
use crate::detect::result::Landmarks;
use crate::geometry::{FrameDescriptor, SensorPoint};
use crate::landmark::LandmarkKey;

/// Maximum per-joint jitter in sensor pixels.
const JITTER_PX: f64 = 4.0;

/// Synthetic detector for demos and tests.
///
/// Reports a standing figure laid out so it renders upright after the
/// sensor-to-display transform. Joints jitter by a few pixels, driven by a
/// digest of the pixel data, so identical frames give identical poses.
/// All-zero (blank) frames contain no subject.
#[derive(Default)]
pub struct SyntheticDetector {
    frames_seen: u64,
}

impl SyntheticDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }
}

impl LandmarkDetector for SyntheticDetector {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn detect(&mut self, pixels: &[u8], frame: FrameDescriptor) -> Result<Option<Landmarks>> {
        self.frames_seen += 1;

        if pixels.iter().all(|&p| p == 0) {
            return Ok(None);
        }

        let digest: [u8; 32] = Sha256::digest(pixels).into();
        let fw = f64::from(frame.width);
        let fh = f64::from(frame.height);

        let landmarks = LandmarkKey::ALL
            .into_iter()
            .map(|key| {
                let (u, v) = upright_position(key);
                let jitter = |byte: u8| (f64::from(byte) / 255.0 * 2.0 - 1.0) * JITTER_PX;
                let jx = jitter(digest[key.index() % 32]);
                let jy = jitter(digest[(key.index() + 7) % 32]);
                // Upright display (u right, v down) back into sensor space.
                let px = v * fw + jx;
                let py = (1.0 - u) * fh + jy;
                (key, SensorPoint::new(px, py))
            })
            .collect();

        Ok(Some(landmarks))
    }
}

/// Normalized position of each joint in an upright, front-facing figure.
fn upright_position(key: LandmarkKey) -> (f64, f64) {
    use LandmarkKey::*;
    match key {
        Nose => (0.50, 0.15),
        LeftEyeInner => (0.52, 0.13),
        RightEyeInner => (0.48, 0.13),
        LeftEye => (0.53, 0.13),
        RightEye => (0.47, 0.13),
        LeftEyeOuter => (0.54, 0.13),
        RightEyeOuter => (0.46, 0.13),
        LeftEar => (0.56, 0.14),
        RightEar => (0.44, 0.14),
        LeftMouth => (0.52, 0.18),
        RightMouth => (0.48, 0.18),
        LeftShoulder => (0.62, 0.27),
        RightShoulder => (0.38, 0.27),
        LeftElbow => (0.66, 0.40),
        RightElbow => (0.34, 0.40),
        LeftWrist => (0.68, 0.52),
        RightWrist => (0.32, 0.52),
        LeftPinky => (0.69, 0.56),
        RightPinky => (0.31, 0.56),
        LeftIndex => (0.68, 0.57),
        RightIndex => (0.32, 0.57),
        LeftThumb => (0.66, 0.55),
        RightThumb => (0.34, 0.55),
        LeftHip => (0.57, 0.55),
        RightHip => (0.43, 0.55),
        LeftKnee => (0.57, 0.72),
        RightKnee => (0.43, 0.72),
        LeftAnkle => (0.57, 0.88),
        RightAnkle => (0.43, 0.88),
        LeftHeel => (0.56, 0.90),
        RightHeel => (0.44, 0.90),
        LeftFootIndex => (0.59, 0.93),
        RightFootIndex => (0.41, 0.93),
    }
}
