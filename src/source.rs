//! Synthetic camera source.
//!
//! Stands in for the host camera layer: produces sensor-oriented frames at a
//! fixed size and cadence. Every `blank_every`-th frame is all zeros, which
//! detectors treat as an empty scene.

use rand::RngCore;
use std::time::Duration;

use crate::frame::Frame;
use crate::geometry::FrameDescriptor;

/// Configuration for a synthetic camera.
#[derive(Clone, Debug)]
pub struct CameraConfig {
    pub fps: u32,
    pub width: u32,
    pub height: u32,
    /// Emit a blank frame every N frames (0 disables).
    pub blank_every: u64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fps: 15,
            width: 1920,
            height: 1080,
            blank_every: 45,
        }
    }
}

impl CameraConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }

    pub fn descriptor(&self) -> FrameDescriptor {
        FrameDescriptor::new(self.width, self.height)
    }
}

/// Statistics for a synthetic camera.
#[derive(Clone, Debug, Default)]
pub struct CameraStats {
    pub frames_captured: u64,
    pub blank_frames: u64,
}

pub struct SyntheticCamera {
    config: CameraConfig,
    stats: CameraStats,
}

/// Bytes per pixel (RGB).
const CHANNELS: usize = 3;

/// Only a strip of the frame carries content; the rest stays zero.
const CONTENT_BYTES: usize = 4096;

impl SyntheticCamera {
    pub fn new(config: CameraConfig) -> Self {
        log::info!(
            "synthetic camera: {}x{} @ {} fps",
            config.width,
            config.height,
            config.fps
        );
        Self {
            config,
            stats: CameraStats::default(),
        }
    }

    pub fn next_frame(&mut self) -> Frame {
        self.stats.frames_captured += 1;
        let sequence = self.stats.frames_captured;

        let len = self.config.width as usize * self.config.height as usize * CHANNELS;
        let mut pixels = vec![0u8; len];

        let blank = self.config.blank_every > 0 && sequence % self.config.blank_every == 0;
        if blank {
            self.stats.blank_frames += 1;
        } else {
            let content = len.min(CONTENT_BYTES);
            rand::thread_rng().fill_bytes(&mut pixels[..content]);
            // Guarantee at least one non-zero byte so the scene is never empty by chance.
            if let Some(first) = pixels.first_mut() {
                *first |= 1;
            }
        }

        Frame::new(pixels, self.config.descriptor(), sequence)
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn stats(&self) -> CameraStats {
        self.stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::SyntheticDetector;

    fn small_camera(blank_every: u64) -> SyntheticCamera {
        SyntheticCamera::new(CameraConfig {
            fps: 15,
            width: 32,
            height: 18,
            blank_every,
        })
    }

    #[test]
    fn frames_carry_descriptor_and_sequence() {
        let mut camera = small_camera(0);
        let a = camera.next_frame();
        let b = camera.next_frame();
        assert_eq!(a.descriptor, FrameDescriptor::new(32, 18));
        assert_eq!(a.byte_len(), 32 * 18 * 3);
        assert_eq!((a.sequence, b.sequence), (1, 2));
    }

    #[test]
    fn blank_frames_have_no_subject() {
        let mut camera = small_camera(3);
        let mut detector = SyntheticDetector::new();
        let hits: Vec<bool> = (0..6)
            .map(|_| {
                camera
                    .next_frame()
                    .run_detector(&mut detector)
                    .unwrap()
                    .is_some()
            })
            .collect();
        assert_eq!(hits, vec![true, true, false, true, true, false]);
        assert_eq!(camera.stats().blank_frames, 2);
    }

    #[test]
    fn frame_interval_matches_fps() {
        let config = CameraConfig::default();
        assert_eq!(config.frame_interval().as_millis(), 66);
    }
}
