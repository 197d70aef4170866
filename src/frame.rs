//! Camera frames.
//!
//! - `Frame`: opaque handle for one captured sensor frame. Pixel bytes are
//!   private; the only consumer is a detector, reached through `run_detector`.
//! - `FrameDescriptor` travels with the frame so the transform always uses the
//!   geometry the detector actually saw.

use anyhow::Result;
use std::time::{Duration, Instant};

use crate::detect::{Landmarks, LandmarkDetector};
use crate::geometry::FrameDescriptor;

/// One captured sensor frame.
///
/// Deliberately not `Clone`: a frame is handed to the pipeline exactly once.
pub struct Frame {
    /// Packed pixel data in sensor orientation.
    pixels: Vec<u8>,

    pub descriptor: FrameDescriptor,

    /// Monotonic per-source sequence number.
    pub sequence: u64,

    captured_at: Instant,
}

impl Frame {
    pub fn new(pixels: Vec<u8>, descriptor: FrameDescriptor, sequence: u64) -> Self {
        Self {
            pixels,
            descriptor,
            sequence,
            captured_at: Instant::now(),
        }
    }

    /// Time since capture.
    pub fn age(&self) -> Duration {
        self.captured_at.elapsed()
    }

    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }

    /// Run a detector on this frame. Pixels flow in; only landmarks flow out.
    pub fn run_detector<D: LandmarkDetector + ?Sized>(
        &self,
        detector: &mut D,
    ) -> Result<Option<Landmarks>> {
        detector.detect(&self.pixels, self.descriptor)
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("sequence", &self.sequence)
            .field("descriptor", &self.descriptor)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}
