use anyhow::Result;

use crate::detect::backend::LandmarkDetector;
use crate::detect::result::Landmarks;
use crate::geometry::FrameDescriptor;

/// Detector that never finds a subject.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullDetector;

impl LandmarkDetector for NullDetector {
    fn name(&self) -> &'static str {
        "none"
    }

    fn detect(&mut self, _pixels: &[u8], _frame: FrameDescriptor) -> Result<Option<Landmarks>> {
        Ok(None)
    }
}
