use anyhow::Result;

use crate::detect::result::Landmarks;
use crate::geometry::FrameDescriptor;

/// Landmark detector plugin.
///
/// # Host Boundary
///
/// Implementations wrap an external pose-detection capability. They:
/// - Run synchronously and are expected to finish within one frame interval
/// - Report points in sensor pixel space, keyed by `LandmarkKey`
/// - Return `Ok(None)` when the frame has no resolvable subject
/// - Never retain the pixel slice beyond the `detect` call
/// - Never touch pipeline state; the controller owns publishing
pub trait LandmarkDetector: Send {
    /// Plugin identifier used for registry lookup.
    fn name(&self) -> &'static str;

    /// Run detection on one frame.
    fn detect(&mut self, pixels: &[u8], frame: FrameDescriptor) -> Result<Option<Landmarks>>;

    /// Optional warm-up hook.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}
