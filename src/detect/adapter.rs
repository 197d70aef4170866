use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

use super::backend::LandmarkDetector;
use super::registry::DetectorRegistry;
use crate::frame::Frame;
use crate::pose::SensorPose;

/// Per-frame result of the detector adapter.
#[derive(Debug)]
pub enum DetectionOutcome {
    /// Total sensor-space pose (missing joints at the origin).
    Detected(SensorPose),
    /// The plugin ran and found no subject.
    NoDetection,
    /// No plugin is registered under the requested name.
    Unavailable,
    /// The plugin returned an error or panicked.
    Failed(String),
}

impl DetectionOutcome {
    /// Collapse to the detector contract: a pose, or nothing to draw.
    pub fn into_pose(self) -> Option<SensorPose> {
        match self {
            DetectionOutcome::Detected(pose) => Some(pose),
            _ => None,
        }
    }
}

/// Invokes a named detector plugin on single frames.
///
/// An adapter whose plugin could not be resolved stays usable and reports
/// `Unavailable` for every frame.
pub struct DetectorAdapter {
    name: String,
    detector: Option<Arc<Mutex<dyn LandmarkDetector>>>,
}

impl DetectorAdapter {
    pub fn resolve(registry: &DetectorRegistry, name: &str) -> Self {
        let detector = registry.get(name);
        if detector.is_none() {
            log::warn!(
                "detector plugin '{}' unavailable (registered: {:?}); overlay will stay at the default pose",
                name,
                registry.list()
            );
        }
        Self {
            name: name.to_string(),
            detector,
        }
    }

    /// Wrap a detector directly, bypassing the registry.
    pub fn from_detector<D: LandmarkDetector + 'static>(detector: D) -> Self {
        Self {
            name: detector.name().to_string(),
            detector: Some(Arc::new(Mutex::new(detector))),
        }
    }

    /// Adapter with no plugin behind it.
    pub fn unavailable(name: &str) -> Self {
        Self {
            name: name.to_string(),
            detector: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_available(&self) -> bool {
        self.detector.is_some()
    }

    pub fn warm_up(&self) {
        let Some(detector) = &self.detector else {
            return;
        };
        let mut guard = detector.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = guard.warm_up() {
            log::warn!("detector '{}' warm-up failed: {}", self.name, e);
        }
    }

    /// Run the plugin on one frame. Never fails; errors become `Failed`.
    pub fn detect(&self, frame: &Frame) -> DetectionOutcome {
        let Some(detector) = &self.detector else {
            return DetectionOutcome::Unavailable;
        };
        // A panicking plugin poisons the lock; later frames still get a turn.
        let mut guard = detector.lock().unwrap_or_else(PoisonError::into_inner);
        let result = panic::catch_unwind(AssertUnwindSafe(|| frame.run_detector(&mut *guard)));
        match result {
            Ok(Ok(Some(landmarks))) => DetectionOutcome::Detected(landmarks.into_pose()),
            Ok(Ok(None)) => DetectionOutcome::NoDetection,
            Ok(Err(e)) => DetectionOutcome::Failed(e.to_string()),
            Err(_) => DetectionOutcome::Failed(format!("detector '{}' panicked", self.name)),
        }
    }
}
