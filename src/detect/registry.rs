use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::backend::LandmarkDetector;

/// Thread-safe registry of detector plugins.
///
/// Detectors are wrapped in `Mutex` because `LandmarkDetector::detect` takes `&mut self`.
pub struct DetectorRegistry {
    detectors: HashMap<String, Arc<Mutex<dyn LandmarkDetector>>>,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self {
            detectors: HashMap::new(),
        }
    }

    /// Register a detector under its own name, replacing any earlier one.
    pub fn register<D: LandmarkDetector + 'static>(&mut self, detector: D) {
        let name = detector.name().to_string();
        log::debug!("registered detector '{}'", name);
        self.detectors.insert(name, Arc::new(Mutex::new(detector)));
    }

    pub fn get(&self, name: &str) -> Option<Arc<Mutex<dyn LandmarkDetector>>> {
        self.detectors.get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.detectors.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{NullDetector, SyntheticDetector};

    #[test]
    fn lookup_by_name() {
        let mut registry = DetectorRegistry::new();
        assert!(registry.list().is_empty());

        registry.register(SyntheticDetector::new());
        registry.register(NullDetector);
        assert_eq!(registry.list(), vec!["none", "synthetic"]);

        let detector = registry.get("none").expect("registered");
        assert_eq!(detector.lock().unwrap().name(), "none");
        assert!(registry.get("poseDetection").is_none());
    }

    #[test]
    fn re_registering_replaces() {
        let mut registry = DetectorRegistry::new();
        registry.register(NullDetector);
        registry.register(NullDetector);
        assert_eq!(registry.list(), vec!["none"]);
    }
}
