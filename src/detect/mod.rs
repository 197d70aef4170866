mod adapter;
mod backend;
pub mod backends;
mod registry;
mod result;

pub use adapter::{DetectionOutcome, DetectorAdapter};
pub use backend::LandmarkDetector;
pub use backends::{JsonReplayDetector, NullDetector, SyntheticDetector};
pub use registry::DetectorRegistry;
pub use result::Landmarks;
