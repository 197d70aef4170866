pub mod none;
pub mod replay;
pub mod synthetic;

pub use none::NullDetector;
pub use replay::JsonReplayDetector;
pub use synthetic::SyntheticDetector;
