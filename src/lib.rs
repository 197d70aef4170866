//! Pose Overlay Core
//!
//! Maps per-frame pose landmarks from camera sensor space into display space
//! and hands the latest pose from the frame-processing thread to the render
//! thread.
//!
//! # Architecture
//!
//! ```text
//! camera -> FrameWorker -> FramePipeline -> DetectorAdapter -> transform -> PoseStore -> renderer
//! ```
//!
//! The pipeline holds the following by construction:
//!
//! 1. **Total poses**: every `Pose` carries all 33 landmarks; unresolved joints sit at the origin.
//! 2. **Tagged spaces**: sensor and display points are distinct types; only `transform` converts.
//! 3. **Single writer**: the store has exactly one `PosePublisher`, owned by the pipeline.
//! 4. **Whole-value reads**: renderers observe either the previous or the new pose, never a mix.
//! 5. **Skip, never fail**: missing detections, plugin errors and degenerate geometry leave the
//!    store untouched and never reach the render side.
//!
//! # Module Structure
//!
//! - `landmark`: the fixed landmark catalogue
//! - `geometry`, `pose`: space-tagged points, frame/display sizes, total poses
//! - `transform`: the sensor-to-display mapping
//! - `detect`: detector plugin trait, registry, adapter, bundled detectors
//! - `store`: the single-slot pose store and render-side reader
//! - `pipeline`, `worker`: per-frame controller and its dedicated thread
//! - `frame`, `source`: frame handles and a synthetic camera
//! - `config`: file + environment configuration

pub mod config;
pub mod detect;
pub mod frame;
pub mod geometry;
pub mod landmark;
pub mod pipeline;
pub mod pose;
pub mod source;
pub mod store;
pub mod transform;
pub mod worker;

pub use config::OverlayConfig;
pub use detect::{
    DetectionOutcome, DetectorAdapter, DetectorRegistry, JsonReplayDetector, LandmarkDetector,
    Landmarks, NullDetector, SyntheticDetector,
};
pub use frame::Frame;
pub use geometry::{
    Display, DisplayDescriptor, DisplayPoint, FrameDescriptor, Point, Sensor, SensorPoint,
};
pub use landmark::{LandmarkKey, Side, LANDMARK_COUNT};
pub use pipeline::{
    DisplayHandle, FrameOutcome, FramePipeline, PipelineConfig, PipelineState, PipelineStats,
    SkipReason,
};
pub use pose::{DisplayPose, Pose, SensorPose};
pub use source::{CameraConfig, SyntheticCamera};
pub use store::{markers, Marker, PosePublisher, PoseReader, PoseStore};
pub use transform::{transform, CoordinateTransform, DEFAULT_Y_OFFSET};
pub use worker::{FramePolicy, FrameWorker, SubmitOutcome, WorkerHandle};
