//! Frame pipeline controller.
//!
//! Once per delivered frame: detect, transform, publish.
//!
//! ```text
//! Idle -> Detecting -> Transforming -> Publishing
//!            \               \-> Skipped
//!             \-> Skipped
//! ```
//!
//! `Idle` only precedes the first frame; afterwards the state rests where the
//! last frame ended until the next one starts.
//!
//! A frame is skipped (store untouched) when the detector finds nothing, is
//! unavailable, fails, or when the frame/display geometry is degenerate.
//! Nothing propagates to the render side; renderers only ever see whole poses.
//!
//! Detection runs synchronously. A detector that overruns the frame budget is
//! counted and logged but not cancelled, so the next frame simply starts late.

use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use crate::detect::{DetectionOutcome, DetectorAdapter};
use crate::frame::Frame;
use crate::geometry::DisplayDescriptor;
use crate::store::PosePublisher;
use crate::transform::{CoordinateTransform, DEFAULT_Y_OFFSET};

/// Camera cadence the budget defaults to.
pub const DEFAULT_FPS: u32 = 15;

/// Stage the pipeline is in. Between frames this holds where the last frame
/// ended: `Publishing` after a publish, `Skipped` after a skip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Detecting,
    Transforming,
    Publishing,
    Skipped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoDetection,
    DetectorUnavailable,
    DetectorError,
    DegenerateGeometry,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// A new pose was published at this store generation.
    Published { generation: u64 },
    Skipped(SkipReason),
}

/// Counters over the pipeline's lifetime.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub frames: u64,
    pub published: u64,
    pub no_detection: u64,
    pub detector_unavailable: u64,
    pub detector_errors: u64,
    pub degenerate_geometry: u64,
    pub budget_overruns: u64,
    /// Frames the worker never saw because it was busy.
    pub dropped_frames: u64,
}

impl PipelineStats {
    pub fn skipped(&self) -> u64 {
        self.no_detection
            + self.detector_unavailable
            + self.detector_errors
            + self.degenerate_geometry
    }

    fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::NoDetection => self.no_detection += 1,
            SkipReason::DetectorUnavailable => self.detector_unavailable += 1,
            SkipReason::DetectorError => self.detector_errors += 1,
            SkipReason::DegenerateGeometry => self.degenerate_geometry += 1,
        }
    }
}

/// Shared, updatable render surface size.
///
/// The UI side calls `set` on rotation or resize; the pipeline reads a
/// snapshot once per frame.
#[derive(Clone)]
pub struct DisplayHandle {
    inner: Arc<RwLock<DisplayDescriptor>>,
}

impl DisplayHandle {
    pub fn new(display: DisplayDescriptor) -> Self {
        Self {
            inner: Arc::new(RwLock::new(display)),
        }
    }

    pub fn get(&self) -> DisplayDescriptor {
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, display: DisplayDescriptor) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = display;
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PipelineConfig {
    pub y_offset: f64,
    /// Time allowed per frame before it counts as an overrun.
    pub frame_budget: Duration,
}

impl PipelineConfig {
    /// One frame interval at `fps`.
    pub fn budget_for_fps(fps: u32) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(fps.max(1)))
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            y_offset: DEFAULT_Y_OFFSET,
            frame_budget: Self::budget_for_fps(DEFAULT_FPS),
        }
    }
}

/// Per-frame detect → transform → publish controller.
///
/// Owns the store's only publisher. `process_frame` takes `&mut self`, so one
/// pipeline instance never handles two frames at once.
pub struct FramePipeline {
    detector: DetectorAdapter,
    transform: CoordinateTransform,
    display: DisplayHandle,
    publisher: PosePublisher,
    frame_budget: Duration,
    state: PipelineState,
    stats: PipelineStats,
}

impl FramePipeline {
    pub fn new(
        detector: DetectorAdapter,
        publisher: PosePublisher,
        display: DisplayHandle,
        config: PipelineConfig,
    ) -> Self {
        Self {
            detector,
            transform: CoordinateTransform::new(config.y_offset),
            display,
            publisher,
            frame_budget: config.frame_budget,
            state: PipelineState::Idle,
            stats: PipelineStats::default(),
        }
    }

    pub fn process_frame(&mut self, frame: &Frame) -> FrameOutcome {
        let started = Instant::now();
        self.stats.frames += 1;

        let outcome = self.run_stages(frame);
        match outcome {
            FrameOutcome::Published { generation } => {
                self.stats.published += 1;
                log::debug!("frame #{} published generation {}", frame.sequence, generation);
            }
            FrameOutcome::Skipped(reason) => {
                log::debug!(
                    "frame #{} skipped while {:?}: {:?}",
                    frame.sequence,
                    self.state,
                    reason
                );
                self.state = PipelineState::Skipped;
                self.stats.record_skip(reason);
            }
        }

        let elapsed = started.elapsed();
        if elapsed > self.frame_budget {
            self.stats.budget_overruns += 1;
            log::warn!(
                "frame #{} took {:?}, over the {:?} frame budget ({:?} since capture)",
                frame.sequence,
                elapsed,
                self.frame_budget,
                frame.age()
            );
        }

        outcome
    }

    fn run_stages(&mut self, frame: &Frame) -> FrameOutcome {
        self.state = PipelineState::Detecting;
        let raw = match self.detector.detect(frame) {
            DetectionOutcome::Detected(pose) => pose,
            DetectionOutcome::NoDetection => {
                return FrameOutcome::Skipped(SkipReason::NoDetection)
            }
            DetectionOutcome::Unavailable => {
                return FrameOutcome::Skipped(SkipReason::DetectorUnavailable)
            }
            DetectionOutcome::Failed(err) => {
                log::debug!(
                    "detector '{}' failed on frame #{}: {}",
                    self.detector.name(),
                    frame.sequence,
                    err
                );
                return FrameOutcome::Skipped(SkipReason::DetectorError);
            }
        };

        self.state = PipelineState::Transforming;
        let display = self.display.get();
        let pose = match self.transform.apply(&raw, frame.descriptor, display) {
            Ok(pose) => pose,
            Err(e) => {
                log::warn!("frame #{}: {}; keeping previous pose", frame.sequence, e);
                return FrameOutcome::Skipped(SkipReason::DegenerateGeometry);
            }
        };

        self.state = PipelineState::Publishing;
        let generation = self.publisher.publish(pose);
        FrameOutcome::Published { generation }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    pub fn display(&self) -> &DisplayHandle {
        &self.display
    }

    pub fn detector_name(&self) -> &str {
        self.detector.name()
    }

    pub fn warm_up(&self) {
        self.detector.warm_up();
    }

    pub fn y_offset(&self) -> f64 {
        self.transform.y_offset()
    }

    pub fn set_y_offset(&mut self, y_offset: f64) {
        self.transform.set_y_offset(y_offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{Landmarks, LandmarkDetector, NullDetector};
    use crate::geometry::{FrameDescriptor, SensorPoint};
    use crate::landmark::LandmarkKey;
    use crate::pose::DisplayPose;
    use crate::store::PoseStore;
    use anyhow::{anyhow, Result};
    use std::collections::VecDeque;

    const FRAME: FrameDescriptor = FrameDescriptor::new(1080, 1920);
    const DISPLAY: DisplayDescriptor = DisplayDescriptor::new(414, 896);

    enum Step {
        Nose(f64),
        Nothing,
        Fail,
        Stall(Duration),
    }

    /// Detector that follows a fixed script, one step per frame.
    struct Scripted(VecDeque<Step>);

    impl LandmarkDetector for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn detect(&mut self, _pixels: &[u8], _frame: FrameDescriptor) -> Result<Option<Landmarks>> {
            match self.0.pop_front() {
                Some(Step::Nose(y)) => {
                    let mut out = Landmarks::new();
                    out.insert(LandmarkKey::Nose, SensorPoint::new(0.0, y));
                    Ok(Some(out))
                }
                Some(Step::Stall(d)) => {
                    std::thread::sleep(d);
                    Ok(None)
                }
                Some(Step::Fail) => Err(anyhow!("scripted failure")),
                Some(Step::Nothing) | None => Ok(None),
            }
        }
    }

    fn pipeline(steps: Vec<Step>) -> (FramePipeline, PoseStore) {
        let (store, publisher) = PoseStore::create();
        let pipeline = FramePipeline::new(
            DetectorAdapter::from_detector(Scripted(steps.into())),
            publisher,
            DisplayHandle::new(DISPLAY),
            PipelineConfig {
                y_offset: 35.0,
                frame_budget: Duration::from_secs(5),
            },
        );
        (pipeline, store)
    }

    fn frame(seq: u64) -> Frame {
        Frame::new(vec![1; 16], FRAME, seq)
    }

    fn nose_x(pose: &DisplayPose) -> f64 {
        pose[LandmarkKey::Nose].x
    }

    #[test]
    fn none_never_overwrites_the_store() {
        let (mut pipeline, store) =
            pipeline(vec![Step::Nose(960.0), Step::Nothing, Step::Nose(480.0)]);

        let mut observed = Vec::new();
        for seq in 0..3 {
            pipeline.process_frame(&frame(seq));
            observed.push(nose_x(&store.current()));
        }

        assert!((observed[0] - 207.0).abs() < 1e-9);
        assert_eq!(observed[1], observed[0]);
        assert!((observed[2] - 310.5).abs() < 1e-9);
        assert_eq!(pipeline.stats().published, 2);
        assert_eq!(pipeline.stats().no_detection, 1);
    }

    #[test]
    fn detector_errors_skip_and_processing_continues() {
        let (mut pipeline, store) = pipeline(vec![Step::Fail, Step::Nose(0.0)]);

        assert_eq!(
            pipeline.process_frame(&frame(0)),
            FrameOutcome::Skipped(SkipReason::DetectorError)
        );
        assert_eq!(store.generation(), 0);
        assert_eq!(
            pipeline.process_frame(&frame(1)),
            FrameOutcome::Published { generation: 1 }
        );
        assert_eq!(pipeline.state(), PipelineState::Publishing);
    }

    #[test]
    fn state_reports_where_the_last_frame_ended() {
        let (mut pipeline, _store) = pipeline(vec![Step::Nothing, Step::Nose(0.0)]);
        assert_eq!(pipeline.state(), PipelineState::Idle);

        pipeline.process_frame(&frame(0));
        assert_eq!(pipeline.state(), PipelineState::Skipped);

        pipeline.process_frame(&frame(1));
        assert_eq!(pipeline.state(), PipelineState::Publishing);
    }

    #[test]
    fn state_is_skipped_for_an_empty_detector() {
        let (store, publisher) = PoseStore::create();
        let mut pipeline = FramePipeline::new(
            DetectorAdapter::from_detector(NullDetector),
            publisher,
            DisplayHandle::new(DISPLAY),
            PipelineConfig::default(),
        );
        assert_eq!(
            pipeline.process_frame(&frame(0)),
            FrameOutcome::Skipped(SkipReason::NoDetection)
        );
        assert_eq!(pipeline.state(), PipelineState::Skipped);
        assert_eq!(store.generation(), 0);
    }

    #[test]
    fn unavailable_detector_keeps_default_pose() {
        let (store, publisher) = PoseStore::create();
        let mut pipeline = FramePipeline::new(
            DetectorAdapter::unavailable("poseDetection"),
            publisher,
            DisplayHandle::new(DISPLAY),
            PipelineConfig::default(),
        );
        for seq in 0..5 {
            assert_eq!(
                pipeline.process_frame(&frame(seq)),
                FrameOutcome::Skipped(SkipReason::DetectorUnavailable)
            );
        }
        assert_eq!(*store.current(), DisplayPose::default());
        assert_eq!(pipeline.stats().detector_unavailable, 5);
    }

    #[test]
    fn degenerate_geometry_keeps_prior_pose() {
        let (mut pipeline, store) =
            pipeline(vec![Step::Nose(960.0), Step::Nose(0.0), Step::Nose(0.0)]);
        pipeline.process_frame(&frame(0));
        let before = store.current();

        pipeline.display().set(DisplayDescriptor::new(0, 0));
        assert_eq!(
            pipeline.process_frame(&frame(1)),
            FrameOutcome::Skipped(SkipReason::DegenerateGeometry)
        );
        let zero_frame = Frame::new(vec![1; 4], FrameDescriptor::new(0, 0), 2);
        pipeline.display().set(DISPLAY);
        assert_eq!(
            pipeline.process_frame(&zero_frame),
            FrameOutcome::Skipped(SkipReason::DegenerateGeometry)
        );

        assert_eq!(*store.current(), *before);
        assert_eq!(pipeline.stats().degenerate_geometry, 2);
    }

    #[test]
    fn display_is_read_per_frame() {
        let (mut pipeline, store) = pipeline(vec![Step::Nose(0.0), Step::Nose(0.0)]);
        pipeline.process_frame(&frame(0));
        assert_eq!(nose_x(&store.current()), 414.0);

        pipeline.display().set(DisplayDescriptor::new(896, 414));
        pipeline.process_frame(&frame(1));
        assert_eq!(nose_x(&store.current()), 896.0);
    }

    #[test]
    fn overruns_are_counted_not_cancelled() {
        let (store, publisher) = PoseStore::create();
        let mut pipeline = FramePipeline::new(
            DetectorAdapter::from_detector(Scripted(
                vec![Step::Stall(Duration::from_millis(30)), Step::Nose(0.0)].into(),
            )),
            publisher,
            DisplayHandle::new(DISPLAY),
            PipelineConfig {
                y_offset: 0.0,
                frame_budget: Duration::from_millis(5),
            },
        );
        pipeline.process_frame(&frame(0));
        assert_eq!(pipeline.stats().budget_overruns, 1);
        assert!(matches!(
            pipeline.process_frame(&frame(1)),
            FrameOutcome::Published { .. }
        ));
        assert_eq!(store.generation(), 1);
    }

    #[test]
    fn y_offset_is_adjustable_at_runtime() {
        let (mut pipeline, store) = pipeline(vec![Step::Nose(0.0), Step::Nose(0.0)]);
        pipeline.process_frame(&frame(0));
        assert!((store.current()[LandmarkKey::Nose].y + 35.0).abs() < 1e-9);

        pipeline.set_y_offset(25.0);
        pipeline.process_frame(&frame(1));
        assert!((store.current()[LandmarkKey::Nose].y + 25.0).abs() < 1e-9);
    }

    #[test]
    fn stats_sum_skips() {
        let (store, publisher) = PoseStore::create();
        let mut pipeline = FramePipeline::new(
            DetectorAdapter::from_detector(NullDetector),
            publisher,
            DisplayHandle::new(DISPLAY),
            PipelineConfig::default(),
        );
        pipeline.process_frame(&frame(0));
        pipeline.process_frame(&frame(1));
        assert_eq!(pipeline.stats().frames, 2);
        assert_eq!(pipeline.stats().skipped(), 2);
        assert_eq!(store.generation(), 0);
        assert_eq!(
            PipelineConfig::budget_for_fps(15),
            Duration::from_secs_f64(1.0 / 15.0)
        );
        assert_eq!(PipelineConfig::budget_for_fps(2000), Duration::from_micros(500));
    }
}
