//! pose_overlay - run the landmark overlay pipeline against a synthetic camera
//!
//! This binary:
//! 1. Loads configuration (POSE_OVERLAY_CONFIG + env overrides + CLI flags)
//! 2. Resolves the detector plugin by name
//! 3. Runs the frame pipeline on its own thread, fed at camera fps
//! 4. Runs a render loop at display cadence that polls the pose store
//! 5. Prints final pipeline statistics as JSON on exit

use anyhow::{anyhow, Result};
use clap::Parser;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use pose_overlay::{
    markers, DetectorAdapter, DisplayHandle, DisplayPose, FramePipeline, FramePolicy, FrameWorker,
    LandmarkKey, OverlayConfig, PipelineStats, PoseReader, PoseStore, SubmitOutcome,
    SyntheticCamera, WorkerHandle,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Stop after this many seconds (default: run until Ctrl-C).
    #[arg(long)]
    seconds: Option<u64>,
    /// Detector plugin name (overrides config).
    #[arg(long)]
    detector: Option<String>,
    /// Vertical display offset (overrides config).
    #[arg(long, allow_negative_numbers = true)]
    y_offset: Option<f64>,
    /// Frame hand-off policy: drop-new or block (overrides config).
    #[arg(long)]
    policy: Option<String>,
    /// Render loop cadence in Hz.
    #[arg(long, default_value_t = 60)]
    render_hz: u32,
}

#[derive(Serialize)]
struct RunReport<'a> {
    detector: &'a str,
    y_offset: f64,
    frames_captured: u64,
    blank_frames: u64,
    renders: u64,
    pipeline: PipelineStats,
    last_pose: &'a DisplayPose,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if args.render_hz == 0 {
        return Err(anyhow!("render-hz must be >= 1"));
    }

    let mut cfg = OverlayConfig::load()?;
    if let Some(detector) = args.detector {
        cfg.detector = detector;
    }
    if let Some(y_offset) = args.y_offset {
        if !y_offset.is_finite() {
            return Err(anyhow!("y-offset must be finite"));
        }
        cfg.y_offset = y_offset;
    }
    if let Some(policy) = args.policy.as_deref() {
        cfg.frame_policy = policy.parse::<FramePolicy>()?;
    }

    let registry = cfg.detector_registry()?;
    let detector = DetectorAdapter::resolve(&registry, &cfg.detector);
    let (store, publisher) = PoseStore::create();
    let display = DisplayHandle::new(cfg.display);
    let pipeline = FramePipeline::new(detector, publisher, display, cfg.pipeline());
    let worker = FrameWorker::spawn(pipeline, cfg.frame_policy)?;

    log::info!(
        "pose_overlay running: detector={} camera={} display={} y_offset={} policy={:?}",
        cfg.detector,
        cfg.frame_descriptor(),
        cfg.display,
        cfg.y_offset,
        cfg.frame_policy
    );

    let running = Arc::new(AtomicBool::new(true));
    let running_signal = running.clone();
    ctrlc::set_handler(move || {
        running_signal.store(false, Ordering::SeqCst);
    })
    .expect("error setting Ctrl-C handler");

    let camera = SyntheticCamera::new(cfg.camera_config());
    let running_camera = running.clone();
    let camera_thread = std::thread::Builder::new()
        .name("camera".to_string())
        .spawn(move || run_camera(camera, worker, running_camera))
        .map_err(|e| anyhow!("failed to spawn camera thread: {}", e))?;

    let renders = run_render_loop(&store, args.render_hz, args.seconds, &running);
    running.store(false, Ordering::SeqCst);

    let (worker, camera) = camera_thread
        .join()
        .map_err(|_| anyhow!("camera thread panicked"))??;
    let stats = worker.stop()?;
    let camera_stats = camera.stats();

    log::info!(
        "shutdown: frames={} published={} skipped={} dropped={} overruns={}",
        stats.frames,
        stats.published,
        stats.skipped(),
        stats.dropped_frames,
        stats.budget_overruns
    );

    let last_pose = store.current();
    let report = RunReport {
        detector: &cfg.detector,
        y_offset: cfg.y_offset,
        frames_captured: camera_stats.frames_captured,
        blank_frames: camera_stats.blank_frames,
        renders,
        pipeline: stats,
        last_pose: last_pose.as_ref(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Feed frames to the worker at camera cadence until told to stop.
fn run_camera(
    mut camera: SyntheticCamera,
    mut worker: WorkerHandle,
    running: Arc<AtomicBool>,
) -> Result<(WorkerHandle, SyntheticCamera)> {
    let interval = camera.config().frame_interval();
    let mut next_tick = Instant::now();
    log::info!(
        "camera: {} at {} fps, policy={:?}",
        camera.config().descriptor(),
        camera.config().fps,
        worker.policy()
    );
    while running.load(Ordering::SeqCst) {
        let frame = camera.next_frame();
        if worker.submit(frame)? == SubmitOutcome::Dropped {
            log::debug!(
                "camera: pipeline busy, frame dropped ({} so far)",
                worker.dropped()
            );
        }
        next_tick += interval;
        let now = Instant::now();
        if next_tick > now {
            std::thread::sleep(next_tick - now);
        } else {
            next_tick = now;
        }
    }
    Ok((worker, camera))
}

/// Poll the store at display cadence; returns the number of redraws.
fn run_render_loop(
    store: &PoseStore,
    render_hz: u32,
    seconds: Option<u64>,
    running: &AtomicBool,
) -> u64 {
    let frame_time = Duration::from_secs_f64(1.0 / f64::from(render_hz));
    let deadline = seconds.map(|s| Instant::now() + Duration::from_secs(s));
    let mut reader = PoseReader::new(store.clone());
    let mut renders = 0u64;
    let mut last_health_log = Instant::now();

    while running.load(Ordering::SeqCst) {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }

        if let Some(pose) = reader.poll() {
            renders += 1;
            let overlay = markers(&pose);
            let nose = pose[LandmarkKey::Nose];
            log::debug!(
                "redraw #{} gen={} markers={} nose=({:.1}, {:.1})",
                renders,
                reader.last_seen(),
                overlay.len(),
                nose.x,
                nose.y
            );
        }

        if last_health_log.elapsed() >= Duration::from_secs(5) {
            log::info!(
                "render health: generation={} redraws={}",
                store.generation(),
                renders
            );
            last_health_log = Instant::now();
        }

        std::thread::sleep(frame_time);
    }
    renders
}
