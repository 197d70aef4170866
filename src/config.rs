use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::detect::{DetectorRegistry, JsonReplayDetector, NullDetector, SyntheticDetector};
use crate::geometry::{DisplayDescriptor, FrameDescriptor};
use crate::pipeline::PipelineConfig;
use crate::source::CameraConfig;
use crate::transform::DEFAULT_Y_OFFSET;
use crate::worker::FramePolicy;

const DEFAULT_DETECTOR: &str = "synthetic";
const DEFAULT_CAMERA_FPS: u32 = 15;
const DEFAULT_CAMERA_WIDTH: u32 = 1920;
const DEFAULT_CAMERA_HEIGHT: u32 = 1080;
const DEFAULT_DISPLAY_WIDTH: u32 = 414;
const DEFAULT_DISPLAY_HEIGHT: u32 = 896;
const REPLAY_DETECTOR: &str = "json-replay";

#[derive(Debug, Deserialize, Default)]
struct OverlayConfigFile {
    detector: Option<String>,
    y_offset: Option<f64>,
    camera: Option<CameraConfigFile>,
    display: Option<DisplayConfigFile>,
    frame_budget_ms: Option<u64>,
    frame_policy: Option<String>,
    replay_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct CameraConfigFile {
    fps: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct DisplayConfigFile {
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct OverlayConfig {
    /// Registry name of the detector plugin.
    pub detector: String,
    /// Vertical correction in display units; device dependent.
    pub y_offset: f64,
    pub camera: CameraSettings,
    pub display: DisplayDescriptor,
    pub frame_budget: Duration,
    pub frame_policy: FramePolicy,
    pub replay_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct CameraSettings {
    pub fps: u32,
    pub width: u32,
    pub height: u32,
}

impl OverlayConfig {
    /// Load from `POSE_OVERLAY_CONFIG` (JSON) if set, then apply env overrides.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("POSE_OVERLAY_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default())?;
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: OverlayConfigFile) -> Result<Self> {
        let camera = CameraSettings {
            fps: file
                .camera
                .as_ref()
                .and_then(|camera| camera.fps)
                .unwrap_or(DEFAULT_CAMERA_FPS),
            width: file
                .camera
                .as_ref()
                .and_then(|camera| camera.width)
                .unwrap_or(DEFAULT_CAMERA_WIDTH),
            height: file
                .camera
                .as_ref()
                .and_then(|camera| camera.height)
                .unwrap_or(DEFAULT_CAMERA_HEIGHT),
        };
        let display = DisplayDescriptor::new(
            file.display
                .as_ref()
                .and_then(|display| display.width)
                .unwrap_or(DEFAULT_DISPLAY_WIDTH),
            file.display
                .as_ref()
                .and_then(|display| display.height)
                .unwrap_or(DEFAULT_DISPLAY_HEIGHT),
        );
        let frame_budget = match file.frame_budget_ms {
            Some(ms) => Duration::from_millis(ms),
            None => PipelineConfig::budget_for_fps(camera.fps),
        };
        let frame_policy = match file.frame_policy.as_deref() {
            Some(policy) => policy.parse()?,
            None => FramePolicy::default(),
        };
        Ok(Self {
            detector: file
                .detector
                .unwrap_or_else(|| DEFAULT_DETECTOR.to_string()),
            y_offset: file.y_offset.unwrap_or(DEFAULT_Y_OFFSET),
            camera,
            display,
            frame_budget,
            frame_policy,
            replay_path: file.replay_path,
        })
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(detector) = std::env::var("POSE_OVERLAY_DETECTOR") {
            if !detector.trim().is_empty() {
                self.detector = detector.trim().to_string();
            }
        }
        if let Ok(offset) = std::env::var("POSE_OVERLAY_Y_OFFSET") {
            self.y_offset = offset
                .trim()
                .parse()
                .map_err(|_| anyhow!("POSE_OVERLAY_Y_OFFSET must be a number"))?;
        }
        if let Ok(fps) = std::env::var("POSE_OVERLAY_FPS") {
            let fps: u32 = fps
                .trim()
                .parse()
                .map_err(|_| anyhow!("POSE_OVERLAY_FPS must be an integer"))?;
            // A budget derived from the old cadence follows the new one.
            if self.frame_budget == PipelineConfig::budget_for_fps(self.camera.fps) {
                self.frame_budget = PipelineConfig::budget_for_fps(fps);
            }
            self.camera.fps = fps;
        }
        if let Ok(display) = std::env::var("POSE_OVERLAY_DISPLAY") {
            self.display = DisplayDescriptor::parse(&display)
                .ok_or_else(|| anyhow!("POSE_OVERLAY_DISPLAY must look like 414x896"))?;
        }
        if let Ok(path) = std::env::var("POSE_OVERLAY_REPLAY_PATH") {
            if !path.trim().is_empty() {
                self.replay_path = Some(PathBuf::from(path));
            }
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<()> {
        if self.camera.fps == 0 {
            return Err(anyhow!("camera fps must be >= 1"));
        }
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(anyhow!("camera dimensions must be non-zero"));
        }
        if self.display.is_degenerate() {
            return Err(anyhow!("display dimensions must be non-zero"));
        }
        if !self.y_offset.is_finite() {
            return Err(anyhow!("y_offset must be finite"));
        }
        if self.frame_budget.is_zero() {
            return Err(anyhow!("frame budget must be greater than zero"));
        }
        if self.detector == REPLAY_DETECTOR && self.replay_path.is_none() {
            return Err(anyhow!(
                "detector '{}' requires replay_path (or POSE_OVERLAY_REPLAY_PATH)",
                REPLAY_DETECTOR
            ));
        }
        Ok(())
    }

    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            y_offset: self.y_offset,
            frame_budget: self.frame_budget,
        }
    }

    pub fn camera_config(&self) -> CameraConfig {
        CameraConfig {
            fps: self.camera.fps,
            width: self.camera.width,
            height: self.camera.height,
            ..CameraConfig::default()
        }
    }

    pub fn frame_descriptor(&self) -> FrameDescriptor {
        FrameDescriptor::new(self.camera.width, self.camera.height)
    }

    /// Registry of the bundled detectors. `json-replay` is present only when a
    /// recording is configured.
    pub fn detector_registry(&self) -> Result<DetectorRegistry> {
        let mut registry = DetectorRegistry::new();
        registry.register(SyntheticDetector::new());
        registry.register(NullDetector);
        if let Some(path) = &self.replay_path {
            registry.register(JsonReplayDetector::from_path(path)?);
        }
        Ok(registry)
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            detector: DEFAULT_DETECTOR.to_string(),
            y_offset: DEFAULT_Y_OFFSET,
            camera: CameraSettings {
                fps: DEFAULT_CAMERA_FPS,
                width: DEFAULT_CAMERA_WIDTH,
                height: DEFAULT_CAMERA_HEIGHT,
            },
            display: DisplayDescriptor::new(DEFAULT_DISPLAY_WIDTH, DEFAULT_DISPLAY_HEIGHT),
            frame_budget: PipelineConfig::budget_for_fps(DEFAULT_CAMERA_FPS),
            frame_policy: FramePolicy::default(),
            replay_path: None,
        }
    }
}

fn read_config_file(path: &Path) -> Result<OverlayConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
