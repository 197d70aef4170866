//! Sensor-to-display coordinate transform.
//!
//! The camera delivers landscape frames while the preview is drawn in
//! portrait. Each point is rotated by 90 degrees, both axes are mirrored to
//! match the preview, and a vertical offset corrects the residual
//! detector/renderer misalignment:
//!
//! ```text
//! x_scale = display.width  / frame.height
//! y_scale = display.height / frame.width
//!
//! rotated_x = py
//! rotated_y = frame.width - px
//!
//! display_x = display.width  - rotated_x * x_scale
//! display_y = display.height - rotated_y * y_scale - y_offset
//! ```
//!
//! No clamping is applied; points may land outside the canvas.

use anyhow::{anyhow, Result};

use crate::geometry::{DisplayDescriptor, DisplayPoint, FrameDescriptor, SensorPoint};
use crate::pose::{DisplayPose, SensorPose};

/// Vertical correction used when nothing else is configured.
pub const DEFAULT_Y_OFFSET: f64 = 35.0;

/// Map a sensor-space pose into display space.
///
/// Fails only on degenerate geometry (a zero frame or display dimension);
/// callers keep their previous pose in that case.
pub fn transform(
    raw: &SensorPose,
    frame: FrameDescriptor,
    display: DisplayDescriptor,
    y_offset: f64,
) -> Result<DisplayPose> {
    if frame.is_degenerate() {
        return Err(anyhow!("degenerate frame geometry {}", frame));
    }
    if display.is_degenerate() {
        return Err(anyhow!("degenerate display geometry {}", display));
    }

    let frame_w = f64::from(frame.width);
    let frame_h = f64::from(frame.height);
    let display_w = f64::from(display.width);
    let display_h = f64::from(display.height);

    let x_scale = display_w / frame_h;
    let y_scale = display_h / frame_w;

    Ok(DisplayPose::from_fn(|key| {
        let p: SensorPoint = raw.get(key);
        let rotated_x = p.y;
        let rotated_y = frame_w - p.x;
        DisplayPoint::new(
            display_w - rotated_x * x_scale,
            display_h - rotated_y * y_scale - y_offset,
        )
    }))
}

/// Transform with a fixed, tunable vertical offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateTransform {
    y_offset: f64,
}

impl CoordinateTransform {
    pub fn new(y_offset: f64) -> Self {
        Self { y_offset }
    }

    pub fn y_offset(&self) -> f64 {
        self.y_offset
    }

    pub fn set_y_offset(&mut self, y_offset: f64) {
        self.y_offset = y_offset;
    }

    pub fn apply(
        &self,
        raw: &SensorPose,
        frame: FrameDescriptor,
        display: DisplayDescriptor,
    ) -> Result<DisplayPose> {
        transform(raw, frame, display, self.y_offset)
    }
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self::new(DEFAULT_Y_OFFSET)
    }
}
