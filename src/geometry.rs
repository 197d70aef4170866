//! Coordinate spaces, points, and frame/display geometry.
//!
//! Points carry a zero-sized space tag so sensor-space and display-space
//! coordinates cannot be mixed. The only conversion between the two lives in
//! `crate::transform`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Pixel space of the raw camera frame, in the sensor's native orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sensor;

/// Pixel space of the render surface, in the device's display orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Display;

/// A 2D landmark position in coordinate space `S`.
#[derive(Serialize, Deserialize)]
pub struct Point<S> {
    pub x: f64,
    pub y: f64,
    #[serde(skip)]
    space: PhantomData<S>,
}

pub type SensorPoint = Point<Sensor>;
pub type DisplayPoint = Point<Display>;

impl<S> Point<S> {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            space: PhantomData,
        }
    }
}

// Manual impls: derives would require the space tag itself to implement the trait.
impl<S> Clone for Point<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Point<S> {}

impl<S> PartialEq for Point<S> {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl<S> Default for Point<S> {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl<S> fmt::Debug for Point<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Raw sensor frame dimensions as delivered to the detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameDescriptor {
    pub width: u32,
    pub height: u32,
}

/// Render surface dimensions in display orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayDescriptor {
    pub width: u32,
    pub height: u32,
}

impl FrameDescriptor {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl DisplayDescriptor {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Parse `WIDTHxHEIGHT` (e.g. `414x896`).
    pub fn parse(value: &str) -> Option<Self> {
        let (w, h) = value.trim().split_once(['x', 'X'])?;
        Some(Self::new(w.trim().parse().ok()?, h.trim().parse().ok()?))
    }
}

impl fmt::Display for FrameDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl fmt::Display for DisplayDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
