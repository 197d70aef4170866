//! Pose state store.
//!
//! A single-slot holder for the latest display-space pose, shared between the
//! frame-processing thread (writer) and the render thread (reader).
//!
//! - `PosePublisher` is the only write handle. It is not `Clone`, so exactly
//!   one pipeline owns the right to publish.
//! - `PoseStore` is the read handle. It is cheap to clone and hand to renderers.
//!
//! Publishing swaps an `Arc<DisplayPose>` under a short write lock; the pose is
//! built before the lock is taken, so readers see either the previous or the
//! new pose, never a partial one. Every publish bumps a generation counter that
//! readers use to detect new data.

use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};

use crate::landmark::{LandmarkKey, Side};
use crate::pose::DisplayPose;

struct Slot {
    generation: u64,
    pose: Arc<DisplayPose>,
}

/// Read handle over the current pose.
#[derive(Clone)]
pub struct PoseStore {
    slot: Arc<RwLock<Slot>>,
}

/// Exclusive write handle. Owned by the frame pipeline.
pub struct PosePublisher {
    slot: Arc<RwLock<Slot>>,
}

impl PoseStore {
    /// Create a store holding the all-zero pose, plus its single publisher.
    pub fn create() -> (PoseStore, PosePublisher) {
        let slot = Arc::new(RwLock::new(Slot {
            generation: 0,
            pose: Arc::new(DisplayPose::default()),
        }));
        (
            PoseStore { slot: slot.clone() },
            PosePublisher { slot },
        )
    }

    /// Latest published pose (or the default pose before the first publish).
    pub fn current(&self) -> Arc<DisplayPose> {
        self.snapshot().1
    }

    /// Latest pose together with the generation it was published at.
    /// Generation 0 is the initial default pose.
    pub fn snapshot(&self) -> (u64, Arc<DisplayPose>) {
        // The slot only ever holds a complete value, so a poisoned lock is still readable.
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        (slot.generation, slot.pose.clone())
    }

    pub fn generation(&self) -> u64 {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }
}

impl PosePublisher {
    /// Replace the stored pose. Returns the new generation.
    pub fn publish(&mut self, pose: DisplayPose) -> u64 {
        let pose = Arc::new(pose);
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        slot.generation += 1;
        slot.pose = pose;
        slot.generation
    }
}

// ----------------------------------------------------------------------------
// Render boundary
// ----------------------------------------------------------------------------

/// Renderer-side cursor that yields a pose only when something new was published.
///
/// Rapid successive publishes between two polls coalesce: only the latest is
/// returned.
pub struct PoseReader {
    store: PoseStore,
    last_seen: u64,
}

impl PoseReader {
    pub fn new(store: PoseStore) -> Self {
        Self {
            store,
            last_seen: 0,
        }
    }

    pub fn poll(&mut self) -> Option<Arc<DisplayPose>> {
        let (generation, pose) = self.store.snapshot();
        if generation == self.last_seen {
            return None;
        }
        self.last_seen = generation;
        Some(pose)
    }

    pub fn last_seen(&self) -> u64 {
        self.last_seen
    }
}

/// One overlay primitive for a renderer to draw.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub key: LandmarkKey,
    pub side: Side,
    pub x: f64,
    pub y: f64,
}

/// Flatten a display pose into markers, in `LandmarkKey::ALL` order.
pub fn markers(pose: &DisplayPose) -> Vec<Marker> {
    pose.iter()
        .map(|(key, p)| Marker {
            key,
            side: key.side(),
            x: p.x,
            y: p.y,
        })
        .collect()
}
