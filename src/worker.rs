//! Dedicated frame-processing thread.
//!
//! The camera side hands frames to the worker through a zero-capacity
//! rendezvous channel, so no frame is ever queued behind another:
//!
//! - `FramePolicy::DropNew`: a frame is accepted only if the worker is idle
//!   and waiting; otherwise it is dropped on the spot.
//! - `FramePolicy::Block`: the caller waits until the worker is free.
//!
//! The render side never talks to the worker; it reads the `PoseStore`.

use anyhow::{anyhow, Result};
use std::str::FromStr;
use std::sync::mpsc::{self, SyncSender, TrySendError};
use std::thread::JoinHandle;

use crate::frame::Frame;
use crate::pipeline::{FramePipeline, PipelineStats};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FramePolicy {
    #[default]
    DropNew,
    Block,
}

impl FromStr for FramePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop-new" | "drop_new" | "drop" => Ok(FramePolicy::DropNew),
            "block" => Ok(FramePolicy::Block),
            other => Err(anyhow!(
                "unknown frame policy '{}' (expected drop-new or block)",
                other
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    /// Worker was busy; the frame was discarded.
    Dropped,
}

pub struct FrameWorker;

impl FrameWorker {
    /// Move `pipeline` onto its own thread.
    pub fn spawn(pipeline: FramePipeline, policy: FramePolicy) -> Result<WorkerHandle> {
        let (tx, rx) = mpsc::sync_channel::<Frame>(0);

        let join = std::thread::Builder::new()
            .name("frame-pipeline".to_string())
            .spawn(move || {
                let mut pipeline = pipeline;
                pipeline.warm_up();
                log::info!(
                    "frame pipeline started (detector={}, y_offset={})",
                    pipeline.detector_name(),
                    pipeline.y_offset()
                );
                while let Ok(frame) = rx.recv() {
                    pipeline.process_frame(&frame);
                }
                log::info!("frame pipeline stopped after {} frames", pipeline.stats().frames);
                pipeline.stats().clone()
            })
            .map_err(|e| anyhow!("failed to spawn frame pipeline thread: {}", e))?;

        Ok(WorkerHandle {
            tx: Some(tx),
            join: Some(join),
            policy,
            dropped: 0,
        })
    }
}

/// Camera-side handle to a running worker.
pub struct WorkerHandle {
    tx: Option<SyncSender<Frame>>,
    join: Option<JoinHandle<PipelineStats>>,
    policy: FramePolicy,
    dropped: u64,
}

impl WorkerHandle {
    pub fn submit(&mut self, frame: Frame) -> Result<SubmitOutcome> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| anyhow!("frame worker already stopped"))?;
        match self.policy {
            FramePolicy::DropNew => match tx.try_send(frame) {
                Ok(()) => Ok(SubmitOutcome::Accepted),
                Err(TrySendError::Full(frame)) => {
                    self.dropped += 1;
                    log::debug!("frame #{} dropped: pipeline busy", frame.sequence);
                    Ok(SubmitOutcome::Dropped)
                }
                Err(TrySendError::Disconnected(_)) => Err(anyhow!("frame pipeline thread exited")),
            },
            FramePolicy::Block => tx
                .send(frame)
                .map(|()| SubmitOutcome::Accepted)
                .map_err(|_| anyhow!("frame pipeline thread exited")),
        }
    }

    pub fn policy(&self) -> FramePolicy {
        self.policy
    }

    /// Frames discarded so far because the worker was busy.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Stop accepting frames, let the in-flight frame finish, and join.
    pub fn stop(mut self) -> Result<PipelineStats> {
        self.tx.take();
        let join = self
            .join
            .take()
            .ok_or_else(|| anyhow!("frame worker already joined"))?;
        let mut stats = join
            .join()
            .map_err(|_| anyhow!("frame pipeline thread panicked"))?;
        stats.dropped_frames = self.dropped;
        Ok(stats)
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.tx.take();
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                log::error!("frame pipeline thread panicked");
            }
        }
    }
}
