//! Shared channel infrastructure between system threads.
//!
//! The `SystemBus` is the communication hub between presentation and the
//! logic thread, using lock-free channels for message passing. The audio
//! clock is shared as an atomic written by the audio side and read by the
//! logic thread each tick.

use crate::shared::messages::{EngineCommand, EngineEvent};
use crate::shared::snapshot::GameplaySnapshot;
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Aggregates the cross-thread communication channels.
///
/// Channels:
/// - Presentation → Logic: engine commands (start, hits, settings)
/// - Logic → Presentation: engine events (judgements, gimmicks, game over)
/// - Logic → Presentation: engine snapshots for rendering
#[derive(Clone)]
pub struct SystemBus {
    /// Presentation → Logic: engine commands.
    pub command_tx: Sender<EngineCommand>,
    pub command_rx: Receiver<EngineCommand>,

    /// Logic → Presentation: engine events.
    pub event_tx: Sender<EngineEvent>,
    pub event_rx: Receiver<EngineEvent>,

    /// Logic → Presentation: engine snapshots.
    pub snapshot_tx: Sender<GameplaySnapshot>,
    pub snapshot_rx: Receiver<GameplaySnapshot>,

    /// Shared audio clock in microseconds.
    /// Written by the audio side, read by the logic thread.
    pub audio_clock_us: Arc<AtomicU64>,
}

impl SystemBus {
    /// Creates a new system bus with all channels initialized.
    pub fn new() -> Self {
        let (command_tx, command_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();

        // Bounded snapshot channel: max 2 frames queued to limit latency
        let (snapshot_tx, snapshot_rx) = bounded(2);

        Self {
            command_tx,
            command_rx,
            event_tx,
            event_rx,
            snapshot_tx,
            snapshot_rx,
            audio_clock_us: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Publishes the audio clock (seconds → shared micros).
    pub fn store_audio_clock(&self, seconds: f64) {
        self.audio_clock_us
            .store((seconds.max(0.0) * 1_000_000.0) as u64, Ordering::Release);
    }

    /// Reads the audio clock in seconds.
    pub fn load_audio_clock(&self) -> f64 {
        self.audio_clock_us.load(Ordering::Acquire) as f64 / 1_000_000.0
    }
}

impl Default for SystemBus {
    fn default() -> Self {
        Self::new()
    }
}
