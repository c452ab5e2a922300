//! Render snapshots for inter-thread communication.
//!
//! Snapshots are immutable captures of engine state sent from the logic
//! thread to presentation. They decouple the engine from rendering: the HUD
//! and the approach visual are drawn entirely from this struct plus the
//! event stream.

use crate::models::note::Note;
use crate::models::settings::JudgementPosition;
use crate::models::stats::{HitStats, Judgement};
use crate::models::threat::SessionPhase;

/// Snapshot of engine state for rendering.
#[derive(Clone, Debug)]
pub struct GameplaySnapshot {
    /// Current audio time in seconds.
    pub audio_time: f64,
    pub phase: SessionPhase,

    /// Notes currently in flight (unresolved).
    pub notes: Vec<Note>,
    /// Current in-flight duration (SlowMotion changes it temporarily).
    pub travel_seconds: f64,

    pub combo: u32,
    pub misses: u32,
    pub max_misses: u32,
    /// Normalized proximity to failure, in [0, 1).
    pub threat_level: f64,
    /// True while the approach visual should be obscured ("behind you").
    pub hidden: bool,

    pub hit_stats: HitStats,
    /// Current accuracy percentage.
    pub accuracy: f64,
    /// Judgement of the last resolved input or expiry.
    pub last_judgement: Option<Judgement>,

    /// Where presentation shows the judgement text (passthrough).
    pub judgement_position: JudgementPosition,
}
