use crate::models::gimmick::Gimmick;
use crate::models::settings::Mode;
use crate::models::stats::Judgement;

/// Presentation → engine calls.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    /// Begin a session; `now` is the current audio-domain timestamp.
    Start { now: f64 },
    /// A strike input at the given audio-domain timestamp.
    Hit { now: f64 },
    /// Abandon the current session and return to idle.
    Retry,
    Shutdown,

    // Settings
    SetMode(Mode),
    SetBpm(f64),
    SetOffset(f64),
}

/// Engine → presentation events.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Judgement(Judgement),
    ComboChanged(u32),
    MissChanged { misses: u32, max: u32 },
    GameOver,
    NoteSpawned { id: u64, target_time: f64 },
    NoteResolved { id: u64, tier: Judgement },
    GimmickTriggered(Gimmick),
}
