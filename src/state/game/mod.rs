//! Core engine for beat-synchronized judgement.
//!
//! The `GameEngine` handles all real-time game logic:
//! - Beat scheduling (one note per beat, recomputed from the audio clock)
//! - Hit detection against the shrinking judgement window
//! - Miss counting, combo tracking and the derived threat level
//! - Combo milestone gimmicks
//!
//! Everything here runs on the logic thread; presentation talks to it only
//! through the bus.

mod input;
mod notes;
mod snapshot;

pub mod actions;

use crate::models::clock::{BeatClock, ClockConfig};
use crate::models::gimmick::NOTE_RUSH_CADENCE;
use crate::models::note::Note;
use crate::models::settings::{GameSettings, JudgeMode, JudgementPosition, Mode};
use crate::models::stats::{HitStats, Judgement};
use crate::models::threat::{SessionPhase, ThreatState};
use crate::models::window::JudgementWindow;
use crate::shared::messages::EngineEvent;
use crate::system::bus::SystemBus;
use crossbeam_channel::Sender;

/// A live play session.
///
/// The id is a generation token: it changes on every start, so anything kept
/// around from an earlier session can be told apart and dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Session {
    pub id: u64,
    /// Audio-domain timestamp playback started at.
    pub start_time: f64,
}

/// Main engine handling beat scheduling, judgement and threat state.
pub struct GameEngine {
    /// Beat grid over the audio clock.
    pub(crate) clock: BeatClock,
    /// Judgement tolerance policy.
    pub(crate) window: JudgementWindow,
    /// Active difficulty mode.
    pub(crate) mode: Mode,
    /// Judgement strategy (per-note or nearest-beat).
    pub(crate) judge_mode: JudgeMode,
    /// Mode selected mid-session, applied on the next start.
    pub(crate) pending_mode: Option<Mode>,
    /// Passthrough for presentation.
    pub(crate) judgement_position: JudgementPosition,

    pub(crate) phase: SessionPhase,
    pub(crate) session: Option<Session>,
    pub(crate) next_session_id: u64,

    /// Miss/combo counters and the derived threat level.
    pub(crate) threat: ThreatState,
    pub(crate) hit_stats: HitStats,
    pub(crate) last_judgement: Option<Judgement>,

    /// Notes in flight. Pruned of resolved entries every tick.
    pub(crate) notes: Vec<Note>,
    pub(crate) next_note_id: u64,
    /// Next beat the scheduler will spawn a note for.
    pub(crate) next_target: f64,

    /// Configured in-flight duration.
    pub(crate) base_travel_seconds: f64,
    /// Current in-flight duration (SlowMotion changes it temporarily).
    pub(crate) travel_seconds: f64,
    pub(crate) slow_motion_until: Option<f64>,
    pub(crate) rush_until: Option<f64>,
    pub(crate) rush_next_spawn: f64,

    /// Monotonic audio clock, advanced by `update`.
    pub(crate) audio_clock: f64,

    pub(crate) event_tx: Sender<EngineEvent>,
}

impl GameEngine {
    /// Creates an idle engine wired to the bus.
    pub fn new(bus: &SystemBus, settings: &GameSettings) -> Self {
        Self {
            clock: BeatClock::new(ClockConfig::new(settings.bpm, settings.offset_seconds)),
            window: JudgementWindow::new(),
            mode: settings.mode,
            judge_mode: settings.judge_mode,
            pending_mode: None,
            judgement_position: settings.judgement_position,
            phase: SessionPhase::Idle,
            session: None,
            next_session_id: 1,
            threat: ThreatState::new(settings.mode.max_misses()),
            hit_stats: HitStats::new(),
            last_judgement: None,
            notes: Vec::new(),
            next_note_id: 0,
            next_target: 0.0,
            base_travel_seconds: settings.travel_seconds,
            travel_seconds: settings.travel_seconds,
            slow_motion_until: None,
            rush_until: None,
            rush_next_spawn: 0.0,
            audio_clock: 0.0,
            event_tx: bus.event_tx.clone(),
        }
    }

    /// Advances the engine to the given audio time.
    ///
    /// This method:
    /// 1. Advances the monotonic audio clock
    /// 2. Expires timed gimmick effects
    /// 3. Spawns every note whose spawn point has been reached
    /// 4. Auto-misses notes whose late window has passed
    pub fn update(&mut self, now: f64) {
        // The audio clock never goes backwards within a session.
        if now.is_finite() && now > self.audio_clock {
            self.audio_clock = now;
        }
        if self.phase != SessionPhase::Playing {
            return;
        }
        let now = self.audio_clock;

        self.expire_gimmicks(now);
        // Nearest-beat mode has no discrete notes: nothing to spawn or
        // expire, the grid itself is the target.
        if self.judge_mode == JudgeMode::PerNote {
            self.spawn_due_notes(now);
            self.sweep_expired(now);
        }
    }

    /// Restores scheduler parameters whose gimmick deadline has passed.
    fn expire_gimmicks(&mut self, now: f64) {
        if let Some(until) = self.slow_motion_until {
            if now >= until {
                self.slow_motion_until = None;
                self.travel_seconds = self.base_travel_seconds;
            }
        }
        if let Some(until) = self.rush_until {
            if now >= until {
                self.rush_until = None;
            }
        }
    }

    /// Spawns every note whose spawn point (`target - travel`) is due.
    ///
    /// The next target is always recomputed from the beat grid, never from an
    /// accumulated interval, so the cadence cannot drift against the clock.
    fn spawn_due_notes(&mut self, now: f64) {
        while self.next_target - self.travel_seconds <= now {
            let target = self.next_target;
            self.next_target = self.clock.beat_after(target);
            self.spawn_note(now, target);
        }

        // NoteRush: extra off-grid notes on a sub-beat cadence.
        if let Some(until) = self.rush_until {
            let cadence = NOTE_RUSH_CADENCE * self.clock.config().seconds_per_beat();
            while self.rush_next_spawn <= now && self.rush_next_spawn < until {
                let target = now + self.travel_seconds;
                self.spawn_note(now, target);
                self.rush_next_spawn += cadence;
            }
        }
    }

    pub(crate) fn spawn_note(&mut self, now: f64, target_time: f64) {
        self.next_note_id += 1;
        let note = Note::new(self.next_note_id, now, target_time);
        self.notes.push(note);
        self.emit(EngineEvent::NoteSpawned {
            id: note.id,
            target_time,
        });
    }

    /// Current tolerance for the live threat level and mode.
    pub(crate) fn tolerance(&self) -> f64 {
        self.window.tolerance(self.threat.threat_level(), self.mode)
    }

    pub(crate) fn emit(&self, event: EngineEvent) {
        // Presentation may be gone during shutdown.
        let _ = self.event_tx.send(event);
    }
}
