//! Session lifecycle and settings application for GameEngine.

use super::{GameEngine, Session};
use crate::models::clock::ClockConfig;
use crate::models::settings::Mode;
use crate::models::stats::HitStats;
use crate::models::threat::SessionPhase;
use crate::shared::messages::EngineEvent;

impl GameEngine {
    /// Starts a session at the given audio timestamp.
    ///
    /// Fails when the audio clock is not primed (`now` not finite); the
    /// caller retries after resuming the audio context. Starting while a
    /// session is active is a legal no-op.
    pub fn start(&mut self, now: f64) -> Result<(), String> {
        if self.phase != SessionPhase::Idle {
            log::warn!("ENGINE: Start ignored, session already active");
            return Ok(());
        }
        self.clock.start(now)?;
        if let Some(mode) = self.pending_mode.take() {
            self.mode = mode;
        }

        let id = self.next_session_id;
        self.next_session_id += 1;
        self.session = Some(Session {
            id,
            start_time: now,
        });

        self.audio_clock = now;
        self.threat.reset(self.mode.max_misses());
        self.hit_stats = HitStats::new();
        self.last_judgement = None;
        self.notes.clear();
        self.next_note_id = 0;
        self.travel_seconds = self.base_travel_seconds;
        self.slow_motion_until = None;
        self.rush_until = None;
        self.next_target = self.clock.beat_after(now);
        self.phase = SessionPhase::Playing;

        log::info!(
            "ENGINE: Session {} started at {:.3}s ({:?}, {:?})",
            id,
            now,
            self.mode,
            self.judge_mode
        );
        self.push_hud();
        Ok(())
    }

    /// Abandons the current session and returns to idle.
    ///
    /// Clears notes, timed effects and counters in one step; nothing
    /// scheduled for the dead session can fire afterwards. No-op while idle.
    pub fn retry(&mut self) {
        if self.phase == SessionPhase::Idle {
            log::debug!("ENGINE: Retry ignored while idle");
            return;
        }
        let id = self.session.map(|s| s.id);
        self.phase = SessionPhase::Idle;
        self.session = None;
        self.clock.stop();
        self.notes.clear();
        self.next_note_id = 0;
        self.threat.reset(self.mode.max_misses());
        self.hit_stats = HitStats::new();
        self.last_judgement = None;
        self.travel_seconds = self.base_travel_seconds;
        self.slow_motion_until = None;
        self.rush_until = None;

        log::info!("ENGINE: Session {:?} reset", id);
        self.push_hud();
    }

    /// Changes the difficulty mode.
    ///
    /// Outside idle the change is deferred to the next start: applying a
    /// smaller miss budget while playing could skip past the game-over
    /// transition, and a game-over screen keeps showing its final counters.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.phase == SessionPhase::Idle {
            self.mode = mode;
            self.pending_mode = None;
            self.threat.reset(mode.max_misses());
        } else {
            log::info!("ENGINE: Mode {:?} deferred to next session", mode);
            self.pending_mode = Some(mode);
        }
    }

    /// Changes the BPM (clamped into [30, 240]); the beat grid keeps its
    /// origin and the scheduler re-arms from the live clock.
    pub fn set_bpm(&mut self, bpm: f64) {
        if !bpm.is_finite() {
            log::warn!("ENGINE: Ignoring non-finite BPM");
            return;
        }
        let offset = self.clock.config().offset_seconds;
        self.clock.set_config(ClockConfig::new(bpm, offset));
        self.resync_schedule();
    }

    /// Changes the grid offset; the scheduler re-arms from the live clock.
    pub fn set_offset(&mut self, offset_seconds: f64) {
        if !offset_seconds.is_finite() {
            log::warn!("ENGINE: Ignoring non-finite offset");
            return;
        }
        let bpm = self.clock.config().bpm;
        self.clock.set_config(ClockConfig::new(bpm, offset_seconds));
        self.resync_schedule();
    }

    /// Recomputes the next scheduled beat after a tempo model change.
    fn resync_schedule(&mut self) {
        if self.phase == SessionPhase::Playing {
            self.next_target = self.clock.beat_after(self.audio_clock);
        }
    }

    /// Pushes the HUD counters so presentation reflects a fresh session.
    fn push_hud(&self) {
        self.emit(EngineEvent::ComboChanged(self.threat.combo));
        self.emit(EngineEvent::MissChanged {
            misses: self.threat.misses,
            max: self.threat.max_misses,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_util::*;
    use crate::models::settings::{GameSettings, Mode};
    use crate::models::threat::SessionPhase;
    use crate::shared::messages::EngineEvent;

    #[test]
    fn start_requires_a_primed_clock() {
        let (mut engine, _rx) = idle_engine(GameSettings::default());
        assert!(engine.start(f64::NAN).is_err());
        assert_eq!(engine.phase, SessionPhase::Idle);
        assert!(engine.start(0.0).is_ok());
        assert_eq!(engine.phase, SessionPhase::Playing);
    }

    #[test]
    fn start_while_playing_is_a_no_op() {
        let (mut engine, _rx) = started_engine(GameSettings::default());
        let session = engine.session;
        assert!(engine.start(5.0).is_ok());
        assert_eq!(engine.session, session);
    }

    #[test]
    fn hard_mode_dies_on_the_first_miss() {
        let settings = GameSettings {
            mode: Mode::Hard,
            ..Default::default()
        };
        let (mut engine, rx) = started_engine(settings);
        engine.process_hit(10_000.0);
        assert_eq!(engine.phase, SessionPhase::GameOver);
        assert!(drain(&rx).contains(&EngineEvent::GameOver));
    }

    #[test]
    fn retry_after_game_over_restores_idle_zero_state() {
        let (mut engine, _rx) = started_engine(GameSettings::default());
        engine.update(0.0);
        engine.process_hit(0.75);
        for _ in 0..6 {
            engine.process_hit(10_000.0);
        }
        assert_eq!(engine.phase, SessionPhase::GameOver);

        engine.retry();
        assert_eq!(engine.phase, SessionPhase::Idle);
        assert_eq!(engine.threat.misses, 0);
        assert_eq!(engine.threat.combo, 0);
        assert_eq!(engine.threat.threat_level(), 0.0);
        assert!(engine.notes.is_empty());
        assert_eq!(engine.hit_stats, crate::models::stats::HitStats::new());
    }

    #[test]
    fn retry_while_idle_is_a_no_op() {
        let (mut engine, rx) = idle_engine(GameSettings::default());
        engine.retry();
        assert_eq!(engine.phase, SessionPhase::Idle);
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn sessions_get_fresh_generation_tokens() {
        let (mut engine, _rx) = started_engine(GameSettings::default());
        let first = engine.session.unwrap().id;
        engine.retry();
        engine.start(10.0).unwrap();
        assert!(engine.session.unwrap().id > first);
    }

    #[test]
    fn mode_change_while_playing_is_deferred() {
        let (mut engine, _rx) = started_engine(GameSettings::default());
        engine.set_mode(Mode::Hard);
        // Still playing on the normal budget.
        assert_eq!(engine.threat.max_misses, 6);
        engine.retry();
        engine.start(10.0).unwrap();
        assert_eq!(engine.threat.max_misses, 1);
    }

    #[test]
    fn mode_change_while_idle_applies_immediately() {
        let (mut engine, _rx) = idle_engine(GameSettings::default());
        engine.set_mode(Mode::Easy);
        assert_eq!(engine.threat.max_misses, 16);
    }

    #[test]
    fn set_bpm_is_clamped_and_rearms_the_scheduler() {
        let (mut engine, _rx) = started_engine(GameSettings::default());
        engine.update(0.0);
        engine.set_bpm(1000.0);
        assert_eq!(engine.clock.config().bpm, 240.0);
        // Next target is the first beat of the new grid after "now".
        assert!(engine.next_target > engine.audio_clock);
    }

    #[test]
    fn restart_restores_slow_motion_travel() {
        let (mut engine, _rx) = started_engine(GameSettings::default());
        let base = engine.travel_seconds;
        engine.travel_seconds = base * 2.0;
        engine.slow_motion_until = Some(100.0);
        engine.retry();
        assert_eq!(engine.travel_seconds, base);
        assert_eq!(engine.slow_motion_until, None);
    }
}
