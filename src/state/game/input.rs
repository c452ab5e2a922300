//! Hit detection for GameEngine - process_hit and the judgement strategies.
//!
//! All times are audio-domain seconds.

use super::GameEngine;
use crate::models::settings::JudgeMode;
use crate::models::stats::Judgement;
use crate::models::threat::SessionPhase;
use crate::shared::messages::EngineEvent;
use ordered_float::OrderedFloat;

impl GameEngine {
    /// Judges a strike input at audio time `t`.
    ///
    /// Input outside a session is a legal no-op, not a fault.
    pub fn process_hit(&mut self, t: f64) {
        if self.phase != SessionPhase::Playing {
            log::debug!("ENGINE: Input at {:.3}s ignored while not playing", t);
            return;
        }
        if !t.is_finite() {
            log::warn!("ENGINE: Ignoring input with non-finite timestamp");
            return;
        }
        match self.judge_mode {
            JudgeMode::PerNote => self.judge_per_note(t),
            JudgeMode::NearestBeat => self.judge_nearest_beat(t),
        }
    }

    /// Per-note strategy: judge against the nearest unresolved note.
    ///
    /// Ties on distance break towards the lowest note id (earliest created),
    /// which makes the selection deterministic.
    fn judge_per_note(&mut self, t: f64) {
        let best = self
            .notes
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.resolved)
            .min_by_key(|(_, n)| (OrderedFloat((n.target_time - t).abs()), n.id))
            .map(|(idx, n)| (idx, t - n.target_time));

        let Some((idx, diff)) = best else {
            // Nothing in flight to hit.
            self.apply_judgement(Judgement::Miss);
            return;
        };

        match self.window.judge(diff, self.threat.threat_level(), self.mode) {
            Some(tier) => {
                let id = self.notes[idx].id;
                self.notes[idx].resolved = true;
                self.emit(EngineEvent::NoteResolved { id, tier });
                self.apply_judgement(tier);
            }
            // The nearest note is out of reach: the input itself is a miss
            // and resolves nothing.
            None => self.apply_judgement(Judgement::Miss),
        }
    }

    /// Nearest-beat strategy: judge against the closest grid line.
    ///
    /// Degraded mode: with no discrete notes there is nothing to expire, so a
    /// silent player accrues no misses. That is the documented trade-off of
    /// this strategy, not something to patch around.
    fn judge_nearest_beat(&mut self, t: f64) {
        let beat = self.clock.nearest_beat_time(t);
        match self.window.judge(t - beat, self.threat.threat_level(), self.mode) {
            Some(tier) => self.apply_judgement(tier),
            None => self.apply_judgement(Judgement::Miss),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_util::*;
    use crate::models::settings::{GameSettings, JudgeMode, Mode};
    use crate::models::stats::Judgement;
    use crate::models::threat::SessionPhase;
    use crate::shared::messages::EngineEvent;

    #[test]
    fn input_with_no_notes_is_a_miss() {
        // bpm=80, offset=0, normal: input at 0.001 before anything spawned.
        let (mut engine, rx) = started_engine(GameSettings::default());
        engine.process_hit(0.001);
        assert_eq!(engine.threat.misses, 1);
        assert_eq!(engine.threat.combo, 0);
        let events = drain(&rx);
        assert!(events.contains(&EngineEvent::Judgement(Judgement::Miss)));
        // No note was resolved by the stray input.
        assert!(!events.iter().any(|e| matches!(e, EngineEvent::NoteResolved { .. })));
    }

    #[test]
    fn on_beat_input_is_perfect() {
        let (mut engine, rx) = started_engine(GameSettings::default());
        engine.update(0.0); // spawns notes targeting 0.75 and 1.5
        engine.process_hit(0.75);
        let events = drain(&rx);
        assert!(events.contains(&EngineEvent::Judgement(Judgement::Perfect)));
        assert_eq!(engine.threat.combo, 1);
    }

    #[test]
    fn late_input_within_tolerance_is_ok() {
        let (mut engine, rx) = started_engine(GameSettings::default());
        engine.update(0.0);
        // 100ms late: outside the 40ms perfect window, inside 150ms tolerance.
        engine.process_hit(0.85);
        let events = drain(&rx);
        assert!(events.contains(&EngineEvent::Judgement(Judgement::Ok)));
    }

    #[test]
    fn input_outside_tolerance_resolves_nothing() {
        let (mut engine, rx) = started_engine(GameSettings::default());
        engine.update(0.0);
        engine.process_hit(0.4); // 350ms early on the 0.75 note
        let events = drain(&rx);
        assert!(events.contains(&EngineEvent::Judgement(Judgement::Miss)));
        assert!(engine.notes.iter().all(|n| !n.resolved));
    }

    #[test]
    fn nearest_note_wins_and_ties_break_low_id() {
        // Two notes equidistant (100ms) from the input at 1.0; the
        // earliest-created one must win.
        let (mut engine, _rx) = started_engine(GameSettings::default());
        engine.spawn_note(0.0, 0.9);
        engine.spawn_note(0.0, 1.1);
        let first_id = engine.notes[0].id;
        engine.process_hit(1.0);
        let resolved: Vec<_> = engine.notes.iter().filter(|n| n.resolved).collect();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id, first_id);
    }

    #[test]
    fn input_while_idle_is_a_no_op() {
        let (mut engine, rx) = idle_engine(GameSettings::default());
        engine.process_hit(1.0);
        assert_eq!(engine.phase, SessionPhase::Idle);
        assert_eq!(engine.threat.misses, 0);
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn nearest_beat_mode_judges_the_grid() {
        let settings = GameSettings {
            judge_mode: JudgeMode::NearestBeat,
            ..Default::default()
        };
        let (mut engine, rx) = started_engine(settings);
        engine.process_hit(0.76); // 10ms off the 0.75 beat
        let events = drain(&rx);
        assert!(events.contains(&EngineEvent::Judgement(Judgement::Perfect)));
        engine.process_hit(1.5); // exactly on the grid
        assert_eq!(engine.threat.misses, 0);
        engine.process_hit(2.075); // 175ms off the 2.25 beat
        assert_eq!(engine.threat.misses, 1);
    }

    #[test]
    fn nearest_beat_mode_never_misses_a_silent_player() {
        let settings = GameSettings {
            judge_mode: JudgeMode::NearestBeat,
            ..Default::default()
        };
        let (mut engine, _rx) = started_engine(settings);
        for tick in 0..200 {
            engine.update(tick as f64 * 0.05);
        }
        assert_eq!(engine.threat.misses, 0);
        assert_eq!(engine.phase, SessionPhase::Playing);
    }

    #[test]
    fn hard_mode_window_is_tighter() {
        let settings = GameSettings {
            mode: Mode::Hard,
            ..Default::default()
        };
        let (mut engine, rx) = started_engine(settings);
        engine.update(0.0);
        // 100ms late: OK in normal mode, outside hard tolerance (90ms).
        engine.process_hit(0.85);
        let events = drain(&rx);
        assert!(events.contains(&EngineEvent::Judgement(Judgement::Miss)));
    }
}
