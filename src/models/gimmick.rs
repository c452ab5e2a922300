//! Combo milestone gimmicks.
//!
//! A pure lookup from combo value to effect name. Most effects are handled
//! entirely by presentation; SlowMotion and NoteRush additionally bend the
//! note scheduler for a few seconds (see the engine's gimmick handling).

/// Scale applied to note speed during SlowMotion (travel is divided by this).
pub const SLOW_MOTION_RATE: f64 = 0.6;
/// How long SlowMotion lasts, in seconds.
pub const SLOW_MOTION_SECONDS: f64 = 2.5;
/// How long NoteRush lasts, in seconds.
pub const NOTE_RUSH_SECONDS: f64 = 4.0;
/// Fraction of a beat between extra NoteRush spawns.
pub const NOTE_RUSH_CADENCE: f64 = 0.6;

/// Named presentation effect fired on a combo milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gimmick {
    Shake,
    BigShake,
    Flash,
    SlowMotion,
    Spin,
    GhostNotes,
    NoteRush,
    Blackout,
    InvertColors,
}

impl Gimmick {
    /// Milestone table: fires only on positive multiples of 10.
    ///
    /// Unlisted higher multiples fall back to Flash.
    pub fn for_combo(combo: u32) -> Option<Gimmick> {
        if combo == 0 || combo % 10 != 0 {
            return None;
        }
        Some(match combo {
            10 => Gimmick::Shake,
            20 => Gimmick::BigShake,
            30 => Gimmick::Flash,
            40 => Gimmick::SlowMotion,
            50 => Gimmick::Spin,
            60 => Gimmick::GhostNotes,
            70 => Gimmick::NoteRush,
            80 => Gimmick::Blackout,
            90 => Gimmick::InvertColors,
            _ => Gimmick::Flash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_only_on_multiples_of_ten() {
        for combo in [1, 5, 9, 11, 19, 95] {
            assert_eq!(Gimmick::for_combo(combo), None, "combo {}", combo);
        }
        assert_eq!(Gimmick::for_combo(0), None);
        assert_eq!(Gimmick::for_combo(10), Some(Gimmick::Shake));
        assert_eq!(Gimmick::for_combo(50), Some(Gimmick::Spin));
        assert_eq!(Gimmick::for_combo(90), Some(Gimmick::InvertColors));
    }

    #[test]
    fn high_multiples_fall_back_to_flash() {
        assert_eq!(Gimmick::for_combo(100), Some(Gimmick::Flash));
        assert_eq!(Gimmick::for_combo(250), Some(Gimmick::Flash));
    }
}
