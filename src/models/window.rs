//! Judgement tolerance policy.
//!
//! The tolerance shrinks linearly as the threat level rises, then gets scaled
//! by the difficulty mode. Every input and every note expiry goes through the
//! same window, so the constants here define the whole feel of the game.

use crate::models::settings::Mode;
use crate::models::stats::Judgement;

/// Tolerance at zero threat (seconds).
pub const BASE_WINDOW: f64 = 0.150;
/// Tolerance floor reached at maximum threat (seconds).
pub const MIN_WINDOW: f64 = 0.045;
/// Inputs at most this far from the target are PERFECT (seconds).
pub const PERFECT_WINDOW: f64 = 0.040;

/// Hard lower bound so the window can never collapse to zero.
const MIN_TOLERANCE: f64 = 0.005;

/// Time-varying judgement window.
#[derive(Debug, Clone, Copy)]
pub struct JudgementWindow {
    pub base: f64,
    pub floor: f64,
    pub perfect: f64,
}

impl JudgementWindow {
    pub fn new() -> Self {
        Self {
            base: BASE_WINDOW,
            floor: MIN_WINDOW,
            perfect: PERFECT_WINDOW,
        }
    }

    /// Utility constructor for fully custom values.
    pub fn from_custom(base: f64, floor: f64, perfect: f64) -> Self {
        Self {
            base,
            floor,
            perfect,
        }
    }

    /// Current tolerance in seconds.
    ///
    /// Linear interpolation from `base` down to `floor` over the threat
    /// level, scaled by mode. Always positive; non-increasing in threat for a
    /// fixed mode; hard < normal < easy at every level.
    pub fn tolerance(&self, threat_level: f64, mode: Mode) -> f64 {
        let threat = threat_level.clamp(0.0, 1.0);
        let w = self.base - (self.base - self.floor) * threat;
        (w * mode.window_scale()).max(MIN_TOLERANCE)
    }

    /// Classifies a signed timing difference (input minus target).
    ///
    /// Returns `None` when the input is outside tolerance; the caller decides
    /// what a miss means (resolve nothing, count against the player).
    pub fn judge(&self, diff_seconds: f64, threat_level: f64, mode: Mode) -> Option<Judgement> {
        let abs_diff = diff_seconds.abs();
        if abs_diff > self.tolerance(threat_level, mode) {
            return None;
        }
        if abs_diff <= self.perfect {
            Some(Judgement::Perfect)
        } else {
            Some(Judgement::Ok)
        }
    }
}

impl Default for JudgementWindow {
    fn default() -> Self {
        Self::new()
    }
}
