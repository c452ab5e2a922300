//! Miss/combo bookkeeping and the derived threat level.
//!
//! The threat level is the normalized distance to failure, in [0, 1). It is
//! recomputed from the miss count on demand, never stored separately. The
//! "hidden" band is the stretch just before game over where the approach
//! visual goes behind the player; presentation reads it off the snapshot.

/// Miss count at which the approach visual becomes obscured.
pub const HIDE_STEP: u32 = 5;

/// Lifecycle of a play session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Playing,
    GameOver,
}

/// Miss and combo counters for the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreatState {
    pub misses: u32,
    pub combo: u32,
    pub max_misses: u32,
}

impl ThreatState {
    pub fn new(max_misses: u32) -> Self {
        Self {
            misses: 0,
            combo: 0,
            // A zero budget would make threat_level undefined.
            max_misses: max_misses.max(1),
        }
    }

    /// Zeroes the counters for a fresh session with the given miss budget.
    pub fn reset(&mut self, max_misses: u32) {
        self.misses = 0;
        self.combo = 0;
        self.max_misses = max_misses.max(1);
    }

    /// Normalized threat in [0, 1): clamp(misses, 0, max-1) / max(1, max-1).
    pub fn threat_level(&self) -> f64 {
        let capped = self.misses.min(self.max_misses - 1);
        capped as f64 / (self.max_misses - 1).max(1) as f64
    }

    /// True while the approach visual should be obscured: misses in
    /// [HIDE_STEP, max_misses). Pure function of the counters.
    pub fn is_hidden(&self) -> bool {
        self.misses >= HIDE_STEP && self.misses < self.max_misses
    }

    /// Records a hit; returns the new combo value.
    pub fn record_hit(&mut self) -> u32 {
        self.combo += 1;
        self.combo
    }

    /// Records a miss: combo resets, miss count goes up by one.
    ///
    /// Returns true exactly when this miss exhausts the budget (the
    /// misses == max_misses transition), i.e. the game-over trigger.
    pub fn record_miss(&mut self) -> bool {
        self.combo = 0;
        if self.misses < self.max_misses {
            self.misses += 1;
        }
        self.misses >= self.max_misses
    }
}
