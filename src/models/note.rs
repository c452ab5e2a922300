//! A scheduled note: one strike target on the beat grid.

/// A note in flight between spawn and its target beat.
///
/// The engine only tracks times and resolution; trajectory interpolation is a
/// presentation concern built from `(spawn_time, target_time)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub id: u64,
    /// Audio time the note was spawned at.
    pub spawn_time: f64,
    /// Beat grid time the note must be struck at.
    pub target_time: f64,
    /// Set exactly once, on hit or expiry.
    pub resolved: bool,
}

impl Note {
    pub fn new(id: u64, spawn_time: f64, target_time: f64) -> Self {
        Self {
            id,
            spawn_time,
            target_time,
            resolved: false,
        }
    }

    /// In-flight duration, for trajectory rendering.
    pub fn travel_seconds(&self) -> f64 {
        self.target_time - self.spawn_time
    }
}
