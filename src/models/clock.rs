//! Beat grid math over the audio-domain clock.
//!
//! All times are audio-domain seconds (the timeline of the audio device),
//! never wall-clock. The grid is the set of timestamps
//! `start + offset + k * seconds_per_beat` for integer `k >= 0`.

pub const MIN_BPM: f64 = 30.0;
pub const MAX_BPM: f64 = 240.0;

/// Tempo model: BPM plus a fixed grid offset from session start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockConfig {
    pub bpm: f64,
    pub offset_seconds: f64,
}

impl ClockConfig {
    /// Builds a config with the BPM clamped into [30, 240].
    ///
    /// Out-of-range values are clamped rather than rejected so a bad settings
    /// file can never produce a zero or negative beat interval.
    pub fn new(bpm: f64, offset_seconds: f64) -> Self {
        let clamped = bpm.clamp(MIN_BPM, MAX_BPM);
        if clamped != bpm {
            log::warn!("CLOCK: BPM {} out of range, clamped to {}", bpm, clamped);
        }
        Self {
            bpm: clamped,
            offset_seconds,
        }
    }

    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.bpm
    }
}

/// Converts audio timestamps to and from beat grid positions.
///
/// The clock itself is owned by the audio side; callers pass timestamps in.
/// `start` is callable once per session; a retry stops the clock so the next
/// session can start it again.
#[derive(Debug, Clone)]
pub struct BeatClock {
    config: ClockConfig,
    start_time: Option<f64>,
}

impl BeatClock {
    pub fn new(config: ClockConfig) -> Self {
        Self {
            config,
            start_time: None,
        }
    }

    pub fn config(&self) -> ClockConfig {
        self.config
    }

    /// Replaces the tempo model. The grid keeps its origin; only the beat
    /// interval and offset change.
    pub fn set_config(&mut self, config: ClockConfig) {
        self.config = config;
    }

    /// Marks the session start.
    ///
    /// Fails when the audio clock has not been primed yet (`now` is not a
    /// finite timestamp) or when the clock was already started this session.
    pub fn start(&mut self, now: f64) -> Result<(), String> {
        if !now.is_finite() {
            return Err("audio clock not primed".to_string());
        }
        if self.start_time.is_some() {
            return Err("clock already started this session".to_string());
        }
        self.start_time = Some(now);
        Ok(())
    }

    /// Clears the session start so a new session can call `start` again.
    pub fn stop(&mut self) {
        self.start_time = None;
    }

    pub fn is_started(&self) -> bool {
        self.start_time.is_some()
    }

    /// Grid origin: session start plus offset. Before `start` the origin is
    /// the offset alone, which keeps the math total (callers gate on phase).
    fn origin(&self) -> f64 {
        self.start_time.unwrap_or(0.0) + self.config.offset_seconds
    }

    /// Snaps `t` to the closest grid line.
    ///
    /// Ties at exactly half a beat round away from zero (`f64::round`); the
    /// rule matters at exact half-window boundaries and must stay consistent
    /// with the judgement tests.
    pub fn nearest_beat_time(&self, t: f64) -> f64 {
        let spb = self.config.seconds_per_beat();
        let k = ((t - self.origin()) / spb).round();
        self.origin() + k * spb
    }

    /// Smallest grid time strictly greater than `t`, never before the grid
    /// origin (k >= 0).
    pub fn beat_after(&self, t: f64) -> f64 {
        let spb = self.config.seconds_per_beat();
        let k = (((t - self.origin()) / spb).floor() + 1.0).max(0.0);
        let mut beat = self.origin() + k * spb;
        // Guard against float error putting us at or before t.
        if beat <= t {
            beat += spb;
        }
        beat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn clock_80() -> BeatClock {
        let mut clock = BeatClock::new(ClockConfig::new(80.0, 0.0));
        clock.start(0.0).unwrap();
        clock
    }

    #[test]
    fn bpm_is_clamped() {
        assert_eq!(ClockConfig::new(10.0, 0.0).bpm, 30.0);
        assert_eq!(ClockConfig::new(999.0, 0.0).bpm, 240.0);
        assert_eq!(ClockConfig::new(80.0, 0.0).bpm, 80.0);
    }

    #[test]
    fn grid_at_80_bpm() {
        let clock = clock_80();
        // secondsPerBeat = 0.75: beats at 0.0, 0.75, 1.5, 2.25, ...
        assert_eq!(clock.nearest_beat_time(1.1), 0.75);
        assert_eq!(clock.nearest_beat_time(1.5), 1.5);
        assert_eq!(clock.nearest_beat_time(0.0), 0.0);
    }

    #[test]
    fn beat_after_is_strictly_greater() {
        let clock = clock_80();
        assert_eq!(clock.beat_after(0.0), 0.75);
        assert_eq!(clock.beat_after(0.75), 1.5);
        assert_eq!(clock.beat_after(1.0), 1.5);
    }

    #[test]
    fn beat_after_never_precedes_origin() {
        let clock = clock_80();
        assert_eq!(clock.beat_after(-10.0), 0.0);
    }

    #[test]
    fn start_requires_primed_clock() {
        let mut clock = BeatClock::new(ClockConfig::new(80.0, 0.0));
        assert!(clock.start(f64::NAN).is_err());
        assert!(!clock.is_started());
        assert!(clock.start(1.25).is_ok());
    }

    #[test]
    fn start_is_once_per_session() {
        let mut clock = BeatClock::new(ClockConfig::new(80.0, 0.0));
        clock.start(0.0).unwrap();
        assert!(clock.start(1.0).is_err());
        clock.stop();
        assert!(clock.start(2.0).is_ok());
    }

    #[test]
    fn offset_shifts_the_grid() {
        let mut clock = BeatClock::new(ClockConfig::new(80.0, 0.1));
        clock.start(0.0).unwrap();
        assert!((clock.nearest_beat_time(0.86) - 0.85).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn nearest_beat_is_idempotent(t in -10.0f64..100.0, bpm in 30.0f64..240.0) {
            let mut clock = BeatClock::new(ClockConfig::new(bpm, 0.0));
            clock.start(0.0).unwrap();
            let snapped = clock.nearest_beat_time(t);
            prop_assert!((clock.nearest_beat_time(snapped) - snapped).abs() < 1e-9);
        }

        #[test]
        fn nearest_beat_is_within_half_a_beat(t in 0.0f64..100.0, bpm in 30.0f64..240.0) {
            let mut clock = BeatClock::new(ClockConfig::new(bpm, 0.0));
            clock.start(0.0).unwrap();
            let spb = clock.config().seconds_per_beat();
            prop_assert!((clock.nearest_beat_time(t) - t).abs() <= spb / 2.0 + 1e-9);
        }

        #[test]
        fn beat_after_is_on_grid_and_greater(t in -5.0f64..100.0, bpm in 30.0f64..240.0) {
            let mut clock = BeatClock::new(ClockConfig::new(bpm, 0.0));
            clock.start(0.0).unwrap();
            let beat = clock.beat_after(t);
            prop_assert!(beat > t);
            prop_assert!((clock.nearest_beat_time(beat) - beat).abs() < 1e-9);
        }
    }
}
