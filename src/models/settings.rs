//! Game settings: difficulty mode, judgement strategy, tempo model.
//!
//! Persisted as TOML next to the executable; a missing or broken file falls
//! back to defaults so the engine always has a valid configuration.

use crate::models::clock::{MAX_BPM, MIN_BPM};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BPM: f64 = 80.0;
pub const DEFAULT_TRAVEL_SECONDS: f64 = 1.8;

/// Difficulty mode. Drives both the tolerance scale and the miss budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Mode {
    /// Multiplier applied to the judgement tolerance.
    pub fn window_scale(&self) -> f64 {
        match self {
            Mode::Easy => 1.4,
            Mode::Normal => 1.0,
            Mode::Hard => 0.6,
        }
    }

    /// Misses allowed before game over.
    pub fn max_misses(&self) -> u32 {
        match self {
            Mode::Easy => 16,
            Mode::Normal => 6,
            Mode::Hard => 1,
        }
    }
}

/// Where presentation shows the judgement text. Passthrough only: the engine
/// stores and forwards it, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JudgementPosition {
    Top,
    #[default]
    Bottom,
}

/// Judgement strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JudgeMode {
    /// Judge against the nearest unresolved note (default).
    #[default]
    PerNote,
    /// Judge against the nearest beat grid line only. Simplification: without
    /// discrete notes to expire, a silent player accrues no misses.
    NearestBeat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub bpm: f64,
    pub offset_seconds: f64,
    pub mode: Mode,
    pub judgement_position: JudgementPosition,
    pub judge_mode: JudgeMode,
    /// Seconds a note is in flight before its target beat.
    pub travel_seconds: f64,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            offset_seconds: 0.0,
            mode: Mode::Normal,
            judgement_position: JudgementPosition::Bottom,
            judge_mode: JudgeMode::PerNote,
            travel_seconds: DEFAULT_TRAVEL_SECONDS,
        }
    }
}

impl GameSettings {
    /// Loads settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read settings {:?}: {}", path, e))?;
        let settings: GameSettings = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse settings {:?}: {}", path, e))?;
        settings.validated()
    }

    /// Loads settings, falling back to defaults when the file is missing or
    /// invalid (logged, never fatal).
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("SETTINGS: {} - using defaults", e);
                Self::default()
            }
        }
    }

    /// Saves settings as pretty TOML.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content = toml::to_string_pretty(self).map_err(|e| e.to_string())?;
        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write settings {:?}: {}", path, e))
    }

    /// Rejects non-finite numbers and clamps the rest into their ranges.
    ///
    /// BPM outside [30, 240] and a non-positive travel time are recoverable
    /// (clamped with a warning); NaN/infinity means the file is garbage.
    pub fn validated(mut self) -> Result<Self, String> {
        if !self.bpm.is_finite() || !self.offset_seconds.is_finite() || !self.travel_seconds.is_finite() {
            return Err("settings contain non-finite numbers".to_string());
        }
        let clamped = self.bpm.clamp(MIN_BPM, MAX_BPM);
        if clamped != self.bpm {
            log::warn!("SETTINGS: BPM {} out of range, clamped to {}", self.bpm, clamped);
            self.bpm = clamped;
        }
        if self.travel_seconds <= 0.0 {
            log::warn!(
                "SETTINGS: travel_seconds {} invalid, using {}",
                self.travel_seconds,
                DEFAULT_TRAVEL_SECONDS
            );
            self.travel_seconds = DEFAULT_TRAVEL_SECONDS;
        }
        Ok(self)
    }
}
