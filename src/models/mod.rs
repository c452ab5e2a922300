//! Engine data models: beat grid, judgement window, threat, notes, settings.

pub mod clock;
pub mod gimmick;
pub mod note;
pub mod settings;
pub mod stats;
pub mod threat;
pub mod window;
