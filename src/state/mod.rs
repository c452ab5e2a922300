//! Engine state: the live gameplay session.

pub mod game;

pub use game::{GameEngine, Session};
