//! Types shared between the logic thread and presentation.

pub mod messages;
pub mod snapshot;
