//! Logic thread: owns the engine and runs it at a fixed tick rate.

pub mod game_loop;

use crate::models::settings::GameSettings;
use crate::system::bus::SystemBus;
use game_loop::LogicLoop;
use std::thread;

/// Spawns the logic thread.
///
/// The thread drains engine commands, advances the engine against the shared
/// audio clock and broadcasts snapshots until `Shutdown` arrives.
pub fn start_thread(bus: SystemBus, settings: GameSettings) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("Logic Thread".to_string())
        .spawn(move || {
            log::info!("LOGIC: Thread started");
            LogicLoop::new(bus, &settings).run();
        })
        .expect("Failed to spawn Logic thread")
}
