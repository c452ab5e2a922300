//! The logic loop: drains commands, ticks the engine, broadcasts snapshots.

use crate::models::settings::GameSettings;
use crate::shared::messages::EngineCommand;
use crate::state::GameEngine;
use crate::system::bus::SystemBus;
use std::thread;
use std::time::{Duration, Instant};

/// Target ticks per second for the logic thread.
const TICK_RATE: u64 = 200;

pub struct LogicLoop {
    bus: SystemBus,
    engine: GameEngine,
}

impl LogicLoop {
    pub fn new(bus: SystemBus, settings: &GameSettings) -> Self {
        let engine = GameEngine::new(&bus, settings);
        Self { bus, engine }
    }

    /// Runs until a `Shutdown` command arrives.
    pub fn run(&mut self) {
        let target_dt = Duration::from_secs_f64(1.0 / TICK_RATE as f64);
        let mut next_tick = Instant::now();

        loop {
            // 1. Process commands from presentation
            while let Ok(command) = self.bus.command_rx.try_recv() {
                if !self.handle_command(command) {
                    log::info!("LOGIC: Shutdown received");
                    return;
                }
            }

            // 2. Advance the engine to the shared audio clock
            let now = self.bus.load_audio_clock();
            self.engine.update(now);

            // 3. Broadcast a snapshot; drop the frame if presentation lags
            let _ = self.bus.snapshot_tx.try_send(self.engine.get_snapshot());

            // 4. Fixed-rate sleep with catch-up
            next_tick += target_dt;
            let now = Instant::now();
            if now < next_tick {
                thread::sleep(next_tick - now);
            } else {
                next_tick = now + target_dt;
            }
        }
    }

    /// Returns false when the loop should exit.
    fn handle_command(&mut self, command: EngineCommand) -> bool {
        match command {
            EngineCommand::Start { now } => {
                if let Err(e) = self.engine.start(now) {
                    log::error!("LOGIC: Start failed: {}", e);
                }
            }
            EngineCommand::Hit { now } => self.engine.process_hit(now),
            EngineCommand::Retry => self.engine.retry(),
            EngineCommand::SetMode(mode) => self.engine.set_mode(mode),
            EngineCommand::SetBpm(bpm) => self.engine.set_bpm(bpm),
            EngineCommand::SetOffset(offset) => self.engine.set_offset(offset),
            EngineCommand::Shutdown => return false,
        }
        true
    }
}
