//! Application entry point and thread bootstrapper.

mod logic;
mod models;
mod shared;
mod state;
mod system;

use crate::models::settings::GameSettings;
use crate::shared::messages::{EngineCommand, EngineEvent};
use crate::shared::snapshot::GameplaySnapshot;
use crate::system::bus::SystemBus;
use std::path::Path;
use std::time::{Duration, Instant};

fn main() {
    unsafe {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    log::info!("MAIN: Booting mokugyo engine...");

    let settings_path = Path::new("settings.toml");
    let settings = GameSettings::load_or_default(settings_path);
    if !settings_path.exists() {
        if let Err(e) = settings.save(settings_path) {
            log::warn!("MAIN: {}", e);
        }
    }

    let bus = SystemBus::new();

    let logic_bus = bus.clone();
    let handle = logic::start_thread(logic_bus, settings.clone());

    run_demo_session(&bus, &settings);

    let _ = bus.command_tx.send(EngineCommand::Shutdown);
    let _ = handle.join();
}

/// Headless driver standing in for presentation: primes the audio clock,
/// plays a short scripted session and logs what the engine reports.
fn run_demo_session(bus: &SystemBus, settings: &GameSettings) {
    let origin = Instant::now();
    let now = |bus: &SystemBus| -> f64 {
        let t = origin.elapsed().as_secs_f64();
        bus.store_audio_clock(t);
        t
    };

    // Presentation pushes its settings form at the engine, like the settings
    // modal would.
    let _ = bus.command_tx.send(EngineCommand::SetMode(settings.mode));
    let _ = bus.command_tx.send(EngineCommand::SetBpm(settings.bpm));
    let _ = bus
        .command_tx
        .send(EngineCommand::SetOffset(settings.offset_seconds));

    let start_time = now(bus);
    let _ = bus.command_tx.send(EngineCommand::Start { now: start_time });

    // Strike the first 12 beats with a little timing error; skip beats 9 and
    // 11 so the threat climbs and the auto-miss path shows up in the log.
    let spb = 60.0 / settings.bpm;
    let jitter = [
        0.0, 0.012, -0.015, 0.030, -0.020, 0.008, 0.0, 0.025, -0.010, 0.018, 0.0, -0.030,
    ];
    let strike_times: Vec<f64> = (1..=12usize)
        .filter(|k| *k != 9 && *k != 11)
        .map(|k| start_time + settings.offset_seconds + k as f64 * spb + jitter[k - 1])
        .collect();
    let end_time = start_time + 14.0 * spb;

    let mut strikes = strike_times.into_iter().peekable();
    let mut last_snapshot: Option<GameplaySnapshot> = None;
    while now(bus) < end_time {
        let t = now(bus);
        if let Some(&next) = strikes.peek() {
            if t >= next {
                let _ = bus.command_tx.send(EngineCommand::Hit { now: next });
                strikes.next();
            }
        }
        for event in bus.event_rx.try_iter() {
            log_event(&event);
        }
        for snapshot in bus.snapshot_rx.try_iter() {
            last_snapshot = Some(snapshot);
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    for event in bus.event_rx.try_iter() {
        log_event(&event);
    }

    if let Some(snapshot) = last_snapshot {
        log_summary(&snapshot);
    }
    let _ = bus.command_tx.send(EngineCommand::Retry);
}

fn log_event(event: &EngineEvent) {
    match event {
        EngineEvent::Judgement(tier) => log::info!("DEMO: {}", tier),
        EngineEvent::ComboChanged(combo) => log::info!("DEMO: combo {}", combo),
        EngineEvent::MissChanged { misses, max } => log::info!("DEMO: miss {}/{}", misses, max),
        EngineEvent::GameOver => log::info!("DEMO: GAME OVER"),
        EngineEvent::GimmickTriggered(gimmick) => log::info!("DEMO: gimmick {:?}", gimmick),
        // Note traffic is too chatty for the demo log.
        EngineEvent::NoteSpawned { .. } | EngineEvent::NoteResolved { .. } => {}
    }
}

/// End-of-session HUD dump from the last snapshot.
fn log_summary(snapshot: &GameplaySnapshot) {
    log::info!(
        "DEMO: [{:?}] t={:.2}s combo={} miss={}/{} threat={:.2} hidden={} acc={:.1}% (P{}/O{}/M{}) last={:?}",
        snapshot.phase,
        snapshot.audio_time,
        snapshot.combo,
        snapshot.misses,
        snapshot.max_misses,
        snapshot.threat_level,
        snapshot.hidden,
        snapshot.accuracy,
        snapshot.hit_stats.perfect,
        snapshot.hit_stats.ok,
        snapshot.hit_stats.miss,
        snapshot.last_judgement,
    );
    log::info!(
        "DEMO: {} notes in flight, travel {:.2}s, judgement text at {:?}",
        snapshot.notes.len(),
        snapshot.travel_seconds,
        snapshot.judgement_position,
    );
}
