use std::time::Duration;

use anyhow::{Context, Result};
use glam::Vec3;
use log::info;
use winit::{event::MouseButton, keyboard::KeyCode};

use blade_chain::engine::input::InputSource;
use blade_chain::game::arena::Arena;
use blade_chain::game::combat::CombatEvent;

/// One wall-clock frame per fixed step
const FRAME_TIME: Duration = Duration::from_micros(16_667);

/// Length of the scripted session in seconds
const SESSION_LENGTH: f32 = 4.5;

/// Scripted input: (time, source, pressed)
fn input_timeline() -> Vec<(f32, InputSource, bool)> {
    let combo = InputSource::mouse(MouseButton::Left);
    let charge = InputSource::key(KeyCode::KeyK);

    vec![
        // Three-hit combo string
        (0.00, combo, true),
        (0.05, combo, false),
        (0.30, combo, true),
        (0.35, combo, false),
        (0.85, combo, true),
        (0.90, combo, false),
        // Pressed after the last combo window, replayed when the montage ends
        (1.40, combo, true),
        (1.45, combo, false),
        // Charge, hold through a few loops, release
        (2.40, charge, true),
        (3.50, charge, false),
    ]
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Blade Chain training ground...");

    let mut arena = Arena::new(1);
    arena.spawn_floor(20.0, 20.0);
    let player = arena
        .spawn_player(0, "Hero", Vec3::new(0.0, 0.9, 0.0))
        .context("spawning the player")?;
    arena
        .spawn_dummy("Dummy A", Vec3::new(0.0, 0.9, 1.0))
        .context("spawning dummy A")?;
    arena
        .spawn_dummy("Dummy B", Vec3::new(2.5, 0.9, 3.0))
        .context("spawning dummy B")?;
    arena.spawn_prop(Vec3::new(-0.9, 0.4, 0.9), 0.4);

    let mut timeline = input_timeline().into_iter().peekable();
    let mut hits = 0;
    let mut deaths = 0;

    while arena.world_time() < SESSION_LENGTH {
        let now = arena.world_time();
        while let Some((_, source, pressed)) = timeline.next_if(|(time, _, _)| *time <= now) {
            arena.input.process_input(source, pressed, false);
        }

        arena.run_frame(FRAME_TIME);

        for (id, event) in arena.drain_events() {
            let name = arena
                .characters
                .get(id)
                .map(|c| c.name.as_str())
                .unwrap_or("?");
            match event {
                CombatEvent::DealtDamage { damage, location } => {
                    hits += 1;
                    info!("[{:.2}] {} hit for {} at {:.2?}", now, name, damage, location);
                }
                CombatEvent::ReceivedDamage {
                    damage, direction, ..
                } => {
                    info!("[{:.2}] {} took {} (pushed {:.2?})", now, name, damage, direction);
                }
                CombatEvent::Died => {
                    deaths += 1;
                    info!("[{:.2}] {} went down", now, name);
                }
                CombatEvent::Respawned => info!("[{:.2}] {} is back", now, name),
            }
        }
    }

    arena.log_status();
    let combo_count = arena
        .characters
        .get(player)
        .map(|c| c.attack.combo_count())
        .unwrap_or_default();
    info!(
        "Session over after {} steps: {} hits landed, {} knockouts, last combo count {}",
        arena.game_loop.update_count(),
        hits,
        deaths,
        combo_count
    );

    Ok(())
}
