//! Space Shooter headless driver
//!
//! Runs the simulation with the autopilot at a fixed 60 Hz and prints the
//! stats of every finished game as JSON lines.
//!
//! Usage: `space-shooter [settings.json] [frames]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use space_shooter::Settings;
    use space_shooter::consts::FRAME_MS;
    use space_shooter::sim::{GameEvent, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Space Shooter (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(&path).unwrap_or_else(|e| {
            log::error!("{e}; using default settings");
            Settings::default()
        }),
        None => Settings::default(),
    };
    let frames: u64 = match args.next().map(|s| s.parse()) {
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            log::error!("Invalid frame count: {e}; running 3600 frames");
            3600
        }
        None => 3600,
    };

    let seed = settings.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });
    let mut state = GameState::new(settings, seed);
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    let mut now = 0.0;
    let mut games = 0u32;
    state.start(now);
    for _ in 0..frames {
        now += FRAME_MS;
        tick(&mut state, &input, now);

        for event in state.drain_events() {
            if let GameEvent::GameOver(stats) = event {
                games += 1;
                match serde_json::to_string(&stats) {
                    Ok(line) => println!("{line}"),
                    Err(e) => log::error!("Failed to encode stats: {e}"),
                }
                state.restart(now);
            }
        }
    }

    if state.game_over.is_none() {
        let hud = state.hud();
        log::info!(
            "Stopped after {} frames: score {}, level {}, health {}",
            frames,
            hud.score,
            hud.attack_level,
            hud.health
        );
        match serde_json::to_string(&hud) {
            Ok(line) => println!("{line}"),
            Err(e) => log::error!("Failed to encode HUD: {e}"),
        }
    }
    log::info!("{} game(s) finished", games);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive the library directly
}
