//! Ridge Runner headless runner
//!
//! Plays a scripted run through a level at a fixed 60 Hz and logs what
//! happened. `RUST_LOG=debug` shows per-entity events.
//!
//! Usage: `ridge-runner [tuning.json] [level.json]`

use std::process::ExitCode;

use ridge_runner::Tuning;
use ridge_runner::consts::FRAME_DT;
use ridge_runner::sim::{
    EventSink, GameEvent, GameState, HitTarget, ItemKind, Level, ScreenState, TickInput, tick,
};

/// Frames to simulate before giving up
const MAX_FRAMES: u32 = 60 * 120;

/// Tallies events and forwards them to the log
#[derive(Default)]
struct LogSink {
    jumps: u32,
    hits_taken: u32,
    defeats: u32,
    pickups: u32,
}

impl EventSink for LogSink {
    fn emit(&mut self, event: GameEvent) {
        match &event {
            GameEvent::Jump => self.jumps += 1,
            GameEvent::Hit {
                target: HitTarget::Player,
                ..
            } => self.hits_taken += 1,
            GameEvent::Defeat { .. } => self.defeats += 1,
            GameEvent::ItemCollected { .. } => self.pickups += 1,
            _ => {}
        }
        log::debug!("{:?}", event);
    }
}

fn load_tuning(path: Option<&str>) -> Result<Tuning, String> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let json = std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
    let tuning = Tuning::from_json(&json).map_err(|e| format!("{path}: {e}"))?;
    log::info!("Loaded tuning from {path}");
    Ok(tuning)
}

fn load_level(path: Option<&str>) -> Result<Level, String> {
    let Some(path) = path else {
        return Ok(Level::demo());
    };
    let json = std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
    Level::from_json(&json).map_err(|e| format!("{path}: {e}"))
}

/// Run right, hop every second, throw a stone now and then, skip dialogue
fn scripted_input(frame: u32, screen: ScreenState) -> TickInput {
    match screen {
        ScreenState::Menu => TickInput {
            confirm: true,
            ..Default::default()
        },
        ScreenState::Dialogue => TickInput {
            interact: frame % 20 == 0,
            ..Default::default()
        },
        ScreenState::Inventory | ScreenState::Paused => TickInput {
            back: screen == ScreenState::Inventory,
            confirm: screen == ScreenState::Paused,
            ..Default::default()
        },
        ScreenState::Playing => TickInput {
            right: true,
            jump: frame % 60 < 4,
            throw: frame % 90 == 0,
            shoot: frame % 45 == 0,
            ..Default::default()
        },
        ScreenState::Victory | ScreenState::GameOver => TickInput::default(),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Ridge Runner (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let setup = load_tuning(args.first().map(String::as_str)).and_then(|tuning| {
        let level = load_level(args.get(1).map(String::as_str))?;
        GameState::new(level, tuning, 0x5eed).map_err(|e| e.to_string())
    });
    let mut state = match setup {
        Ok(state) => state,
        Err(e) => {
            log::error!("Failed to start: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut sink = LogSink::default();
    let mut frame = 0;
    while frame < MAX_FRAMES {
        let screen = state.screen.current();
        if matches!(screen, ScreenState::Victory | ScreenState::GameOver) {
            break;
        }
        let input = scripted_input(frame, screen);
        tick(&mut state, &input, FRAME_DT, &mut sink);
        frame += 1;
    }

    let snapshot = state.snapshot();
    log::info!(
        "Finished on {} after {} frames ({:.1}s simulated)",
        snapshot.screen.as_str(),
        frame,
        state.time_ticks as f32 * FRAME_DT
    );
    log::info!(
        "Body at ({:.0}, {:.0}) with {}/{} health",
        snapshot.body.rect.x,
        snapshot.body.rect.y,
        snapshot.body.health,
        snapshot.body.max_health
    );
    log::info!(
        "{} jumps, {} hits taken, {} enemies defeated, {} items collected",
        sink.jumps,
        sink.hits_taken,
        sink.defeats,
        sink.pickups
    );
    log::info!(
        "Carrying {} stones, {} herbs, {} relics",
        snapshot.inventory.count(ItemKind::Stone),
        snapshot.inventory.count(ItemKind::Herb),
        snapshot.inventory.count(ItemKind::Relic)
    );

    ExitCode::SUCCESS
}
