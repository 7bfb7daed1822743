//! Flappy Sim - headless runner
//!
//! Plays one autopilot session natively and prints the final snapshot.
//! On wasm32 the game is driven from JS through `flappy_sim::web::WebGame`.

#[cfg(not(target_arch = "wasm32"))]
use clap::{Parser, ValueEnum};
#[cfg(not(target_arch = "wasm32"))]
use flappy_sim::GameVariant;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum VariantArg {
    FlappyShot,
    SloppyBirds,
}

#[cfg(not(target_arch = "wasm32"))]
impl From<VariantArg> for GameVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::FlappyShot => GameVariant::FlappyShot,
            VariantArg::SloppyBirds => GameVariant::SloppyBirds,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "flappy-sim")]
#[command(about = "Play one autopilot session headless and print the final snapshot", long_about = None)]
struct Cli {
    /// Which game to play
    #[arg(value_enum, default_value = "flappy-shot")]
    variant: VariantArg,

    /// Seed for obstacle and power-up generation
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Stop after this many frames even if the session is still running
    #[arg(long, default_value_t = 60 * 60)]
    max_frames: u32,

    /// JSON object of tuning overrides applied on top of the variant
    #[arg(long, value_name = "PATH")]
    tuning: Option<PathBuf>,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use flappy_sim::consts::MAX_DELTA_MS;
    use flappy_sim::persistence::LocalScoreStore;
    use flappy_sim::sim::{GameEvent, GamePhase};
    use flappy_sim::{GameScreen, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let variant = GameVariant::from(cli.variant);

    log::info!("Flappy Sim (native) {} seed {}", variant.game_name(), cli.seed);

    let settings = Settings {
        variant,
        ..Settings::load()
    };
    let mut screen = GameScreen::new(cli.seed, settings, LocalScoreStore::load(), "local");
    if let Some(path) = &cli.tuning {
        let loaded = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|json| screen.with_overrides(&json).map_err(|e| e.to_string()));
        screen = match loaded {
            Ok(screen) => screen,
            Err(e) => {
                eprintln!("error: cannot use tuning file {}: {}", path.display(), e);
                std::process::exit(1);
            }
        };
    }
    screen.set_autopilot(true);
    screen.start();

    let mut frames = 0;
    while frames < cli.max_frames && screen.state().phase != GamePhase::GameOver {
        for event in screen.frame(MAX_DELTA_MS) {
            match event {
                GameEvent::Scored { .. } | GameEvent::CountdownTick { .. } => log::debug!("{:?}", event),
                _ => log::info!("frame {}: {:?}", frames, event),
            }
        }
        frames += 1;
    }
    screen.teardown();

    let snapshot = screen.snapshot();
    log::info!(
        "Finished after {} frames: score {}, best {}",
        frames,
        snapshot.score,
        snapshot.best_score
    );
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Could not serialize snapshot: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is WebGame, this is just to satisfy the compiler
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["flappy-sim"]).unwrap();
        assert_eq!(GameVariant::from(cli.variant), GameVariant::FlappyShot);
        assert_eq!(cli.seed, 42);
        assert_eq!(cli.max_frames, 3600);
        assert!(cli.tuning.is_none());
    }

    #[test]
    fn test_parses_variant_and_options() {
        let cli = Cli::try_parse_from([
            "flappy-sim",
            "sloppy-birds",
            "--seed",
            "7",
            "--max-frames",
            "120",
            "--tuning",
            "fast.json",
        ])
        .unwrap();
        assert_eq!(GameVariant::from(cli.variant), GameVariant::SloppyBirds);
        assert_eq!(cli.seed, 7);
        assert_eq!(cli.max_frames, 120);
        assert_eq!(cli.tuning, Some(PathBuf::from("fast.json")));
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(Cli::try_parse_from(["flappy-sim", "pong"]).is_err());
        assert!(Cli::try_parse_from(["flappy-sim", "--seed", "abc"]).is_err());
        assert!(Cli::try_parse_from(["flappy-sim", "--max-frames", "-1"]).is_err());
    }
}
