use std::{path::PathBuf, time::Duration};

use blockfall_engine::{GameConfig, GameMachine, GameRuntime, PieceGenerator, PlayMode};
use blockfall_evaluator::{AutoPilot, MoveSearch, SharedWeights};

use crate::{
    settings::{ConsoleAudio, FileSettingsStore},
    util,
};

/// Time scale applied by `--fast`.
const FAST_TIME_SCALE: f64 = 0.02;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DemoArg {
    /// Path to the model file (JSON format); built-in weights when omitted
    #[arg(long)]
    model: Option<PathBuf>,
    /// Settings file holding the mute flag and high score
    #[arg(long, default_value = "blockfall-settings.json")]
    settings: PathBuf,
    /// Run all timers much faster than real time
    #[arg(long, default_value_t = false)]
    fast: bool,
    /// Seed of the piece sequence (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
}

pub(crate) fn run(arg: &DemoArg) -> anyhow::Result<()> {
    let DemoArg {
        model,
        settings,
        fast,
        seed,
    } = arg;

    let weights = SharedWeights::new(util::load_weights(model.as_deref())?);
    let settings = FileSettingsStore::open(settings.clone())?;

    let mut config = GameConfig::default();
    if *fast {
        config = config.with_time_scale(FAST_TIME_SCALE);
    }
    let generator = seed.map_or_else(PieceGenerator::new, PieceGenerator::with_seed);
    let machine = GameMachine::new(config, generator);

    let mut runtime = GameRuntime::new(machine, ConsoleAudio::default(), settings);
    let mut pilot = AutoPilot::new(MoveSearch::new(weights));

    runtime.start(PlayMode::Demo);
    eprintln!("Demo started (high score {})", runtime.state().high_score());

    let mut reported_level = runtime.state().level();
    while !runtime.state().is_game_over() {
        for event in pilot.plan(runtime.state()) {
            runtime.dispatch(event);
        }
        runtime.process_next(POLL_INTERVAL);

        let state = runtime.state();
        if state.level() != reported_level {
            reported_level = state.level();
            eprintln!(
                "  Level {reported_level}: {} lines, score {}",
                state.lines_cleared(),
                state.score()
            );
        }
    }

    let state = runtime.state();
    print!("{}", state.board());
    println!();
    println!("Game over");
    println!("Pieces:        {}", state.completed_pieces());
    println!("Lines cleared: {}", state.lines_cleared());
    println!("Score:         {}", state.score());
    println!("Level:         {}", state.level());
    println!("High score:    {} (not updated in demo mode)", state.high_score());

    Ok(())
}
