use std::path::PathBuf;

use blockfall_engine::GameConfig;
use blockfall_evaluator::{MoveSearch, SharedWeights, play_session};
use rand::Rng as _;

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Path to the model file (JSON format); built-in weights when omitted
    #[arg(long)]
    model: Option<PathBuf>,
    /// Seed of the piece sequence (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many pieces
    #[arg(long, default_value_t = 10_000)]
    max_pieces: usize,
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let AutoPlayArg {
        model,
        seed,
        max_pieces,
    } = arg;

    let weights = util::load_weights(model.as_deref())?;
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    eprintln!("Playing with weights {:.3?} (seed {seed})", weights.to_array());

    let search = MoveSearch::new(SharedWeights::new(weights));
    let stats = play_session(&search, &GameConfig::default(), seed, *max_pieces);

    print!("{}", stats.final_board);
    println!();
    println!("Pieces:        {}", stats.pieces);
    println!("Lines cleared: {}", stats.lines_cleared);
    println!("Score:         {}", stats.score);
    println!("Level:         {}", stats.level);
    let [singles, doubles, triples, tetrises] = stats.line_clear_counts;
    println!("Clears:        {singles} single / {doubles} double / {triples} triple / {tetrises} tetris");

    Ok(())
}
