use std::path::PathBuf;

use blockfall_engine::GameConfig;
use blockfall_evaluator::SharedWeights;
use blockfall_training::{AiModel, GenerationReport, Trainer, TrainerConfig};
use chrono::Utc;
use rand::Rng as _;

use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Number of generations to evolve
    #[arg(long, default_value_t = 50)]
    episodes: usize,
    /// Individuals per generation
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u16).range(1..))]
    population: u16,
    /// Seed of the trainer's random source (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Play every fitness game with the same piece sequence
    #[arg(long)]
    game_seed: Option<u64>,
    /// Piece cap for each fitness game
    #[arg(long, default_value_t = 1000)]
    max_pieces: usize,
    /// Name stored in the model file
    #[arg(long, default_value = "self-play")]
    name: String,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        episodes,
        population,
        seed,
        game_seed,
        max_pieces,
        name,
        output,
    } = arg;

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let config = TrainerConfig {
        population_size: usize::from(*population),
        max_pieces: *max_pieces,
        fixed_game_seed: *game_seed,
        ..TrainerConfig::default()
    };
    eprintln!("Training {population} individuals for {episodes} generations (seed {seed})");

    let mut trainer = Trainer::new(SharedWeights::default(), config, GameConfig::default(), seed);
    let outcome = trainer.train_with_observer(*episodes, print_report);

    eprintln!("Best Individual:");
    eprintln!(
        "  {:.3?} => {:.3}",
        outcome.best_weights.to_array(),
        outcome.best_fitness
    );
    eprintln!("  Initial best fitness: {:.3}", outcome.initial_best_fitness);
    eprintln!("AI learning completed.");

    let model = AiModel::from_weights(
        name.clone(),
        Utc::now(),
        outcome.best_fitness,
        outcome.best_weights,
    );
    Output::save_json(&model, output.as_deref())?;

    eprintln!();
    eprintln!("Model saved successfully");
    if let Some(path) = &output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", model.name);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Final fitness: {:.3}", model.final_fitness);
    eprintln!("  Weights: {} features", model.placement_weights.len());

    Ok(())
}

fn print_report(report: &GenerationReport) {
    eprintln!(
        "Generation #{} (game seed {}):",
        report.generation, report.game_seed
    );

    eprintln!("  Individuals:");
    for (i, ind) in report.individuals.iter().enumerate() {
        eprintln!(
            "  {i:2}: {:.3?} => {:.3}",
            ind.weights().to_array(),
            ind.fitness()
        );
    }

    if let Some(weight_stats) = &report.weight_stats {
        #[expect(clippy::cast_precision_loss)]
        let weight_norm_std_dev_mean = weight_stats
            .iter()
            .map(|s| s.normalized_std_dev)
            .sum::<f32>()
            / weight_stats.len() as f32;

        eprintln!("  Weights Stats:");
        eprintln!(
            "    Min:        {:.3?}",
            weight_stats.iter().map(|s| s.min).collect::<Vec<_>>(),
        );
        eprintln!(
            "    Max:        {:.3?}",
            weight_stats.iter().map(|s| s.max).collect::<Vec<_>>(),
        );
        eprintln!(
            "    Mean:       {:.3?}",
            weight_stats.iter().map(|s| s.mean).collect::<Vec<_>>(),
        );
        eprintln!(
            "    NormStddev: {:.3?}",
            weight_stats
                .iter()
                .map(|s| s.normalized_std_dev)
                .collect::<Vec<_>>(),
        );
        eprintln!("    => Mean:    {weight_norm_std_dev_mean:.3}");
    }

    if let Some(fitness_stats) = &report.fitness_stats {
        eprintln!("  Fitness Stats:");
        eprintln!("    Min:  {:.3}", fitness_stats.min);
        eprintln!("    Max:  {:.3}", fitness_stats.max);
        eprintln!("    Mean: {:.3}", fitness_stats.mean);
    }
}
