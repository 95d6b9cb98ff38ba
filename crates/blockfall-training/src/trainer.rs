//! Self-play training loop.

use std::path::Path;

use blockfall_engine::GameConfig;
use blockfall_evaluator::{FeatureWeights, MoveSearch, SharedWeights, play_session};
use blockfall_stats::descriptive::DescriptiveStats;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{
    genetic::{Individual, Population, PopulationEvolver},
    model::{JsonModelLoader, LoadModelError, ModelLoader},
};

/// Parameters of a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerConfig {
    pub population_size: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub mutation_range: f32,
    /// Initial genes are uniform in `[-initial_range, initial_range]`.
    pub initial_range: f32,
    /// Piece cap for each fitness game.
    pub max_pieces: usize,
    /// Plays every fitness game with this piece sequence when set; otherwise
    /// each generation draws a fresh seed.
    pub fixed_game_seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            crossover_rate: 0.7,
            mutation_rate: 0.1,
            mutation_range: 0.5,
            initial_range: 1.0,
            max_pieces: 1000,
            fixed_game_seed: None,
        }
    }
}

impl TrainerConfig {
    fn evolver(&self) -> PopulationEvolver {
        PopulationEvolver {
            crossover_rate: self.crossover_rate,
            mutation_rate: self.mutation_rate,
            mutation_range: self.mutation_range,
        }
    }
}

/// Progress of one evaluated generation.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub generation: usize,
    /// Seed of the piece sequence every individual played.
    pub game_seed: u64,
    /// Individuals ranked best first.
    pub individuals: Vec<Individual>,
    pub fitness_stats: Option<DescriptiveStats>,
    pub weight_stats: Option<Vec<DescriptiveStats>>,
}

impl GenerationReport {
    fn new(generation: usize, game_seed: u64, population: &Population) -> Self {
        Self {
            generation,
            game_seed,
            individuals: population.individuals().to_vec(),
            fitness_stats: population.compute_fitness_stats(),
            weight_stats: population.compute_weight_stats(),
        }
    }
}

/// Result of a training run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingOutcome {
    /// Weights installed into the live slot.
    pub best_weights: FeatureWeights,
    pub best_fitness: f32,
    /// Best fitness of the randomly initialized population.
    pub initial_best_fitness: f32,
}

/// Evolves the weights of a [`SharedWeights`] slot by self-play.
///
/// The trainer writes every candidate into the slot while it plays that
/// candidate's fitness game, so it must be the only writer for the duration of
/// a run.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameConfig;
/// use blockfall_evaluator::SharedWeights;
/// use blockfall_training::{Trainer, TrainerConfig};
///
/// let weights = SharedWeights::default();
/// let config = TrainerConfig {
///     population_size: 4,
///     max_pieces: 20,
///     ..TrainerConfig::default()
/// };
/// let mut trainer = Trainer::new(weights.clone(), config, GameConfig::default(), 0);
/// let outcome = trainer.train_with_self_play(1);
/// assert_eq!(weights.snapshot(), outcome.best_weights);
/// ```
#[derive(Debug)]
pub struct Trainer {
    search: MoveSearch,
    config: TrainerConfig,
    game_config: GameConfig,
    rng: Pcg32,
}

impl Trainer {
    /// Creates a trainer over the `weights` slot.
    ///
    /// # Panics
    ///
    /// Panics if the population size is zero.
    #[must_use]
    pub fn new(
        weights: SharedWeights,
        config: TrainerConfig,
        game_config: GameConfig,
        seed: u64,
    ) -> Self {
        assert!(config.population_size > 0, "population must not be empty");
        Self {
            search: MoveSearch::new(weights),
            config,
            game_config,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn weights(&self) -> &SharedWeights {
        self.search.weights()
    }

    #[must_use]
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn train_with_self_play(&mut self, episodes: usize) -> TrainingOutcome {
        self.train_with_observer(episodes, |_| {})
    }

    /// Runs `episodes` generations and installs the best weights found in a
    /// final evaluation of the last population.
    ///
    /// `observer` is called once per generation after its fitness is known.
    pub fn train_with_observer<F>(&mut self, episodes: usize, mut observer: F) -> TrainingOutcome
    where
        F: FnMut(&GenerationReport),
    {
        let evolver = self.config.evolver();
        let mut population = Population::random(
            self.config.population_size,
            &mut self.rng,
            self.config.initial_range,
        );
        let mut game_seed = self.evaluate(&mut population);
        let initial_best_fitness = population.best().map_or(0.0, Individual::fitness);

        for generation in 0..episodes {
            observer(&GenerationReport::new(generation, game_seed, &population));
            population = evolver.evolve(&population, &mut self.rng);
            game_seed = self.evaluate(&mut population);
        }

        let best = population
            .best()
            .copied()
            .unwrap_or_else(|| Individual::new(self.weights().snapshot()));
        self.weights().replace(best.weights());
        TrainingOutcome {
            best_weights: best.weights(),
            best_fitness: best.fitness(),
            initial_best_fitness,
        }
    }

    /// Replaces the live weights with a model file's.
    ///
    /// On failure the live weights are left untouched.
    pub fn load_pretrained_model(&self, path: &Path) -> Result<FeatureWeights, LoadModelError> {
        self.load_pretrained_model_with(&JsonModelLoader, path)
    }

    pub fn load_pretrained_model_with<L>(
        &self,
        loader: &L,
        path: &Path,
    ) -> Result<FeatureWeights, LoadModelError>
    where
        L: ModelLoader + ?Sized,
    {
        let weights = loader.load(path)?;
        self.weights().replace(weights);
        Ok(weights)
    }

    /// Plays one game per individual, all on the same piece sequence, and
    /// returns that sequence's seed.
    #[expect(clippy::cast_precision_loss)]
    fn evaluate(&mut self, population: &mut Population) -> u64 {
        let game_seed = self
            .config
            .fixed_game_seed
            .unwrap_or_else(|| self.rng.random());
        let search = &self.search;
        let game_config = &self.game_config;
        let max_pieces = self.config.max_pieces;
        population.evaluate_fitness(|weights| {
            search.weights().replace(weights);
            play_session(search, game_config, game_seed, max_pieces).lines_cleared as f32
        });
        game_seed
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use super::*;

    fn config(population_size: usize) -> TrainerConfig {
        TrainerConfig {
            population_size,
            max_pieces: 60,
            fixed_game_seed: Some(11),
            ..TrainerConfig::default()
        }
    }

    fn trainer(config: TrainerConfig, seed: u64) -> Trainer {
        Trainer::new(SharedWeights::default(), config, GameConfig::default(), seed)
    }

    #[test]
    fn test_frozen_population_does_not_regress() {
        let config = TrainerConfig {
            crossover_rate: 0.0,
            mutation_rate: 0.0,
            ..config(6)
        };
        let mut trainer = trainer(config, 1);
        let outcome = trainer.train_with_self_play(3);
        assert!(outcome.best_fitness >= outcome.initial_best_fitness);
        assert!((outcome.best_fitness - outcome.initial_best_fitness).abs() < f32::EPSILON);
    }

    #[test]
    fn test_best_weights_are_installed() {
        let mut trainer = trainer(config(4), 2);
        let outcome = trainer.train_with_self_play(2);
        assert_eq!(trainer.weights().snapshot(), outcome.best_weights);
    }

    #[test]
    fn test_same_seed_same_result() {
        let a = trainer(config(4), 5).train_with_self_play(2);
        let b = trainer(config(4), 5).train_with_self_play(2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_observer_sees_every_generation() {
        let mut trainer = trainer(config(5), 3);
        let mut reports = vec![];
        trainer.train_with_observer(3, |report| reports.push(report.clone()));
        assert_eq!(
            reports.iter().map(|r| r.generation).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        for report in &reports {
            assert_eq!(report.individuals.len(), 5);
            assert_eq!(report.game_seed, 11);
            assert!(
                report
                    .individuals
                    .is_sorted_by(|a, b| a.fitness() >= b.fitness())
            );
            let stats = report.fitness_stats.as_ref().unwrap();
            assert!((stats.max - report.individuals[0].fitness()).abs() < f32::EPSILON);
            assert_eq!(report.weight_stats.as_ref().unwrap().len(), 4);
        }
    }

    #[test]
    fn test_zero_episodes_still_selects_best() {
        let mut trainer = trainer(config(3), 4);
        let outcome = trainer.train_with_self_play(0);
        assert!((outcome.best_fitness - outcome.initial_best_fitness).abs() < f32::EPSILON);
        assert_eq!(trainer.weights().snapshot(), outcome.best_weights);
    }

    #[test]
    fn test_failed_load_keeps_weights() {
        let trainer = trainer(config(2), 0);
        let custom = FeatureWeights([0.0, 1.0, -1.0, 0.0]);
        trainer.weights().replace(custom);

        let missing = env::temp_dir().join(format!("blockfall-missing-{}.json", process::id()));
        assert!(trainer.load_pretrained_model(&missing).is_err());
        assert_eq!(trainer.weights().snapshot(), custom);

        let bad = env::temp_dir().join(format!("blockfall-bad-{}.json", process::id()));
        fs::write(&bad, r#"{"name": "x"}"#).unwrap();
        let result = trainer.load_pretrained_model(&bad);
        fs::remove_file(&bad).unwrap();
        assert!(matches!(result, Err(LoadModelError::Parse { .. })));
        assert_eq!(trainer.weights().snapshot(), custom);
    }

    #[test]
    fn test_load_replaces_weights() {
        #[derive(Debug)]
        struct Fixed;
        impl ModelLoader for Fixed {
            fn load(&self, _path: &Path) -> Result<FeatureWeights, LoadModelError> {
                Ok(FeatureWeights([1.0, 2.0, 3.0, 4.0]))
            }
        }

        let trainer = trainer(config(2), 0);
        let loaded = trainer
            .load_pretrained_model_with(&Fixed, Path::new("any"))
            .unwrap();
        assert_eq!(trainer.weights().snapshot(), loaded);
    }

    #[test]
    fn test_evolution_does_not_regress_on_average() {
        let (mut initial, mut evolved) = (0.0, 0.0);
        for seed in 0..5 {
            let config = TrainerConfig {
                population_size: 8,
                max_pieces: 150,
                fixed_game_seed: Some(seed),
                ..TrainerConfig::default()
            };
            let outcome = trainer(config, seed).train_with_self_play(3);
            initial += outcome.initial_best_fitness;
            evolved += outcome.best_fitness;
        }
        assert!(evolved >= initial, "evolved {evolved} < initial {initial}");
    }
}
