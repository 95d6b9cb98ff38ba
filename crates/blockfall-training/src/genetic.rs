//! Genetic algorithm over [`FeatureWeights`] vectors.
//!
//! # Algorithm Overview
//!
//! 1. **Evaluate Fitness** - every individual plays one game; fitness is the
//!    number of lines it cleared
//! 2. **Rank** - individuals are sorted by descending fitness (stable, so
//!    equal fitness keeps the previous order)
//! 3. **Pair** - parents are taken from the ranked list two at a time,
//!    wrapping around to the best individual when the size is odd
//! 4. **Crossover** - with probability `crossover_rate` per pair, a
//!    single-point crossover; otherwise both parents pass through unchanged
//! 5. **Mutation** - each gene of each child is perturbed with probability
//!    `mutation_rate`
//!
//! There is no elitism: the whole population is replaced every generation.
//!
//! # Example
//!
//! ```
//! use blockfall_training::genetic::{Population, PopulationEvolver};
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//!
//! let mut rng = Pcg32::seed_from_u64(0);
//! let mut population = Population::random(6, &mut rng, 1.0);
//! population.evaluate_fitness(|weights| weights.0[1]);
//!
//! let next = PopulationEvolver::default().evolve(&population, &mut rng);
//! assert_eq!(next.individuals().len(), 6);
//! ```

use blockfall_evaluator::{BoardFeatures, FeatureWeights};
use blockfall_stats::descriptive::DescriptiveStats;
use rand::Rng;

use crate::weights;

/// A weight vector and the fitness it reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Individual {
    weights: FeatureWeights,
    fitness: f32,
}

impl Individual {
    /// Creates an individual that has not been evaluated yet.
    #[must_use]
    pub fn new(weights: FeatureWeights) -> Self {
        Self {
            weights,
            fitness: f32::MIN,
        }
    }

    #[must_use]
    pub fn weights(&self) -> FeatureWeights {
        self.weights
    }

    /// Lines cleared in the last evaluation, or `f32::MIN` before any.
    #[must_use]
    pub fn fitness(&self) -> f32 {
        self.fitness
    }
}

/// One generation of individuals.
#[derive(Debug, Clone, Default)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Creates `count` individuals with genes uniform in `[-range, range]`.
    #[must_use]
    pub fn random<R>(count: usize, rng: &mut R, range: f32) -> Self
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..count)
            .map(|_| Individual::new(weights::random(rng, range)))
            .collect();
        Self { individuals }
    }

    #[must_use]
    pub fn from_weights<I>(weights: I) -> Self
    where
        I: IntoIterator<Item = FeatureWeights>,
    {
        Self {
            individuals: weights.into_iter().map(Individual::new).collect(),
        }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Scores every individual in order, then ranks them best first.
    ///
    /// Evaluation is sequential: the fitness function may install the weights
    /// into a shared slot before playing.
    pub fn evaluate_fitness<F>(&mut self, mut fitness_fn: F)
    where
        F: FnMut(FeatureWeights) -> f32,
    {
        for ind in &mut self.individuals {
            ind.fitness = fitness_fn(ind.weights);
        }
        // stable: ties keep their previous order
        self.individuals
            .sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
    }

    /// Best individual of a ranked population.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    /// Statistics of each gene across the population, in feature order.
    ///
    /// Returns `None` for an empty population.
    #[must_use]
    pub fn compute_weight_stats(&self) -> Option<Vec<DescriptiveStats>> {
        (0..BoardFeatures::LEN)
            .map(|i| DescriptiveStats::new(self.individuals.iter().map(|ind| ind.weights.0[i])))
            .collect()
    }

    /// Statistics of the fitness values, or `None` for an empty population.
    #[must_use]
    pub fn compute_fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.individuals.iter().map(|ind| ind.fitness))
    }
}

/// Reproduction parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationEvolver {
    /// Probability that a parent pair is crossed over.
    pub crossover_rate: f64,
    /// Per-gene mutation probability.
    pub mutation_rate: f64,
    /// Mutations are uniform in `[-mutation_range, mutation_range]`.
    pub mutation_range: f32,
}

impl Default for PopulationEvolver {
    fn default() -> Self {
        Self {
            crossover_rate: 0.7,
            mutation_rate: 0.1,
            mutation_range: 0.5,
        }
    }
}

impl PopulationEvolver {
    /// Creates the next generation, the same size as `population`.
    ///
    /// # Panics
    ///
    /// Panics if `population` is not ranked by descending fitness.
    #[must_use]
    pub fn evolve<R>(&self, population: &Population, rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        let ranked = &population.individuals;
        assert!(
            ranked.is_sorted_by(|a, b| a.fitness >= b.fitness),
            "population must be ranked before evolving"
        );

        let n = ranked.len();
        let mut children = Vec::with_capacity(n);
        let mut i = 0;
        while children.len() < n {
            let p1 = ranked[i % n].weights;
            let p2 = ranked[(i + 1) % n].weights;
            i += 2;

            let (mut c1, mut c2) = if rng.random_bool(self.crossover_rate.clamp(0.0, 1.0)) {
                weights::single_point_crossover(p1, p2, rng)
            } else {
                (p1, p2)
            };
            weights::mutate(&mut c1, self.mutation_rate, self.mutation_range, rng);
            weights::mutate(&mut c2, self.mutation_rate, self.mutation_range, rng);

            children.push(Individual::new(c1));
            if children.len() < n {
                children.push(Individual::new(c2));
            }
        }

        Population {
            individuals: children,
        }
    }
}
