//! Genetic operators on [`FeatureWeights`] vectors.
//!
//! - **Initialization**: [`random`] draws every gene uniformly from a range
//! - **Crossover**: [`single_point_crossover`] swaps the tails of two parents
//!   after a cut point in `[1, 4)`
//! - **Mutation**: [`mutate`] adds a uniform perturbation to each gene with a
//!   fixed probability
//!
//! All randomness comes from the caller's RNG, so a seeded RNG reproduces the
//! same sequence of operations.

use blockfall_evaluator::{BoardFeatures, FeatureWeights};
use rand::Rng;
use rand_distr::Uniform;

/// Draws a weight vector with every gene uniform in `[-range, range]`.
pub fn random<R>(rng: &mut R, range: f32) -> FeatureWeights
where
    R: Rng + ?Sized,
{
    FeatureWeights(std::array::from_fn(|_| rng.random_range(-range..=range)))
}

/// Exchanges the genes at and after `cut` between two parents.
///
/// ```
/// use blockfall_evaluator::FeatureWeights;
/// use blockfall_training::weights::crossover_at;
///
/// let (a, b) = crossover_at(
///     FeatureWeights([1.0, 2.0, 3.0, 4.0]),
///     FeatureWeights([5.0, 6.0, 7.0, 8.0]),
///     1,
/// );
/// assert_eq!(a, FeatureWeights([1.0, 6.0, 7.0, 8.0]));
/// assert_eq!(b, FeatureWeights([5.0, 2.0, 3.0, 4.0]));
/// ```
#[must_use]
pub fn crossover_at(
    p1: FeatureWeights,
    p2: FeatureWeights,
    cut: usize,
) -> (FeatureWeights, FeatureWeights) {
    let (mut c1, mut c2) = (p1.to_array(), p2.to_array());
    let cut = cut.min(BoardFeatures::LEN);
    c1[cut..].copy_from_slice(&p2.0[cut..]);
    c2[cut..].copy_from_slice(&p1.0[cut..]);
    (FeatureWeights(c1), FeatureWeights(c2))
}

/// Single-point crossover with the cut drawn uniformly from `[1, 4)`.
pub fn single_point_crossover<R>(
    p1: FeatureWeights,
    p2: FeatureWeights,
    rng: &mut R,
) -> (FeatureWeights, FeatureWeights)
where
    R: Rng + ?Sized,
{
    let cut = rng.random_range(1..BoardFeatures::LEN);
    crossover_at(p1, p2, cut)
}

/// Adds a perturbation uniform in `[-range, range]` to each gene with
/// probability `rate`.
///
/// A non-positive or non-finite `range` leaves the weights unchanged.
pub fn mutate<R>(weights: &mut FeatureWeights, rate: f64, range: f32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    if range <= 0.0 {
        return;
    }
    let Ok(perturbation) = Uniform::new_inclusive(-range, range) else {
        return;
    };
    for w in &mut weights.0 {
        if rng.random_bool(rate.clamp(0.0, 1.0)) {
            *w += rng.sample(perturbation);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_random_stays_in_range() {
        let mut rng = Pcg32::seed_from_u64(0);
        for _ in 0..100 {
            let w = random(&mut rng, 1.0);
            assert!(w.0.iter().all(|x| (-1.0..=1.0).contains(x)), "{w:?}");
        }
    }

    #[test]
    fn test_crossover_keeps_genes_in_place() {
        let p1 = FeatureWeights([1.0, 2.0, 3.0, 4.0]);
        let p2 = FeatureWeights([-1.0, -2.0, -3.0, -4.0]);
        let mut rng = Pcg32::seed_from_u64(4);
        for _ in 0..50 {
            let (c1, c2) = single_point_crossover(p1, p2, &mut rng);
            // first gene always comes from the own parent, last from the other
            assert_eq!(c1.0[0], 1.0);
            assert_eq!(c1.0[3], -4.0);
            for i in 0..4 {
                assert_eq!(c1.0[i].abs(), p1.0[i]);
                assert_eq!(c1.0[i], -c2.0[i]);
            }
        }
    }

    #[test]
    fn test_mutation_rate_bounds() {
        let mut rng = Pcg32::seed_from_u64(1);
        let original = FeatureWeights([0.1, 0.2, 0.3, 0.4]);

        let mut unchanged = original;
        mutate(&mut unchanged, 0.0, 0.5, &mut rng);
        assert_eq!(unchanged, original);

        let mut all = original;
        mutate(&mut all, 1.0, 0.5, &mut rng);
        for (a, b) in all.0.iter().zip(original.0) {
            assert!((a - b).abs() <= 0.5 + f32::EPSILON);
        }
        assert_ne!(all, original);
    }

    #[test]
    fn test_zero_range_does_not_mutate() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut w = FeatureWeights::DEFAULT;
        mutate(&mut w, 1.0, 0.0, &mut rng);
        assert_eq!(w, FeatureWeights::DEFAULT);
    }
}
