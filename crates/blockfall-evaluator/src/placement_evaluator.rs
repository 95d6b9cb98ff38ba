//! Placement evaluation: scoring one hypothetical placement.
//!
//! The score is a plain dot product of the [`BoardFeatures`] and a
//! [`FeatureWeights`] vector:
//!
//! ```text
//! score = w₁·aggregate_height + w₂·lines_cleared + w₃·holes + w₄·bumpiness
//! ```
//!
//! Features are not normalized; the sign and magnitude of each weight carry the
//! preference. The live weights are held in a [`SharedWeights`] slot owned by
//! whoever drives the search (a game, or the trainer), and are always read and
//! replaced as a whole vector.

use std::{
    fmt, iter,
    sync::{Arc, PoisonError, RwLock},
};

use serde::{Deserialize, Serialize};

use crate::placement_analysis::BoardFeatures;

/// Scores placements from their features (higher is better).
pub trait PlacementEvaluator: fmt::Debug + Send + Sync {
    fn evaluate_placement(&self, features: &BoardFeatures) -> f32;
}

/// Weight vector in [`BoardFeatures::to_array`] order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeights(pub [f32; BoardFeatures::LEN]);

impl Default for FeatureWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FeatureWeights {
    /// Hand-tuned starting point: penalize height, holes and bumpiness,
    /// reward cleared lines.
    pub const DEFAULT: Self = Self([-0.51, 0.76, -0.36, -0.18]);

    #[must_use]
    pub const fn to_array(self) -> [f32; BoardFeatures::LEN] {
        self.0
    }

    /// Dot product of the weights and `features`.
    #[must_use]
    pub fn evaluate(&self, features: &BoardFeatures) -> f32 {
        iter::zip(self.0, features.to_array())
            .map(|(w, f)| w * f)
            .sum()
    }
}

impl PlacementEvaluator for FeatureWeights {
    #[inline]
    fn evaluate_placement(&self, features: &BoardFeatures) -> f32 {
        self.evaluate(features)
    }
}

/// Shared slot holding the live evaluator weights.
///
/// Clones share the same slot. Readers take a [`SharedWeights::snapshot`] and
/// therefore always observe one complete vector, either before or after a
/// concurrent [`SharedWeights::replace`].
///
/// ```
/// use blockfall_evaluator::{FeatureWeights, SharedWeights};
///
/// let weights = SharedWeights::default();
/// let handle = weights.clone();
/// handle.replace(FeatureWeights([0.0, 1.0, 0.0, 0.0]));
/// assert_eq!(weights.snapshot(), FeatureWeights([0.0, 1.0, 0.0, 0.0]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedWeights(Arc<RwLock<FeatureWeights>>);

impl SharedWeights {
    #[must_use]
    pub fn new(weights: FeatureWeights) -> Self {
        Self(Arc::new(RwLock::new(weights)))
    }

    #[must_use]
    pub fn snapshot(&self) -> FeatureWeights {
        *self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Installs `weights` and returns the previous vector.
    pub fn replace(&self, weights: FeatureWeights) -> FeatureWeights {
        let mut slot = self.0.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, weights)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn test_dot_product() {
        let features = BoardFeatures {
            aggregate_height: 10,
            cleared_lines: 2,
            holes: 1,
            bumpiness: 4,
        };
        let score = FeatureWeights::DEFAULT.evaluate(&features);
        let expected = -0.51 * 10.0 + 0.76 * 2.0 - 0.36 - 0.18 * 4.0;
        assert!((score - expected).abs() < 1e-5, "{score} != {expected}");
    }

    #[test]
    fn test_concurrent_readers_see_whole_vectors() {
        let weights = SharedWeights::new(FeatureWeights([1.0; 4]));
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let weights = weights.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        let w = weights.snapshot().to_array();
                        assert!(w.iter().all(|x| (*x - w[0]).abs() < f32::EPSILON));
                    }
                })
            })
            .collect();
        for i in 0..1000 {
            #[expect(clippy::cast_precision_loss)]
            let v = i as f32;
            weights.replace(FeatureWeights([v; 4]));
        }
        for reader in readers {
            reader.join().unwrap();
        }
    }

    #[test]
    fn test_weights_serialize_as_array() {
        let json = serde_json::to_string(&FeatureWeights([0.5, 1.0, -1.0, 0.0])).unwrap();
        assert_eq!(json, "[0.5,1.0,-1.0,0.0]");
    }
}
