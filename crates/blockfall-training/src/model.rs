//! Pretrained model files.
//!
//! A model is a JSON document holding the trained weights by feature name:
//!
//! ```json
//! {
//!   "name": "self-play",
//!   "trained_at": "2025-01-01T00:00:00Z",
//!   "final_fitness": 412.0,
//!   "placement_weights": {
//!     "aggregate_height": -0.51,
//!     "bumpiness": -0.18,
//!     "holes": -0.36,
//!     "lines_cleared": 0.76
//!   }
//! }
//! ```

use std::{
    collections::BTreeMap,
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use blockfall_evaluator::{BoardFeatures, FeatureWeights};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Failure to obtain a weight vector from a model file.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadModelError {
    #[display("failed to open AI model file: {}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[display("failed to parse AI model file: {}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display("feature {_0} is missing from the model")]
    MissingFeature(#[error(not(source))] String),
    #[display("feature {_0} in model not found")]
    UnknownFeature(#[error(not(source))] String),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AiModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub final_fitness: f32,
    pub placement_weights: BTreeMap<String, f32>,
}

impl AiModel {
    #[must_use]
    pub fn from_weights(
        name: impl Into<String>,
        trained_at: DateTime<Utc>,
        final_fitness: f32,
        weights: FeatureWeights,
    ) -> Self {
        let placement_weights = BoardFeatures::NAMES
            .iter()
            .zip(weights.to_array())
            .map(|(name, weight)| ((*name).to_owned(), weight))
            .collect();
        Self {
            name: name.into(),
            trained_at,
            final_fitness,
            placement_weights,
        }
    }

    /// Reads a model from a JSON file.
    pub fn open<P>(path: P) -> Result<Self, LoadModelError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadModelError::Open {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| LoadModelError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Converts the named weights into a vector in feature order.
    ///
    /// Every feature must be present exactly once and no other names are
    /// accepted.
    pub fn to_feature_weights(&self) -> Result<FeatureWeights, LoadModelError> {
        if let Some(unknown) = self
            .placement_weights
            .keys()
            .find(|name| !BoardFeatures::NAMES.contains(&name.as_str()))
        {
            return Err(LoadModelError::UnknownFeature(unknown.clone()));
        }
        let mut weights = [0.0; BoardFeatures::LEN];
        for (slot, name) in weights.iter_mut().zip(BoardFeatures::NAMES) {
            *slot = *self
                .placement_weights
                .get(name)
                .ok_or_else(|| LoadModelError::MissingFeature(name.to_owned()))?;
        }
        Ok(FeatureWeights(weights))
    }
}

/// Source of pretrained weight vectors.
pub trait ModelLoader {
    fn load(&self, path: &Path) -> Result<FeatureWeights, LoadModelError>;
}

/// Loads [`AiModel`] JSON files.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonModelLoader;

impl ModelLoader for JsonModelLoader {
    fn load(&self, path: &Path) -> Result<FeatureWeights, LoadModelError> {
        AiModel::open(path)?.to_feature_weights()
    }
}
