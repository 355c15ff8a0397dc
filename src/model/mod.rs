//! Rating models and the process-wide model handle.
//!
//! A deployment serves one request shape, so the handle holds either a
//! [`RatingRegressor`] (movie attributes) or a [`PairPredictor`]
//! (user/movie identifiers), or nothing when loading failed.

pub mod factorization;
pub mod loader;
pub mod regressor;

use std::path::Path;
use std::sync::Arc;

use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::ServingMode;
use crate::features::FeatureVector;
use crate::{Error, Result};

pub use factorization::SvdModel;
pub use regressor::{ClassHead, LinearRatingModel};

/// Regression-style model over a [`FeatureVector`]
pub trait RatingRegressor: Send + Sync {
    /// Single-example rating estimate
    fn predict(&self, features: &FeatureVector) -> Result<f64>;

    /// Whether [`RatingRegressor::predict_proba`] is backed by the model
    fn supports_probabilities(&self) -> bool {
        false
    }

    /// Class-probability distribution for one example
    fn predict_proba(&self, _features: &FeatureVector) -> Result<Vec<f64>> {
        Err(Error::inference("model does not expose class probabilities"))
    }
}

/// Collaborative-filtering model keyed by raw identifiers
pub trait PairPredictor: Send + Sync {
    /// Estimated rating of `item_id` by `user_id`
    fn estimate(&self, user_id: &str, item_id: &str) -> Result<f64>;
}

/// On-disk model document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelArtifact {
    Regressor(LinearRatingModel),
    Factorization(SvdModel),
}

impl ModelArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::Regressor(_) => "regressor",
            ModelArtifact::Factorization(_) => "factorization",
        }
    }

    /// Request shape this artifact can serve
    pub fn serving_mode(&self) -> ServingMode {
        match self {
            ModelArtifact::Regressor(_) => ServingMode::Features,
            ModelArtifact::Factorization(_) => ServingMode::Pairs,
        }
    }

    /// Structural checks run right after decoding
    pub fn validate(&self) -> Result<()> {
        match self {
            ModelArtifact::Regressor(model) => model.validate(),
            ModelArtifact::Factorization(model) => model.validate(),
        }
    }
}

/// Read-only handle shared by every request
#[derive(Clone)]
pub enum ModelHandle {
    Features(Arc<dyn RatingRegressor>),
    Pairs(Arc<dyn PairPredictor>),
    Unloaded,
}

impl ModelHandle {
    /// Load the artifact at `path` for a deployment in `mode`.
    ///
    /// Never fails: a missing, corrupt or mismatched artifact is logged and
    /// yields [`ModelHandle::Unloaded`] so the health endpoint keeps answering.
    pub fn load(path: &Path, mode: ServingMode) -> Self {
        let artifact = match loader::load(path) {
            Ok(artifact) => artifact,
            Err(Error::NotFound(msg)) => {
                warn!("{}", msg);
                return ModelHandle::Unloaded;
            }
            Err(e) => {
                error!("Failed to load model from {}: {}", path.display(), e);
                return ModelHandle::Unloaded;
            }
        };

        if artifact.serving_mode() != mode {
            error!(
                "Model at {} is a {} model, which cannot serve {} requests",
                path.display(),
                artifact.kind(),
                mode
            );
            return ModelHandle::Unloaded;
        }

        info!("Loaded {} model from {}", artifact.kind(), path.display());
        ModelHandle::from(artifact)
    }

    pub fn is_loaded(&self) -> bool {
        !matches!(self, ModelHandle::Unloaded)
    }
}

impl From<ModelArtifact> for ModelHandle {
    fn from(artifact: ModelArtifact) -> Self {
        match artifact {
            ModelArtifact::Regressor(model) => ModelHandle::Features(Arc::new(model)),
            ModelArtifact::Factorization(model) => ModelHandle::Pairs(Arc::new(model)),
        }
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelHandle::Features(_) => write!(f, "ModelHandle::Features"),
            ModelHandle::Pairs(_) => write!(f, "ModelHandle::Pairs"),
            ModelHandle::Unloaded => write!(f, "ModelHandle::Unloaded"),
        }
    }
}
