//! Prediction service: input checks, inference and result shaping.
//!
//! The service owns nothing but the injected [`ModelHandle`], so one instance
//! is shared by every HTTP worker without locking.

use log::debug;

use crate::config::ServingMode;
use crate::error::WithErrorContext;
use crate::features::FeatureVector;
use crate::model::ModelHandle;
use crate::types::{MovieFeatures, RatingPair, RatingPrediction, RatingScale};
use crate::{Error, Result};

const MODEL_UNAVAILABLE: &str = "Model not available";

pub struct PredictionService {
    model: ModelHandle,
    mode: ServingMode,
}

impl PredictionService {
    pub fn new(model: ModelHandle, mode: ServingMode) -> Self {
        Self { model, mode }
    }

    pub fn mode(&self) -> ServingMode {
        self.mode
    }

    pub fn scale(&self) -> RatingScale {
        self.mode.scale()
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_loaded()
    }

    /// Rate a movie from its attributes.
    pub fn predict_features(&self, movie: &MovieFeatures) -> Result<RatingPrediction> {
        movie.validate()?;
        let model = match &self.model {
            ModelHandle::Features(model) => model,
            _ => return Err(Error::model_unavailable(MODEL_UNAVAILABLE)),
        };

        let context = format!(
            "Error during prediction for genre={:?} year={} budget={:?} runtime={:?}",
            movie.genre, movie.year, movie.budget, movie.runtime
        );
        let features = FeatureVector::encode(movie);
        debug!("Encoded features for {:?}: {:?}", movie.title, features.as_slice());

        let rating = model
            .predict(&features)
            .map_err(into_inference)
            .and_then(finite)
            .with_context(context.clone())?;

        let confidence = if model.supports_probabilities() {
            let probabilities = model
                .predict_proba(&features)
                .map_err(into_inference)
                .with_context(context.clone())?;
            let best = probabilities
                .into_iter()
                .filter(|p| p.is_finite())
                .reduce(f64::max)
                .ok_or_else(|| Error::inference("model returned an empty probability distribution"))
                .with_context(context)?;
            Some(best.clamp(0.0, 1.0))
        } else {
            None
        };

        Ok(RatingPrediction {
            rating: self.scale().clamp(rating),
            confidence,
        })
    }

    /// Rate a movie for a user; the estimate is rounded to two decimals.
    pub fn predict_pair(&self, user_id: &str, movie_id: &str) -> Result<f64> {
        if user_id.trim().is_empty() {
            return Err(Error::invalid_input("user_id cannot be empty"));
        }
        if movie_id.trim().is_empty() {
            return Err(Error::invalid_input("movie_id cannot be empty"));
        }
        let model = match &self.model {
            ModelHandle::Pairs(model) => model,
            _ => return Err(Error::model_unavailable(MODEL_UNAVAILABLE)),
        };

        let estimate = model
            .estimate(user_id, movie_id)
            .map_err(into_inference)
            .and_then(finite)
            .with_context(format!(
                "Error during prediction for user {} and movie {}",
                user_id, movie_id
            ))?;

        Ok(self.scale().clamp(round2(estimate)))
    }

    /// Rate every pair in order, stopping at the first failure.
    pub fn predict_batch(&self, pairs: &[RatingPair]) -> Result<Vec<f64>> {
        if pairs.is_empty() {
            return Err(Error::invalid_input("pairs list cannot be empty"));
        }
        pairs
            .iter()
            .enumerate()
            .map(|(position, pair)| {
                self.predict_pair(&pair.user_id, &pair.movie_id)
                    .with_context(format!("Error in batch prediction at position {}", position))
            })
            .collect()
    }
}

/// Model failures that are not already classified become inference errors.
fn into_inference(err: Error) -> Error {
    match err {
        Error::Inference(_) => err,
        other => Error::inference(other.to_string()),
    }
}

fn finite(value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::inference(format!("model returned a non-finite rating: {}", value)))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
