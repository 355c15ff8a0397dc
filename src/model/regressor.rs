//! Linear rating regressor with an optional softmax class head.

use serde::{Deserialize, Serialize};

use super::RatingRegressor;
use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::{Error, Result};

/// Per-class linear scores turned into probabilities by softmax
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassHead {
    /// One weight row per class, each [`FEATURE_COUNT`] wide
    pub coefficients: Vec<Vec<f64>>,
    /// One intercept per class
    pub intercepts: Vec<f64>,
}

impl ClassHead {
    fn validate(&self) -> Result<()> {
        if self.coefficients.is_empty() {
            return Err(Error::serialization("class head has no classes"));
        }
        if self.coefficients.len() != self.intercepts.len() {
            return Err(Error::serialization(format!(
                "class head has {} coefficient rows but {} intercepts",
                self.coefficients.len(),
                self.intercepts.len()
            )));
        }
        if let Some(row) = self.coefficients.iter().find(|row| row.len() != FEATURE_COUNT) {
            return Err(Error::serialization(format!(
                "class head row has {} weights, expected {}",
                row.len(),
                FEATURE_COUNT
            )));
        }
        Ok(())
    }

    fn probabilities(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        let scores = self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, intercept)| {
                features
                    .dot(row)
                    .map(|score| score + intercept)
                    .ok_or_else(|| Error::inference("class head width does not match features"))
            })
            .collect::<Result<Vec<f64>>>()?;

        // Shift by the max score so exp() cannot overflow
        let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
        let total: f64 = exps.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(Error::inference("class scores are not finite"));
        }
        Ok(exps.into_iter().map(|e| e / total).collect())
    }
}

/// `rating = weights · features + intercept`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRatingModel {
    pub weights: Vec<f64>,
    pub intercept: f64,
    pub class_head: Option<ClassHead>,
}

impl LinearRatingModel {
    pub fn new(weights: Vec<f64>, intercept: f64) -> Self {
        Self {
            weights,
            intercept,
            class_head: None,
        }
    }

    pub fn with_class_head(mut self, head: ClassHead) -> Self {
        self.class_head = Some(head);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.weights.len() != FEATURE_COUNT {
            return Err(Error::serialization(format!(
                "regressor has {} weights, expected {}",
                self.weights.len(),
                FEATURE_COUNT
            )));
        }
        if let Some(head) = &self.class_head {
            head.validate()?;
        }
        Ok(())
    }
}

impl RatingRegressor for LinearRatingModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        features
            .dot(&self.weights)
            .map(|score| score + self.intercept)
            .ok_or_else(|| {
                Error::inference(format!(
                    "expected {} weights, model has {}",
                    FEATURE_COUNT,
                    self.weights.len()
                ))
            })
    }

    fn supports_probabilities(&self) -> bool {
        self.class_head.is_some()
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        match &self.class_head {
            Some(head) => head.probabilities(features),
            None => Err(Error::inference("model does not expose class probabilities")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features() -> FeatureVector {
        FeatureVector::new([10.0, 2000.0, 1_000_000.0, 100.0])
    }

    #[test]
    fn test_linear_predict() {
        let model = LinearRatingModel::new(vec![0.0, 0.001, 0.000001, 0.01], 1.0);
        let rating = model.predict(&features()).unwrap();
        assert!((rating - 5.0).abs() < 1e-9);
        assert!(!model.supports_probabilities());
        assert!(model.predict_proba(&features()).is_err());
    }

    #[test]
    fn test_wrong_width_is_rejected() {
        let model = LinearRatingModel::new(vec![1.0, 2.0], 0.0);
        assert!(matches!(model.validate(), Err(Error::Serialization(_))));
        assert!(matches!(model.predict(&features()), Err(Error::Inference(_))));
    }

    #[test]
    fn test_class_head_softmax() {
        let head = ClassHead {
            coefficients: vec![vec![0.0; 4], vec![0.0; 4], vec![0.0; 4]],
            intercepts: vec![0.0, 0.0, (2.0f64).ln()],
        };
        let model = LinearRatingModel::new(vec![0.0; 4], 7.0).with_class_head(head);
        assert!(model.validate().is_ok());
        assert!(model.supports_probabilities());

        let probs = model.predict_proba(&features()).unwrap();
        assert_eq!(probs.len(), 3);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!((probs[2] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_softmax_survives_large_scores() {
        let head = ClassHead {
            coefficients: vec![vec![0.0, 0.0, 1.0, 0.0], vec![0.0; 4]],
            intercepts: vec![0.0, 0.0],
        };
        let model = LinearRatingModel::new(vec![0.0; 4], 0.0).with_class_head(head);
        let probs = model.predict_proba(&features()).unwrap();
        assert!((probs[0] - 1.0).abs() < 1e-9);
        assert!(probs.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_inconsistent_class_head() {
        let head = ClassHead {
            coefficients: vec![vec![0.0; 4]],
            intercepts: vec![0.0, 1.0],
        };
        let model = LinearRatingModel::new(vec![0.0; 4], 0.0).with_class_head(head);
        assert!(model.validate().is_err());
    }
}
