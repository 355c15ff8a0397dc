//! Request and prediction value types shared by the service and the HTTP layer.

use serde::{Deserialize, Serialize};

/// Earliest accepted release year (first known motion picture).
pub const YEAR_MIN: i64 = 1888;
/// Latest accepted release year.
pub const YEAR_MAX: i64 = 2100;

/// Movie attributes consumed by a feature-vector regressor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieFeatures {
    /// Movie title, echoed back and never fed to the model
    pub title: String,
    /// Free-text genre
    pub genre: String,
    /// Release year
    pub year: i64,
    /// Budget in USD
    pub budget: Option<f64>,
    /// Runtime in minutes
    pub runtime: Option<i64>,
}

impl MovieFeatures {
    /// Check the range constraints on numeric fields.
    pub fn validate(&self) -> crate::Result<()> {
        if !(YEAR_MIN..=YEAR_MAX).contains(&self.year) {
            return Err(crate::Error::invalid_input(format!(
                "year must be between {} and {}, got {}",
                YEAR_MIN, YEAR_MAX, self.year
            )));
        }
        if let Some(budget) = self.budget {
            if !budget.is_finite() || budget < 0.0 {
                return Err(crate::Error::invalid_input(format!(
                    "budget must be a non-negative number, got {}",
                    budget
                )));
            }
        }
        if let Some(runtime) = self.runtime {
            if runtime < 1 {
                return Err(crate::Error::invalid_input(format!(
                    "runtime must be at least 1 minute, got {}",
                    runtime
                )));
            }
        }
        Ok(())
    }
}

/// (user, movie) key consumed by a collaborative-filtering model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingPair {
    pub user_id: String,
    pub movie_id: String,
}

impl RatingPair {
    pub fn new(user_id: impl Into<String>, movie_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            movie_id: movie_id.into(),
        }
    }
}

/// Rating produced for a feature request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingPrediction {
    /// Rating, already clamped into the deployment scale
    pub rating: f64,
    /// Maximum class probability, when the model exposes one
    pub confidence: Option<f64>,
}

/// Inclusive rating bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingScale {
    pub min: f64,
    pub max: f64,
}

impl RatingScale {
    /// Scale used by feature-vector regressors
    pub const TEN_POINT: RatingScale = RatingScale { min: 0.0, max: 10.0 };
    /// Scale used by the MovieLens-style factorization model
    pub const FIVE_STAR: RatingScale = RatingScale { min: 1.0, max: 5.0 };

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}
