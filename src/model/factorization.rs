//! Biased matrix factorization (SVD-style) rating model.
//!
//! Parameters are produced by an external fitting job; this module only
//! holds them and computes estimates:
//!
//! ```text
//! est = μ + b_u + b_i + q_iᵀ p_u
//! ```
//!
//! Terms for an unknown user or item are dropped rather than treated as an
//! error, so a cold-start pair falls back towards the global mean.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::PairPredictor;
use crate::types::RatingScale;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvdModel {
    /// Mean of all training ratings
    pub global_mean: f64,
    /// Bounds estimates are clipped to
    pub rating_scale: RatingScale,
    /// Use baseline biases; when false only the factor product is used
    pub biased: bool,
    /// Raw user id -> row in the user tables
    pub user_index: HashMap<String, usize>,
    /// Raw item id -> row in the item tables
    pub item_index: HashMap<String, usize>,
    pub user_bias: Vec<f64>,
    pub item_bias: Vec<f64>,
    pub user_factors: Vec<Vec<f64>>,
    pub item_factors: Vec<Vec<f64>>,
}

impl SvdModel {
    /// Empty biased model; every estimate is `global_mean` until users and items are added.
    pub fn new(global_mean: f64, rating_scale: RatingScale) -> Self {
        Self {
            global_mean,
            rating_scale,
            biased: true,
            user_index: HashMap::new(),
            item_index: HashMap::new(),
            user_bias: Vec::new(),
            item_bias: Vec::new(),
            user_factors: Vec::new(),
            item_factors: Vec::new(),
        }
    }

    pub fn with_user(mut self, raw_id: impl Into<String>, bias: f64, factors: Vec<f64>) -> Self {
        self.user_index.insert(raw_id.into(), self.user_bias.len());
        self.user_bias.push(bias);
        self.user_factors.push(factors);
        self
    }

    pub fn with_item(mut self, raw_id: impl Into<String>, bias: f64, factors: Vec<f64>) -> Self {
        self.item_index.insert(raw_id.into(), self.item_bias.len());
        self.item_bias.push(bias);
        self.item_factors.push(factors);
        self
    }

    pub fn n_users(&self) -> usize {
        self.user_bias.len()
    }

    pub fn n_items(&self) -> usize {
        self.item_bias.len()
    }

    /// Checks that every table agrees on sizes and that indices are in range.
    pub fn validate(&self) -> Result<()> {
        if !self.global_mean.is_finite() {
            return Err(Error::serialization("global mean is not finite"));
        }
        if self.rating_scale.min > self.rating_scale.max {
            return Err(Error::serialization(format!(
                "rating scale is inverted: {} > {}",
                self.rating_scale.min, self.rating_scale.max
            )));
        }
        check_side("user", &self.user_index, &self.user_bias, &self.user_factors)?;
        check_side("item", &self.item_index, &self.item_bias, &self.item_factors)?;

        let user_dim = self.user_factors.first().map(Vec::len);
        let item_dim = self.item_factors.first().map(Vec::len);
        if let (Some(u), Some(i)) = (user_dim, item_dim) {
            if u != i {
                return Err(Error::serialization(format!(
                    "user factors have {} dimensions but item factors have {}",
                    u, i
                )));
            }
        }
        Ok(())
    }
}

fn check_side(
    side: &str,
    index: &HashMap<String, usize>,
    bias: &[f64],
    factors: &[Vec<f64>],
) -> Result<()> {
    if bias.len() != factors.len() {
        return Err(Error::serialization(format!(
            "{} biases ({}) and factor rows ({}) differ in length",
            side,
            bias.len(),
            factors.len()
        )));
    }
    if let Some((raw, inner)) = index.iter().find(|(_, inner)| **inner >= bias.len()) {
        return Err(Error::serialization(format!(
            "{} {} maps to row {} but only {} rows exist",
            side,
            raw,
            inner,
            bias.len()
        )));
    }
    if let Some(first) = factors.first() {
        if factors.iter().any(|row| row.len() != first.len()) {
            return Err(Error::serialization(format!(
                "{} factor rows have uneven lengths",
                side
            )));
        }
    }
    Ok(())
}

impl PairPredictor for SvdModel {
    fn estimate(&self, user_id: &str, item_id: &str) -> Result<f64> {
        let user = self.user_index.get(user_id).copied();
        let item = self.item_index.get(item_id).copied();

        let interaction = match (user, item) {
            (Some(u), Some(i)) => {
                let pu = self
                    .user_factors
                    .get(u)
                    .ok_or_else(|| Error::inference(format!("missing factors for user row {}", u)))?;
                let qi = self
                    .item_factors
                    .get(i)
                    .ok_or_else(|| Error::inference(format!("missing factors for item row {}", i)))?;
                if pu.len() != qi.len() {
                    return Err(Error::inference(format!(
                        "factor dimension mismatch: {} vs {}",
                        pu.len(),
                        qi.len()
                    )));
                }
                Some(pu.iter().zip(qi).map(|(a, b)| a * b).sum::<f64>())
            }
            _ => None,
        };

        let estimate = if self.biased {
            let mut est = self.global_mean;
            if let Some(u) = user {
                est += self.user_bias.get(u).copied().unwrap_or(0.0);
            }
            if let Some(i) = item {
                est += self.item_bias.get(i).copied().unwrap_or(0.0);
            }
            est + interaction.unwrap_or(0.0)
        } else {
            interaction.unwrap_or(self.global_mean)
        };

        Ok(self.rating_scale.clamp(estimate))
    }
}
