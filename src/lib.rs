//! Movie rating server
//!
//! Serves a pre-trained rating model over HTTP. A deployment loads one
//! model artifact at startup and answers either feature-based requests
//! (genre, year, budget, runtime -> 0-10 rating) or collaborative-filtering
//! requests (user id, movie id -> 1-5 rating).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use movie_rating::{config::ServingMode, model::ModelHandle, service::PredictionService};
//!
//! let handle = ModelHandle::load("models/svd_model.bin".as_ref(), ServingMode::Pairs);
//! let service = PredictionService::new(handle, ServingMode::Pairs);
//! let rating = service.predict_pair("196", "242");
//! ```

// Core modules
pub mod error;
pub mod config;
pub mod cli;
pub mod types;

// Model serving
pub mod serialization;
pub mod features;
pub mod model;
pub mod service;

// API module (optional)
#[cfg(feature = "http-server")]
pub mod api;

// Re-export commonly used types
pub use error::{Error, Result};
pub use config::{Config, ServingMode};
pub use model::{ModelArtifact, ModelHandle};
pub use service::PredictionService;
pub use types::{MovieFeatures, RatingPair, RatingPrediction, RatingScale};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging; `RUST_LOG` overrides the default level.
pub fn init_logging(debug: bool) -> Result<()> {
    let level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init()
        .map_err(|e| Error::config(format!("Failed to initialize logger: {}", e)))?;
    log::debug!("{} {} logging initialized", NAME, VERSION);
    Ok(())
}
