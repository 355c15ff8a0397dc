use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::RatingScale;

/// Main configuration for the rating server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application metadata
    pub app: AppConfig,

    /// Model artifact configuration
    pub model: ModelConfig,

    /// HTTP server configuration
    pub server: ServerConfig,
}

/// Application metadata reported by the health endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application name
    pub name: String,

    /// Version string reported by `/health`
    pub version: String,

    /// Enable debug logging
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "Movie Rating API".to_string(),
            version: crate::VERSION.to_string(),
            debug: false,
        }
    }
}

/// Which request shape a deployment serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ServingMode {
    /// Movie attributes -> rating on a 0-10 scale
    Features,
    /// (user_id, movie_id) -> rating on a 1-5 scale
    Pairs,
}

impl ServingMode {
    /// Scale every returned rating is clamped into
    pub fn scale(&self) -> RatingScale {
        match self {
            ServingMode::Features => RatingScale::TEN_POINT,
            ServingMode::Pairs => RatingScale::FIVE_STAR,
        }
    }
}

impl std::fmt::Display for ServingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServingMode::Features => write!(f, "features"),
            ServingMode::Pairs => write!(f, "pairs"),
        }
    }
}

/// Model artifact configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the serialized model
    pub path: PathBuf,

    /// Request shape served by this process
    pub mode: ServingMode,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("models/movie_rating_model.bin"),
            mode: ServingMode::Features,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Number of worker threads
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            workers: num_cpus::get(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| crate::Error::config(format!("cannot parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn to_file(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the server cannot start with
    pub fn validate(&self) -> crate::Result<()> {
        if self.server.port == 0 {
            return Err(crate::Error::config("server.port must be non-zero"));
        }
        if self.server.workers == 0 {
            return Err(crate::Error::config("server.workers must be at least 1"));
        }
        if self.model.path.as_os_str().is_empty() {
            return Err(crate::Error::config("model.path must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.app.name, "Movie Rating API");
        assert_eq!(config.app.version, crate::VERSION);
        assert!(!config.app.debug);
        assert_eq!(config.model.mode, ServingMode::Features);
        assert_eq!(config.server.port, 8000);
        assert!(config.server.workers >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_roundtrip_and_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.model.mode = ServingMode::Pairs;
        config.model.path = PathBuf::from("models/svd_model.bin");
        config.to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.model.mode, ServingMode::Pairs);
        assert_eq!(loaded.model.path, PathBuf::from("models/svd_model.bin"));

        // Missing sections fall back to defaults
        std::fs::write(&path, r#"{"server": {"port": 9100}}"#).unwrap();
        let partial = Config::from_file(&path).unwrap();
        assert_eq!(partial.server.port, 9100);
        assert_eq!(partial.server.host, "127.0.0.1");
        assert_eq!(partial.model.mode, ServingMode::Features);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::from_file(&path), Err(crate::Error::Config(_))));
        assert!(matches!(
            Config::from_file(dir.path().join("absent.json")),
            Err(crate::Error::Config(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_port_and_workers() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mode_scale() {
        assert_eq!(ServingMode::Features.scale(), RatingScale::TEN_POINT);
        assert_eq!(ServingMode::Pairs.scale(), RatingScale::FIVE_STAR);
        assert_eq!(
            serde_json::to_string(&ServingMode::Pairs).unwrap(),
            "\"pairs\""
        );
    }
}
