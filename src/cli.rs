//! Command line and environment overrides for [`Config`].

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, ServingMode};
use crate::Result;

/// Command line arguments for the rating server
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "movie-rating-server")]
#[command(about = "Serve a pre-trained movie rating model over HTTP")]
#[command(version)]
pub struct Cli {
    /// JSON configuration file
    #[arg(short, long, env = "MOVIE_RATING_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the serialized model artifact
    #[arg(long, env = "MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Request shape served by this process
    #[arg(long, value_enum, env = "SERVING_MODE")]
    pub mode: Option<ServingMode>,

    /// Address to bind
    #[arg(long, env = "MOVIE_RATING_HOST")]
    pub host: Option<String>,

    /// Port to bind
    #[arg(short, long, env = "MOVIE_RATING_PORT")]
    pub port: Option<u16>,

    /// Number of HTTP worker threads
    #[arg(long, env = "MOVIE_RATING_WORKERS")]
    pub workers: Option<usize>,

    /// Application name used in logs
    #[arg(long, env = "APP_NAME")]
    pub app_name: Option<String>,

    /// Version reported by the health endpoint
    #[arg(long, env = "APP_VERSION")]
    pub app_version: Option<String>,

    /// Enable debug logging
    #[arg(long, env = "DEBUG")]
    pub debug: bool,
}

impl Cli {
    /// Build the effective configuration: defaults, then the config file, then flags.
    pub fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(path) = self.model_path {
            config.model.path = path;
        }
        if let Some(mode) = self.mode {
            config.model.mode = mode;
        }
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(workers) = self.workers {
            config.server.workers = workers;
        }
        if let Some(name) = self.app_name {
            config.app.name = name;
        }
        if let Some(version) = self.app_version {
            config.app.version = version;
        }
        if self.debug {
            config.app.debug = true;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "movie-rating-server",
            "--model-path",
            "models/svd_model.bin",
            "--mode",
            "pairs",
            "--port",
            "9000",
            "--debug",
        ])
        .unwrap();

        let config = cli.into_config().unwrap();
        assert_eq!(config.model.path, PathBuf::from("models/svd_model.bin"));
        assert_eq!(config.model.mode, ServingMode::Pairs);
        assert_eq!(config.server.port, 9000);
        assert!(config.app.debug);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("server.json");
        std::fs::write(
            &path,
            r#"{"app": {"version": "2.3.0"}, "server": {"port": 7000, "workers": 2}}"#,
        )
        .unwrap();

        let cli = Cli {
            config: Some(path),
            port: Some(7100),
            ..Cli::default()
        };
        let config = cli.into_config().unwrap();
        assert_eq!(config.app.version, "2.3.0");
        assert_eq!(config.server.port, 7100);
        assert_eq!(config.server.workers, 2);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let cli = Cli {
            workers: Some(0),
            ..Cli::default()
        };
        assert!(matches!(cli.into_config(), Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_bind_settings_use_prefixed_env_names() {
        use clap::CommandFactory;

        let command = Cli::command();
        for (id, env) in [
            ("host", "MOVIE_RATING_HOST"),
            ("port", "MOVIE_RATING_PORT"),
            ("workers", "MOVIE_RATING_WORKERS"),
        ] {
            let arg = command
                .get_arguments()
                .find(|arg| arg.get_id() == id)
                .unwrap();
            assert_eq!(arg.get_env(), Some(std::ffi::OsStr::new(env)));
        }
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(Cli::try_parse_from(["movie-rating-server", "--mode", "hybrid"]).is_err());
    }
}
