use std::{env, num::NonZeroUsize, path::PathBuf};

use anyhow::{Context, Result};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MODEL_PATH: &str = "titanic_model.json";

/// Immutable settings for a server instance, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    host: String,
    port: u16,
    model_path: PathBuf,
    workers: Option<NonZeroUsize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            workers: None,
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    /// If `PORT` or `HTTP_WORKERS` are set but aren't valid.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source, falling back to the defaults for
    /// missing keys.
    ///
    /// # Args
    /// * `lookup` - Returns the value set for a key, if any.
    ///
    /// # Errors
    /// If `PORT` or `HTTP_WORKERS` are set but aren't valid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("HOST") {
            config.host = host;
        }

        if let Some(port) = lookup("PORT") {
            config.port = port
                .parse()
                .with_context(|| format!("invalid PORT value '{port}'"))?;
        }

        if let Some(path) = lookup("MODEL_PATH") {
            config.model_path = PathBuf::from(path);
        }

        if let Some(workers) = lookup("HTTP_WORKERS") {
            let workers = workers
                .parse()
                .with_context(|| format!("invalid HTTP_WORKERS value '{workers}'"))?;
            config.workers = Some(workers);
        }

        Ok(config)
    }

    /// Returns the address to bind, as `host:port`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the path of the model artifact.
    pub fn model_path(&self) -> &PathBuf {
        &self.model_path
    }

    /// Returns the amount of HTTP workers, `None` leaving actix's default.
    pub fn workers(&self) -> Option<NonZeroUsize> {
        self.workers
    }
}
