use std::{env, path::PathBuf};

use crate::error::ConfigErr;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MODEL_PATH: &str = "artifacts/bengaluru_house_price_model.safetensors";
const DEFAULT_COLUMNS_PATH: &str = "artifacts/columns.json";

/// Immutable process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub columns_path: PathBuf,
    pub debug: bool,
}

impl ServiceConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    /// Returns `ConfigErr::InvalidPort` if `PORT` is set but isn't a port number.
    pub fn from_env() -> Result<Self, ConfigErr> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Arguments
    /// * `lookup` - Returns the value of a variable, if set.
    ///
    /// # Errors
    /// Returns `ConfigErr::InvalidPort` if `PORT` is set but isn't a port number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigErr>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigErr::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let debug = lookup("DEBUG").is_some_and(|raw| {
            matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        });

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            model_path: lookup("MODEL_PATH")
                .unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string())
                .into(),
            columns_path: lookup("COLUMNS_PATH")
                .unwrap_or_else(|| DEFAULT_COLUMNS_PATH.to_string())
                .into(),
            debug,
        })
    }

    /// Returns the `host:port` address to bind.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the default log filter, overridden by `RUST_LOG` when set.
    pub fn log_filter(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }
}
