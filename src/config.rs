// src/config.rs - Configuration management
use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

use crate::models::Empresa;
use crate::validator::parsear_empresa;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL of the REST backend, without trailing slash.
    pub base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DefaultsConfig {
    /// Business unit used when the command line does not name one.
    pub empresa: String,
    /// Operator name stamped on loads when none is given.
    pub usuario: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            empresa: "Telecom".to_string(),
            usuario: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

pub fn load_config() -> Result<Config> {
    load_env_file()?;

    let mut config = if let Ok(config_file) = env::var("CONFIG_FILE") {
        let config_str = fs::read_to_string(&config_file)
            .with_context(|| format!("Failed to read config file: {}", config_file))?;
        toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", config_file))?
    } else {
        Config::default()
    };

    override_with_env(&mut config);

    config.validate().context("Configuration validation failed")?;

    Ok(config)
}

fn override_with_env(config: &mut Config) {
    if let Ok(url) = env::var("VENDSTOCK_API_URL") {
        config.api.base_url = url;
    }
    if let Ok(timeout_str) = env::var("VENDSTOCK_TIMEOUT_SECONDS") {
        if let Ok(timeout) = timeout_str.parse::<u64>() {
            config.api.timeout_seconds = timeout;
        }
    }
    if let Ok(empresa) = env::var("VENDSTOCK_EMPRESA") {
        config.defaults.empresa = empresa;
    }
    if let Ok(usuario) = env::var("VENDSTOCK_USUARIO") {
        config.defaults.usuario = Some(usuario);
    }
    if let Ok(level) = env::var("RUST_LOG") {
        config.logging.level = level;
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "api.base_url must start with http:// or https:// (current: {})",
                self.api.base_url
            ));
        }

        if self.api.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("api.timeout_seconds must be greater than 0"));
        }

        parsear_empresa(&self.defaults.empresa)
            .map_err(|e| anyhow::anyhow!("defaults.empresa: {}", e))?;

        Ok(())
    }

    pub fn empresa_default(&self) -> Empresa {
        // validate() already guaranteed this parses
        parsear_empresa(&self.defaults.empresa).unwrap_or_default()
    }

    pub fn print_startup_info(&self) {
        log::debug!("Backend: {}", self.api.base_url);
        log::debug!("Empresa por defecto: {}", self.defaults.empresa);
        log::debug!("Logging: {} level", self.logging.level);
    }
}

pub fn load_env_file() -> Result<()> {
    if let Ok(env_file) = env::var("ENV_FILE") {
        dotenvy::from_filename(&env_file)
            .with_context(|| format!("Failed to load environment file: {}", env_file))?;
    } else if Path::new(".env").exists() {
        dotenvy::dotenv().context("Failed to load .env file")?;
    }
    Ok(())
}
