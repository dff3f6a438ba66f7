//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted request body, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// Hosted inference service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub api_token: String,
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
    /// Completion bound for the description model
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Diffusion step count for the synthesis model
    #[serde(default = "default_num_steps")]
    pub num_steps: u32,
    #[serde(default)]
    pub models: ModelConfig,
}

fn default_base_url() -> String {
    "https://api.cloudflare.com/client/v4".to_string()
}

fn default_timeout() -> u64 {
    120_000
}

fn default_max_tokens() -> u32 {
    200
}

fn default_num_steps() -> u32 {
    20
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            account_id: String::new(),
            api_token: String::new(),
            timeout_ms: default_timeout(),
            max_tokens: default_max_tokens(),
            num_steps: default_num_steps(),
            models: ModelConfig::default(),
        }
    }
}

/// Model identifiers used by the handlers
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(default = "default_classifier")]
    pub classifier: String,
    #[serde(default = "default_text")]
    pub text: String,
    #[serde(default = "default_image")]
    pub image: String,
}

fn default_classifier() -> String {
    "@cf/microsoft/resnet-50".to_string()
}

fn default_text() -> String {
    "@cf/meta/llama-3.1-8b-instruct".to_string()
}

fn default_image() -> String {
    "@cf/stabilityai/stable-diffusion-xl-base-1.0".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            classifier: default_classifier(),
            text: default_text(),
            image: default_image(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/default.toml")
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_str().ok_or_else(|| {
            AppError::Config(config::ConfigError::Message(
                "Configuration path is not valid UTF-8".to_string(),
            ))
        })?;

        let config = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("gateway.base_url", default_base_url())?
            .set_default("gateway.timeout_ms", default_timeout() as i64)?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?
            .add_source(File::with_name(path).required(false))
            // Override with environment variables, e.g. IMG_STUDIO_GATEWAY__API_TOKEN
            .add_source(
                Environment::with_prefix("IMG_STUDIO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(invalid("Server port cannot be 0"));
        }

        let gateway = &self.gateway;
        if gateway.base_url.trim().is_empty() {
            return Err(invalid("Gateway base_url cannot be empty"));
        }
        if gateway.account_id.trim().is_empty() {
            return Err(invalid("Gateway account_id must be set"));
        }
        if gateway.api_token.trim().is_empty() {
            return Err(invalid("Gateway api_token must be set"));
        }
        if gateway.timeout_ms == 0 {
            return Err(invalid("Gateway timeout_ms must be greater than 0"));
        }
        if gateway.max_tokens == 0 {
            return Err(invalid("Gateway max_tokens must be greater than 0"));
        }
        if gateway.num_steps == 0 {
            return Err(invalid("Gateway num_steps must be greater than 0"));
        }

        for (role, id) in [
            ("classifier", &gateway.models.classifier),
            ("text", &gateway.models.text),
            ("image", &gateway.models.image),
        ] {
            if id.trim().is_empty() {
                return Err(invalid(&format!("Model id for '{}' cannot be empty", role)));
            }
        }

        Ok(())
    }
}

fn invalid(message: &str) -> AppError {
    AppError::Config(config::ConfigError::Message(message.to_string()))
}
