//! Configuration module

pub mod settings;

pub use settings::{GatewayConfig, LoggingConfig, ModelConfig, ServerConfig, Settings};
