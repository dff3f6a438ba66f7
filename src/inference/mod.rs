//! Inference module - Model contracts, the hosted HTTP client, and the typed runner

pub mod base64;
pub mod http_gateway;
pub mod runner;
pub mod traits;

pub use http_gateway::HttpGateway;
pub use runner::ModelRunner;
pub use traits::{Classification, InferenceGateway, ModelInput, ModelOutput};
