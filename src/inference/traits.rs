//! Common traits and types for hosted model calls

use async_trait::async_trait;
use axum::body::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One classifier prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    pub score: f64,
}

impl Classification {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Model-specific input
#[derive(Debug, Clone)]
pub enum ModelInput {
    /// Raw image bytes for the classifier
    Image { image: Bytes },

    /// Bounded-length text completion
    Text { prompt: String, max_tokens: u32 },

    /// Text-to-image synthesis
    Synthesis { prompt: String, num_steps: u32 },
}

impl ModelInput {
    pub fn kind(&self) -> &'static str {
        match self {
            ModelInput::Image { .. } => "image",
            ModelInput::Text { .. } => "text",
            ModelInput::Synthesis { .. } => "synthesis",
        }
    }
}

/// Model-specific output
#[derive(Debug, Clone)]
pub enum ModelOutput {
    /// Predictions in the order the model produced them
    Classification(Vec<Classification>),

    /// Generated text, possibly empty
    Text(String),

    /// Encoded image payload
    Image(Bytes),
}

impl ModelOutput {
    pub fn kind(&self) -> &'static str {
        match self {
            ModelOutput::Classification(_) => "classification",
            ModelOutput::Text(_) => "text",
            ModelOutput::Image(_) => "image",
        }
    }
}

/// A service that runs a named pre-trained model against an input
#[async_trait]
pub trait InferenceGateway: Send + Sync {
    /// Human-readable gateway name for logs
    fn name(&self) -> &str;

    /// Run `model` on `input`
    async fn run(&self, model: &str, input: ModelInput) -> Result<ModelOutput>;
}
