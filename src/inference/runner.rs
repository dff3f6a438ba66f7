//! Typed access to the three models the handlers use

use axum::body::Bytes;
use std::sync::Arc;
use tracing::debug;

use crate::config::GatewayConfig;
use crate::error::{AppError, Result};
use crate::inference::traits::{Classification, InferenceGateway, ModelInput, ModelOutput};

/// Binds a gateway to the configured classifier, text and image models
#[derive(Clone)]
pub struct ModelRunner {
    gateway: Arc<dyn InferenceGateway>,
    classifier: String,
    text: String,
    image: String,
    max_tokens: u32,
    num_steps: u32,
}

impl ModelRunner {
    pub fn new(gateway: Arc<dyn InferenceGateway>, config: &GatewayConfig) -> Self {
        Self {
            gateway,
            classifier: config.models.classifier.clone(),
            text: config.models.text.clone(),
            image: config.models.image.clone(),
            max_tokens: config.max_tokens,
            num_steps: config.num_steps,
        }
    }

    /// Classify an image; predictions keep the model's ordering
    pub async fn classify(&self, image: Bytes) -> Result<Vec<Classification>> {
        match self.run(&self.classifier, ModelInput::Image { image }).await? {
            ModelOutput::Classification(predictions) => {
                debug!(model = %self.classifier, count = predictions.len(), "Image classified");
                Ok(predictions)
            }
            other => Err(unexpected(&self.classifier, "classification", &other)),
        }
    }

    /// Bounded-length completion; an empty string means the model said nothing
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let input = ModelInput::Text {
            prompt: prompt.to_string(),
            max_tokens: self.max_tokens,
        };

        match self.run(&self.text, input).await? {
            ModelOutput::Text(text) => Ok(text),
            other => Err(unexpected(&self.text, "text", &other)),
        }
    }

    /// Synthesize an image from a prompt
    pub async fn synthesize(&self, prompt: &str) -> Result<Bytes> {
        let input = ModelInput::Synthesis {
            prompt: prompt.to_string(),
            num_steps: self.num_steps,
        };

        match self.run(&self.image, input).await? {
            ModelOutput::Image(bytes) => {
                debug!(model = %self.image, bytes = bytes.len(), "Image synthesized");
                Ok(bytes)
            }
            other => Err(unexpected(&self.image, "image", &other)),
        }
    }

    async fn run(&self, model: &str, input: ModelInput) -> Result<ModelOutput> {
        debug!(
            gateway = %self.gateway.name(),
            model = %model,
            input = input.kind(),
            "Dispatching model call"
        );
        self.gateway.run(model, input).await
    }
}

fn unexpected(model: &str, expected: &str, got: &ModelOutput) -> AppError {
    AppError::Gateway(format!(
        "{} returned {} output, expected {}",
        model,
        got.kind(),
        expected
    ))
}
