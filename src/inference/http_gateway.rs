//! HTTP client for the hosted inference service

use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::{header::CONTENT_TYPE, Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::error::{AppError, Result};
use crate::inference::base64;
use crate::inference::traits::{Classification, InferenceGateway, ModelInput, ModelOutput};

/// Gateway that runs models through the hosted REST API
pub struct HttpGateway {
    client: Client,
    base_url: String,
    account_id: String,
    api_token: String,
    timeout_ms: u64,
}

/// Request body, shaped per model family
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ApiRunRequest<'a> {
    Image { image: &'a [u8] },
    Text { prompt: &'a str, max_tokens: u32 },
    Synthesis { prompt: &'a str, num_steps: u32 },
}

impl<'a> From<&'a ModelInput> for ApiRunRequest<'a> {
    fn from(input: &'a ModelInput) -> Self {
        match input {
            ModelInput::Image { image } => ApiRunRequest::Image { image },
            ModelInput::Text { prompt, max_tokens } => ApiRunRequest::Text {
                prompt,
                max_tokens: *max_tokens,
            },
            ModelInput::Synthesis { prompt, num_steps } => ApiRunRequest::Synthesis {
                prompt,
                num_steps: *num_steps,
            },
        }
    }
}

/// JSON envelope returned by the service
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    errors: Vec<ApiMessage>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ApiTextResult {
    #[serde(default)]
    response: Option<String>,
}

/// Some synthesis models answer with JSON carrying a base64 image
#[derive(Debug, Deserialize)]
struct ApiImageResult {
    image: String,
}

impl HttpGateway {
    /// Create a new gateway client from configuration
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            account_id: config.account_id.clone(),
            api_token: config.api_token.clone(),
            timeout_ms: config.timeout_ms,
        })
    }

    /// Endpoint for running `model`
    pub fn model_url(&self, model: &str) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.base_url,
            self.account_id,
            model.trim_start_matches('/')
        )
    }

    async fn decode(
        &self,
        model: &str,
        input: &ModelInput,
        response: Response,
    ) -> Result<ModelOutput> {
        let is_image = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("image/"))
            .unwrap_or(false);

        if is_image {
            let bytes = response.bytes().await?;
            debug!(model = %model, bytes = bytes.len(), "Received image payload");
            return Ok(ModelOutput::Image(bytes));
        }

        let envelope: ApiEnvelope = response.json().await?;

        if envelope.success == Some(false) {
            return Err(AppError::Gateway(format!(
                "{} failed: {}",
                model,
                join_messages(&envelope.errors)
            )));
        }

        let result = envelope
            .result
            .ok_or_else(|| AppError::Gateway(format!("{} returned no result", model)))?;

        match input {
            ModelInput::Image { .. } => {
                let predictions: Vec<Classification> = serde_json::from_value(result)?;
                Ok(ModelOutput::Classification(predictions))
            }
            ModelInput::Text { .. } => {
                let text: ApiTextResult = serde_json::from_value(result)?;
                Ok(ModelOutput::Text(text.response.unwrap_or_default()))
            }
            ModelInput::Synthesis { .. } => {
                let image: ApiImageResult = serde_json::from_value(result)?;
                let bytes = base64::decode(&image.image)?;
                Ok(ModelOutput::Image(Bytes::from(bytes)))
            }
        }
    }
}

#[async_trait]
impl InferenceGateway for HttpGateway {
    fn name(&self) -> &str {
        "http"
    }

    async fn run(&self, model: &str, input: ModelInput) -> Result<ModelOutput> {
        let url = self.model_url(model);
        debug!(model = %model, input = input.kind(), "Running model");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&ApiRunRequest::from(&input))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout(format!(
                        "{} did not respond within {} ms",
                        model, self.timeout_ms
                    ))
                } else if e.is_connect() {
                    AppError::Gateway(format!("Connection failed to {}: {}", self.base_url, e))
                } else {
                    AppError::HttpClient(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(model = %model, status = %status, "Model call rejected");
            return Err(AppError::Gateway(describe_failure(model, status, &body)));
        }

        self.decode(model, &input, response).await
    }
}

fn join_messages(errors: &[ApiMessage]) -> String {
    if errors.is_empty() {
        return "unknown error".to_string();
    }

    errors
        .iter()
        .map(|e| match e.code {
            Some(code) => format!("{} (code {})", e.message, code),
            None => e.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn describe_failure(model: &str, status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiEnvelope>(body) {
        Ok(envelope) if !envelope.errors.is_empty() => format!(
            "{} returned {}: {}",
            model,
            status,
            join_messages(&envelope.errors)
        ),
        _ => format!("{} returned {}: {}", model, status, body),
    }
}
