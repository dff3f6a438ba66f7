//! `POST /api/generate-image`: text-to-image with a style template

use axum::{body::Bytes, extract::State, response::Response};
use std::sync::Arc;
use tracing::info;

use super::{fail, png};
use crate::api::types::GenerateRequest;
use crate::error::{AppError, Result};
use crate::prompt::{compose, with_cache_buster, Style, TemplateSet};
use crate::AppState;

pub const GENERATE_FAILED: &str = "Image generation failed";

/// The body is parsed by hand so a missing JSON content type is not a rejection
pub async fn generate_image(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response> {
    generate(&state, &body)
        .await
        .map(png)
        .map_err(|e| fail(e, GENERATE_FAILED))
}

async fn generate(state: &AppState, body: &[u8]) -> Result<Bytes> {
    let request: GenerateRequest = serde_json::from_slice(body)?;

    let prompt = request
        .prompt
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or(AppError::MissingPrompt)?;

    let style = request.style.as_deref();
    let styled = compose(prompt, style, TemplateSet::Generate);

    info!(style = %Style::from_key(style), "Generating image");
    state.models.synthesize(&with_cache_buster(&styled)).await
}
