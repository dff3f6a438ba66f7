//! `POST /api/analyze-image`: classify an upload and describe it

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use std::sync::Arc;
use tracing::info;

use super::fail;
use crate::api::form::ImageForm;
use crate::api::types::AnalyzeResponse;
use crate::error::Result;
use crate::prompt::{describe_instruction, description_or_fallback, top_labels};
use crate::AppState;

pub const ANALYZE_FAILED: &str = "Image analysis failed";

pub async fn analyze_image(
    State(state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>> {
    analyze(&state, multipart)
        .await
        .map(Json)
        .map_err(|e| fail(e, ANALYZE_FAILED))
}

async fn analyze(
    state: &AppState,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<AnalyzeResponse> {
    let mut form = ImageForm::read(multipart).await?;
    let image = form.require_image()?;

    let analysis = state.models.classify(image).await?;
    let labels = top_labels(&analysis);

    let generated = state.models.complete(&describe_instruction(&labels, None)).await?;
    let description = description_or_fallback(&generated, &labels);

    info!(labels = %labels, "Image analyzed");

    Ok(AnalyzeResponse {
        analysis,
        prompt_suggestion: description.clone(),
        description,
    })
}
