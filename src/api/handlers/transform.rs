//! `POST /api/transform-image`: describe an upload, then redraw it in a style

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    response::Response,
};
use std::sync::Arc;
use tracing::info;

use super::{fail, png};
use crate::api::form::ImageForm;
use crate::error::Result;
use crate::prompt::{
    compose, describe_instruction, description_or_fallback, final_description, top_labels,
    with_cache_buster, Style, TemplateSet,
};
use crate::AppState;

pub const TRANSFORM_FAILED: &str = "Image transformation failed";

pub async fn transform_image(
    State(state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Response> {
    transform(&state, multipart)
        .await
        .map(png)
        .map_err(|e| fail(e, TRANSFORM_FAILED))
}

async fn transform(
    state: &AppState,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Bytes> {
    let mut form = ImageForm::read(multipart).await?;
    let image = form.require_image()?;
    let custom = form.prompt.as_deref();

    let predictions = state.models.classify(image).await?;
    let labels = top_labels(&predictions);

    let generated = state
        .models
        .complete(&describe_instruction(&labels, custom))
        .await?;
    let base = description_or_fallback(&generated, &labels);
    let description = final_description(&base, custom);

    let style = form.style.as_deref();
    let styled = compose(&description, style, TemplateSet::Transform);

    info!(labels = %labels, style = %Style::from_key(style), "Transforming image");
    state.models.synthesize(&with_cache_buster(&styled)).await
}
