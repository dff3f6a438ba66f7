//! Multipart image form shared by the analyze and transform endpoints

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart},
};
use tracing::debug;

use crate::error::{AppError, Result};

/// Fields read from an image upload form
#[derive(Debug, Default)]
pub struct ImageForm {
    pub image: Option<Bytes>,
    pub prompt: Option<String>,
    pub style: Option<String>,
}

impl ImageForm {
    /// Read every field of the form; empty parts count as absent
    pub async fn read(
        multipart: std::result::Result<Multipart, MultipartRejection>,
    ) -> Result<Self> {
        let mut multipart = multipart.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
        let mut form = ImageForm::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            AppError::InvalidRequest(format!("Failed to read multipart field: {}", e))
        })? {
            let name = field.name().unwrap_or_default().to_string();

            match name.as_str() {
                "image" => {
                    let bytes = field.bytes().await.map_err(|e| {
                        AppError::InvalidRequest(format!("Failed to read image bytes: {}", e))
                    })?;
                    debug!(bytes = bytes.len(), "Read image field");
                    form.image = Some(bytes).filter(|b| !b.is_empty());
                }
                "prompt" | "style" => {
                    let text = field.text().await.map_err(|e| {
                        AppError::InvalidRequest(format!("Failed to read field '{}': {}", name, e))
                    })?;
                    let text = Some(text.trim().to_string()).filter(|t| !t.is_empty());
                    if name == "prompt" {
                        form.prompt = text;
                    } else {
                        form.style = text;
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }

    /// The uploaded image, or `MissingImage`
    pub fn require_image(&mut self) -> Result<Bytes> {
        self.image.take().ok_or(AppError::MissingImage)
    }
}
