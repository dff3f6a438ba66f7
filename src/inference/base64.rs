//! Base64 decoding for image payloads embedded in JSON results

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::{AppError, Result};

/// Decode a base64 image, accepting a bare payload or a data URL
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    let data = match encoded.split_once(',') {
        Some((prefix, payload)) if prefix.starts_with("data:") => payload,
        _ => encoded,
    };

    STANDARD
        .decode(data.trim())
        .map_err(|e| AppError::Gateway(format!("Invalid base64 image data: {}", e)))
}
