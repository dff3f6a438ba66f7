//! Prompt composition - Style templates, image descriptions, and cache busting

pub mod description;
pub mod style;

pub use description::{describe_instruction, description_or_fallback, final_description, top_labels};
pub use style::{compose, Style, TemplateSet};

use chrono::Utc;
use uuid::Uuid;

/// Append a per-call suffix so identical prompts are never served from an upstream cache
pub fn with_cache_buster(prompt: &str) -> String {
    let request_id = Uuid::new_v4().simple().to_string();
    append_nonce(prompt, &format!("{}-{}", Utc::now().timestamp_millis(), &request_id[..8]))
}

/// Append `nonce` to `prompt` in the suffix format sent upstream
pub fn append_nonce(prompt: &str, nonce: &str) -> String {
    format!("{} [{}]", prompt, nonce)
}
