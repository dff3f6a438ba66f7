//! Request and response bodies for the HTTP API

use serde::{Deserialize, Serialize};

use crate::inference::Classification;

/// Body of `POST /api/generate-image`
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
}

/// Body returned by `POST /api/analyze-image`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub analysis: Vec<Classification>,
    pub description: String,
    pub prompt_suggestion: String,
}

/// One entry of the capability listing
#[derive(Debug, Clone, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

/// Default response for unmatched routes
#[derive(Debug, Clone, Serialize)]
pub struct CapabilityListing {
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<EndpointInfo>,
    pub styles: Vec<&'static str>,
}
