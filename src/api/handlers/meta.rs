//! Front end page and the capability listing

use axum::{response::Html, Json};

use crate::api::types::{CapabilityListing, EndpointInfo};
use crate::prompt::Style;

const INDEX_HTML: &str = include_str!("../../../static/index.html");

/// `GET /`
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Fallback for every unmatched method and path
pub async fn capabilities() -> Json<CapabilityListing> {
    Json(capability_listing())
}

pub fn capability_listing() -> CapabilityListing {
    CapabilityListing {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        endpoints: vec![
            EndpointInfo {
                method: "GET",
                path: "/",
                description: "Browser front end",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/analyze-image",
                description: "Classify an uploaded image (multipart field 'image') and describe it",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/generate-image",
                description: "Generate a PNG from JSON {prompt, style?}",
            },
            EndpointInfo {
                method: "POST",
                path: "/api/transform-image",
                description:
                    "Redraw an uploaded image (multipart 'image', 'prompt?', 'style?') as a PNG",
            },
        ],
        styles: Style::ALL.iter().map(Style::as_str).collect(),
    }
}
