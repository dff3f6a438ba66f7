//! Functional tests for the HTTP surface, driven against an in-memory gateway

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    response::Response,
    Router,
};
use img_studio_gateway::{
    api::routes::create_router,
    config::Settings,
    inference::{Classification, InferenceGateway, ModelInput, ModelOutput, ModelRunner},
    prompt::{compose, TemplateSet},
    AppError, AppState, Result,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-data";
const BOUNDARY: &str = "studio-test-boundary";

/// Gateway double that records every call and answers from fixed data
#[derive(Default)]
struct RecordingGateway {
    predictions: Vec<Classification>,
    description: String,
    fail_on: Option<&'static str>,
    calls: Mutex<Vec<(String, ModelInput)>>,
}

impl RecordingGateway {
    fn new(description: &str) -> Self {
        Self {
            predictions: vec![
                Classification::new("cat", 0.9),
                Classification::new("dog", 0.5),
                Classification::new("tree", 0.3),
                Classification::new("sky", 0.1),
            ],
            description: description.to_string(),
            ..Self::default()
        }
    }

    fn failing_on(mut self, kind: &'static str) -> Self {
        self.fail_on = Some(kind);
        self
    }

    fn calls(&self) -> Vec<(String, ModelInput)> {
        self.calls.lock().unwrap().clone()
    }

    fn text_prompt(&self) -> String {
        self.calls()
            .into_iter()
            .find_map(|(_, input)| match input {
                ModelInput::Text { prompt, .. } => Some(prompt),
                _ => None,
            })
            .expect("no text call recorded")
    }

    fn synthesis_prompt(&self) -> (String, u32) {
        self.calls()
            .into_iter()
            .find_map(|(_, input)| match input {
                ModelInput::Synthesis { prompt, num_steps } => Some((prompt, num_steps)),
                _ => None,
            })
            .expect("no synthesis call recorded")
    }
}

#[async_trait]
impl InferenceGateway for RecordingGateway {
    fn name(&self) -> &str {
        "recording"
    }

    async fn run(&self, model: &str, input: ModelInput) -> Result<ModelOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), input.clone()));

        if self.fail_on == Some(input.kind()) {
            return Err(AppError::Gateway("model exploded".to_string()));
        }

        Ok(match input {
            ModelInput::Image { .. } => ModelOutput::Classification(self.predictions.clone()),
            ModelInput::Text { .. } => ModelOutput::Text(self.description.clone()),
            ModelInput::Synthesis { .. } => ModelOutput::Image(Bytes::from_static(PNG)),
        })
    }
}

fn create_test_app(gateway: Arc<RecordingGateway>) -> Router {
    create_test_app_with(Settings::default(), gateway)
}

fn create_test_app_with(settings: Settings, gateway: Arc<RecordingGateway>) -> Router {
    let models = ModelRunner::new(gateway, &settings.gateway);
    create_router(Arc::new(AppState::new(settings, models)))
}

fn multipart_body(fields: &[(&str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, data) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        if *name == "image" {
            body.extend_from_slice(
                b"Content-Disposition: form-data; name=\"image\"; filename=\"photo.png\"\r\n\
                  Content-Type: image/png\r\n\r\n",
            );
        } else {
            body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            );
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn multipart_request(uri: &str, fields: &[(&str, &[u8])]) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(fields)))
        .unwrap()
}

fn json_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(response: Response) -> Bytes {
    to_bytes(response.into_body(), usize::MAX).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn assert_cors(response: &Response) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "GET, POST, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
}

/// Strip the cache-busting suffix
fn without_nonce(prompt: &str) -> &str {
    let (styled, nonce) = prompt.rsplit_once(" [").expect("missing cache-busting suffix");
    assert!(nonce.ends_with(']'));
    styled
}

#[tokio::test]
async fn test_options_returns_empty_preflight_on_any_path() {
    for uri in ["/", "/api/generate-image", "/somewhere/else"] {
        let app = create_test_app(Arc::new(RecordingGateway::new("")));

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);
        assert!(body_bytes(response).await.is_empty());
    }
}

#[tokio::test]
async fn test_root_serves_front_end() {
    let app = create_test_app(Arc::new(RecordingGateway::new("")));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors(&response);
    let content_type = response.headers()[CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let html = body_bytes(response).await;
    assert!(String::from_utf8_lossy(&html).contains("/api/transform-image"));
}

#[tokio::test]
async fn test_unmatched_requests_list_capabilities() {
    let cases = [
        (Method::GET, "/api/unknown"),
        (Method::GET, "/api/generate-image"),
        (Method::DELETE, "/"),
    ];

    for (method, uri) in cases {
        let app = create_test_app(Arc::new(RecordingGateway::new("")));

        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);

        let body = body_json(response).await;
        let paths: Vec<&str> = body["endpoints"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["path"].as_str().unwrap())
            .collect();
        assert!(paths.contains(&"/api/analyze-image"));
        assert_eq!(body["styles"].as_array().unwrap().len(), 4);
    }
}

#[tokio::test]
async fn test_analyze_without_image_is_rejected() {
    let gateway = Arc::new(RecordingGateway::new("unused"));
    let app = create_test_app(gateway.clone());

    let response = app
        .oneshot(multipart_request(
            "/api/analyze-image",
            &[("prompt", b"hello".as_slice())],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_cors(&response);

    let body = body_json(response).await;
    assert_eq!(body["error"], "No image provided");
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_analyze_returns_analysis_and_description() {
    let gateway = Arc::new(RecordingGateway::new("A cat and a dog resting under a tree."));
    let app = create_test_app(gateway.clone());

    let response = app
        .oneshot(multipart_request("/api/analyze-image", &[("image", PNG)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["analysis"].as_array().unwrap().len(), 4);
    assert_eq!(body["analysis"][0]["label"], "cat");
    assert_eq!(body["description"], "A cat and a dog resting under a tree.");
    assert_eq!(body["prompt_suggestion"], body["description"]);

    let prompt = gateway.text_prompt();
    assert!(prompt.contains("cat, dog, tree"));
    assert!(!prompt.contains("sky"));

    let calls = gateway.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "@cf/microsoft/resnet-50");
    match &calls[0].1 {
        ModelInput::Image { image } => assert_eq!(image.as_ref(), PNG),
        other => panic!("unexpected first call: {other:?}"),
    }
    match &calls[1].1 {
        ModelInput::Text { max_tokens, .. } => assert_eq!(*max_tokens, 200),
        other => panic!("unexpected second call: {other:?}"),
    }
}

#[tokio::test]
async fn test_analyze_falls_back_when_text_model_is_silent() {
    let gateway = Arc::new(RecordingGateway::new("   "));
    let app = create_test_app(gateway);

    let response = app
        .oneshot(multipart_request("/api/analyze-image", &[("image", PNG)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["description"], "An image containing cat, dog, tree");
}

#[tokio::test]
async fn test_analyze_failure_returns_single_error_envelope() {
    let gateway = Arc::new(RecordingGateway::new("unused").failing_on("image"));
    let app = create_test_app(gateway.clone());

    let response = app
        .oneshot(multipart_request("/api/analyze-image", &[("image", PNG)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Image analysis failed");
    assert!(body["details"].as_str().unwrap().contains("model exploded"));
    assert!(body.get("analysis").is_none());
    assert_eq!(gateway.calls().len(), 1);
}

#[tokio::test]
async fn test_analyze_rejects_non_multipart_body() {
    let app = create_test_app(Arc::new(RecordingGateway::new("")));

    let response = app
        .oneshot(json_request("/api/analyze-image", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Image analysis failed");
}

#[tokio::test]
async fn test_analyze_accepts_upload_above_default_body_limit() {
    let mut settings = Settings::default();
    settings.server.max_upload_bytes = 4 * 1024 * 1024;
    let gateway = Arc::new(RecordingGateway::new("A large photo."));
    let app = create_test_app_with(settings, gateway.clone());

    // Larger than axum's 2 MiB default
    let image = vec![0xAB; 3 * 1024 * 1024];
    let response = app
        .oneshot(multipart_request("/api/analyze-image", &[("image", image.as_slice())]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["description"], "A large photo.");

    match &gateway.calls()[0].1 {
        ModelInput::Image { image: sent } => assert_eq!(sent.len(), image.len()),
        other => panic!("unexpected first call: {other:?}"),
    }
}

#[tokio::test]
async fn test_analyze_upload_over_limit_fails() {
    let mut settings = Settings::default();
    settings.server.max_upload_bytes = 4 * 1024 * 1024;
    let gateway = Arc::new(RecordingGateway::new("unused"));
    let app = create_test_app_with(settings, gateway.clone());

    let image = vec![0xAB; 5 * 1024 * 1024];
    let response = app
        .oneshot(multipart_request("/api/analyze-image", &[("image", image.as_slice())]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(&response);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Image analysis failed");
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_generate_requires_prompt() {
    for payload in [r#"{}"#, r#"{"prompt": ""}"#, r#"{"prompt": "   ", "style": "cartoon"}"#] {
        let gateway = Arc::new(RecordingGateway::new(""));
        let app = create_test_app(gateway.clone());

        let response = app
            .oneshot(json_request("/api/generate-image", payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "No prompt provided");
        assert!(gateway.calls().is_empty());
    }
}

#[tokio::test]
async fn test_generate_returns_png() {
    let gateway = Arc::new(RecordingGateway::new(""));
    let app = create_test_app(gateway.clone());

    let response = app
        .oneshot(json_request(
            "/api/generate-image",
            r#"{"prompt": "a lighthouse at dusk", "style": "cartoon"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "image/png");
    assert_cors(&response);
    assert_eq!(body_bytes(response).await.as_ref(), PNG);

    let (prompt, num_steps) = gateway.synthesis_prompt();
    assert_eq!(num_steps, 20);
    assert_eq!(
        without_nonce(&prompt),
        compose("a lighthouse at dusk", Some("cartoon"), TemplateSet::Generate)
    );
}

#[tokio::test]
async fn test_generate_unknown_style_uses_realistic() {
    let gateway = Arc::new(RecordingGateway::new(""));
    let app = create_test_app(gateway.clone());

    let response = app
        .oneshot(json_request(
            "/api/generate-image",
            r#"{"prompt": "a lighthouse", "style": "vaporwave"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let (prompt, _) = gateway.synthesis_prompt();
    assert_eq!(
        without_nonce(&prompt),
        compose("a lighthouse", Some("realistic"), TemplateSet::Generate)
    );
}

#[tokio::test]
async fn test_generate_failure_emits_no_image() {
    let gateway = Arc::new(RecordingGateway::new("").failing_on("synthesis"));
    let app = create_test_app(gateway);

    let response = app
        .oneshot(json_request("/api/generate-image", r#"{"prompt": "a lighthouse"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    let body = body_json(response).await;
    assert_eq!(body["error"], "Image generation failed");
    assert!(body["details"].as_str().unwrap().contains("model exploded"));
}

#[tokio::test]
async fn test_generate_malformed_json_is_a_failure() {
    let app = create_test_app(Arc::new(RecordingGateway::new("")));

    let response = app
        .oneshot(json_request("/api/generate-image", "{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Image generation failed");
}

#[tokio::test]
async fn test_transform_appends_custom_prompt() {
    let gateway = Arc::new(RecordingGateway::new("A forest scene"));
    let app = create_test_app(gateway.clone());

    let response = app
        .oneshot(multipart_request(
            "/api/transform-image",
            &[
                ("image", PNG),
                ("prompt", b"add mountains".as_slice()),
                ("style", b"artistic".as_slice()),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "image/png");
    assert_eq!(body_bytes(response).await.as_ref(), PNG);

    assert!(gateway.text_prompt().contains("add mountains"));

    let (prompt, _) = gateway.synthesis_prompt();
    assert_eq!(
        without_nonce(&prompt),
        compose(
            "A forest scene. add mountains",
            Some("artistic"),
            TemplateSet::Transform
        )
    );
}

#[tokio::test]
async fn test_transform_without_custom_prompt_keeps_description() {
    let gateway = Arc::new(RecordingGateway::new("A forest scene"));
    let app = create_test_app(gateway.clone());

    let response = app
        .oneshot(multipart_request(
            "/api/transform-image",
            &[("image", PNG), ("prompt", b"".as_slice())],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let (prompt, _) = gateway.synthesis_prompt();
    let styled = without_nonce(&prompt);
    assert_eq!(
        styled,
        compose("A forest scene", Some("realistic"), TemplateSet::Transform)
    );
    assert!(!styled.contains("A forest scene. "));
}

#[tokio::test]
async fn test_transform_aborts_on_first_failure() {
    let gateway = Arc::new(RecordingGateway::new("A forest scene").failing_on("text"));
    let app = create_test_app(gateway.clone());

    let response = app
        .oneshot(multipart_request("/api/transform-image", &[("image", PNG)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    let body = body_json(response).await;
    assert_eq!(body["error"], "Image transformation failed");
    assert!(body["details"].as_str().unwrap().contains("model exploded"));

    // classifier and text model only; synthesis never ran
    assert_eq!(gateway.calls().len(), 2);
}

#[tokio::test]
async fn test_transform_without_image_is_rejected() {
    let gateway = Arc::new(RecordingGateway::new(""));
    let app = create_test_app(gateway.clone());

    let response = app
        .oneshot(multipart_request(
            "/api/transform-image",
            &[("image", b"".as_slice()), ("style", b"cartoon".as_slice())],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "No image provided");
    assert!(gateway.calls().is_empty());
}
