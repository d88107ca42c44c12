//! HTTP API consumed by the browser client.
//!
//!   POST /analyze        menu photo in, dish list out
//!   POST /search-image   dish search query in, one image out
//!   GET  /health         liveness and version

mod error;

pub use error::ApiError;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use menumenu_core::{ImageResult, MenuAnalysis, MenuMenu};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// State shared by all routes.
#[derive(Clone)]
pub struct AppState {
    pub menu: MenuMenu,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest {
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    target_language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchRequest {
    #[serde(default)]
    query: Option<String>,
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    let body_limit = body_limit_bytes(state.menu.config().limits.max_image_mb);
    Router::new()
        .route("/analyze", post(analyze))
        .route("/search-image", post(search_image))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = router(state);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("MenuMenu API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    tracing::info!("Shutting down");
}

/// Base64 inflates the image by 4/3; leave room for the JSON envelope.
fn body_limit_bytes(max_image_mb: u64) -> usize {
    let image_bytes = (max_image_mb as usize).saturating_mul(1024 * 1024);
    image_bytes / 3 * 4 + 64 * 1024
}

/// Parse a JSON object body regardless of `Content-Type`.
///
/// A body that isn't a JSON object gets the same answer as a missing field.
fn parse_body<T: DeserializeOwned>(
    body: Result<Bytes, BytesRejection>,
    missing: &str,
) -> Result<T, ApiError> {
    let bytes = match body {
        Ok(bytes) => bytes,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Err(ApiError::payload_too_large());
        }
        Err(rejection) => {
            tracing::debug!("Unreadable request body: {rejection}");
            return Err(ApiError::bad_request(missing));
        }
    };

    let value: Value = serde_json::from_slice(&bytes).map_err(|e| {
        tracing::debug!("Request body is not JSON: {e}");
        ApiError::bad_request(missing)
    })?;
    if !value.is_object() {
        return Err(ApiError::bad_request(missing));
    }
    serde_json::from_value(value).map_err(|e| {
        tracing::debug!("Unusable request body: {e}");
        ApiError::bad_request(missing)
    })
}

async fn analyze(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<MenuAnalysis>, ApiError> {
    let request: AnalyzeRequest = parse_body(body, "No image provided")?;
    let image = request.image.unwrap_or_default();

    let analysis = state
        .menu
        .extractor()
        .analyze_payload(&image, request.target_language.as_deref())
        .await?;

    tracing::info!(
        "Analyzed menu: {} dishes ({})",
        analysis.dishes.len(),
        analysis.detected_language
    );
    Ok(Json(analysis))
}

async fn search_image(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ImageResult>, ApiError> {
    let request: SearchRequest = parse_body(body, "No query provided")?;
    let query = request.query.unwrap_or_default();

    let result = state.menu.resolver().resolve(&query).await?;
    Ok(Json(result))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": menumenu_core::VERSION,
        "primary_search": state.menu.resolver().has_primary(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use menumenu_core::llm::{LlmRequest, LlmResponse};
    use menumenu_core::{
        Config, Credit, ExtractOptions, ImageHit, ImageResolver, ImageSearchProvider,
        MenuExtractor, UpstreamError, VisionProvider,
    };
    use std::time::Duration;
    use tower::ServiceExt;

    const MENU_REPLY: &str = r#"{
        "restaurant_vibe": "Modern Izakaya",
        "language": "English",
        "currency": "USD",
        "dishes": [
            {"originalName": "Wagyu Steak", "translatedName": "和牛ステーキ", "description": "鉄板で焼いた和牛", "price": "$48", "searchQuery": "Wagyu Steak Teppanyaki style plated delicious professional photography"},
            {"originalName": "Edamame", "translatedName": "枝豆", "description": "塩ゆで枝豆", "searchQuery": "Edamame izakaya bowl sea salt close up"}
        ]
    }"#;

    struct FixedVision(Result<&'static str, u16>);

    #[async_trait]
    impl VisionProvider for FixedVision {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate(&self, _request: &LlmRequest) -> Result<LlmResponse, UpstreamError> {
            match self.0 {
                Ok(text) => Ok(LlmResponse {
                    text: text.to_string(),
                    model: "fixed-vision".to_string(),
                    tokens_used: None,
                    latency_ms: 1,
                }),
                Err(code) => Err(UpstreamError::Llm {
                    message: format!("HTTP {code}: quota exceeded for key sk-secret"),
                    status_code: Some(code),
                }),
            }
        }

        fn timeout(&self) -> Duration {
            Duration::from_secs(5)
        }
    }

    struct FixedSearch(Result<Option<&'static str>, u16>);

    #[async_trait]
    impl ImageSearchProvider for FixedSearch {
        fn name(&self) -> &str {
            "unsplash"
        }

        async fn search(&self, _query: &str) -> Result<Option<ImageHit>, UpstreamError> {
            match self.0 {
                Ok(Some(url)) => Ok(Some(ImageHit {
                    url: url.to_string(),
                    credit: Credit {
                        name: "Kenji Tanaka".to_string(),
                        link: "https://unsplash.com/@kenji".to_string(),
                    },
                })),
                Ok(None) => Ok(None),
                Err(code) => Err(UpstreamError::Search {
                    provider: "unsplash".to_string(),
                    message: format!("HTTP {code}"),
                    status_code: Some(code),
                }),
            }
        }
    }

    fn app(vision: FixedVision, search: FixedSearch) -> Router {
        app_with_config(Config::default(), vision, search)
    }

    fn app_with_config(config: Config, vision: FixedVision, search: FixedSearch) -> Router {
        let extractor = MenuExtractor::new(Box::new(vision), ExtractOptions::default());
        let resolver = ImageResolver::new(None, Box::new(search), Duration::from_secs(5));
        let menu = MenuMenu::from_parts(config, extractor, resolver);
        router(AppState { menu })
    }

    fn default_app() -> Router {
        app(
            FixedVision(Ok(MENU_REPLY)),
            FixedSearch(Ok(Some("https://images.unsplash.com/wagyu"))),
        )
    }

    async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
        post(app, uri, body.as_bytes().to_vec(), Some("application/json")).await
    }

    async fn post(
        app: Router,
        uri: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let request = builder.body(Body::from(body)).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_analyze_returns_dishes() {
        let (status, body) = post_json(
            default_app(),
            "/analyze",
            r#"{"image": "data:image/jpeg;base64,/9j/4AAQ", "targetLanguage": "Japanese"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dishes"].as_array().unwrap().len(), 2);
        assert_eq!(body["language"], "English");
        assert_eq!(body["restaurant_vibe"], "Modern Izakaya");
        assert_eq!(body["dishes"][0]["originalName"], "Wagyu Steak");
        assert!(body["dishes"][0]["id"].as_str().is_some_and(|id| !id.is_empty()));
        assert!(body["dishes"][1].get("price").is_none());
    }

    #[tokio::test]
    async fn test_analyze_without_image_is_400() {
        for payload in [r#"{}"#, r#"{"image": ""}"#, r#"{"image": "data:image/png;base64,"}"#] {
            let (status, body) = post_json(default_app(), "/analyze", payload).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
            assert_eq!(body, json!({"error": "No image provided"}));
        }
    }

    #[tokio::test]
    async fn test_analyze_malformed_body_is_400() {
        let (status, body) = post_json(default_app(), "/analyze", "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No image provided");
    }

    #[tokio::test]
    async fn test_analyze_model_failure_is_500() {
        let app = app(FixedVision(Err(503)), FixedSearch(Ok(None)));
        let (status, body) = post_json(app, "/analyze", r#"{"image": "/9j/4AAQ"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to process menu"}));
    }

    #[tokio::test]
    async fn test_analyze_unparseable_reply_is_500() {
        let vision = FixedVision(Ok("Sorry, I can't read this menu."));
        let app = app(vision, FixedSearch(Ok(None)));
        let (status, body) = post_json(app, "/analyze", r#"{"image": "/9j/4AAQ"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to process menu");
    }

    #[tokio::test]
    async fn test_search_image_returns_credit() {
        let (status, body) = post_json(
            default_app(),
            "/search-image",
            r#"{"query": "Wagyu Steak Teppanyaki style plated delicious professional photography"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["imageUrl"], "https://images.unsplash.com/wagyu");
        assert_eq!(body["credit"]["name"], "Kenji Tanaka");
        assert_eq!(body["credit"]["link"], "https://unsplash.com/@kenji");
    }

    #[tokio::test]
    async fn test_search_image_nothing_found_is_null() {
        let app = app(FixedVision(Ok(MENU_REPLY)), FixedSearch(Ok(None)));
        let payload = r#"{"query": "dragonfruit foam"}"#;
        let (status, body) = post_json(app, "/search-image", payload).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"imageUrl": null, "credit": null}));
    }

    #[tokio::test]
    async fn test_search_image_without_query_is_400() {
        for payload in [r#"{}"#, r#"{"query": "   "}"#, "[1, 2]", "[]", "\"ramen\""] {
            let (status, body) = post_json(default_app(), "/search-image", payload).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
            assert_eq!(body, json!({"error": "No query provided"}));
        }
    }

    #[tokio::test]
    async fn test_search_image_accepts_body_without_content_type() {
        let body = br#"{"query": "ramen"}"#.to_vec();
        let (status, body) = post(default_app(), "/search-image", body, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["imageUrl"], "https://images.unsplash.com/wagyu");
    }

    #[tokio::test]
    async fn test_analyze_accepts_text_plain_body() {
        let body = br#"{"image": "/9j/4AAQ"}"#.to_vec();
        let (status, body) = post(default_app(), "/analyze", body, Some("text/plain")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dishes"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_oversized_body_is_413() {
        let mut config = Config::default();
        config.limits.max_image_mb = 0;
        let app = app_with_config(config, FixedVision(Ok(MENU_REPLY)), FixedSearch(Ok(None)));

        let image = "A".repeat(128 * 1024);
        let body = format!(r#"{{"image": "{image}"}}"#).into_bytes();
        let (status, body) = post(app, "/analyze", body, None).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], "Image too large");
    }

    #[tokio::test]
    async fn test_search_image_provider_failure_is_500() {
        let app = app(FixedVision(Ok(MENU_REPLY)), FixedSearch(Err(401)));
        let (status, body) = post_json(app, "/search-image", r#"{"query": "ramen"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Image search failed"}));
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = default_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], menumenu_core::VERSION);
        assert_eq!(body["primary_search"], false);
    }

    #[test]
    fn test_body_limit_covers_base64_image() {
        let limit = body_limit_bytes(20);
        assert!(limit > 20 * 1024 * 1024 * 4 / 3);
    }
}
