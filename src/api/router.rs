use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use super::v1;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Create the full router with application state.
/// The metrics endpoint is merged outside the request middleware so scrapes are not counted.
/// `max_body_bytes` replaces axum's 2 MB default on the v1 endpoints.
pub fn create_router(
    state: AppState,
    metrics: Option<PrometheusMetrics>,
    max_body_bytes: usize,
) -> Router {
    let app = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest(
            "/v1",
            v1::create_v1_router().layer(DefaultBodyLimit::max(max_body_bytes)),
        )
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    match metrics {
        Some(metrics) => app.merge(create_metrics_router(metrics)),
        None => app,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::llm::MockProviderAdapter;
    use crate::domain::{EnvSnapshot, ProviderAdapter, ProviderCapabilities, ProviderId};
    use crate::infrastructure::credentials::CredentialResolver;
    use crate::infrastructure::gateway::{AiGateway, FallbackOrchestrator, FallbackPolicy};
    use crate::infrastructure::llm::ProviderRegistry;

    const QUIZ_REPLY: &str = r#"```json
{"questions": [
  {"question": "What is the charge of a proton?",
   "options": {"A": "+1", "B": "-1", "C": "0", "D": "+2"},
   "correct": "a",
   "explanation": "Protons carry one positive elementary charge."},
  {"question": "Which particle has no charge?",
   "options": {"A": "Electron", "B": "Proton", "C": "Neutron", "D": "Ion"},
   "correct": "C",
   "explanation": "Neutrons are neutral."}
]}
```"#;

    fn both_keys() -> EnvSnapshot {
        EnvSnapshot::default()
            .with_var("GOOGLE_AI_API_KEY", "AIza-test")
            .with_var("GROQ_API_KEY", "gsk-test")
    }

    const TEST_BODY_LIMIT: usize = 10 * 1024 * 1024;

    fn app(env: EnvSnapshot, adapters: Vec<Arc<MockProviderAdapter>>) -> Router {
        app_with_limit(env, adapters, TEST_BODY_LIMIT)
    }

    fn app_with_limit(
        env: EnvSnapshot,
        adapters: Vec<Arc<MockProviderAdapter>>,
        max_body_bytes: usize,
    ) -> Router {
        let order: Vec<ProviderId> = adapters.iter().map(|a| a.id()).collect();
        let registry = adapters
            .into_iter()
            .fold(ProviderRegistry::new(), |registry, adapter| {
                registry.with_adapter(adapter)
            });

        let gateway = AiGateway::new(
            CredentialResolver::env_only(env),
            FallbackOrchestrator::new(registry, FallbackPolicy::default()),
            order,
        );

        create_router(AppState::new(gateway), None, max_body_bytes)
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_health_is_ok() {
        let app = app(EnvSnapshot::default(), vec![]);
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_ready_without_keys_is_unavailable() {
        let google = Arc::new(MockProviderAdapter::new(ProviderId::GoogleAi));
        let app = app(EnvSnapshot::default(), vec![google]);
        let request = Request::builder().uri("/ready").body(Body::empty()).unwrap();

        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["checks"][0]["name"], "google_ai");
    }

    #[tokio::test]
    async fn test_quiz_without_chapter_content_is_bad_request() {
        let google = Arc::new(MockProviderAdapter::replying(ProviderId::GoogleAi, QUIZ_REPLY));
        let app = app(both_keys(), vec![google.clone()]);

        let (status, body) = send(app, post("/v1/quiz", r#"{"questionCount": 2}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "missing_input");
        assert_eq!(google.calls(), 0);
    }

    #[tokio::test]
    async fn test_quiz_without_question_count_is_bad_request() {
        let google = Arc::new(MockProviderAdapter::replying(ProviderId::GoogleAi, QUIZ_REPLY));
        let app = app(both_keys(), vec![google]);

        let (status, _) = send(
            app,
            post("/v1/quiz", r#"{"chapterContent": "Atoms and ions"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_quiz_returns_normalized_questions() {
        let google = Arc::new(MockProviderAdapter::replying(ProviderId::GoogleAi, QUIZ_REPLY));
        let app = app(both_keys(), vec![google]);
        let body = json!({
            "chapterContent": "Atoms are made of protons, neutrons and electrons.",
            "questionCount": 1,
            "difficulty": "easy"
        });

        let (status, body) = send(app, post("/v1/quiz", &body.to_string())).await;

        assert_eq!(status, StatusCode::OK);
        let questions = body["questions"].as_array().unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0]["correct"], "A");
        assert_eq!(questions[0]["options"]["A"], "+1");
    }

    #[tokio::test]
    async fn test_quiz_malformed_completion_includes_raw() {
        let google = Arc::new(MockProviderAdapter::replying(
            ProviderId::GoogleAi,
            "Here are your questions!",
        ));
        let app = app(both_keys(), vec![google]);
        let body = json!({"chapterContent": "Acids", "questionCount": 3});

        let (status, body) = send(app, post("/v1/quiz", &body.to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "malformed_provider_response");
        assert_eq!(body["raw"], "Here are your questions!");
    }

    #[tokio::test]
    async fn test_reactions_with_no_substances_is_bad_request() {
        let app = app(both_keys(), vec![]);

        let (status, body) = send(app, post("/v1/reactions", r#"{"substances": []}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "missing_input");
    }

    #[tokio::test]
    async fn test_reactions_falls_back_to_next_provider() {
        let google = Arc::new(MockProviderAdapter::failing(ProviderId::GoogleAi, 503));
        let groq = Arc::new(MockProviderAdapter::replying(
            ProviderId::Groq,
            r#"{"possible": false, "reactions": [], "noReactionReason": "Both are noble gases"}"#,
        ));
        let app = app(both_keys(), vec![google.clone(), groq.clone()]);

        let (status, body) = send(
            app,
            post("/v1/reactions", r#"{"substances": ["He", "Ne"]}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["possible"], false);
        assert_eq!(google.calls(), 1);
        assert_eq!(groq.calls(), 1);
    }

    #[tokio::test]
    async fn test_reactions_malformed_completion_hides_raw() {
        let google = Arc::new(MockProviderAdapter::replying(ProviderId::GoogleAi, "nope"));
        let app = app(both_keys(), vec![google]);

        let (status, body) = send(
            app,
            post("/v1/reactions", r#"{"substances": ["Na", "Cl2"]}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.get("raw").is_none());
    }

    #[tokio::test]
    async fn test_malformed_request_json_is_bad_request() {
        let app = app(both_keys(), vec![]);

        let (status, body) = send(app, post("/v1/solve", "{\"question\": ")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_json");
    }

    #[tokio::test]
    async fn test_solve_when_all_providers_fail_is_internal_error() {
        let google = Arc::new(MockProviderAdapter::failing(ProviderId::GoogleAi, 500));
        let groq = Arc::new(MockProviderAdapter::failing(ProviderId::Groq, 401));
        let app = app(both_keys(), vec![google, groq]);

        let (status, body) = send(
            app,
            post("/v1/solve", r#"{"question": "How many moles in 36 g of water?"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "no_provider_available");
    }

    #[tokio::test]
    async fn test_solve_passes_rate_limit_through() {
        let google = Arc::new(MockProviderAdapter::failing(ProviderId::GoogleAi, 429));
        let groq = Arc::new(MockProviderAdapter::failing(ProviderId::Groq, 500));
        let app = app(both_keys(), vec![google, groq]);

        let (status, body) = send(
            app,
            post("/v1/solve", r#"{"question": "Balance H2 + O2"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["code"], "rate_limited");
    }

    #[tokio::test]
    async fn test_solve_returns_solution_text() {
        let groq = Arc::new(MockProviderAdapter::replying(
            ProviderId::Groq,
            "  2 H2 + O2 -> 2 H2O \n",
        ));
        let app = app(both_keys(), vec![groq]);

        let (status, body) = send(
            app,
            post("/v1/solve", r#"{"question": "Balance H2 + O2"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["solution"], "2 H2 + O2 -> 2 H2O");
    }

    fn photo_data_url(bytes: usize) -> String {
        format!("data:image/jpeg;base64,{}", STANDARD.encode(vec![0xffu8; bytes]))
    }

    #[tokio::test]
    async fn test_solve_accepts_photo_over_default_body_limit() {
        let google = Arc::new(
            MockProviderAdapter::replying(ProviderId::GoogleAi, "The flask holds 0.5 mol NaCl.")
                .with_capabilities(ProviderCapabilities {
                    images: true,
                    json_mode: true,
                }),
        );
        let app = app(both_keys(), vec![google.clone()]);
        let body = json!({"question": "q", "imageData": photo_data_url(2_400_000)}).to_string();
        assert!(body.len() > 2 * 1024 * 1024);

        let (status, body) = send(app, post("/v1/solve", &body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["solution"], "The flask holds 0.5 mol NaCl.");
        assert_eq!(google.calls(), 1);
        assert_eq!(google.last_call_had_image(), Some(true));
    }

    #[tokio::test]
    async fn test_body_over_configured_limit_is_payload_too_large() {
        let google = Arc::new(MockProviderAdapter::replying(ProviderId::GoogleAi, "unused"));
        let app = app_with_limit(both_keys(), vec![google.clone()], 64 * 1024);
        let body = json!({"question": "q", "imageData": photo_data_url(100 * 1024)}).to_string();

        let (status, body) = send(app, post("/v1/solve", &body)).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["code"], "payload_too_large");
        assert_eq!(google.calls(), 0);
    }

    #[tokio::test]
    async fn test_response_echoes_request_id() {
        let app = app(EnvSnapshot::default(), vec![]);
        let request = Request::builder()
            .uri("/live")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }
}
