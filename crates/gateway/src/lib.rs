//! HTTP gateway for the Sommelier wine concierge.
//!
//! Routes:
//! - `GET /`: embedded chat page
//! - `GET /health`: liveness plus whether the concierge initialised
//! - `POST /chat`: JSON `{"message": ...}` or form `message=...`
//! - `GET /api/chat/{message}`: the same exchange addressed by path
//! - `POST /api/weather`: current conditions for `{"lat", "lon"}`
//!
//! Built on Axum. A panic inside a handler is turned into a 500 JSON body by
//! `tower_http::catch_panic`.

pub mod frontend;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, FromRequest, Path, Request, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sommelier_agent::ChatService;
use sommelier_config::AppConfig;
use sommelier_core::error::Error;
use sommelier_core::tool::Location;
use sommelier_tools::{WeatherClient, WeatherReading};
use std::any::Any;
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{error, info, warn};

const UNEXPECTED_ERROR: &str =
    "Sorry, I encountered an error processing your request. Please try again.";

/// Shared application state for the gateway.
///
/// Built once in [`start`] and never mutated.
pub struct GatewayState {
    /// `None` when the concierge could not be built (for example, no API
    /// key); chat routes then answer 503.
    pub concierge: Option<Arc<ChatService>>,
    pub weather: Arc<WeatherClient>,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with every route, the embedded page, and the
/// panic, body-size, and trace layers.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .route("/api/chat/{message}", get(chat_path_handler))
        .route("/api/weather", post(weather_handler))
        .with_state(state)
        .merge(frontend::frontend_router())
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
///
/// A concierge that fails to build is logged and left out; the server still
/// starts so `/health` can report it.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let concierge = match ChatService::from_config(&config) {
        Ok(service) => {
            info!("Wine concierge initialized");
            Some(Arc::new(service))
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize wine concierge; chat requests will get 503");
            None
        }
    };
    let weather = Arc::new(WeatherClient::from_config(&config)?);

    let app = build_router(Arc::new(GatewayState { concierge, weather }));

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn unexpected_response(details: impl Into<String>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": UNEXPECTED_ERROR, "details": details.into() })),
    )
        .into_response()
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    };
    error!(details = %details, "Request handler panicked");
    unexpected_response(details)
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    agent_ready: bool,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        agent_ready: state.concierge.is_some(),
    })
}

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct ChatResponse {
    user_message: String,
    bot_response: String,
    status: &'static str,
}

/// The `message` field of a chat submission, from either a JSON or a
/// form-encoded body. `None` when the body is missing or unreadable.
struct ChatSubmission(Option<String>);

impl<S> FromRequest<S> for ChatSubmission
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"));

        let parsed = if is_form {
            axum::Form::<ChatRequest>::from_request(req, state)
                .await
                .map(|axum::Form(body)| body)
                .ok()
        } else {
            Json::<ChatRequest>::from_request(req, state)
                .await
                .map(|Json(body)| body)
                .ok()
        };

        Ok(ChatSubmission(parsed.and_then(|body| body.message)))
    }
}

async fn chat_handler(State(state): State<SharedState>, submission: ChatSubmission) -> Response {
    respond(&state, submission.0).await
}

async fn chat_path_handler(
    State(state): State<SharedState>,
    Path(message): Path<String>,
) -> Response {
    respond(&state, Some(message)).await
}

/// Availability first, then input validation, then the concierge.
async fn respond(state: &GatewayState, message: Option<String>) -> Response {
    let Some(concierge) = state.concierge.as_ref() else {
        return error_response(StatusCode::SERVICE_UNAVAILABLE, "Wine concierge agent not available");
    };

    let message = message.as_deref().map(str::trim).unwrap_or_default();
    if message.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, Error::EmptyMessage.to_string());
    }

    info!(message_len = message.len(), "Chat message received");

    match concierge.chat(message).await {
        Ok(reply) => Json(ChatResponse {
            user_message: message.to_string(),
            bot_response: reply,
            status: "success",
        })
        .into_response(),
        Err(Error::EmptyMessage) => {
            error_response(StatusCode::BAD_REQUEST, Error::EmptyMessage.to_string())
        }
        Err(e) => {
            error!(error = %e, "Error processing chat request");
            unexpected_response(e.to_string())
        }
    }
}

#[derive(Deserialize)]
struct WeatherRequest {
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Serialize)]
struct WeatherResponse {
    #[serde(flatten)]
    reading: WeatherReading,
    summary: String,
}

async fn weather_handler(
    State(state): State<SharedState>,
    payload: Result<Json<WeatherRequest>, JsonRejection>,
) -> Response {
    let (lat, lon) = match payload {
        Ok(Json(WeatherRequest {
            lat: Some(lat),
            lon: Some(lon),
        })) => (lat, lon),
        Ok(_) => {
            return error_response(StatusCode::BAD_REQUEST, "Both lat and lon are required");
        }
        Err(rejection) => {
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    match state.weather.reading(&Location::Coordinates { lat, lon }).await {
        Ok(reading) => {
            let summary = reading.summary();
            Json(WeatherResponse { reading, summary }).into_response()
        }
        Err(e) => {
            warn!(error = %e, lat, lon, "Weather request failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use mockito::Matcher;
    use sommelier_agent::{ContextRouter, ResponseGenerator};
    use sommelier_core::error::ToolError;
    use sommelier_core::tool::{KnowledgeLookup, WeatherLookup, WebSearch};
    use sommelier_providers::OpenAiCompatProvider;
    use std::time::Duration;
    use tower::ServiceExt;

    struct Knowledge;

    #[async_trait]
    impl KnowledgeLookup for Knowledge {
        async fn lookup(&self, query: &str) -> Result<String, ToolError> {
            Ok(format!("Tasting Room Hours: 10am - 6pm ({query})"))
        }
        async fn full_info(&self) -> Result<String, ToolError> {
            Ok("Tasting Room Hours: 10am - 6pm".into())
        }
    }

    struct Weather;

    #[async_trait]
    impl WeatherLookup for Weather {
        async fn current_weather(&self, location: &Location) -> Result<String, ToolError> {
            Ok(format!("Current weather in {location}: 21°C, Clear sky. Humidity: 40%"))
        }
    }

    struct PanickingSearch;

    #[async_trait]
    impl WebSearch for PanickingSearch {
        async fn search(&self, _query: &str, _max_results: usize) -> Result<String, ToolError> {
            panic!("search index corrupted");
        }
    }

    fn weather_client(base_url: &str) -> Arc<WeatherClient> {
        Arc::new(WeatherClient::new(base_url, Some("test-key".into()), Duration::from_secs(5)).unwrap())
    }

    fn concierge(completion_url: &str) -> Arc<ChatService> {
        let router = ContextRouter::new(
            Arc::new(Knowledge),
            Arc::new(Weather),
            Arc::new(PanickingSearch),
            Location::named("Napa, CA"),
        );
        let provider = Arc::new(OpenAiCompatProvider::new("openai", completion_url, "sk-test"));
        let generator = ResponseGenerator::new(provider, "gpt-3.5-turbo", 0.7);
        Arc::new(ChatService::new(router, generator))
    }

    async fn completion_server(reply: &str) -> mockito::ServerGuard {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({ "choices": [{ "message": { "role": "assistant", "content": reply } }] })
                    .to_string(),
            )
            .create_async()
            .await;
        server
    }

    fn app(concierge: Option<Arc<ChatService>>, weather: Arc<WeatherClient>) -> Router {
        build_router(Arc::new(GatewayState { concierge, weather }))
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_reports_agent_not_ready() {
        let app = app(None, weather_client("http://127.0.0.1:9"));
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "healthy", "agent_ready": false }));
    }

    #[tokio::test]
    async fn health_reports_agent_ready() {
        let server = completion_server("hi").await;
        let app = app(Some(concierge(&server.url())), weather_client("http://127.0.0.1:9"));
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (_, body) = send(app, req).await;
        assert_eq!(body["agent_ready"], true);
    }

    #[tokio::test]
    async fn chat_json_success() {
        let server = completion_server("We're open 10am to 6pm every day!").await;
        let app = app(Some(concierge(&server.url())), weather_client("http://127.0.0.1:9"));

        let (status, body) = send(app, post_json("/chat", json!({ "message": "  hello  " }))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["user_message"], "hello");
        assert_eq!(body["bot_response"], "We're open 10am to 6pm every day!");
    }

    #[tokio::test]
    async fn chat_form_success() {
        let server = completion_server("Cheers!").await;
        let app = app(Some(concierge(&server.url())), weather_client("http://127.0.0.1:9"));

        let req = Request::builder()
            .method("POST")
            .uri("/chat")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("message=What+are+your+hours%3F"))
            .unwrap();
        let (status, body) = send(app, req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user_message"], "What are your hours?");
        assert_eq!(body["bot_response"], "Cheers!");
    }

    #[tokio::test]
    async fn chat_empty_message_is_bad_request() {
        let server = completion_server("unused").await;
        let app = app(Some(concierge(&server.url())), weather_client("http://127.0.0.1:9"));

        let (status, body) = send(app, post_json("/chat", json!({ "message": "" }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Please provide a message");
    }

    #[tokio::test]
    async fn chat_missing_or_unparseable_body_is_bad_request() {
        let server = completion_server("unused").await;
        let concierge = concierge(&server.url());

        let (status, _) = send(
            app(Some(concierge.clone()), weather_client("http://127.0.0.1:9")),
            post_json("/chat", json!({ "text": "hello" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let req = Request::builder()
            .method("POST")
            .uri("/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, _) = send(app(Some(concierge), weather_client("http://127.0.0.1:9")), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unavailable_agent_is_checked_before_input() {
        let app = app(None, weather_client("http://127.0.0.1:9"));
        let (status, body) = send(app, post_json("/chat", json!({ "message": "" }))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Wine concierge agent not available");
    }

    #[tokio::test]
    async fn completion_failure_still_returns_success() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("upstream down")
            .create_async()
            .await;
        let app = app(Some(concierge(&server.url())), weather_client("http://127.0.0.1:9"));

        let (status, body) = send(app, post_json("/chat", json!({ "message": "wine list" }))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        let reply = body["bot_response"].as_str().unwrap();
        assert!(reply.starts_with(
            "I apologize, but I'm having trouble processing your request right now. Please try again. Error: "
        ));
    }

    #[tokio::test]
    async fn handler_panic_becomes_internal_error() {
        let server = completion_server("unused").await;
        let app = app(Some(concierge(&server.url())), weather_client("http://127.0.0.1:9"));

        let (status, body) = send(app, post_json("/chat", json!({ "message": "latest news" }))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], UNEXPECTED_ERROR);
        assert_eq!(body["details"], "search index corrupted");
    }

    #[tokio::test]
    async fn chat_by_path_segment() {
        let server = completion_server("Our Merlot is lovely.").await;
        let app = app(Some(concierge(&server.url())), weather_client("http://127.0.0.1:9"));

        let req = Request::builder()
            .uri("/api/chat/Tell%20me%20about%20merlot")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user_message"], "Tell me about merlot");
        assert_eq!(body["bot_response"], "Our Merlot is lovely.");
    }

    #[tokio::test]
    async fn whitespace_path_segment_is_bad_request() {
        let server = completion_server("unused").await;
        let app = app(Some(concierge(&server.url())), weather_client("http://127.0.0.1:9"));

        let req = Request::builder().uri("/api/chat/%20%20").body(Body::empty()).unwrap();
        let (status, _) = send(app, req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn weather_by_coordinates() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/data/2.5/weather")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("lat".into(), "38.5".into()),
                Matcher::UrlEncoded("lon".into(), "-122.25".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"weather":[{"description":"few clouds"}],"main":{"temp":19.5,"humidity":55}}"#)
            .create_async()
            .await;
        let app = app(None, weather_client(&server.url()));

        let (status, body) =
            send(app, post_json("/api/weather", json!({ "lat": 38.5, "lon": -122.25 }))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["temperature_celsius"], 19.5);
        assert_eq!(body["humidity_percent"], 55.0);
        assert_eq!(body["description"], "Few clouds");
        assert_eq!(
            body["summary"],
            "Current weather in 38.5, -122.25: 19.5°C, Few clouds. Humidity: 55%"
        );
    }

    #[tokio::test]
    async fn weather_missing_coordinate_is_bad_request() {
        let app = app(None, weather_client("http://127.0.0.1:9"));
        let (status, body) = send(app, post_json("/api/weather", json!({ "lat": 38.5 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Both lat and lon are required");
    }

    #[tokio::test]
    async fn weather_upstream_failure_is_internal_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/data/2.5/weather")
            .match_query(Matcher::Any)
            .with_status(502)
            .create_async()
            .await;
        let app = app(None, weather_client(&server.url()));

        let (status, body) =
            send(app, post_json("/api/weather", json!({ "lat": 1.0, "lon": 2.0 }))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "weather returned HTTP 502");
    }
}
