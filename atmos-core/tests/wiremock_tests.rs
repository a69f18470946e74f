//! Integration tests for the forecast client using wiremock
//!
//! These tests run the HTTP client and a full chat session against a mock
//! forecast server.

use atmos_core::{
    Deployment, Endpoint, ErrorBanner, ForecastClient, ForecastError, ForecastRequest,
    ForecastSession, FormState, HttpForecastClient, RenderStyle, Variant,
    style::WeatherIcon,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

fn sample_forecast(precipitation: f64, with_warnings: bool) -> serde_json::Value {
    let warnings = if with_warnings {
        serde_json::json!({
            "humidity": {
                "level": "moderate",
                "message": "HIGH HUMIDITY: Uncomfortable conditions with humidity at 84.0%."
            }
        })
    } else {
        serde_json::json!({})
    };

    serde_json::json!({
        "date": "2025-02-28",
        "forecast": "A muggy day along the coast.\n\nWeather Warnings: HIGH HUMIDITY at 84%\n\nEnjoy the evening breeze.",
        "disaster_warnings": warnings,
        "data_used": {
            "date": "2025-02-28 23:00:00+00:00",
            "temperature_2m": 29.34,
            "relative_humidity_2m": 84.0,
            "dew_point_2m": 26.1,
            "precipitation": precipitation,
            "wind_speed_10m": 14.26,
            "wind_gusts_10m": 22.0
        }
    })
}

fn client_for(server: &MockServer) -> HttpForecastClient {
    HttpForecastClient::new(Endpoint::served(server.uri()))
}

async fn mount_forecast(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/generate_forecast"))
        .respond_with(response)
        .mount(server)
        .await;
}

// ============================================================================
// Client
// ============================================================================

#[tokio::test]
async fn posts_json_body_with_fixed_style() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate_forecast"))
        .and(header("content-type", "application/json"))
        .and(header("accept", "application/json"))
        .and(body_json(serde_json::json!({
            "date": "2025-02-28",
            "style": "balanced",
            "report_length": 200
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast(0.0, false)))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .submit_forecast(&ForecastRequest::from_form("2025-02-28", "200"))
        .await
        .expect("forecast should parse");

    assert_eq!(response.date, "2025-02-28");
    assert_eq!(response.data_used.temperature_2m, 29.34);
    assert!(response.disaster_warnings.is_empty());
}

#[tokio::test]
async fn not_found_reports_valid_range() {
    let server = MockServer::start().await;
    mount_forecast(
        &server,
        ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "detail": "No weather data found for 2026-02-19. Please try a different date between 2024-01-01 and 2026-02-18."
        })),
    )
    .await;

    let err = client_for(&server)
        .submit_forecast(&ForecastRequest::from_form("2026-02-19", "200"))
        .await
        .unwrap_err();

    assert!(matches!(err, ForecastError::NotFound { .. }));
    assert_eq!(
        err.to_string(),
        "No weather data found for 2026-02-19. Please try a date between January 1, 2024 and February 18, 2026."
    );
}

#[tokio::test]
async fn server_detail_is_surfaced() {
    let server = MockServer::start().await;
    mount_forecast(
        &server,
        ResponseTemplate::new(502).set_body_json(serde_json::json!({
            "detail": "Error from language model service: quota exceeded"
        })),
    )
    .await;

    let err = client_for(&server)
        .submit_forecast(&ForecastRequest::from_form("2025-01-01", "100"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Error from language model service: quota exceeded");
}

#[tokio::test]
async fn plain_text_error_body_is_surfaced() {
    let server = MockServer::start().await;
    mount_forecast(&server, ResponseTemplate::new(500).set_body_string("Internal Server Error")).await;

    let err = client_for(&server)
        .submit_forecast(&ForecastRequest::from_form("2025-01-01", "100"))
        .await
        .unwrap_err();

    assert!(matches!(err, ForecastError::Server(_)));
    assert_eq!(err.to_string(), "Internal Server Error");
}

#[tokio::test]
async fn malformed_success_body_is_a_parse_error() {
    let server = MockServer::start().await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_string("{\"date\": 1")).await;

    let err = client_for(&server)
        .submit_forecast(&ForecastRequest::from_form("2025-01-01", "100"))
        .await
        .unwrap_err();

    assert!(matches!(err, ForecastError::Parse(_)));
}

#[tokio::test]
async fn unreachable_server_is_a_connectivity_error() {
    // Grab a free port and release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);

    let client = HttpForecastClient::new(Endpoint::served(format!("http://127.0.0.1:{port}")));
    let err = client
        .submit_forecast(&ForecastRequest::from_form("2025-01-01", "100"))
        .await
        .unwrap_err();

    match err {
        ForecastError::Connectivity { deployment, .. } => {
            assert_eq!(deployment, Deployment::Served);
        }
        other => panic!("expected connectivity error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_local_server_names_its_address() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);

    let base_url = format!("http://127.0.0.1:{port}");
    let client = HttpForecastClient::new(Endpoint::local_at(&base_url));
    let err = client
        .submit_forecast(&ForecastRequest::from_form("2025-01-01", "100"))
        .await
        .unwrap_err();

    assert!(matches!(err, ForecastError::Connectivity { deployment: Deployment::Local, .. }));
    assert_eq!(
        err.to_string(),
        format!(
            "Unable to connect to server. When running locally, please ensure the forecast server is running at {base_url}"
        )
    );
}

#[tokio::test]
async fn empty_error_body_uses_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate_forecast"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = HttpForecastClient::new(Endpoint::served(server.uri()));
    let err = client
        .submit_forecast(&ForecastRequest::from_form("2025-01-01", "100"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to get forecast");
}

#[tokio::test]
async fn health_check_parses_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "healthy",
            "database": "connected",
            "timestamp": "2025-02-28T10:00:00"
        })))
        .mount(&server)
        .await;

    let health = client_for(&server).health().await.expect("health");
    assert_eq!(health.status, "healthy");
    assert_eq!(health.database.as_deref(), Some("connected"));
}

// ============================================================================
// Session
// ============================================================================

fn session_for(server: &MockServer, variant: Variant) -> (ForecastSession, ErrorBanner) {
    let banner = ErrorBanner::default();
    let session = ForecastSession::new(
        Box::new(client_for(server)),
        Box::new(banner.clone()),
        RenderStyle::for_variant(variant),
    );
    (session, banner)
}

#[tokio::test]
async fn chat_session_renders_rainy_card_with_warning_block() {
    let server = MockServer::start().await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(sample_forecast(7.2, true))).await;

    let (mut session, banner) = session_for(&server, Variant::Chat);
    session.form = FormState { date: "2025-02-28".into(), report_length: "200".into() };

    let idx = session.submit().await.expect("submission");
    let card = session.card(idx).expect("card");

    assert_eq!(card.icon().icon, WeatherIcon::Rainy);
    let values: Vec<_> = card.stats().iter().map(|s| s.value.as_str()).collect();
    assert_eq!(values, ["29.3°C", "84.0%", "7.2mm", "14.3km/h"]);
    assert!(card.has_warning_block());
    assert!(!banner.is_visible());
    assert!(session.form.date.is_empty());
}

#[tokio::test]
async fn classic_session_without_warnings_has_no_highlight() {
    let server = MockServer::start().await;
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(sample_forecast(0.0, false))).await;

    let (mut session, _) = session_for(&server, Variant::Classic);
    session.form = FormState { date: "2025-02-28".into(), report_length: "150".into() };

    let idx = session.submit().await.expect("submission");
    let card = session.card(idx).expect("card");

    let values: Vec<_> = card.stats().iter().map(|s| s.value.as_str()).collect();
    assert_eq!(values, ["29.34°C", "84.00%", "0.00mm", "14.26km/h"]);
    assert!(!card.has_warning_block());
    assert!(card.narrative_markdown().contains("Weather Warnings:"));
}

#[tokio::test]
async fn failed_session_submission_shows_banner() {
    let server = MockServer::start().await;
    mount_forecast(&server, ResponseTemplate::new(404)).await;

    let (mut session, banner) = session_for(&server, Variant::Chat);
    session.form = FormState { date: "2026-02-19".into(), report_length: "200".into() };

    assert!(session.submit().await.is_err());
    assert!(banner.is_visible());
    assert!(banner.message().contains("February 18, 2026"));
}
