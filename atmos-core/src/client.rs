use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use std::fmt::Debug;
use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::{
    endpoint::{Deployment, Endpoint},
    model::{ForecastRequest, ForecastResponse, HealthStatus},
};

const FALLBACK_FAILURE: &str = "Failed to get forecast";

/// Every way a forecast submission can fail. `Display` is the user-facing text.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("No weather data found for {date}. Please try a date between January 1, 2024 and February 18, 2026.")]
    NotFound { date: String },

    /// Non-2xx other than 404; carries `detail` or the raw body.
    #[error("{0}")]
    Server(String),

    #[error("{}", connectivity_message(.endpoint, .deployment))]
    Connectivity { endpoint: String, deployment: Deployment },

    #[error("Failed to parse forecast response: {0}")]
    Parse(String),
}

fn connectivity_message(endpoint: &str, deployment: &Deployment) -> String {
    match deployment {
        Deployment::Local => format!(
            "Unable to connect to server. When running locally, please ensure the forecast server is running at {endpoint}"
        ),
        Deployment::Served => {
            "Unable to connect to server. Please ensure the forecast server is running.".to_string()
        }
    }
}

#[async_trait]
pub trait ForecastClient: Send + Sync + Debug {
    async fn submit_forecast(
        &self,
        request: &ForecastRequest,
    ) -> Result<ForecastResponse, ForecastError>;

    async fn health(&self) -> Result<HealthStatus, ForecastError>;
}

/// reqwest-backed client for the forecast server. No timeout and no retries: a request
/// either completes or surfaces its error.
#[derive(Debug, Clone)]
pub struct HttpForecastClient {
    endpoint: Endpoint,
    http: Client,
}

impl HttpForecastClient {
    pub fn new(endpoint: Endpoint) -> Self {
        Self { endpoint, http: Client::new() }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn connectivity_error(&self, err: &reqwest::Error) -> ForecastError {
        error!(error = %err, endpoint = %self.endpoint.base_url(), "forecast server unreachable");
        ForecastError::Connectivity {
            endpoint: self.endpoint.base_url().to_string(),
            deployment: self.endpoint.deployment(),
        }
    }
}

#[async_trait]
impl ForecastClient for HttpForecastClient {
    #[instrument(skip(self), fields(date = %request.date))]
    async fn submit_forecast(
        &self,
        request: &ForecastRequest,
    ) -> Result<ForecastResponse, ForecastError> {
        let url = self.endpoint.forecast_url();
        debug!(%url, report_length = ?request.report_length, "sending forecast request");

        let res = self
            .http
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| self.connectivity_error(&e))?;

        let status = res.status();
        debug!(%status, "forecast response received");

        let body = res.text().await.map_err(|e| self.connectivity_error(&e))?;

        if !status.is_success() {
            let err = error_from_status(status, &request.date, &body);
            error!(%status, message = %err, "forecast request failed");
            return Err(err);
        }

        let parsed: ForecastResponse =
            serde_json::from_str(&body).map_err(|e| ForecastError::Parse(e.to_string()))?;
        debug!(
            date = %parsed.date,
            warnings = parsed.disaster_warnings.len(),
            "forecast parsed"
        );

        Ok(parsed)
    }

    async fn health(&self) -> Result<HealthStatus, ForecastError> {
        let url = self.endpoint.health_url();
        debug!(%url, "checking server health");

        let res = self
            .http
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.connectivity_error(&e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| self.connectivity_error(&e))?;

        if !status.is_success() {
            return Err(ForecastError::Server(server_message(&body)));
        }

        serde_json::from_str(&body).map_err(|e| ForecastError::Parse(e.to_string()))
    }
}

/// Map a non-2xx reply to the message shown to the user.
fn error_from_status(status: StatusCode, date: &str, body: &str) -> ForecastError {
    if status == StatusCode::NOT_FOUND {
        return ForecastError::NotFound { date: date.to_string() };
    }

    ForecastError::Server(server_message(body))
}

/// `detail` from a JSON body, the generic fallback for JSON without one,
/// or the body itself when it is not JSON at all.
fn server_message(body: &str) -> String {
    if body.trim().is_empty() {
        return FALLBACK_FAILURE.to_string();
    }

    let value = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value,
        Err(_) => return body.to_string(),
    };

    match value.get("detail") {
        Some(serde_json::Value::String(detail)) if !detail.is_empty() => detail.clone(),
        // FastAPI validation failures put a list of problems here.
        Some(detail @ (serde_json::Value::Array(_) | serde_json::Value::Object(_))) => {
            detail.to_string()
        }
        _ => FALLBACK_FAILURE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_restates_the_data_range() {
        let err = error_from_status(StatusCode::NOT_FOUND, "2026-02-19", "{}");
        assert_eq!(
            err.to_string(),
            "No weather data found for 2026-02-19. Please try a date between January 1, 2024 and February 18, 2026."
        );
    }

    #[test]
    fn detail_field_wins_for_other_statuses() {
        let err = error_from_status(
            StatusCode::SERVICE_UNAVAILABLE,
            "2025-01-01",
            r#"{"detail":"Database connection is not available"}"#,
        );
        assert_eq!(err.to_string(), "Database connection is not available");
    }

    #[test]
    fn empty_body_falls_back_to_generic_text() {
        let err = error_from_status(StatusCode::INTERNAL_SERVER_ERROR, "2025-01-01", "");
        assert_eq!(err.to_string(), "Failed to get forecast");

        let err = error_from_status(StatusCode::BAD_GATEWAY, "2025-01-01", "  \n");
        assert_eq!(err.to_string(), "Failed to get forecast");
    }

    #[test]
    fn json_without_detail_falls_back_to_generic_text() {
        let err = error_from_status(StatusCode::BAD_REQUEST, "x", r#"{"error":"nope"}"#);
        assert_eq!(err.to_string(), "Failed to get forecast");
    }

    #[test]
    fn structured_detail_is_shown_as_json() {
        let err = error_from_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            "x",
            r#"{"detail":[{"loc":["body","date"],"msg":"field required"}]}"#,
        );
        assert!(err.to_string().contains("field required"));
    }

    #[test]
    fn plain_text_body_is_shown_verbatim() {
        let err = error_from_status(StatusCode::BAD_GATEWAY, "x", "upstream exploded");
        assert_eq!(err.to_string(), "upstream exploded");
    }

    #[test]
    fn local_connectivity_names_the_loopback_address() {
        let err = ForecastError::Connectivity {
            endpoint: crate::endpoint::LOCAL_BASE_URL.to_string(),
            deployment: Deployment::Local,
        };
        assert!(err.to_string().contains("http://localhost:8000"));
    }

    #[test]
    fn served_connectivity_is_generic() {
        let err = ForecastError::Connectivity {
            endpoint: "https://atmos.example.com".to_string(),
            deployment: Deployment::Served,
        };
        let msg = err.to_string();
        assert!(msg.contains("Please ensure the forecast server is running."));
        assert!(!msg.contains("atmos.example.com"));
    }
}
