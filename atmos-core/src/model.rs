use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// Narrative style accepted by `/api/generate_forecast`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastStyle {
    #[default]
    Balanced,
    Detailed,
    Casual,
    Broadcast,
}

impl ForecastStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastStyle::Balanced => "balanced",
            ForecastStyle::Detailed => "detailed",
            ForecastStyle::Casual => "casual",
            ForecastStyle::Broadcast => "broadcast",
        }
    }

    pub const fn all() -> &'static [ForecastStyle] {
        &[
            ForecastStyle::Balanced,
            ForecastStyle::Detailed,
            ForecastStyle::Casual,
            ForecastStyle::Broadcast,
        ]
    }
}

impl fmt::Display for ForecastStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ForecastStyle {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "balanced" => Ok(ForecastStyle::Balanced),
            "detailed" => Ok(ForecastStyle::Detailed),
            "casual" => Ok(ForecastStyle::Casual),
            "broadcast" => Ok(ForecastStyle::Broadcast),
            _ => Err(anyhow::anyhow!(
                "Unknown style '{value}'. Supported styles: balanced, detailed, casual, broadcast."
            )),
        }
    }
}

/// Body of `POST /api/generate_forecast`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRequest {
    /// Whatever the date field held; the server is the only validator.
    pub date: String,
    pub style: ForecastStyle,
    /// `None` is sent as `null`, which is what an unparsable selection produces.
    pub report_length: Option<i64>,
}

impl ForecastRequest {
    /// Build a request from raw form values, coercing the report length the way
    /// a browser `parseInt` would.
    pub fn from_form(date: impl Into<String>, report_length: &str) -> Self {
        Self {
            date: date.into(),
            style: ForecastStyle::Balanced,
            report_length: parse_report_length(report_length),
        }
    }

    pub fn with_style(mut self, style: ForecastStyle) -> Self {
        self.style = style;
        self
    }
}

/// Leading-integer parse: optional whitespace, optional sign, then digits.
/// Anything after the digits is ignored; no digits at all yields `None`.
pub fn parse_report_length(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    let value: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Measurements the server based the narrative on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    pub temperature_2m: f64,
    pub relative_humidity_2m: f64,
    pub precipitation: f64,
    pub wind_speed_10m: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisasterWarning {
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub message: String,
}

/// Successful reply from `/api/generate_forecast`. Read-only once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub date: String,
    /// Markdown narrative.
    pub forecast: String,
    #[serde(default)]
    pub disaster_warnings: BTreeMap<String, DisasterWarning>,
    pub data_used: WeatherData,
}

impl ForecastResponse {
    pub fn has_warnings(&self) -> bool {
        !self.disaster_warnings.is_empty()
    }
}

/// Reply from `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}
