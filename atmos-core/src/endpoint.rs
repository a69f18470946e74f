use std::fmt;

use reqwest::Url;

/// Loopback origin used when the client is not served from a web origin.
pub const LOCAL_BASE_URL: &str = "http://localhost:8000";

pub const FORECAST_PATH: &str = "/api/generate_forecast";
pub const HEALTH_PATH: &str = "/health";

/// How the client reaches the forecast server. Only changes the wording of
/// connectivity errors; the URL always comes from [`Endpoint::base_url`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deployment {
    /// Running outside any web origin, talking to the loopback server.
    Local,
    /// Served next to the API.
    Served,
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deployment::Local => f.write_str("local"),
            Deployment::Served => f.write_str("served"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_url: String,
    deployment: Deployment,
}

impl Endpoint {
    pub fn local() -> Self {
        Self::local_at(LOCAL_BASE_URL)
    }

    /// A loopback server on a non-default address, e.g. `http://127.0.0.1:9000`.
    pub fn local_at(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            deployment: Deployment::Local,
        }
    }

    /// An explicit origin such as `https://atmos.example.com`. Trailing slashes are dropped
    /// so paths can be appended verbatim.
    pub fn served(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            deployment: Deployment::Served,
        }
    }

    /// Pick the endpoint from the location a page was loaded from: `file:` pages talk to
    /// the loopback server, everything else talks to its own origin.
    pub fn from_page_location(location: &str) -> anyhow::Result<Self> {
        let url = Url::parse(location)
            .map_err(|e| anyhow::anyhow!("Invalid page location '{location}': {e}"))?;

        if url.scheme() == "file" {
            return Ok(Self::local());
        }

        let origin = url.origin();
        if !origin.is_tuple() {
            return Err(anyhow::anyhow!("Page location '{location}' has no usable origin"));
        }

        Ok(Self::served(origin.ascii_serialization()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn deployment(&self) -> Deployment {
        self.deployment
    }

    pub fn forecast_url(&self) -> String {
        format!("{}{}", self.base_url, FORECAST_PATH)
    }

    pub fn health_url(&self) -> String {
        format!("{}{}", self.base_url, HEALTH_PATH)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_pages_use_loopback() {
        let ep = Endpoint::from_page_location("file:///home/me/atmos/index.html").unwrap();
        assert_eq!(ep.deployment(), Deployment::Local);
        assert_eq!(ep.forecast_url(), "http://localhost:8000/api/generate_forecast");
    }

    #[test]
    fn served_pages_use_their_own_origin() {
        let ep = Endpoint::from_page_location("https://atmos.example.com:8443/app/index.html").unwrap();
        assert_eq!(ep.deployment(), Deployment::Served);
        assert_eq!(ep.forecast_url(), "https://atmos.example.com:8443/api/generate_forecast");
    }

    #[test]
    fn served_trims_trailing_slash() {
        let ep = Endpoint::served("http://10.0.0.2:9000/");
        assert_eq!(ep.health_url(), "http://10.0.0.2:9000/health");
    }

    #[test]
    fn local_at_keeps_loopback_deployment() {
        let ep = Endpoint::local_at("http://127.0.0.1:9000/");
        assert_eq!(ep.deployment(), Deployment::Local);
        assert_eq!(ep.forecast_url(), "http://127.0.0.1:9000/api/generate_forecast");
    }

    #[test]
    fn garbage_location_is_rejected() {
        assert!(Endpoint::from_page_location("not a url").is_err());
    }
}
