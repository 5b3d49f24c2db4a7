use async_trait::async_trait;
use reqwest::Client;

use crate::error::LookupError;

use super::StationProvider;

/// Endpoint template; the normalized location is appended verbatim.
pub const DEFAULT_ENDPOINT: &str =
    "http://api.wunderground.com/auto/wui/geo/GeoLookupXML/index.xml?query=";

/// Weather Underground geo lookup over plain HTTP.
#[derive(Debug, Clone)]
pub struct GeoLookupProvider {
    endpoint: String,
    http: Client,
}

impl Default for GeoLookupProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoLookupProvider {
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            http: Client::new(),
        }
    }

    /// Replace the endpoint template (for testing).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Use a preconfigured HTTP client.
    pub fn with_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    /// Full request URL. Plain concatenation, no percent-encoding.
    pub fn url_for(&self, normalized_location: &str) -> String {
        format!("{}{}", self.endpoint, normalized_location)
    }
}

#[async_trait]
impl StationProvider for GeoLookupProvider {
    async fn fetch(&self, normalized_location: &str) -> Result<Vec<u8>, LookupError> {
        let url = self.url_for(normalized_location);
        tracing::debug!(%url, "requesting nearby stations");

        let res = self.http.get(&url).send().await?;

        // Error statuses still carry a body worth handing to the decoder.
        let status = res.status();
        if !status.is_success() {
            tracing::debug!(%status, "geo lookup answered with a non-success status");
        }

        // Headers arrived, so a body cut short is a broken document, not a
        // transport failure.
        let body = res
            .bytes()
            .await
            .map_err(|err| LookupError::parse(format!("response body ended early: {err}")))?;
        tracing::debug!(bytes = body.len(), %status, "received geo lookup response");

        Ok(body.to_vec())
    }
}
