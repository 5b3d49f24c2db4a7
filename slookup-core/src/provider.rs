use crate::{LookupConfig, error::LookupError, provider::geolookup::GeoLookupProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod geolookup;

/// Source of raw geo lookup documents.
#[async_trait]
pub trait StationProvider: Send + Sync + Debug {
    /// Fetch the response body for an already normalized location.
    async fn fetch(&self, normalized_location: &str) -> Result<Vec<u8>, LookupError>;
}

/// Construct the HTTP provider described by `config`.
pub fn provider_from_config(config: &LookupConfig) -> Box<dyn StationProvider> {
    Box::new(GeoLookupProvider::new().with_endpoint(config.endpoint.clone()))
}
