//! The normalize → fetch → decode → print pipeline.

use std::io::Write;

use crate::{
    error::LookupError,
    location::LocationQuery,
    model::StationList,
    provider::{StationProvider, geolookup::DEFAULT_ENDPOINT},
    report::{parse_stations, write_stations},
};

/// Everything one run needs, fixed before the pipeline starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    pub location: LocationQuery,
    /// Endpoint template the normalized location is appended to.
    pub endpoint: String,
    /// Treat transport failures as fatal instead of silently exiting.
    pub strict_transport: bool,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            location: LocationQuery::default(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            strict_transport: false,
        }
    }
}

/// How a run ended, as far as the process is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Fatal,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Success => 0,
            Outcome::Fatal => 1,
        }
    }
}

/// Fetch and decode the stations near `location`.
pub async fn lookup(
    provider: &dyn StationProvider,
    location: &LocationQuery,
) -> Result<StationList, LookupError> {
    let normalized = location.normalized();
    let body = provider.fetch(&normalized).await?;
    parse_stations(&body)
}

/// Run the whole pipeline once, writing the report to `out` and any fatal
/// diagnostic to `err`.
///
/// Only a response that cannot be decoded is fatal, and nothing reaches
/// `out` in that case. Transport failures end the run quietly with
/// [`Outcome::Success`] unless `strict_transport` is set. A report that
/// cannot be written is dropped without changing the outcome.
pub async fn run<O: Write, E: Write>(
    provider: &dyn StationProvider,
    config: &LookupConfig,
    out: &mut O,
    err: &mut E,
) -> Outcome {
    match lookup(provider, &config.location).await {
        Ok(stations) => {
            match write_stations(&stations, out) {
                Ok(()) => {
                    tracing::info!(
                        count = stations.len(),
                        location = %config.location,
                        "reported nearby stations"
                    );
                }
                Err(e) => {
                    tracing::debug!(error = %e, location = %config.location, "report not written");
                }
            }
            Outcome::Success
        }
        Err(e) if e.is_transport() && !config.strict_transport => {
            tracing::debug!(error = %e, location = %config.location, "lookup skipped");
            Outcome::Success
        }
        Err(e) => {
            // Nowhere left to report a failing stderr.
            let _ = writeln!(err, "Fatal error {e}");
            Outcome::Fatal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::geolookup::tests::{local_provider, truncated_endpoint};
    use async_trait::async_trait;
    use std::{io, sync::Mutex};

    /// Serves a fixed body and remembers what it was asked for.
    #[derive(Debug)]
    struct FixtureProvider {
        body: &'static str,
        queries: Mutex<Vec<String>>,
    }

    impl FixtureProvider {
        fn new(body: &'static str) -> Self {
            Self { body, queries: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl StationProvider for FixtureProvider {
        async fn fetch(&self, normalized_location: &str) -> Result<Vec<u8>, LookupError> {
            self.queries.lock().unwrap().push(normalized_location.to_string());
            Ok(self.body.as_bytes().to_vec())
        }
    }

    /// Writer whose reader has gone away.
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    const THREE_STATIONS: &str = "<location><nearby_weather_stations><airport>\
        <station><city>Omaha</city><icao>KOMA</icao></station>\
        <station><city>Lincoln</city><icao>KLNK</icao></station>\
        <station><city>Kearney</city><icao>KEAR</icao></station>\
        </airport></nearby_weather_stations></location>";

    async fn run_with(provider: &dyn StationProvider, config: &LookupConfig) -> (Outcome, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let outcome = run(provider, config, &mut out, &mut err).await;
        (outcome, String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[tokio::test]
    async fn prints_stations_in_order() {
        let provider = FixtureProvider::new(THREE_STATIONS);
        let (outcome, out, err) = run_with(&provider, &LookupConfig::default()).await;

        assert_eq!(outcome, Outcome::Success);
        assert_eq!(out, "Omaha: KOMA\nLincoln: KLNK\nKearney: KEAR\n");
        assert!(err.is_empty());
    }

    #[tokio::test]
    async fn provider_receives_normalized_location() {
        let provider = FixtureProvider::new("<location/>");
        let config = LookupConfig { location: "New York, NY".into(), ..LookupConfig::default() };
        run_with(&provider, &config).await;

        assert_eq!(*provider.queries.lock().unwrap(), ["NewYork,NY"]);
    }

    #[tokio::test]
    async fn no_stations_prints_nothing() {
        let provider = FixtureProvider::new("<location><nearby_weather_stations/></location>");
        let (outcome, out, err) = run_with(&provider, &LookupConfig::default()).await;

        assert_eq!(outcome, Outcome::Success);
        assert!(out.is_empty());
        assert!(err.is_empty());
    }

    #[tokio::test]
    async fn missing_icao_prints_empty_identifier() {
        let provider = FixtureProvider::new(
            "<location><nearby_weather_stations><airport>\
             <station><city>Omaha</city><icao>KOMA</icao></station>\
             <station><city>Lincoln</city></station>\
             </airport></nearby_weather_stations></location>",
        );
        let (_, out, _) = run_with(&provider, &LookupConfig::default()).await;

        assert_eq!(out, "Omaha: KOMA\nLincoln: \n");
    }

    #[tokio::test]
    async fn malformed_body_is_fatal_and_prints_nothing() {
        let provider = FixtureProvider::new(
            "<location><nearby_weather_stations><airport><station><city>Omaha</city>",
        );
        let (outcome, out, err) = run_with(&provider, &LookupConfig::default()).await;

        assert_eq!(outcome, Outcome::Fatal);
        assert_eq!(outcome.exit_code(), 1);
        assert!(out.is_empty());
        assert!(err.starts_with("Fatal error "));
        assert_eq!(err.lines().count(), 1);
    }

    #[tokio::test]
    async fn transport_failure_is_silent_by_default() {
        let provider = local_provider("http://127.0.0.1:9/geo?query=");
        let (outcome, out, err) = run_with(&provider, &LookupConfig::default()).await;

        assert_eq!(outcome, Outcome::Success);
        assert_eq!(outcome.exit_code(), 0);
        assert!(out.is_empty());
        assert!(err.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_is_fatal_when_strict() {
        let provider = local_provider("http://127.0.0.1:9/geo?query=");
        let config = LookupConfig { strict_transport: true, ..LookupConfig::default() };
        let (outcome, out, err) = run_with(&provider, &config).await;

        assert_eq!(outcome, Outcome::Fatal);
        assert!(out.is_empty());
        assert!(err.starts_with("Fatal error transport error"));
    }

    #[tokio::test]
    async fn unwritable_report_is_not_fatal() {
        let provider = FixtureProvider::new(THREE_STATIONS);
        let mut err = Vec::new();
        let outcome = run(&provider, &LookupConfig::default(), &mut ClosedPipe, &mut err).await;

        assert_eq!(outcome, Outcome::Success);
        assert_eq!(outcome.exit_code(), 0);
        assert!(err.is_empty());
    }

    #[tokio::test]
    async fn body_cut_short_is_fatal() {
        let provider = local_provider(&truncated_endpoint());
        let (outcome, out, err) = run_with(&provider, &LookupConfig::default()).await;

        assert_eq!(outcome, Outcome::Fatal);
        assert!(out.is_empty());
        assert!(err.starts_with("Fatal error XML syntax error"), "stderr was: {err}");
    }
}
