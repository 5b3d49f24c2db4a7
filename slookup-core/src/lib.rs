//! Core library for the `slookup` CLI.
//!
//! This crate defines:
//! - Location normalization for the geo lookup query
//! - The station provider abstraction and its HTTP implementation
//! - Decoding and printing of nearby weather stations
//!
//! It is used by `slookup-cli`, but the pipeline can be driven from anywhere
//! that supplies its own writers.

pub mod error;
pub mod location;
pub mod lookup;
pub mod model;
pub mod provider;
pub mod report;

pub use error::LookupError;
pub use location::{DEFAULT_LOCATION, LocationQuery, normalize};
pub use lookup::{LookupConfig, Outcome, lookup, run};
pub use model::{StationList, StationRecord};
pub use provider::{StationProvider, geolookup::GeoLookupProvider, provider_from_config};
pub use report::{parse_stations, write_stations};
