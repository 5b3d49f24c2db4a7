use std::{io, process::ExitCode};

use clap::Parser;
use slookup_core::{
    DEFAULT_LOCATION, LocationQuery, LookupConfig, provider::geolookup::DEFAULT_ENDPOINT,
    provider_from_config,
};

/// Printed by both `-V` and `--version`.
const VERSION_BANNER: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\n",
    "Copyright (C) 2011 by Stephen Ramsay\n",
    "Data courtesy of Weather Underground, Inc. and subject to the\n",
    "Weather Underground Data Feed Terms of Service. The program itself\n",
    "is free software, and you are welcome to redistribute it under\n",
    "certain conditions. See LICENSE for details."
);

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "slookup",
    version = VERSION_BANNER,
    about = "Print the weather stations near a location"
)]
pub struct Cli {
    /// Location. May be given as city, state; CITY,STATE; country; a US or
    /// Canadian zip code; a 3- or 4-letter airport code; or LAT,LONG.
    #[arg(short = 's', long, default_value = DEFAULT_LOCATION)]
    pub location: LocationQuery,

    /// Exit with an error when the lookup service cannot be reached,
    /// instead of quietly printing nothing.
    #[arg(long)]
    pub strict_transport: bool,

    /// Endpoint template the location is appended to.
    #[arg(long, hide = true, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

impl Cli {
    pub fn into_config(self) -> LookupConfig {
        LookupConfig {
            location: self.location,
            endpoint: self.endpoint,
            strict_transport: self.strict_transport,
        }
    }

    pub async fn run(self) -> ExitCode {
        let config = self.into_config();
        let provider = provider_from_config(&config);

        let outcome =
            slookup_core::run(provider.as_ref(), &config, &mut io::stdout(), &mut io::stderr()).await;

        ExitCode::from(outcome.exit_code())
    }
}
