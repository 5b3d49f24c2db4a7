use std::{convert::Infallible, fmt, str::FromStr};

/// Location used when the user does not pass one.
pub const DEFAULT_LOCATION: &str = "Lincoln, NE";

/// Raw location text as typed by the user.
///
/// Accepts anything the geo lookup service understands: "city, state",
/// "city, country", a zip code, an airport code or "lat,long". Nothing is
/// validated here; the service is the judge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery(String);

impl LocationQuery {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Query fragment ready to be appended to the endpoint template.
    pub fn normalized(&self) -> String {
        normalize(&self.0)
    }
}

impl Default for LocationQuery {
    fn default() -> Self {
        Self::new(DEFAULT_LOCATION)
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LocationQuery {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for LocationQuery {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Drop every whitespace run, gluing the remaining tokens together
/// ("New York, NY" -> "NewYork,NY").
///
/// No percent-encoding is done; the service accepts commas but not spaces.
pub fn normalize(raw: &str) -> String {
    raw.split_whitespace().collect()
}
