use std::fmt;

/// One weather station near the queried location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationRecord {
    pub city: String,
    pub icao: String,
}

impl StationRecord {
    pub fn new(city: impl Into<String>, icao: impl Into<String>) -> Self {
        Self { city: city.into(), icao: icao.into() }
    }
}

impl fmt::Display for StationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.city, self.icao)
    }
}

/// Stations in the order the service returned them. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationList(Vec<StationRecord>);

impl StationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: StationRecord) {
        self.0.push(record);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StationRecord> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<StationRecord> {
        self.0
    }
}

impl From<Vec<StationRecord>> for StationList {
    fn from(records: Vec<StationRecord>) -> Self {
        Self(records)
    }
}

impl<'a> IntoIterator for &'a StationList {
    type Item = &'a StationRecord;
    type IntoIter = std::slice::Iter<'a, StationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
