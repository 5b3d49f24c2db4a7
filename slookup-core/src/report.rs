//! Station decoding and printing.
//!
//! The geo lookup document looks roughly like
//!
//! ```xml
//! <location>
//!   <nearby_weather_stations>
//!     <airport>
//!       <station><city>Omaha</city><icao>KOMA</icao></station>
//!     </airport>
//!   </nearby_weather_stations>
//! </location>
//! ```
//!
//! Only `station` elements at exactly that path below the root are read.
//! Everything else is skipped, but the whole document must still be
//! well-formed.

use std::io::Write;

use quick_xml::{
    Reader,
    encoding::Decoder,
    escape::resolve_predefined_entity,
    events::{BytesStart, Event},
};

use crate::{
    error::LookupError,
    model::{StationList, StationRecord},
};

/// Element path from the root's children down to a station.
const STATION_PATH: [&[u8]; 3] = [b"nearby_weather_stations", b"airport", b"station"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    City,
    Icao,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        if name.eq_ignore_ascii_case(b"city") {
            Some(Self::City)
        } else if name.eq_ignore_ascii_case(b"icao") {
            Some(Self::Icao)
        } else {
            None
        }
    }
}

/// A station being read. Child elements win over attributes.
#[derive(Debug, Default)]
struct StationDraft {
    city: Option<String>,
    icao: Option<String>,
    city_attr: Option<String>,
    icao_attr: Option<String>,
}

impl StationDraft {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::City => &mut self.city,
            Field::Icao => &mut self.icao,
        }
    }

    fn finish(self) -> StationRecord {
        StationRecord {
            city: self.city.or(self.city_attr).unwrap_or_default(),
            icao: self.icao.or(self.icao_attr).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default)]
struct StationWalker {
    /// Open elements, root first.
    open: Vec<Vec<u8>>,
    station: Option<StationDraft>,
    field: Option<Field>,
    stations: StationList,
}

impl StationWalker {
    /// Names of the open elements below the root.
    fn below_root(&self) -> &[Vec<u8>] {
        self.open.get(1..).unwrap_or_default()
    }

    fn at_path(&self, path: &[&[u8]]) -> bool {
        let open = self.below_root();
        open.len() == path.len() && open.iter().zip(path).all(|(a, b)| a.as_slice() == *b)
    }

    fn start(&mut self, e: &BytesStart<'_>, decoder: Decoder) -> Result<(), LookupError> {
        let name = e.local_name().as_ref().to_vec();

        if self.at_path(&STATION_PATH) {
            // Direct child of <station>.
            if let (Some(draft), Some(field)) = (self.station.as_mut(), Field::from_name(&name)) {
                *draft.slot(field) = Some(String::new());
                self.field = Some(field);
            }
        }

        self.open.push(name);

        if self.at_path(&STATION_PATH) {
            self.station = Some(station_from_attributes(e, decoder)?);
        }

        Ok(())
    }

    /// Returns `true` once the root element has been closed.
    fn end(&mut self) -> Result<bool, LookupError> {
        if self.at_path(&STATION_PATH) {
            if let Some(draft) = self.station.take() {
                self.stations.push(draft.finish());
            }
        } else if self.below_root().len() == STATION_PATH.len() + 1 {
            self.field = None;
        }

        self.open
            .pop()
            .ok_or_else(|| LookupError::parse("end tag without a matching start tag"))?;

        Ok(self.open.is_empty())
    }

    fn text(&mut self, text: &str) {
        if self.below_root().len() != STATION_PATH.len() + 1 {
            return;
        }
        if let (Some(draft), Some(field)) = (self.station.as_mut(), self.field) {
            if let Some(value) = draft.slot(field) {
                value.push_str(text);
            }
        }
    }
}

fn station_from_attributes(e: &BytesStart<'_>, decoder: Decoder) -> Result<StationDraft, LookupError> {
    let mut draft = StationDraft::default();

    for attr in e.attributes() {
        let attr = attr.map_err(|err| LookupError::parse(err.to_string()))?;
        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(|err| LookupError::parse(err.to_string()))?;

        match Field::from_name(attr.key.local_name().as_ref()) {
            Some(Field::City) => draft.city_attr = Some(value.into_owned()),
            Some(Field::Icao) => draft.icao_attr = Some(value.into_owned()),
            None => {}
        }
    }

    Ok(draft)
}

/// Resolve `&name;` or `&#NN;` (the name without `&` and `;`).
fn resolve_reference(name: &str) -> Result<String, LookupError> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => num.parse::<u32>(),
        };
        return code
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .ok_or_else(|| LookupError::parse(format!("invalid character reference &{name};")));
    }

    resolve_predefined_entity(name)
        .map(str::to_string)
        .ok_or_else(|| LookupError::parse(format!("unknown entity &{name};")))
}

/// Decode a geo lookup response into its stations.
///
/// Well-formed documents never fail: a missing path yields an empty list and
/// a missing `city` or `icao` yields an empty string. Anything that is not a
/// single well-formed root element is a [`LookupError::Parse`].
pub fn parse_stations(body: &[u8]) -> Result<StationList, LookupError> {
    let mut reader = Reader::from_reader(body);
    let mut walker = StationWalker::default();
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|err| {
            LookupError::parse(format!("{err} at byte {}", reader.error_position()))
        })?;
        let decoder = reader.decoder();

        match event {
            Event::Start(e) => walker.start(&e, decoder)?,
            Event::Empty(e) => {
                walker.start(&e, decoder)?;
                if walker.end()? {
                    break;
                }
            }
            Event::End(_) => {
                // Trailing content after the root is not read.
                if walker.end()? {
                    break;
                }
            }
            Event::Text(e) => {
                let text = decoder
                    .decode(&e)
                    .map_err(|err| LookupError::parse(err.to_string()))?;
                walker.text(&text);
            }
            Event::CData(e) => {
                let text = decoder
                    .decode(&e)
                    .map_err(|err| LookupError::parse(err.to_string()))?;
                walker.text(&text);
            }
            Event::GeneralRef(e) => {
                let name = decoder
                    .decode(&e)
                    .map_err(|err| LookupError::parse(err.to_string()))?;
                let resolved = resolve_reference(&name)?;
                walker.text(&resolved);
            }
            Event::Eof => {
                return Err(match walker.open.last() {
                    Some(name) => LookupError::parse(format!(
                        "unexpected end of document inside <{}>",
                        String::from_utf8_lossy(name)
                    )),
                    None => LookupError::parse("document has no root element"),
                });
            }
            _ => {}
        }

        buf.clear();
    }

    tracing::debug!(count = walker.stations.len(), "decoded nearby stations");

    Ok(walker.stations)
}

/// Print one `city: icao` line per station.
pub fn write_stations<W: Write>(stations: &StationList, out: &mut W) -> Result<(), LookupError> {
    for station in stations {
        writeln!(out, "{station}")?;
    }
    out.flush()?;
    Ok(())
}
