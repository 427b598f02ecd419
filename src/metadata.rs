use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

/// Raw sidecar schema as exported. Every field is optional here; presence
/// of the required ones is checked by `extract_record`, not during
/// deserialization, so album and shared-album sidecars still parse.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sidecar {
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub creation_time: Option<Timestamp>,
    pub photo_taken_time: Option<Timestamp>,
    pub geo_data: Option<GeoData>,
    pub people: Option<Vec<Person>>,
}

#[derive(Debug, Deserialize)]
pub struct Timestamp {
    pub formatted: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeoData {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct Person {
    pub name: String,
}

/// One row of the aggregated table, derived from one valid sidecar.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoRecord {
    /// Trailing path segment of `url`.
    pub id: String,
    pub title: String,
    /// Uppercased extension of `title`.
    pub file_type: String,
    pub url: String,
    pub description: String,
    pub creation_time: DateTime<Utc>,
    pub photo_taken_time: DateTime<Utc>,
    /// `None` when the export reports exactly 0 (the no-GPS sentinel).
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Passed through unchanged; zero is a legitimate altitude.
    pub altitude: f64,
    /// Unique tagged names. `None` when the sidecar has no `people` key,
    /// which is distinct from an empty set.
    pub people: Option<BTreeSet<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The file could not be read or is not JSON of the expected shape.
    Unparsable,
    /// A required field or sub-field is absent.
    MissingField(&'static str),
    /// A formatted timestamp string did not parse.
    Timestamp(&'static str),
}

/// Result of attempting to extract a record from one sidecar. Skips are
/// expected and silent at the record level; non-photo sidecars are filtered
/// out through this path.
#[derive(Debug)]
pub enum Extraction {
    Record(PhotoRecord),
    Skipped(SkipReason),
}

/// Read one sidecar file and extract its record.
pub fn extract_from_file(path: &Path) -> Extraction {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            log::debug!("Could not open sidecar {:?}: {}", path, err);
            return Extraction::Skipped(SkipReason::Unparsable);
        }
    };

    let sidecar: Sidecar = match serde_json::from_reader(BufReader::new(file)) {
        Ok(sidecar) => sidecar,
        Err(err) => {
            log::debug!("Could not parse sidecar {:?}: {}", path, err);
            return Extraction::Skipped(SkipReason::Unparsable);
        }
    };

    extract_record(sidecar)
}

pub fn extract_record(sidecar: Sidecar) -> Extraction {
    match try_extract(sidecar) {
        Ok(record) => Extraction::Record(record),
        Err(reason) => Extraction::Skipped(reason),
    }
}

fn try_extract(sidecar: Sidecar) -> Result<PhotoRecord, SkipReason> {
    let url = require(sidecar.url, "url")?;
    let title = require(sidecar.title, "title")?;
    let description = require(sidecar.description, "description")?;
    let creation = require(
        sidecar.creation_time.and_then(|t| t.formatted),
        "creationTime.formatted",
    )?;
    let taken = require(
        sidecar.photo_taken_time.and_then(|t| t.formatted),
        "photoTakenTime.formatted",
    )?;
    let geo = require(sidecar.geo_data, "geoData")?;
    let latitude = require(geo.latitude, "geoData.latitude")?;
    let longitude = require(geo.longitude, "geoData.longitude")?;
    let altitude = require(geo.altitude, "geoData.altitude")?;

    let creation_time =
        parse_formatted(&creation).ok_or(SkipReason::Timestamp("creationTime"))?;
    let photo_taken_time =
        parse_formatted(&taken).ok_or(SkipReason::Timestamp("photoTakenTime"))?;

    let people = sidecar
        .people
        .map(|people| people.into_iter().map(|person| person.name).collect());

    Ok(PhotoRecord {
        id: trailing_segment(&url, '/').to_string(),
        file_type: trailing_segment(&title, '.').to_uppercase(),
        title,
        url,
        description,
        creation_time,
        photo_taken_time,
        latitude: non_zero(latitude),
        longitude: non_zero(longitude),
        altitude,
        people,
    })
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, SkipReason> {
    value.ok_or(SkipReason::MissingField(field))
}

/// Everything after the last `sep`; the whole string when `sep` is absent.
fn trailing_segment(s: &str, sep: char) -> &str {
    s.rsplit(sep).next().unwrap_or(s)
}

/// Zero is the export's sentinel for "no GPS fix".
fn non_zero(value: f64) -> Option<f64> {
    if value == 0.0 {
        None
    } else {
        Some(value)
    }
}

/// Fixed formats the export is known to emit. Everything is UTC.
const FORMATTED_PATTERNS: [&str; 2] = [
    "%b %d, %Y, %I:%M:%S %p UTC",
    "%b %d, %Y, %I:%M:%S %p",
];

/// Parse one of the export's human-formatted timestamps, e.g.
/// "Jan 2, 2021, 3:04:05 PM UTC". The export format is not a single fixed
/// standard, so the known patterns are tried first and anything else goes
/// through a permissive catch-all parser. Newer exports put narrow no-break
/// spaces around the meridiem; those are normalized away up front.
pub fn parse_formatted(formatted: &str) -> Option<DateTime<Utc>> {
    let normalized: String = formatted
        .chars()
        .map(|c| {
            if c == '\u{202f}' || c == '\u{00a0}' {
                ' '
            } else {
                c
            }
        })
        .collect();
    let trimmed = normalized.trim();

    for pattern in FORMATTED_PATTERNS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return Some(naive.and_utc());
        }
    }

    dateparser::parse(trimmed).ok()
}
