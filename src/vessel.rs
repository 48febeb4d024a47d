//! Vessel records as read from the record store.
//!
//! `visited_ports` and `last_known_position` live in TEXT columns. Rows
//! written by this crate use a JSON array and `(lat, lon)`; rows written by
//! older loaders may use a Python-repr list, so decoding is lenient.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Latitude / longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", format_number(self.lat), format_number(self.lon))
    }
}

/// A single row of the `vessels` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselRecord {
    /// Maritime Mobile Service Identity.
    pub mmsi: i64,
    pub name: String,
    pub vessel_type: String,
    pub owner: String,
    pub flag: String,
    pub speed_knots: f64,
    pub dimensions: String,
    pub visited_ports: Vec<String>,
    /// `None` when the stored column is empty or unreadable.
    pub last_known_position: Option<Position>,
    /// Free-form status such as "In Transit", "Docked" or "Active".
    pub status: String,
}

/// A stored column value that could not be decoded.
#[derive(Debug, Error, PartialEq)]
#[error("cannot decode {column} value '{value}'")]
pub struct DecodeError {
    pub column: &'static str,
    pub value: String,
}

/// Encode a port list for the `visited_ports` column.
pub fn encode_ports(ports: &[String]) -> String {
    serde_json::to_string(ports).unwrap_or_else(|_| "[]".to_string())
}

/// Decode the `visited_ports` column.
///
/// Accepts `["A", "B"]`, `['A', 'B']` and `A; B`. Empty text is an empty list.
pub fn decode_ports(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if let Ok(ports) = serde_json::from_str::<Vec<String>>(trimmed) {
        return ports;
    }

    let (body, separator) = match trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        Some(inner) => (inner, ','),
        None => (trimmed, ';'),
    };

    body.split(separator)
        .map(|port| port.trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .filter(|port| !port.is_empty())
        .map(str::to_string)
        .collect()
}

/// Encode a position for the `last_known_position` column. `None` is empty text.
pub fn encode_position(position: Option<Position>) -> String {
    position.map(|p| p.to_string()).unwrap_or_default()
}

/// Decode the `last_known_position` column: `(lat, lon)`, `[lat, lon]` or `lat,lon`.
pub fn decode_position(raw: &str) -> Result<Position, DecodeError> {
    let err = || DecodeError {
        column: "last_known_position",
        value: raw.to_string(),
    };

    let inner = raw
        .trim()
        .trim_start_matches(['(', '['])
        .trim_end_matches([')', ']']);
    let mut parts = inner.split(',').map(str::trim);

    let lat = parts.next().and_then(|p| p.parse::<f64>().ok()).ok_or_else(err)?;
    let lon = parts.next().and_then(|p| p.parse::<f64>().ok()).ok_or_else(err)?;
    if parts.next().is_some() {
        return Err(err());
    }
    Ok(Position { lat, lon })
}

/// Like [`decode_position`], but empty text decodes to `None`.
pub fn decode_optional_position(raw: &str) -> Result<Option<Position>, DecodeError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    decode_position(raw).map(Some)
}

/// Render a float the way the reply templates expect: whole numbers keep
/// one decimal place (`15.0`), everything else uses the shortest form.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
