//! CSV wind-series loader.
//!
//! # CSV format
//!
//! One row per timestep, the storm-track export layout:
//!
//! ```csv
//! Time,Longitude,Latitude,Speed,UU,VV,Bearing,Pressure
//! 1388534400,146.3,-38.1,12.4,0.0,0.0,45.0,1012.0
//! 1388538000,146.3,-38.1,15.1,0.0,0.0,50.0,1010.0
//! ```
//!
//! Only `Time` (Unix seconds), `Speed`, and `Bearing` (degrees, converted to
//! radians on load) are consumed; the other columns are carried by the export
//! format and ignored here.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use sl_core::TimeIndex;

use crate::{WindError, WindResult, WindSeries};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct WindRecord {
    #[serde(rename = "Time")]
    time: i64,
    #[serde(rename = "Speed")]
    speed: f64,
    #[serde(rename = "Bearing")]
    bearing_deg: f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load one tower's wind series from a CSV file.
pub fn load_wind_csv(path: &Path) -> WindResult<WindSeries> {
    let file = std::fs::File::open(path).map_err(WindError::Io)?;
    load_wind_reader(file)
}

/// Like [`load_wind_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or loading from network
/// streams.
pub fn load_wind_reader<R: Read>(reader: R) -> WindResult<WindSeries> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let mut timestamps = Vec::new();
    let mut speed = Vec::new();
    let mut bearing_rad = Vec::new();

    for result in csv_reader.deserialize::<WindRecord>() {
        let row = result.map_err(|e| WindError::Parse(e.to_string()))?;
        timestamps.push(row.time);
        speed.push(row.speed);
        bearing_rad.push(row.bearing_deg.to_radians());
    }

    WindSeries::new(TimeIndex::new(timestamps), speed, bearing_rad)
}
