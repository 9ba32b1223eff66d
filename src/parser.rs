//! CSV parsing for daily traffic-survey files.
//!
//! One header line is skipped, then every data row must carry exactly ten
//! fields. A row failing the field count or any field-level type check is
//! skipped with a diagnostic; it never aborts the run.

use chrono::{NaiveDate, NaiveTime};
use csv::StringRecord;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::record::{Direction, Junction, VehicleCategory, VehicleRecord};

/// Every data row carries exactly this many comma-separated fields.
pub const FIELDS_PER_ROW: usize = 10;

/// File-level failures. Row-level problems are [`RowError`] and are never
/// fatal.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("survey file not found: {path}")]
    MissingFile { path: String },
    #[error("survey file has no data rows: {path}")]
    EmptyInput { path: String },
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Why one row was rejected. The caller logs it and moves on.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("expected {FIELDS_PER_ROW} fields, found {found}")]
    FieldCount { found: usize },
    #[error("bad {field} value {value:?}")]
    Field { field: &'static str, value: String },
}

fn bad(field: &'static str, value: &str) -> RowError {
    RowError::Field {
        field,
        value: value.to_string(),
    }
}

/// Converts one raw CSV row into a [`VehicleRecord`].
///
/// # Errors
///
/// Returns a [`RowError`] if the field count is not ten or any field fails
/// its type check. The whole row is rejected in that case so the aggregation
/// counters stay consistent with each other.
pub fn parse_row(row: &StringRecord) -> Result<VehicleRecord, RowError> {
    if row.len() != FIELDS_PER_ROW {
        return Err(RowError::FieldCount { found: row.len() });
    }

    let field = |i: usize| row.get(i).unwrap_or_default();

    let junction = field(0)
        .parse::<Junction>()
        .map_err(|_| bad("junction", field(0)))?;
    let date = parse_date(field(1)).ok_or_else(|| bad("date", field(1)))?;
    let time_of_day = parse_time(field(2)).ok_or_else(|| bad("timeOfDay", field(2)))?;
    let direction_in = field(3)
        .parse::<Direction>()
        .map_err(|_| bad("directionIn", field(3)))?;
    let direction_out = field(4)
        .parse::<Direction>()
        .map_err(|_| bad("directionOut", field(4)))?;
    let weather = field(5).to_string();
    let speed_limit = field(6)
        .parse::<u32>()
        .map_err(|_| bad("speedLimit", field(6)))?;
    let vehicle_speed = field(7)
        .parse::<u32>()
        .map_err(|_| bad("vehicleSpeed", field(7)))?;
    let category = VehicleCategory::parse(field(8));
    let electric = parse_bool(field(9)).ok_or_else(|| bad("isElectric", field(9)))?;

    Ok(VehicleRecord {
        junction,
        date,
        time_of_day,
        direction_in,
        direction_out,
        weather,
        speed_limit,
        vehicle_speed,
        category,
        electric,
    })
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Reads one survey file into memory, skipping malformed rows.
///
/// # Errors
///
/// [`LoadError::MissingFile`] if the path does not exist and
/// [`LoadError::EmptyInput`] if the file holds nothing after the header.
/// Neither produces a report; the caller may pick another input.
pub fn load_survey(path: impl AsRef<Path>) -> Result<Vec<VehicleRecord>, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::MissingFile {
            path: path.display().to_string(),
        });
    }

    // flexible: short/long rows reach parse_row and are rejected there
    // instead of erroring out of the reader.
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    let mut total_rows = 0usize;

    for (i, result) in reader.records().enumerate() {
        let row = result?;
        total_rows += 1;
        match parse_row(&row) {
            Ok(record) => records.push(record),
            Err(e) => {
                skipped += 1;
                // +2: one for the header line, one for zero-based enumerate
                warn!(line = i + 2, error = %e, "Skipping malformed row");
            }
        }
    }

    if total_rows == 0 {
        return Err(LoadError::EmptyInput {
            path: path.display().to_string(),
        });
    }

    info!(
        accepted = records.len(),
        skipped,
        path = %path.display(),
        "Survey file loaded"
    );
    Ok(records)
}
