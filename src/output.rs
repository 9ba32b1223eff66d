//! Report formatting and persistence.
//!
//! Maps the numeric [`Report`] into a fixed-order list of sixteen
//! (label, value) lines, appends one run's block to a results file, and
//! supports JSON emission for machine consumers.

use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::stats::Report;

/// Renders the peak-hour intervals string.
///
/// Each tied hour becomes an "H:00 and H+1:00" fragment and the fragments
/// are themselves joined with " and ", shared boundaries included twice.
/// The double join is the surveyed behaviour, kept literally (DESIGN.md).
pub fn peak_intervals(hours: &[u8]) -> String {
    if hours.is_empty() {
        return "none".to_string();
    }
    hours
        .iter()
        .map(|&h| format!("{}:00 and {}:00", h, h + 1))
        .collect::<Vec<_>>()
        .join(" and ")
}

/// The sixteen report lines in their fixed display order. Percent signs and
/// the peak-interval string are applied here, keeping [`Report`] purely
/// numeric.
pub fn report_lines(file_name: &str, report: &Report) -> Vec<(&'static str, String)> {
    vec![
        ("Data file selected", file_name.to_string()),
        ("Total vehicles", report.total_vehicles.to_string()),
        ("Total trucks", report.total_trucks.to_string()),
        ("Total electric vehicles", report.total_electric.to_string()),
        (
            "Total two-wheeled vehicles",
            report.total_two_wheeled.to_string(),
        ),
        (
            "Buses leaving Elm Avenue/Rabbit Road heading north",
            report.buses_north_from_elm.to_string(),
        ),
        (
            "Vehicles passing straight through",
            report.straight_through.to_string(),
        ),
        ("Truck percentage", format!("{}%", report.truck_percentage)),
        (
            "Average bicycles per hour",
            report.average_bicycles_per_hour.to_string(),
        ),
        (
            "Vehicles over the speed limit",
            report.over_speed_limit.to_string(),
        ),
        (
            "Vehicles through Elm Avenue/Rabbit Road",
            report.elm_avenue_total.to_string(),
        ),
        (
            "Vehicles through Hanley Highway/Westway",
            report.hanley_highway_total.to_string(),
        ),
        (
            "Scooter percentage at Elm Avenue/Rabbit Road",
            format!("{}%", report.elm_scooter_percentage),
        ),
        (
            "Peak hourly count at Hanley Highway/Westway",
            report.peak_hour_count.to_string(),
        ),
        (
            "Peak hour(s) at Hanley Highway/Westway",
            peak_intervals(&report.peak_hours),
        ),
        ("Hours of rain", report.rain_records.to_string()),
    ]
}

/// Appends one run's block of report lines to a results file, followed by a
/// blank-line separator. Creates the file on first use.
pub fn append_report(path: &str, file_name: &str, report: &Report) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending report block");

    let mut file = OpenOptions::new().append(true).create(true).open(path)?;
    for (label, value) in report_lines(file_name, report) {
        writeln!(file, "{}: {}", label, value)?;
    }
    writeln!(file)?;

    info!(path, "Report appended");
    Ok(())
}

/// Logs the report as pretty-printed JSON.
pub fn print_json(report: &Report) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
