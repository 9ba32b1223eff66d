//! Reshapes the hourly matrix into chart-ready ordered hours.

use serde::Serialize;

use crate::record::Junction;
use crate::stats::HourlyMatrix;

/// One hour's counts for both junctions, Elm Avenue first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourCounts {
    pub hour: u8,
    pub counts: [u32; Junction::COUNT],
}

/// All 24 hours in ascending order, each carrying the two junction series in
/// fixed order (Elm Avenue/Rabbit Road, then Hanley Highway/Westway).
pub fn bin(matrix: &HourlyMatrix) -> Vec<HourCounts> {
    matrix
        .iter()
        .enumerate()
        .map(|(hour, counts)| HourCounts {
            hour: hour as u8,
            counts: *counts,
        })
        .collect()
}

/// Highest single-hour count across all hours and both junctions, used
/// purely for chart scaling. Distinct from the report's peak count, which is
/// Hanley Highway only.
pub fn peak_across_all(matrix: &HourlyMatrix) -> u32 {
    matrix
        .iter()
        .flat_map(|counts| counts.iter().copied())
        .max()
        .unwrap_or(0)
}
