//! Bar geometry for the vehicle-frequency histogram.
//!
//! Pure functions of their inputs: binned hours plus a scale config go in,
//! bar rectangles come out. No rendering surface is touched, so the layout
//! is testable headlessly.

use chrono::NaiveDate;
use serde::Serialize;

use super::binner::HourCounts;
use crate::record::Junction;

/// Legend colours keyed by series order: Elm Avenue green, Hanley Highway
/// red.
pub const SERIES_COLORS: [&str; Junction::COUNT] = ["#b2f6a1", "#e59b9d"];

/// Scale and spacing for the bar layout. Defaults follow the survey
/// histogram canvas: 15-unit bars, 10-unit gap between hour groups, baseline
/// at y=550, tallest bar 400 units.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ChartConfig {
    pub bar_width: f32,
    pub group_gap: f32,
    pub x_offset: f32,
    pub baseline_y: f32,
    pub max_bar_height: f32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            bar_width: 15.0,
            group_gap: 10.0,
            x_offset: 50.0,
            baseline_y: 550.0,
            max_bar_height: 400.0,
        }
    }
}

/// One bar, positioned by its top-left corner in a y-down coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BarRect {
    pub hour: u8,
    pub junction: Junction,
    pub count: u32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Lays out two bars per hour, left to right: Elm Avenue/Rabbit Road then
/// Hanley Highway/Westway. Heights scale so `max_count` fills
/// `max_bar_height`; a zero `max_count` yields a flat baseline instead of
/// dividing by zero.
///
/// The sequence is lazy and restartable: calling [`layout`] again with the
/// same inputs replays it.
pub fn layout(
    hours: &[HourCounts],
    max_count: u32,
    config: ChartConfig,
) -> impl Iterator<Item = BarRect> + '_ {
    let scale = if max_count > 0 {
        config.max_bar_height / max_count as f32
    } else {
        0.0
    };
    let group_width = Junction::COUNT as f32 * config.bar_width + config.group_gap;

    hours.iter().flat_map(move |hc| {
        let hc = *hc;
        let x_base = config.x_offset + hc.hour as f32 * group_width;
        Junction::ORDERED
            .into_iter()
            .enumerate()
            .map(move |(slot, junction)| {
                let count = hc.counts[slot];
                let height = count as f32 * scale;
                BarRect {
                    hour: hc.hour,
                    junction,
                    count,
                    x: x_base + slot as f32 * config.bar_width,
                    y: config.baseline_y - height,
                    width: config.bar_width,
                    height,
                }
            })
    })
}

/// Chart title with the survey date embedded as DD/MM/YYYY.
pub fn chart_title(survey_date: NaiveDate) -> String {
    format!(
        "Histogram of Vehicle Frequency per Hour ({})",
        survey_date.format("%d/%m/%Y")
    )
}

/// Two-entry colour legend keyed by junction name, in series order.
pub fn legend() -> [(&'static str, &'static str); Junction::COUNT] {
    [
        (Junction::ElmAvenueRabbitRoad.name(), SERIES_COLORS[0]),
        (Junction::HanleyHighwayWestway.name(), SERIES_COLORS[1]),
    ]
}
