//! Typed representation of one traffic-survey observation.
//!
//! All textual fields are matched case-insensitively. Junction and direction
//! are closed enumerations so that exhaustiveness is checked at compile time
//! instead of relying on ad-hoc string lists.

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::Serialize;
use std::str::FromStr;

/// One of the two fixed survey locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Junction {
    #[serde(rename = "Elm Avenue/Rabbit Road")]
    ElmAvenueRabbitRoad,
    #[serde(rename = "Hanley Highway/Westway")]
    HanleyHighwayWestway,
}

impl Junction {
    /// Number of junctions covered by one survey file.
    pub const COUNT: usize = 2;

    /// Chart series order: Elm Avenue first, Hanley Highway second.
    pub const ORDERED: [Junction; Junction::COUNT] = [
        Junction::ElmAvenueRabbitRoad,
        Junction::HanleyHighwayWestway,
    ];

    /// Slot used by the hourly matrix and the chart series.
    pub fn index(self) -> usize {
        match self {
            Junction::ElmAvenueRabbitRoad => 0,
            Junction::HanleyHighwayWestway => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Junction::ElmAvenueRabbitRoad => "Elm Avenue/Rabbit Road",
            Junction::HanleyHighwayWestway => "Hanley Highway/Westway",
        }
    }
}

impl FromStr for Junction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Junction::ORDERED
            .into_iter()
            .find(|j| s.eq_ignore_ascii_case(j.name()))
            .ok_or(())
    }
}

/// Compass point a vehicle entered or left the junction by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "n" | "north" => Ok(Direction::North),
            "e" | "east" => Ok(Direction::East),
            "s" | "south" => Ok(Direction::South),
            "w" | "west" => Ok(Direction::West),
            _ => Err(()),
        }
    }
}

/// Vehicle category. Anything outside the recognized set still counts as a
/// vehicle, it just lands in no special category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VehicleCategory {
    Car,
    Truck,
    Bus,
    Bicycle,
    Motorcycle,
    Scooter,
    Other,
}

impl VehicleCategory {
    pub fn parse(s: &str) -> VehicleCategory {
        match s.to_ascii_lowercase().as_str() {
            "car" => VehicleCategory::Car,
            "truck" => VehicleCategory::Truck,
            "bus" | "buss" => VehicleCategory::Bus,
            "bicycle" => VehicleCategory::Bicycle,
            "motorcycle" | "motorbike" => VehicleCategory::Motorcycle,
            "scooter" => VehicleCategory::Scooter,
            _ => VehicleCategory::Other,
        }
    }

    pub fn is_two_wheeled(self) -> bool {
        matches!(
            self,
            VehicleCategory::Bicycle | VehicleCategory::Motorcycle | VehicleCategory::Scooter
        )
    }
}

/// One accepted observation row. Constructed by the parser, consumed by the
/// aggregation pass, not retained afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleRecord {
    pub junction: Junction,
    pub date: NaiveDate,
    pub time_of_day: NaiveTime,
    pub direction_in: Direction,
    pub direction_out: Direction,
    pub weather: String,
    pub speed_limit: u32,
    pub vehicle_speed: u32,
    pub category: VehicleCategory,
    pub electric: bool,
}

impl VehicleRecord {
    /// Hour-of-day bucket (0-23) the observation falls into.
    pub fn hour(&self) -> usize {
        self.time_of_day.hour() as usize
    }

    pub fn is_rainy(&self) -> bool {
        self.weather.eq_ignore_ascii_case("rain")
    }

    /// Same compass point in and out, a proxy for "no turn".
    pub fn is_straight_through(&self) -> bool {
        self.direction_in == self.direction_out
    }

    /// Strictly above the posted limit; exactly at the limit does not count.
    pub fn is_over_limit(&self) -> bool {
        self.vehicle_speed > self.speed_limit
    }
}
