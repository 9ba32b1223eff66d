//! Hour-by-junction histogram support.
//!
//! This module reshapes the engine's hourly breakdown into an ordered
//! 24-hour, two-series form and computes bar geometry for it. The actual
//! pixel drawing belongs to an external renderer.

pub mod binner;
pub mod geometry;
