//! Conversion between decimal meters and the integer sub-units used for packing.

use crate::types::{Area, Length, PackError, Result};

/// Sub-units per meter.
pub const SCALE: Length = 1000;

/// Largest dimension accepted, in meters. A single piece area stays inside
/// `i64`; layout totals are checked where they are summed.
const MAX_METERS: f64 = 1_000_000.0;

/// [`MAX_METERS`] in sub-units. Bounds roll widths, gaps and piece sides.
pub const MAX_LENGTH: Length = 1_000_000 * SCALE;

/// Converts meters to sub-units, rounding to the nearest sub-unit.
pub fn to_scaled(meters: f64) -> Result<Length> {
    if !meters.is_finite() {
        return Err(PackError::InvalidInput(format!(
            "dimension {} is not a finite number",
            meters
        )));
    }
    if meters.abs() > MAX_METERS {
        return Err(PackError::InvalidInput(format!(
            "dimension {} exceeds {} m",
            meters, MAX_METERS
        )));
    }
    Ok((meters * SCALE as f64).round() as Length)
}

pub fn to_meters(value: Length) -> f64 {
    value as f64 / SCALE as f64
}

pub fn to_square_meters(area: Area) -> f64 {
    area as f64 / (SCALE * SCALE) as f64
}
