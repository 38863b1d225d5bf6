//! Comma-decimal coordinate parsing.
//!
//! Station feeds publish coordinates as locale-formatted strings such as
//! `"40,416775"` / `"-3,703790"`. A dot separator is accepted as well.

use crate::{Coordinate, GeoError, Result};

/// Parse a decimal number written with either `,` or `.` as the separator.
///
/// Leading/trailing whitespace is ignored. Empty strings, strings mixing both
/// separators, and non-finite values are rejected.
///
/// # Example
/// ```
/// use fuelscope_geo::parse_decimal;
///
/// assert_eq!(parse_decimal("40,5").unwrap(), 40.5);
/// assert_eq!(parse_decimal(" -3.25 ").unwrap(), -3.25);
/// assert!(parse_decimal("").is_err());
/// ```
pub fn parse_decimal(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || (trimmed.contains(',') && trimmed.contains('.')) {
        return Err(GeoError::InvalidDecimal(raw.to_string()));
    }

    let value: f64 = trimmed
        .replacen(',', ".", 1)
        .parse()
        .map_err(|_| GeoError::InvalidDecimal(raw.to_string()))?;

    if !value.is_finite() {
        return Err(GeoError::InvalidDecimal(raw.to_string()));
    }

    Ok(value)
}

/// Parse a latitude/longitude pair of comma-decimal strings into a [`Coordinate`].
///
/// Fails if either part is not a decimal or the point is outside WGS84 bounds.
pub fn parse_coordinate(latitude: &str, longitude: &str) -> Result<Coordinate> {
    let coord = Coordinate::new(parse_decimal(latitude)?, parse_decimal(longitude)?);
    if !coord.is_valid() {
        return Err(GeoError::InvalidCoordinate(format!(
            "({}, {}) is outside WGS84 bounds",
            coord.latitude, coord.longitude
        )));
    }
    Ok(coord)
}
