//! Geospatial utilities for fuelscope.
//!
//! This crate provides:
//! - Haversine distance calculations
//! - Parsing of comma-decimal coordinate strings (`"40,416775"`)
//! - Distance annotation, ranking and radius filtering over any [`Locatable`]
//!
//! # Example
//!
//! ```
//! use fuelscope_geo::{distance_km, Coordinate};
//!
//! let madrid = Coordinate::new(40.4168, -3.7038);
//! let barcelona = Coordinate::new(41.3874, 2.1686);
//!
//! let d = distance_km(madrid.latitude, madrid.longitude, barcelona.latitude, barcelona.longitude);
//! assert!((d - 505.0).abs() < 5.0);
//! ```

mod decimal;
mod error;
mod haversine;
pub mod ranker;

pub use decimal::{parse_coordinate, parse_decimal};
pub use error::{GeoError, GeoErrorCode, Result};
pub use haversine::{distance_km, haversine_distance, EARTH_RADIUS_KM};
pub use ranker::{sort_by_distance, DistanceRanker, Locatable};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if the coordinate is finite and within WGS84 bounds.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}
