//! External collaborators: where records and user positions come from.
//!
//! Both are one-shot asynchronous requests that resolve exactly once with a
//! value or a failure.

use crate::record::StationRecord;
use fuelscope_geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

/// Supplies the full collection of station records.
pub trait RecordSource {
    /// Failure reported by the source.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches every station record.
    fn fetch_stations(&self) -> impl Future<Output = Result<Vec<StationRecord>, Self::Error>> + Send;
}

/// A user position with an optional accuracy hint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub coordinate: Coordinate,
    /// Horizontal accuracy in meters, if known
    pub accuracy_m: Option<f64>,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            coordinate: Coordinate::new(latitude, longitude),
            accuracy_m: None,
        }
    }

    /// Builder-style method to set the accuracy hint
    #[must_use]
    pub fn with_accuracy(mut self, meters: f64) -> Self {
        self.accuracy_m = Some(meters);
        self
    }
}

/// Why a position could not be obtained.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    Denied,

    #[error("location unavailable: {0}")]
    Unavailable(String),

    #[error("location request timed out")]
    Timeout,
}

/// Supplies the user's current position.
pub trait LocationSource {
    fn current_position(&self) -> impl Future<Output = Result<Position, LocationError>> + Send;
}

/// A location source that always reports the same position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLocation {
    position: Position,
}

impl FixedLocation {
    pub fn new(position: Position) -> Self {
        Self { position }
    }
}

impl LocationSource for FixedLocation {
    async fn current_position(&self) -> Result<Position, LocationError> {
        if !self.position.coordinate.is_valid() {
            return Err(LocationError::Unavailable(format!(
                "({}, {}) is not a WGS84 position",
                self.position.coordinate.latitude, self.position.coordinate.longitude
            )));
        }
        Ok(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_location_reports_position() {
        let source = FixedLocation::new(Position::new(40.4168, -3.7038).with_accuracy(25.0));
        let position = tokio_test::block_on(source.current_position()).unwrap();
        assert_eq!(position.coordinate, Coordinate::new(40.4168, -3.7038));
        assert_eq!(position.accuracy_m, Some(25.0));
    }

    #[test]
    fn test_fixed_location_rejects_invalid_position() {
        let source = FixedLocation::new(Position::new(123.0, 0.0));
        let result = tokio_test::block_on(source.current_position());
        assert!(matches!(result, Err(LocationError::Unavailable(_))));
    }
}
