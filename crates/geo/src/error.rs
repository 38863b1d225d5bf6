//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// A coordinate string could not be read as a decimal number
    #[error("Invalid decimal value: {0:?}")]
    InvalidDecimal(String),

    /// Invalid coordinate values
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Radius is negative or not a finite number
    #[error("Invalid radius: {0} km")]
    InvalidRadius(f64),

    /// Radius filtering requested before any distance annotation pass
    #[error("No user location yet: annotate records before filtering by radius")]
    NotAnnotated,
}

/// Error code for programmatic handling.
/// Range: 10xxx for geo errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// Invalid decimal string
    InvalidDecimal = 10001,
    /// Invalid coordinate values
    InvalidCoordinate = 10002,
    /// Invalid radius
    InvalidRadius = 10003,
    /// Ranker used before annotation
    NotAnnotated = 10004,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::InvalidDecimal(_) => GeoErrorCode::InvalidDecimal,
            GeoError::InvalidCoordinate(_) => GeoErrorCode::InvalidCoordinate,
            GeoError::InvalidRadius(_) => GeoErrorCode::InvalidRadius,
            GeoError::NotAnnotated => GeoErrorCode::NotAnnotated,
        }
    }
}
