//! Error types for the catalog crate.

use crate::source::LocationError;
use fuelscope_geo::GeoError;
use thiserror::Error;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors surfaced by a [`StationSession`](crate::StationSession).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// The record source failed; the store keeps its previous contents
    #[error("Failed to load stations: {reason}")]
    Load {
        /// Failure reported by the source
        reason: String,
    },

    /// The location source failed; results stay unranked
    #[error(transparent)]
    Location(#[from] LocationError),

    /// Distance ranking failed or was used before a location was applied
    #[error(transparent)]
    Geo(#[from] GeoError),
}

/// Error code for programmatic handling.
/// Range: 11xxx for catalog errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogErrorCode {
    /// Record source failure
    LoadFailed = 11001,
    /// Location source failure
    LocationUnavailable = 11002,
    /// Geo failure, see [`GeoError::code`]
    Geo = 11003,
}

impl CatalogError {
    /// Create a load error from any displayable failure
    pub fn load(reason: impl std::fmt::Display) -> Self {
        Self::Load {
            reason: reason.to_string(),
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> CatalogErrorCode {
        match self {
            CatalogError::Load { .. } => CatalogErrorCode::LoadFailed,
            CatalogError::Location(_) => CatalogErrorCode::LocationUnavailable,
            CatalogError::Geo(_) => CatalogErrorCode::Geo,
        }
    }

    /// Returns true if the caller asked for a radius before any location was applied.
    pub fn is_missing_location(&self) -> bool {
        matches!(self, CatalogError::Geo(GeoError::NotAnnotated))
    }
}
