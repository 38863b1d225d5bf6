//! Listing read from a local JSON file

use crate::error::ApiResult;
use crate::listing::{parse_listing, Listing};
use crate::ApiError;
use fuelscope_catalog::{RecordSource, SchemaPreset, StationRecord, WireSchema};
use std::path::{Path, PathBuf};
use tracing::info;

/// A saved listing on disk, in either listing shape.
#[derive(Debug, Clone)]
pub struct FileListing {
    path: PathBuf,
    schema: WireSchema,
}

impl FileListing {
    pub fn new(path: impl Into<PathBuf>, schema: SchemaPreset) -> Self {
        Self {
            path: path.into(),
            schema: schema.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode the file
    pub async fn read(&self) -> ApiResult<Listing> {
        let body = tokio::fs::read_to_string(&self.path).await?;
        let listing = parse_listing(&body, &self.schema)?;
        info!(
            path = %self.path.display(),
            records = listing.records.len(),
            published = listing.date.as_deref().unwrap_or("unknown"),
            "Read station listing"
        );
        Ok(listing)
    }
}

impl RecordSource for FileListing {
    type Error = ApiError;

    async fn fetch_stations(&self) -> Result<Vec<StationRecord>, ApiError> {
        Ok(self.read().await?.records)
    }
}
