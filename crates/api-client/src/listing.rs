//! Decoding of station listings.
//!
//! The ministry feed wraps entries in an envelope:
//!
//! ```json
//! { "Fecha": "18/10/2026 9:15:02", "ListaEESSPrecio": [ ... ], "ResultadoConsulta": "OK" }
//! ```
//!
//! A bare array of entries is accepted as well.

use crate::error::{ApiError, ApiResult};
use fuelscope_catalog::{StationRecord, WireSchema};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Status the feed reports for a successful query
const RESULT_OK: &str = "OK";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Fecha", default)]
    date: Option<String>,
    #[serde(rename = "ListaEESSPrecio")]
    entries: Vec<Value>,
    #[serde(rename = "ResultadoConsulta", default)]
    result: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Body {
    Envelope(Envelope),
    Entries(Vec<Value>),
}

/// A decoded listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    /// Timestamp the feed reports for its prices, verbatim
    pub date: Option<String>,
    /// One record per object entry
    pub records: Vec<StationRecord>,
    /// Entries that were not JSON objects
    pub skipped: usize,
}

/// Decodes a listing body with the given field names.
///
/// Entries that are not objects are skipped with a warning. Missing fields
/// inside an entry never fail the listing.
///
/// # Errors
/// [`ApiError::Json`] if the body is not JSON, [`ApiError::UnexpectedListing`]
/// if it has neither shape or reports a result other than `OK`.
pub fn parse_listing(body: &str, schema: &WireSchema) -> ApiResult<Listing> {
    let value: Value = serde_json::from_str(body)?;
    let (date, entries) = match serde_json::from_value::<Body>(value) {
        Ok(Body::Envelope(envelope)) => {
            if let Some(result) = envelope.result.as_deref().filter(|r| *r != RESULT_OK) {
                return Err(ApiError::unexpected(format!("ResultadoConsulta = {result}")));
            }
            (envelope.date, envelope.entries)
        }
        Ok(Body::Entries(entries)) => (None, entries),
        Err(_) => {
            return Err(ApiError::unexpected(
                "expected a station array or a ListaEESSPrecio envelope",
            ));
        }
    };

    let total = entries.len();
    let records: Vec<StationRecord> = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match entry {
            Value::Object(object) => Some(StationRecord::from_wire(object, schema)),
            other => {
                warn!(index, kind = kind_of(other), "Skipping non-object listing entry");
                None
            }
        })
        .collect();

    let skipped = total - records.len();
    debug!(records = records.len(), skipped, date = ?date, "Decoded listing");

    Ok(Listing {
        date,
        records,
        skipped,
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
