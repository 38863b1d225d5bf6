//! Station catalog for fuelscope.
//!
//! This crate provides:
//! - Typed station records read from feed objects through a [`WireSchema`]
//! - Facet derivation (sorted, distinct dropdown values)
//! - A cascading [`FilterEngine`] with distance ranking
//! - A [`StationSession`] that discards superseded asynchronous results
//!
//! # Example
//!
//! ```
//! use fuelscope_catalog::{FilterEngine, StationRecord};
//!
//! let mut engine = FilterEngine::with_records(vec![
//!     StationRecord::new("X", "A", "A-1", "A-1-a"),
//!     StationRecord::new("Y", "A", "A-2", "A-2-a"),
//!     StationRecord::new("X", "B", "B-1", "B-1-a"),
//! ]);
//!
//! engine.set_province("B");
//! assert_eq!(engine.catalog().brands, vec!["X"]);
//! assert_eq!(engine.filtered().len(), 1);
//! ```

mod error;
pub mod facets;
pub mod filter;
mod record;
pub mod session;
pub mod source;
mod store;

pub use error::{CatalogError, CatalogErrorCode, Result};
pub use facets::{extract_fuel_types, unique_values, FacetCatalog, FacetField};
pub use filter::{FilterEngine, FilterField, FilterState};
pub use record::{SchemaPreset, StationRecord, WireSchema};
pub use session::{LoadOutcome, LoadToken, LocateOutcome, LocateTicket, StationSession};
pub use source::{FixedLocation, LocationError, LocationSource, Position, RecordSource};
pub use store::RecordStore;
