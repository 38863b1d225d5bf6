//! Facet derivation.
//!
//! Facet lists are sorted with Rust's `str` ordering, which for UTF-8 is
//! Unicode code-point order: uppercase ASCII before lowercase, and accented
//! letters (`"Á"`, `"É"`) after all unaccented ASCII. The ordering is part of
//! the observable contract and does not depend on locale.

use crate::record::StationRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A categorical record field that facets can be derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetField {
    Brand,
    Province,
    Municipality,
    Locality,
}

/// Distinct, trimmed, non-empty values of `field`, sorted ascending.
pub fn unique_values<'a, I>(records: I, field: FacetField) -> Vec<String>
where
    I: IntoIterator<Item = &'a StationRecord>,
{
    records
        .into_iter()
        .map(|record| record.field(field).trim())
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// The fuel type label of a price key, or `None` if `key` is not a price key.
///
/// The prefix is stripped exactly (case-sensitive) and the remainder trimmed;
/// a key consisting of the prefix alone is not a price key.
pub fn strip_price_prefix<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
    key.strip_prefix(prefix)
        .map(str::trim)
        .filter(|label| !label.is_empty())
}

/// Fuel type labels found among `field_names`, sorted and deduplicated.
///
/// # Example
/// ```
/// use fuelscope_catalog::facets::fuel_labels;
///
/// let labels = fuel_labels(["Price Diesel", "province", "Price Gasoline 95"], "Price ");
/// assert_eq!(labels, vec!["Diesel", "Gasoline 95"]);
/// ```
pub fn fuel_labels<'a, I>(field_names: I, prefix: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    field_names
        .into_iter()
        .filter_map(|name| strip_price_prefix(name, prefix))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Fuel types listed by a sample record. No sample yields an empty list.
pub fn extract_fuel_types(sample: Option<&StationRecord>) -> Vec<String> {
    sample
        .map(|record| fuel_labels(record.fuel_types(), ""))
        .unwrap_or_default()
}

/// The five dropdown catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCatalog {
    pub brands: Vec<String>,
    pub fuel_types: Vec<String>,
    pub provinces: Vec<String>,
    pub municipalities: Vec<String>,
    pub localities: Vec<String>,
}

impl FacetCatalog {
    /// Catalogs of an unfiltered record set.
    pub fn from_records(records: &[StationRecord]) -> Self {
        Self {
            brands: unique_values(records, FacetField::Brand),
            fuel_types: extract_fuel_types(records.first()),
            provinces: unique_values(records, FacetField::Province),
            municipalities: unique_values(records, FacetField::Municipality),
            localities: unique_values(records, FacetField::Locality),
        }
    }

    /// Returns true if every list is empty.
    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
            && self.fuel_types.is_empty()
            && self.provinces.is_empty()
            && self.municipalities.is_empty()
            && self.localities.is_empty()
    }
}
