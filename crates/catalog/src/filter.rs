//! Cascading filter engine.
//!
//! [`FilterEngine`] owns the record store, the current [`FilterState`], the
//! derived [`FacetCatalog`] and the filtered snapshot. Every mutation goes
//! through [`FilterEngine::set_filter_field`], which consults the dependency
//! table in [`FilterField::descendants`] to clear selections that the new
//! value made impossible, then recomputes catalogs and results.
//!
//! Catalogs are a function of the final filter state only. Each facet is
//! narrowed by the fields listed in [`FilterField::facet_scope`]:
//!
//! | Facet          | Narrowed by                         |
//! |----------------|-------------------------------------|
//! | brands         | province, municipality, locality    |
//! | provinces      | brand                               |
//! | municipalities | brand, province                     |
//! | localities     | brand, province, municipality       |
//! | fuel types     | nothing (first record of the store) |
//!
//! A facet is never narrowed by its own selection or by a descendant's, so
//! the province list still offers every province of the chosen brand after a
//! municipality has been picked, while the results honour every selection.
//!
//! Dropdown flows that narrowed the municipality list by brand alone when the
//! brand was the last field touched are not reproduced: that list would then
//! depend on the order of `set_*` calls, and two call sequences ending in the
//! same [`FilterState`] must yield the same catalog.

use crate::facets::{extract_fuel_types, unique_values, FacetCatalog, FacetField};
use crate::record::StationRecord;
use crate::store::RecordStore;
use fuelscope_geo::{sort_by_distance, Coordinate, DistanceRanker, Result as GeoResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// A filterable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Brand,
    FuelType,
    Province,
    Municipality,
    Locality,
}

impl FilterField {
    /// All fields, ancestors before descendants.
    pub const ALL: [FilterField; 5] = [
        FilterField::Brand,
        FilterField::Province,
        FilterField::Municipality,
        FilterField::Locality,
        FilterField::FuelType,
    ];

    /// Fields whose selection may become invalid when this one changes, in cascade order.
    pub fn descendants(self) -> &'static [FilterField] {
        match self {
            FilterField::Brand => &[
                FilterField::Province,
                FilterField::Municipality,
                FilterField::Locality,
            ],
            FilterField::Province => &[FilterField::Municipality, FilterField::Locality],
            FilterField::Municipality => &[FilterField::Locality],
            FilterField::Locality | FilterField::FuelType => &[],
        }
    }

    /// Fields whose selections narrow this field's facet.
    pub fn facet_scope(self) -> &'static [FilterField] {
        match self {
            FilterField::Brand => &[
                FilterField::Province,
                FilterField::Municipality,
                FilterField::Locality,
            ],
            FilterField::Province => &[FilterField::Brand],
            FilterField::Municipality => &[FilterField::Brand, FilterField::Province],
            FilterField::Locality => &[
                FilterField::Brand,
                FilterField::Province,
                FilterField::Municipality,
            ],
            FilterField::FuelType => &[],
        }
    }

    /// The record field this filter compares against, if categorical.
    pub fn facet_field(self) -> Option<FacetField> {
        match self {
            FilterField::Brand => Some(FacetField::Brand),
            FilterField::Province => Some(FacetField::Province),
            FilterField::Municipality => Some(FacetField::Municipality),
            FilterField::Locality => Some(FacetField::Locality),
            FilterField::FuelType => None,
        }
    }

    /// Field name as used in logs and output.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterField::Brand => "brand",
            FilterField::FuelType => "fuel_type",
            FilterField::Province => "province",
            FilterField::Municipality => "municipality",
            FilterField::Locality => "locality",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current equality constraints. `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub brand: Option<String>,
    pub fuel_type: Option<String>,
    pub province: Option<String>,
    pub municipality: Option<String>,
    pub locality: Option<String>,
}

impl FilterState {
    /// The constraint on `field`, if any.
    pub fn get(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Brand => self.brand.as_deref(),
            FilterField::FuelType => self.fuel_type.as_deref(),
            FilterField::Province => self.province.as_deref(),
            FilterField::Municipality => self.municipality.as_deref(),
            FilterField::Locality => self.locality.as_deref(),
        }
    }

    /// Sets or clears the constraint on `field`. Values are trimmed; blank clears.
    pub fn set(&mut self, field: FilterField, value: Option<&str>) {
        let slot = match field {
            FilterField::Brand => &mut self.brand,
            FilterField::FuelType => &mut self.fuel_type,
            FilterField::Province => &mut self.province,
            FilterField::Municipality => &mut self.municipality,
            FilterField::Locality => &mut self.locality,
        };
        *slot = value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
    }

    /// Returns true if nothing is constrained.
    pub fn is_empty(&self) -> bool {
        FilterField::ALL.iter().all(|field| self.get(*field).is_none())
    }

    /// Returns true if `record` satisfies every set constraint.
    pub fn matches(&self, record: &StationRecord) -> bool {
        self.matches_fields(record, &FilterField::ALL)
    }

    /// Returns true if `record` satisfies the set constraints among `fields`.
    pub fn matches_fields(&self, record: &StationRecord, fields: &[FilterField]) -> bool {
        fields.iter().all(|&field| match self.get(field) {
            None => true,
            Some(wanted) => match field.facet_field() {
                Some(facet) => record.field(facet).trim() == wanted,
                None => record.offers(wanted),
            },
        })
    }
}

/// The facet of one field under `state`.
pub fn facet_values(records: &[StationRecord], state: &FilterState, field: FilterField) -> Vec<String> {
    match field.facet_field() {
        Some(facet) => unique_values(
            records
                .iter()
                .filter(|record| state.matches_fields(record, field.facet_scope())),
            facet,
        ),
        None => extract_fuel_types(records.first()),
    }
}

fn derive_catalog(records: &[StationRecord], state: &FilterState) -> FacetCatalog {
    FacetCatalog {
        brands: facet_values(records, state, FilterField::Brand),
        fuel_types: facet_values(records, state, FilterField::FuelType),
        provinces: facet_values(records, state, FilterField::Province),
        municipalities: facet_values(records, state, FilterField::Municipality),
        localities: facet_values(records, state, FilterField::Locality),
    }
}

/// Filter selections, derived catalogs and distance ranking over one store.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    store: RecordStore,
    state: FilterState,
    ranker: DistanceRanker,
    catalog: FacetCatalog,
    filtered: Vec<StationRecord>,
}

impl FilterEngine {
    /// Creates an engine over an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine and loads `records`.
    pub fn with_records(records: Vec<StationRecord>) -> Self {
        let mut engine = Self::new();
        engine.load(records);
        engine
    }

    /// Replaces the store. Filters are reset and any user location is forgotten.
    pub fn load(&mut self, records: Vec<StationRecord>) {
        self.store.load(records);
        self.state = FilterState::default();
        self.ranker.clear();
        self.recompute();
        debug!(
            generation = self.store.generation(),
            records = self.store.len(),
            "Loaded store"
        );
    }

    /// Sets (or, with a blank value, clears) one filter and cascades.
    ///
    /// Descendant selections that no longer appear in their recomputed facet
    /// are cleared, in cascade order, before catalogs and results are rebuilt.
    pub fn set_filter_field(&mut self, field: FilterField, value: &str) {
        self.state.set(field, Some(value));

        for &descendant in field.descendants() {
            let Some(current) = self.state.get(descendant) else {
                continue;
            };
            let options = facet_values(self.store.all(), &self.state, descendant);
            if !options.iter().any(|option| option == current) {
                debug!(
                    field = %field,
                    cleared = %descendant,
                    value = current,
                    "Clearing selection no longer offered"
                );
                self.state.set(descendant, None);
            }
        }

        self.recompute();
    }

    /// Clears one filter and cascades.
    pub fn clear_field(&mut self, field: FilterField) {
        self.set_filter_field(field, "");
    }

    pub fn set_brand(&mut self, value: &str) {
        self.set_filter_field(FilterField::Brand, value);
    }

    pub fn set_province(&mut self, value: &str) {
        self.set_filter_field(FilterField::Province, value);
    }

    pub fn set_municipality(&mut self, value: &str) {
        self.set_filter_field(FilterField::Municipality, value);
    }

    pub fn set_locality(&mut self, value: &str) {
        self.set_filter_field(FilterField::Locality, value);
    }

    pub fn set_fuel_type(&mut self, value: &str) {
        self.set_filter_field(FilterField::FuelType, value);
    }

    /// Clears every filter.
    pub fn reset_filters(&mut self) {
        self.state = FilterState::default();
        self.recompute();
    }

    /// Records matching every set constraint. Nearest first once annotated.
    pub fn apply_filters(&self) -> Vec<StationRecord> {
        let mut matched: Vec<StationRecord> = self
            .store
            .all()
            .iter()
            .filter(|record| self.state.matches(record))
            .cloned()
            .collect();

        if self.ranker.is_annotated() {
            sort_by_distance(&mut matched);
        }
        matched
    }

    /// Writes distances from `origin` onto every stored record. The store keeps
    /// its load order; only the filtered snapshot is ranked.
    ///
    /// Returns how many records had a usable position.
    pub fn annotate(&mut self, origin: Coordinate) -> GeoResult<usize> {
        let located = self.ranker.measure(self.store.records_mut(), origin)?;
        self.recompute();
        Ok(located)
    }

    /// Current filtered records within `radius_km` of the annotated origin.
    ///
    /// # Errors
    /// [`GeoError::NotAnnotated`](fuelscope_geo::GeoError::NotAnnotated) if no
    /// location has been applied since the last load.
    pub fn filter_by_radius(&self, radius_km: f64) -> GeoResult<Vec<StationRecord>> {
        self.ranker.filter_by_radius(&self.filtered, radius_km)
    }

    /// Forgets the user location and removes every distance.
    pub fn clear_location(&mut self) {
        self.ranker.clear();
        self.store.clear_distances();
        self.recompute();
    }

    /// Returns true if distances are present.
    pub fn is_annotated(&self) -> bool {
        self.ranker.is_annotated()
    }

    /// The origin of the current distances.
    pub fn origin(&self) -> Option<Coordinate> {
        self.ranker.origin()
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn catalog(&self) -> &FacetCatalog {
        &self.catalog
    }

    /// Snapshot of [`apply_filters`](Self::apply_filters) as of the last mutation.
    pub fn filtered(&self) -> &[StationRecord] {
        &self.filtered
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    fn recompute(&mut self) {
        self.catalog = derive_catalog(self.store.all(), &self.state);
        self.filtered = self.apply_filters();
        debug!(
            matched = self.filtered.len(),
            total = self.store.len(),
            ranked = self.ranker.is_annotated(),
            "Recomputed filters"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuelscope_geo::GeoError;

    fn scenario_records() -> Vec<StationRecord> {
        vec![
            StationRecord::new("X", "A", "A-1", "A-1-a").with_id("1"),
            StationRecord::new("Y", "A", "A-2", "A-2-a").with_id("2"),
            StationRecord::new("X", "B", "B-1", "B-1-a").with_id("3"),
            StationRecord::new("X", "B", "B-2", "B-2-a").with_id("4"),
        ]
    }

    fn ids(records: &[StationRecord]) -> Vec<&str> {
        records.iter().filter_map(|r| r.id.as_deref()).collect()
    }

    /// Twelve stations across two brands, two provinces, three municipalities
    /// and mixed fuel listings.
    fn grid_records() -> Vec<StationRecord> {
        let mut records = Vec::new();
        let mut n = 0;
        for brand in ["REPSOL", "CEPSA"] {
            for (province, municipality) in [("MADRID", "Madrid"), ("MADRID", "Alcalá"), ("SEVILLA", "Sevilla")] {
                for locality in ["CENTRO", "NORTE"] {
                    n += 1;
                    let mut record = StationRecord::new(brand, province, municipality, locality)
                        .with_id(n.to_string())
                        .with_price("Gasoleo A", Some(1.4));
                    if n % 2 == 0 {
                        record = record.with_price("Gasolina 98", None);
                    }
                    records.push(record);
                }
            }
        }
        records
    }

    fn naive(records: &[StationRecord], state: &FilterState) -> Vec<StationRecord> {
        records
            .iter()
            .filter(|r| {
                state.brand.as_deref().is_none_or(|v| r.brand == v)
                    && state.province.as_deref().is_none_or(|v| r.province == v)
                    && state.municipality.as_deref().is_none_or(|v| r.municipality == v)
                    && state.locality.as_deref().is_none_or(|v| r.locality == v)
                    && state.fuel_type.as_deref().is_none_or(|v| r.prices.contains_key(v))
            })
            .cloned()
            .collect()
    }

    #[test]
    fn test_province_narrows_brand_facet() {
        let mut engine = FilterEngine::with_records(scenario_records());

        engine.set_province("A");
        assert_eq!(engine.catalog().brands, vec!["X", "Y"]);

        engine.set_province("B");
        assert_eq!(engine.catalog().brands, vec!["X"]);
        assert_eq!(ids(&engine.apply_filters()), vec!["3", "4"]);
        assert_eq!(ids(engine.filtered()), vec!["3", "4"]);
    }

    #[test]
    fn test_brand_cascades_to_descendant_facets() {
        let mut engine = FilterEngine::with_records(scenario_records());

        engine.set_brand("Y");
        assert_eq!(engine.catalog().provinces, vec!["A"]);
        assert_eq!(engine.catalog().municipalities, vec!["A-2"]);
        assert_eq!(engine.catalog().localities, vec!["A-2-a"]);
        // The brand facet is not narrowed by the brand selection itself.
        assert_eq!(engine.catalog().brands, vec!["X", "Y"]);
    }

    #[test]
    fn test_setting_ancestor_clears_invalid_descendants() {
        let mut engine = FilterEngine::with_records(scenario_records());

        engine.set_province("B");
        engine.set_municipality("B-2");
        engine.set_locality("B-2-a");
        engine.set_brand("Y");

        assert_eq!(engine.state().brand.as_deref(), Some("Y"));
        assert_eq!(engine.state().province, None);
        assert_eq!(engine.state().municipality, None);
        assert_eq!(engine.state().locality, None);
        assert_eq!(ids(engine.filtered()), vec!["2"]);
    }

    #[test]
    fn test_setting_ancestor_keeps_valid_descendants() {
        let mut engine = FilterEngine::with_records(scenario_records());

        engine.set_municipality("B-1");
        engine.set_brand("X");

        assert_eq!(engine.state().municipality.as_deref(), Some("B-1"));
        assert_eq!(ids(engine.filtered()), vec!["3"]);
    }

    #[test]
    fn test_brand_is_not_cleared_by_province() {
        let mut engine = FilterEngine::with_records(scenario_records());

        engine.set_brand("Y");
        engine.set_province("B");

        assert_eq!(engine.state().brand.as_deref(), Some("Y"));
        assert!(engine.filtered().is_empty());
        assert_eq!(engine.catalog().brands, vec!["X"]);
    }

    #[test]
    fn test_clearing_restores_descendant_facets() {
        let records = grid_records();
        let mut engine = FilterEngine::with_records(records.clone());
        let unconstrained = FacetCatalog::from_records(&records);

        engine.set_province("SEVILLA");
        assert_eq!(engine.catalog().municipalities, vec!["Sevilla"]);
        engine.clear_field(FilterField::Province);
        assert_eq!(engine.catalog().municipalities, unconstrained.municipalities);
        assert_eq!(engine.catalog().localities, unconstrained.localities);

        // With a brand still set, clearing province falls back to the brand scope.
        engine.set_brand("CEPSA");
        engine.set_province("SEVILLA");
        assert_eq!(engine.catalog().localities.len(), 2);
        assert_eq!(engine.catalog().municipalities, vec!["Sevilla"]);
        engine.clear_field(FilterField::Province);
        let brand_only = FilterState {
            brand: Some("CEPSA".to_string()),
            ..FilterState::default()
        };
        assert_eq!(engine.state(), &brand_only);
        assert_eq!(
            engine.catalog().localities,
            facet_values(&records, &brand_only, FilterField::Locality)
        );
        assert_eq!(
            engine.catalog().municipalities,
            facet_values(&records, &brand_only, FilterField::Municipality)
        );
    }

    #[test]
    fn test_apply_filters_matches_naive_conjunction() {
        let records = grid_records();
        let mut engine = FilterEngine::with_records(records.clone());

        let brands = [None, Some("REPSOL"), Some("CEPSA"), Some("SHELL")];
        let provinces = [None, Some("MADRID"), Some("SEVILLA")];
        let municipalities = [None, Some("Madrid"), Some("Alcalá"), Some("Sevilla")];
        let localities = [None, Some("CENTRO"), Some("NORTE")];
        let fuels = [None, Some("Gasoleo A"), Some("Gasolina 98"), Some("GLP")];

        for brand in brands {
            for province in provinces {
                for municipality in municipalities {
                    for locality in localities {
                        for fuel in fuels {
                            let state = FilterState {
                                brand: brand.map(String::from),
                                fuel_type: fuel.map(String::from),
                                province: province.map(String::from),
                                municipality: municipality.map(String::from),
                                locality: locality.map(String::from),
                            };
                            engine.state = state.clone();
                            assert_eq!(engine.apply_filters(), naive(&records, &state), "{state:?}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_fuel_filter_is_a_presence_check() {
        let mut engine = FilterEngine::with_records(grid_records());

        engine.set_fuel_type("Gasolina 98");
        let matched = engine.filtered();
        assert_eq!(matched.len(), 6);
        assert!(matched.iter().all(|r| r.offers("Gasolina 98") && r.price("Gasolina 98").is_none()));
    }

    #[test]
    fn test_order_independence() {
        let records = grid_records();

        let mut first = FilterEngine::with_records(records.clone());
        first.set_brand("REPSOL");
        first.set_province("MADRID");
        first.set_fuel_type("Gasolina 98");
        first.set_municipality("Alcalá");

        let mut second = FilterEngine::with_records(records);
        second.set_fuel_type("Gasolina 98");
        second.set_municipality("Alcalá");
        second.set_province("MADRID");
        second.set_brand("REPSOL");

        assert_eq!(first.state(), second.state());
        assert_eq!(first.filtered(), second.filtered());
        assert_eq!(first.catalog(), second.catalog());
    }

    #[test]
    fn test_blank_value_clears() {
        let mut engine = FilterEngine::with_records(scenario_records());
        engine.set_brand("X");
        engine.set_brand("   ");
        assert!(engine.state().is_empty());
        assert_eq!(engine.filtered().len(), 4);
    }

    #[test]
    fn test_fuel_types_come_from_first_record() {
        let records = vec![
            StationRecord::new("X", "A", "", "").with_price("Diesel", None),
            StationRecord::new("Y", "A", "", "").with_price("GLP", Some(0.9)),
        ];
        let engine = FilterEngine::with_records(records);
        assert_eq!(engine.catalog().fuel_types, vec!["Diesel"]);
        assert!(FilterEngine::new().catalog().fuel_types.is_empty());
    }

    #[test]
    fn test_radius_requires_annotation() {
        let engine = FilterEngine::with_records(scenario_records());
        assert_eq!(engine.filter_by_radius(10.0), Err(GeoError::NotAnnotated));
    }

    #[test]
    fn test_annotated_results_sorted_and_radius_bounded() {
        // Latitudes north of (0, 0) at roughly 15, 2 and 8 km; one unparseable.
        let records = vec![
            StationRecord::new("X", "A", "", "").with_id("far").with_coordinates("0,134898", "0"),
            StationRecord::new("X", "A", "", "").with_id("near").with_coordinates("0,017986", "0"),
            StationRecord::new("X", "A", "", "").with_id("lost").with_coordinates("", "0"),
            StationRecord::new("X", "A", "", "").with_id("mid").with_coordinates("0,071946", "0"),
        ];
        let mut engine = FilterEngine::with_records(records);

        let located = engine.annotate(Coordinate::new(0.0, 0.0)).unwrap();
        assert_eq!(located, 3);
        assert_eq!(ids(engine.filtered()), vec!["near", "mid", "far", "lost"]);

        let within = engine.filter_by_radius(10.0).unwrap();
        assert_eq!(ids(&within), vec!["near", "mid"]);
        assert!(within.iter().all(|r| r.distance_to_user.unwrap() <= 10.0));

        // The unlocated record still takes part in categorical filtering.
        engine.set_brand("X");
        assert_eq!(engine.filtered().len(), 4);
        assert_eq!(engine.filtered()[3].distance_to_user, None);
    }

    #[test]
    fn test_load_invalidates_location_and_filters() {
        let mut engine = FilterEngine::with_records(scenario_records());
        engine.set_brand("X");
        engine.annotate(Coordinate::new(0.0, 0.0)).unwrap();

        engine.load(scenario_records());

        assert!(!engine.is_annotated());
        assert!(engine.state().is_empty());
        assert_eq!(engine.filter_by_radius(10.0), Err(GeoError::NotAnnotated));
    }

    #[test]
    fn test_clear_location_removes_distances() {
        let records = vec![StationRecord::new("X", "A", "", "").with_coordinates("1,0", "1,0")];
        let mut engine = FilterEngine::with_records(records);
        engine.annotate(Coordinate::new(0.0, 0.0)).unwrap();
        assert!(engine.filtered()[0].distance_to_user.is_some());

        engine.clear_location();
        assert_eq!(engine.filtered()[0].distance_to_user, None);
        assert!(engine.origin().is_none());
    }

    #[test]
    fn test_clear_location_restores_load_order() {
        let records = vec![
            StationRecord::new("X", "A", "", "").with_id("far").with_coordinates("0,134898", "0"),
            StationRecord::new("X", "A", "", "").with_id("near").with_coordinates("0,017986", "0"),
        ];
        let mut engine = FilterEngine::with_records(records);

        engine.annotate(Coordinate::new(0.0, 0.0)).unwrap();
        assert_eq!(ids(engine.filtered()), vec!["near", "far"]);
        assert_eq!(ids(engine.store().all()), vec!["far", "near"]);

        engine.clear_location();
        assert_eq!(ids(engine.filtered()), vec!["far", "near"]);
        assert_eq!(ids(&engine.apply_filters()), vec!["far", "near"]);
        assert_eq!(ids(engine.store().all()), vec!["far", "near"]);
    }

    #[test]
    fn test_descendants_table() {
        assert_eq!(FilterField::Brand.descendants().len(), 3);
        assert_eq!(FilterField::Province.descendants(), &[FilterField::Municipality, FilterField::Locality]);
        assert!(FilterField::FuelType.descendants().is_empty());
        assert_eq!(FilterField::Municipality.to_string(), "municipality");
    }
}
