//! Distance annotation, ranking and radius filtering.
//!
//! [`DistanceRanker`] writes a distance onto every item it is given, keeps the
//! items ordered nearest-first and remembers the origin it measured from, so
//! that a radius filter requested before any annotation can be reported as an
//! error rather than an empty result.

use crate::{haversine_distance, Coordinate, GeoError, Result};
use std::cmp::Ordering;
use tracing::debug;

/// Something with an optional position that can carry a computed distance.
pub trait Locatable {
    /// The item's position, or `None` if it cannot be determined.
    fn coordinate(&self) -> Option<Coordinate>;

    /// The distance to the user in kilometers, if annotated.
    fn distance(&self) -> Option<f64>;

    /// Store (or clear) the distance to the user in kilometers.
    fn set_distance(&mut self, distance: Option<f64>);
}

/// Sorts items ascending by distance.
///
/// Items without a distance go last. The sort is stable, so items with equal
/// (or no) distance keep their relative order.
pub fn sort_by_distance<T: Locatable>(items: &mut [T]) {
    items.sort_by(|a, b| compare_distance(a.distance(), b.distance()));
}

fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Ranks items by great-circle distance to a user position.
#[derive(Debug, Clone, Default)]
pub struct DistanceRanker {
    origin: Option<Coordinate>,
}

impl DistanceRanker {
    /// Creates a ranker that has not annotated anything yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The position of the last annotation pass.
    pub fn origin(&self) -> Option<Coordinate> {
        self.origin
    }

    /// Returns true once [`annotate`](Self::annotate) has succeeded.
    pub fn is_annotated(&self) -> bool {
        self.origin.is_some()
    }

    /// Forgets the current origin. Distances already written stay on the items;
    /// callers replacing the items (a new load) are expected to clear them.
    pub fn clear(&mut self) {
        self.origin = None;
    }

    /// Computes the distance from `origin` to every item, writes it onto the
    /// item and sorts the items nearest-first.
    ///
    /// Items whose position is unknown get `None` (never a stale value from an
    /// earlier origin) and sort after all located items.
    ///
    /// Returns the number of items that received a distance.
    pub fn annotate<T: Locatable + Send>(&mut self, items: &mut [T], origin: Coordinate) -> Result<usize> {
        let located = self.measure(items, origin)?;
        sort_by_distance(items);
        Ok(located)
    }

    /// Like [`annotate`](Self::annotate) but leaves the items in their order.
    pub fn measure<T: Locatable + Send>(&mut self, items: &mut [T], origin: Coordinate) -> Result<usize> {
        if !origin.is_valid() {
            return Err(GeoError::InvalidCoordinate(format!(
                "origin ({}, {}) is outside WGS84 bounds",
                origin.latitude, origin.longitude
            )));
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            items
                .par_iter_mut()
                .for_each(|item| annotate_single(&origin, item));
        }

        #[cfg(not(feature = "parallel"))]
        {
            items
                .iter_mut()
                .for_each(|item| annotate_single(&origin, item));
        }

        self.origin = Some(origin);

        let located = items.iter().filter(|item| item.distance().is_some()).count();
        debug!(
            total = items.len(),
            located,
            lat = origin.latitude,
            lng = origin.longitude,
            "Annotated distances"
        );
        Ok(located)
    }

    /// Returns the items whose distance is defined and `<= radius_km`, in input order.
    ///
    /// # Errors
    /// - [`GeoError::NotAnnotated`] if no annotation pass has happened yet
    /// - [`GeoError::InvalidRadius`] if `radius_km` is negative or not finite
    pub fn filter_by_radius<T: Locatable + Clone>(&self, items: &[T], radius_km: f64) -> Result<Vec<T>> {
        if self.origin.is_none() {
            return Err(GeoError::NotAnnotated);
        }
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(GeoError::InvalidRadius(radius_km));
        }

        Ok(items
            .iter()
            .filter(|item| item.distance().is_some_and(|d| d <= radius_km))
            .cloned()
            .collect())
    }
}

#[inline]
fn annotate_single<T: Locatable>(origin: &Coordinate, item: &mut T) {
    let distance = item
        .coordinate()
        .map(|coord| haversine_distance(origin, &coord));
    item.set_distance(distance);
}
