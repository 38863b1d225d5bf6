//! Load-token bookkeeping around a [`FilterEngine`].
//!
//! Fetching records and locating the user are asynchronous and may overlap
//! with newer requests. Each request is split into a `begin_*` call that hands
//! out a token and a `complete_*` call that applies the outcome only if the
//! token is still current, so a slow response can never overwrite a newer one.

use crate::error::{CatalogError, Result};
use crate::filter::FilterEngine;
use crate::record::StationRecord;
use crate::source::{LocationError, LocationSource, Position, RecordSource};
use std::fmt;
use tracing::{info, warn};

/// Identifies one load request. Later requests compare greater.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadToken(u64);

impl LoadToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LoadToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "load#{}", self.0)
    }
}

/// Identifies one location request and the load it was issued under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocateTicket {
    load: LoadToken,
    sequence: u64,
}

/// What happened to a completed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The records replaced the store
    Applied { records: usize },
    /// A newer load was issued meanwhile; the result was discarded
    Stale,
}

/// What happened to a completed location request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocateOutcome {
    /// Distances were written from this position
    Applied { position: Position, located: usize },
    /// A newer load or location request was issued meanwhile; the result was discarded
    Stale,
}

/// A [`FilterEngine`] plus the staleness rules for its two asynchronous inputs.
#[derive(Debug, Clone, Default)]
pub struct StationSession {
    engine: FilterEngine,
    current_load: LoadToken,
    locate_sequence: u64,
}

impl StationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn engine(&self) -> &FilterEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut FilterEngine {
        &mut self.engine
    }

    /// The most recently issued load token.
    pub fn current_load(&self) -> LoadToken {
        self.current_load
    }

    /// Starts a load request. Any earlier outstanding load becomes stale.
    pub fn begin_load(&mut self) -> LoadToken {
        self.current_load = LoadToken(self.current_load.0 + 1);
        self.current_load
    }

    /// Applies the outcome of the load identified by `token`.
    ///
    /// Outcomes of superseded loads, successful or not, are discarded and
    /// reported as [`LoadOutcome::Stale`].
    ///
    /// # Errors
    /// [`CatalogError::Load`] if the current load failed. The store keeps
    /// whatever it held before.
    pub fn complete_load<E: fmt::Display>(
        &mut self,
        token: LoadToken,
        outcome: std::result::Result<Vec<StationRecord>, E>,
    ) -> Result<LoadOutcome> {
        if token != self.current_load {
            warn!(token = %token, current = %self.current_load, "Discarding stale load result");
            return Ok(LoadOutcome::Stale);
        }

        match outcome {
            Ok(records) => {
                let count = records.len();
                self.engine.load(records);
                info!(
                    token = %token,
                    records = count,
                    generation = self.engine.store().generation(),
                    "Loaded stations"
                );
                Ok(LoadOutcome::Applied { records: count })
            }
            Err(e) => {
                warn!(token = %token, error = %e, "Station load failed");
                Err(CatalogError::load(e))
            }
        }
    }

    /// Starts a location request tied to the current load.
    pub fn begin_locate(&mut self) -> LocateTicket {
        self.locate_sequence += 1;
        LocateTicket {
            load: self.current_load,
            sequence: self.locate_sequence,
        }
    }

    /// Applies the outcome of the location request identified by `ticket`.
    ///
    /// A result arriving after a newer load or a newer location request is
    /// discarded as [`LocateOutcome::Stale`].
    ///
    /// # Errors
    /// [`CatalogError::Location`] if the position could not be obtained. Any
    /// previously applied distances are cleared, leaving results unranked.
    pub fn complete_locate(
        &mut self,
        ticket: LocateTicket,
        outcome: std::result::Result<Position, LocationError>,
    ) -> Result<LocateOutcome> {
        if ticket.load != self.current_load || ticket.sequence != self.locate_sequence {
            warn!(
                ticket_load = %ticket.load,
                current = %self.current_load,
                "Discarding stale location result"
            );
            return Ok(LocateOutcome::Stale);
        }

        let position = match outcome {
            Ok(position) => position,
            Err(e) => {
                warn!(error = %e, "Location unavailable, results are unranked");
                self.engine.clear_location();
                return Err(e.into());
            }
        };
        let located = self.engine.annotate(position.coordinate)?;
        info!(
            lat = position.coordinate.latitude,
            lng = position.coordinate.longitude,
            located,
            "Ranked stations by distance"
        );
        Ok(LocateOutcome::Applied { position, located })
    }

    /// Fetches from `source` and applies the result under a fresh load token.
    pub async fn refresh<S: RecordSource>(&mut self, source: &S) -> Result<LoadOutcome> {
        let token = self.begin_load();
        let outcome = source.fetch_stations().await;
        self.complete_load(token, outcome)
    }

    /// Asks `source` for the user's position and ranks the store by it.
    pub async fn locate<L: LocationSource>(&mut self, source: &L) -> Result<LocateOutcome> {
        let ticket = self.begin_locate();
        let outcome = source.current_position().await;
        self.complete_locate(ticket, outcome)
    }

    /// Current filtered records within `radius_km` of the user.
    ///
    /// # Errors
    /// A [`CatalogError::Geo`] for which
    /// [`is_missing_location`](CatalogError::is_missing_location) holds when
    /// no position has been applied since the last load.
    pub fn within_radius(&self, radius_km: f64) -> Result<Vec<StationRecord>> {
        Ok(self.engine.filter_by_radius(radius_km)?)
    }
}
