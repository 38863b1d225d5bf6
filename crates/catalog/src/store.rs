//! Snapshot of the station records of one load cycle.

use crate::record::StationRecord;

/// Holds every record of the current load. Replaced wholesale by [`load`](Self::load).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<StationRecord>,
    generation: u64,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the snapshot. Distances carried by incoming records are dropped.
    pub fn load(&mut self, records: Vec<StationRecord>) {
        self.records = records;
        self.generation += 1;
        self.clear_distances();
    }

    /// Number of loads applied so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The current snapshot; empty if nothing was loaded.
    pub fn all(&self) -> &[StationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn records_mut(&mut self) -> &mut [StationRecord] {
        &mut self.records
    }

    pub(crate) fn clear_distances(&mut self) {
        for record in &mut self.records {
            record.distance_to_user = None;
        }
    }
}
