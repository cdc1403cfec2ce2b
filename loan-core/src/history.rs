//! Session history of loan calculations.
//!
//! Records are kept most recent first and capped at [`HISTORY_CAPACITY`];
//! recording past the cap drops the oldest entries. The history lives only as
//! long as the session that owns it.

use tracing::debug;

use crate::models::{AmortizationResult, CalculationRecord, LoanTerms, RecordId};

/// Maximum number of calculations retained.
pub const HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone)]
pub struct CalculationHistory {
    records: Vec<CalculationRecord>,
    selected: Option<RecordId>,
    capacity: usize,
}

impl CalculationHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// A history that keeps at most `capacity` records (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity.max(1)),
            selected: None,
            capacity: capacity.max(1),
        }
    }

    /// Stores a new calculation at the front and selects it.
    pub fn record(
        &mut self,
        terms: LoanTerms,
        result: AmortizationResult,
    ) -> &CalculationRecord {
        let record = CalculationRecord::new(terms, result);
        self.selected = Some(record.id);
        self.records.insert(0, record);

        if self.records.len() > self.capacity {
            let evicted = self.records.len() - self.capacity;
            self.records.truncate(self.capacity);
            debug!(evicted, capacity = self.capacity, "oldest calculations evicted");
        }

        &self.records[0]
    }

    /// Selects the record with `id` and returns it, or `None` if unknown.
    ///
    /// An unknown id leaves the current selection as it was.
    pub fn select(
        &mut self,
        id: RecordId,
    ) -> Option<&CalculationRecord> {
        let record = self.records.iter().find(|r| r.id == id)?;
        self.selected = Some(id);
        Some(record)
    }

    /// Deletes the record with `id`. Returns whether anything was removed.
    ///
    /// Removing the selected record clears the selection; no other record is
    /// selected in its place.
    pub fn remove(
        &mut self,
        id: RecordId,
    ) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        let removed = self.records.len() != before;

        if removed && self.selected == Some(id) {
            self.selected = None;
        }
        removed
    }

    /// Forgets the selection while keeping every record.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&CalculationRecord> {
        let id = self.selected?;
        self.records.iter().find(|r| r.id == id)
    }

    pub fn selected_id(&self) -> Option<RecordId> {
        self.selected
    }

    pub fn get(
        &self,
        id: RecordId,
    ) -> Option<&CalculationRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Records, most recent first.
    pub fn records(&self) -> &[CalculationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for CalculationHistory {
    fn default() -> Self {
        Self::new()
    }
}
