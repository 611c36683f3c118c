use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

/// Kinds of activity counted per provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CounterKind {
    Encounters,
    Procedures,
    Labs,
    Prescriptions,
}

impl CounterKind {
    /// All kinds, in export order
    pub const ALL: [CounterKind; 4] = [
        CounterKind::Encounters,
        CounterKind::Procedures,
        CounterKind::Labs,
        CounterKind::Prescriptions,
    ];
}

/// Immutable per-provider utilization counts, keyed by period then counter kind.
///
/// Serialized as `{"2020": {"encounters": 5, "labs": 1}, ...}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct UtilizationTable {
    periods: BTreeMap<i32, BTreeMap<CounterKind, u64>>,
}

impl UtilizationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the count for one cell, replacing any previous value
    pub fn set(&mut self, period: i32, kind: CounterKind, value: u64) {
        self.periods.entry(period).or_default().insert(kind, value);
    }

    /// Builder-style variant of [`set`](Self::set)
    pub fn with(mut self, period: i32, kind: CounterKind, value: u64) -> Self {
        self.set(period, kind, value);
        self
    }

    /// Count for one cell; absent cells read as zero
    pub fn get(&self, period: i32, kind: CounterKind) -> u64 {
        self.periods
            .get(&period)
            .and_then(|row| row.get(&kind))
            .copied()
            .unwrap_or(0)
    }

    /// Every recorded value of one kind, across all periods
    pub fn column(&self, kind: CounterKind) -> impl Iterator<Item = u64> + '_ {
        self.periods
            .values()
            .filter_map(move |row| row.get(&kind).copied())
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

/// Thread-safe counter store written by simulation workers.
///
/// Cells are created lazily under the write lock; existing cells are bumped
/// under the read lock. Call [`snapshot`](Self::snapshot) once all workers
/// have stopped to obtain the table consumed by export.
#[derive(Debug, Default)]
pub struct UtilizationRecorder {
    cells: RwLock<HashMap<(i32, CounterKind), AtomicU64>>,
}

impl UtilizationRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self, period: i32, kind: CounterKind) {
        self.add(period, kind, 1);
    }

    pub fn add(&self, period: i32, kind: CounterKind, amount: u64) {
        {
            let cells = self.cells.read();
            if let Some(cell) = cells.get(&(period, kind)) {
                cell.fetch_add(amount, Ordering::Relaxed);
                return;
            }
        }

        self.cells
            .write()
            .entry((period, kind))
            .or_default()
            .fetch_add(amount, Ordering::Relaxed);
    }

    /// Copy the current counts into an immutable table
    pub fn snapshot(&self) -> UtilizationTable {
        let cells = self.cells.read();
        let mut table = UtilizationTable::new();
        for (&(period, kind), cell) in cells.iter() {
            table.set(period, kind, cell.load(Ordering::Acquire));
        }
        table
    }
}
