use super::utilization::{CounterKind, UtilizationTable};

/// Stateless aggregator over a provider's utilization table
pub struct UtilizationAggregator;

impl UtilizationAggregator {
    /// Sum one counter kind across every recorded period.
    ///
    /// An empty table, or a table without any cell of `kind`, sums to zero.
    pub fn sum(table: &UtilizationTable, kind: CounterKind) -> u64 {
        table.column(kind).sum()
    }

    /// Totals for all four kinds, in export order
    pub fn totals(table: &UtilizationTable) -> [(CounterKind, u64); 4] {
        CounterKind::ALL.map(|kind| (kind, Self::sum(table, kind)))
    }
}
