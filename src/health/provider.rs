use super::utilization::{CounterKind, UtilizationTable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A simulated hospital, as handed over by the simulation after it stops
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub bed_count: Option<u32>,
    #[serde(default)]
    pub utilization: UtilizationTable,
}

impl Provider {
    /// Create a provider with a fresh random id and no activity
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name)
    }

    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: None,
            city: None,
            state: None,
            zip: None,
            phone: None,
            bed_count: None,
            utilization: UtilizationTable::new(),
        }
    }

    pub fn bed_count(mut self, beds: u32) -> Self {
        self.bed_count = Some(beds);
        self
    }

    /// Record a count for one period and kind
    pub fn record(mut self, period: i32, kind: CounterKind, value: u64) -> Self {
        self.utilization.set(period, kind, value);
        self
    }
}
