pub mod aggregator;
pub mod fhir;
pub mod provider;
pub mod utilization;

pub use aggregator::UtilizationAggregator;
pub use fhir::{Bundle, BundleEntry, BundleType, Extension, Organization};
pub use provider::Provider;
pub use utilization::{CounterKind, UtilizationRecorder, UtilizationTable};
