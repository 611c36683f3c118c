use crate::health::{CounterKind, Extension, Provider, UtilizationAggregator};

/// Namespace shared by every utilization extension url
pub const SYNTHEA_URI: &str = "http://synthetichealth.github.io/synthea/";

const BED_COUNT_SUFFIX: &str = "bed-count-extension";

fn suffix(kind: CounterKind) -> &'static str {
    match kind {
        CounterKind::Encounters => "utilization-encounters-extension",
        CounterKind::Procedures => "utilization-procedures-extension",
        CounterKind::Labs => "utilization-labs-extension",
        CounterKind::Prescriptions => "utilization-prescriptions-extension",
    }
}

/// Extension url for one counter kind
pub fn extension_url(kind: CounterKind) -> String {
    format!("{SYNTHEA_URI}{}", suffix(kind))
}

pub fn bed_count_url() -> String {
    format!("{SYNTHEA_URI}{BED_COUNT_SUFFIX}")
}

/// Build the utilization extensions for one provider.
///
/// Always encounters, procedures, labs, prescriptions in that order; a fifth
/// bed-count extension follows only when the provider reports one.
pub fn build_extensions(provider: &Provider) -> Vec<Extension> {
    let mut extensions: Vec<Extension> = UtilizationAggregator::totals(&provider.utilization)
        .into_iter()
        .map(|(kind, total)| Extension::integer(extension_url(kind), total))
        .collect();

    if let Some(beds) = provider.bed_count {
        extensions.push(Extension::integer(bed_count_url(), u64::from(beds)));
    }

    extensions
}
