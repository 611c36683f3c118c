use super::extensions::build_extensions;
use super::resource::ResourceBuilder;
use crate::health::{Bundle, BundleType, CounterKind, Provider, UtilizationAggregator};

/// Assemble the hospital bundle.
///
/// Providers without any recorded encounter are skipped; everything else is
/// added in input order with its utilization extensions attached.
pub fn assemble<B: ResourceBuilder + ?Sized>(
    providers: &[Provider],
    transaction_bundle: bool,
    builder: &B,
) -> Bundle {
    let mut bundle = Bundle::new(BundleType::from_transaction_flag(transaction_bundle));

    for provider in providers {
        let encounters = UtilizationAggregator::sum(&provider.utilization, CounterKind::Encounters);
        if encounters == 0 {
            tracing::debug!("跳过无就诊记录的机构: {} ({})", provider.name, provider.id);
            continue;
        }

        let mut organization = builder.organization(provider);
        organization.extension = build_extensions(provider);
        bundle.add_entry(organization);
    }

    tracing::info!(
        "已组装 {:?} Bundle: {}/{} 个机构",
        bundle.bundle_type,
        bundle.len(),
        providers.len()
    );
    bundle
}
