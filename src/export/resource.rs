use crate::health::fhir::{Address, Coding, CodeableConcept, ContactPoint, Identifier};
use crate::health::{Organization, Provider};

const IDENTIFIER_SYSTEM: &str = "https://github.com/synthetichealth/synthea";
const ORGANIZATION_TYPE_SYSTEM: &str = "http://hl7.org/fhir/organization-type";

/// Maps a provider to the resource placed in the bundle
pub trait ResourceBuilder {
    fn organization(&self, provider: &Provider) -> Organization;
}

/// Default STU3 Organization mapping
#[derive(Debug, Clone, Copy, Default)]
pub struct OrganizationBuilder;

impl ResourceBuilder for OrganizationBuilder {
    fn organization(&self, provider: &Provider) -> Organization {
        let telecom = provider
            .phone
            .iter()
            .map(|phone| ContactPoint {
                system: "phone".to_string(),
                value: phone.clone(),
            })
            .collect();

        Organization {
            id: provider.id.clone(),
            extension: Vec::new(),
            identifier: vec![Identifier {
                system: IDENTIFIER_SYSTEM.to_string(),
                value: provider.id.clone(),
            }],
            active: true,
            organization_type: vec![CodeableConcept {
                coding: vec![Coding {
                    system: ORGANIZATION_TYPE_SYSTEM.to_string(),
                    code: "prov".to_string(),
                    display: Some("Healthcare Provider".to_string()),
                }],
                text: Some("Healthcare Provider".to_string()),
            }],
            name: provider.name.clone(),
            telecom,
            address: address(provider).into_iter().collect(),
        }
    }
}

fn address(provider: &Provider) -> Option<Address> {
    if provider.address.is_none()
        && provider.city.is_none()
        && provider.state.is_none()
        && provider.zip.is_none()
    {
        return None;
    }

    Some(Address {
        line: provider.address.iter().cloned().collect(),
        city: provider.city.clone(),
        state: provider.state.clone(),
        postal_code: provider.zip.clone(),
        country: Some("US".to_string()),
    })
}
