use serde::{Deserialize, Serialize};

/// FHIR Bundle type (only the two kinds the exporter emits)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BundleType {
    Batch,
    Collection,
}

impl BundleType {
    /// BATCH for transaction bundles, COLLECTION otherwise
    pub fn from_transaction_flag(transaction_bundle: bool) -> Self {
        if transaction_bundle {
            BundleType::Batch
        } else {
            BundleType::Collection
        }
    }
}

/// FHIR Coding
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Coding {
    pub system: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// FHIR CodeableConcept
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// FHIR Identifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identifier {
    pub system: String,
    pub value: String,
}

/// FHIR ContactPoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactPoint {
    pub system: String,
    pub value: String,
}

/// FHIR Address
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// FHIR Extension carrying an integer value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    pub url: String,
    pub value_integer: u64,
}

impl Extension {
    pub fn integer(url: impl Into<String>, value: u64) -> Self {
        Self {
            url: url.into(),
            value_integer: value,
        }
    }
}

/// FHIR STU3 Organization (the subset the exporter fills in)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "resourceType", rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
    pub active: bool,
    #[serde(default, rename = "type", skip_serializing_if = "Vec::is_empty")]
    pub organization_type: Vec<CodeableConcept>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub telecom: Vec<ContactPoint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<Address>,
}

/// HTTP verb used by batch entries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Post,
}

/// Request part of a batch entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BundleEntryRequest {
    pub method: HttpVerb,
    pub url: String,
}

/// One Bundle entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    pub full_url: String,
    pub resource: Organization,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<BundleEntryRequest>,
}

/// FHIR Bundle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "resourceType")]
pub struct Bundle {
    #[serde(rename = "type")]
    pub bundle_type: BundleType,
    #[serde(default)]
    pub entry: Vec<BundleEntry>,
}

impl Bundle {
    /// Create an empty bundle of the given type
    pub fn new(bundle_type: BundleType) -> Self {
        Self {
            bundle_type,
            entry: Vec::new(),
        }
    }

    /// Register a resource into the bundle and return the stored entry
    pub fn add_entry(&mut self, resource: Organization) -> &mut BundleEntry {
        let full_url = format!("urn:uuid:{}", resource.id);
        let request = match self.bundle_type {
            BundleType::Batch => Some(BundleEntryRequest {
                method: HttpVerb::Post,
                url: "Organization".to_string(),
            }),
            BundleType::Collection => None,
        };
        self.entry.push(BundleEntry {
            full_url,
            resource,
            request,
        });
        let last = self.entry.len() - 1;
        &mut self.entry[last]
    }

    pub fn len(&self) -> usize {
        self.entry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn organization(id: &str) -> Organization {
        Organization {
            id: id.to_string(),
            extension: vec![Extension::integer("urn:test", 3)],
            identifier: vec![],
            active: true,
            organization_type: vec![],
            name: "General".to_string(),
            telecom: vec![],
            address: vec![],
        }
    }

    #[test]
    fn test_organization_json_shape() {
        let json = serde_json::to_value(organization("abc")).unwrap();
        assert_eq!(json["resourceType"], "Organization");
        assert_eq!(json["extension"][0]["valueInteger"], 3);
        assert!(json.get("telecom").is_none());
    }

    #[test]
    fn test_batch_entry_has_request() {
        let mut bundle = Bundle::new(BundleType::Batch);
        let entry = bundle.add_entry(organization("abc"));
        assert_eq!(entry.full_url, "urn:uuid:abc");
        assert_eq!(entry.request.as_ref().unwrap().method, HttpVerb::Post);

        let json = serde_json::to_value(&bundle).unwrap();
        assert_eq!(json["resourceType"], "Bundle");
        assert_eq!(json["type"], "batch");
        assert_eq!(json["entry"][0]["request"]["method"], "POST");
    }

    #[test]
    fn test_collection_entry_has_no_request() {
        let mut bundle = Bundle::new(BundleType::Collection);
        bundle.add_entry(organization("abc"));
        let json = serde_json::to_value(&bundle).unwrap();
        assert_eq!(json["type"], "collection");
        assert!(json["entry"][0].get("request").is_none());
    }
}
