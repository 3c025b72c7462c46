//! Shared types used across the migration crates.

use serde::{Deserialize, Serialize};

use crate::labels::{
    self, DSEQ_LABEL, GSEQ_LABEL, LabelError, LabelResult, Labels, OSEQ_LABEL, OWNER_LABEL,
    PROVIDER_LABEL,
};

/// Lease identity as decoded from namespace labels. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantIdentity {
    pub provider: Option<String>,
    pub owner: Option<String>,
    pub dseq: Option<u64>,
    pub gseq: Option<u32>,
    pub oseq: Option<u32>,
}

impl TenantIdentity {
    /// Require every field, naming the first missing label.
    pub fn lease_id(&self) -> LabelResult<LeaseId> {
        fn require<T: Clone>(field: &Option<T>, key: &'static str) -> LabelResult<T> {
            field.clone().ok_or(LabelError::MissingLabel { key })
        }

        Ok(LeaseId {
            provider: require(&self.provider, PROVIDER_LABEL)?,
            owner: require(&self.owner, OWNER_LABEL)?,
            dseq: require(&self.dseq, DSEQ_LABEL)?,
            gseq: require(&self.gseq, GSEQ_LABEL)?,
            oseq: require(&self.oseq, OSEQ_LABEL)?,
        })
    }
}

/// Fully-populated lease identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseId {
    pub provider: String,
    pub owner: String,
    pub dseq: u64,
    pub gseq: u32,
    pub oseq: u32,
}

impl From<LeaseId> for TenantIdentity {
    fn from(lease: LeaseId) -> Self {
        TenantIdentity {
            provider: Some(lease.provider),
            owner: Some(lease.owner),
            dseq: Some(lease.dseq),
            gseq: Some(lease.gseq),
            oseq: Some(lease.oseq),
        }
    }
}

/// One hostname route found in a tenant ingress.
///
/// A record never changes after discovery; replay and purge read it back
/// exactly as it was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingRecord {
    pub provider: String,
    pub owner: String,
    pub dseq: u64,
    pub gseq: u32,
    pub oseq: u32,
    pub service_name: String,
    pub service_port: u16,
    pub hostname: String,
    pub namespace: String,
}

impl RoutingRecord {
    pub fn new(
        lease: &LeaseId,
        hostname: impl Into<String>,
        service_name: impl Into<String>,
        service_port: u16,
        namespace: impl Into<String>,
    ) -> Self {
        RoutingRecord {
            provider: lease.provider.clone(),
            owner: lease.owner.clone(),
            dseq: lease.dseq,
            gseq: lease.gseq,
            oseq: lease.oseq,
            service_name: service_name.into(),
            service_port,
            hostname: hostname.into(),
            namespace: namespace.into(),
        }
    }

    pub fn lease_id(&self) -> LeaseId {
        LeaseId {
            provider: self.provider.clone(),
            owner: self.owner.clone(),
            dseq: self.dseq,
            gseq: self.gseq,
            oseq: self.oseq,
        }
    }
}

// ── ProviderHost custom resource ───────────────────────────────────

pub const PROVIDER_HOST_API_VERSION: &str = "akash.network/v1";
pub const PROVIDER_HOST_KIND: &str = "ProviderHost";

/// `ProviderHost` document applied to the cluster. Field names are the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderHost {
    pub api_version: String,
    pub kind: String,
    pub metadata: ProviderHostMetadata,
    pub spec: ProviderHostSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderHostMetadata {
    pub name: String,
    pub labels: Labels,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderHostSpec {
    pub service_name: String,
    pub external_port: u16,
    pub hostname: String,
    pub owner: String,
    pub provider: String,
    pub dseq: u64,
    pub gseq: u32,
    pub oseq: u32,
}

impl From<&RoutingRecord> for ProviderHost {
    fn from(record: &RoutingRecord) -> Self {
        ProviderHost {
            api_version: PROVIDER_HOST_API_VERSION.to_string(),
            kind: PROVIDER_HOST_KIND.to_string(),
            metadata: ProviderHostMetadata {
                name: record.hostname.clone(),
                labels: labels::encode(&TenantIdentity::from(record.lease_id())),
            },
            spec: ProviderHostSpec {
                service_name: record.service_name.clone(),
                external_port: record.service_port,
                hostname: record.hostname.clone(),
                owner: record.owner.clone(),
                provider: record.provider.clone(),
                dseq: record.dseq,
                gseq: record.gseq,
                oseq: record.oseq,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::MANAGED_LABEL;

    fn lease() -> LeaseId {
        LeaseId {
            provider: "p1".to_string(),
            owner: "o1".to_string(),
            dseq: 3,
            gseq: 1,
            oseq: 2,
        }
    }

    #[test]
    fn lease_id_requires_every_field() {
        let mut identity = TenantIdentity::from(lease());
        assert_eq!(identity.lease_id().unwrap(), lease());

        identity.owner = None;
        match identity.lease_id().unwrap_err() {
            LabelError::MissingLabel { key } => assert_eq!(key, OWNER_LABEL),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn provider_host_document_shape() {
        let record = RoutingRecord::new(&lease(), "a.example.com", "foo", 8080, "ns1");
        let doc = serde_json::to_value(ProviderHost::from(&record)).unwrap();

        assert_eq!(doc["apiVersion"], "akash.network/v1");
        assert_eq!(doc["kind"], "ProviderHost");
        assert_eq!(doc["metadata"]["name"], "a.example.com");
        assert_eq!(doc["metadata"]["labels"][MANAGED_LABEL], "true");
        assert_eq!(doc["metadata"]["labels"][DSEQ_LABEL], "3");
        assert_eq!(doc["spec"]["service_name"], "foo");
        assert_eq!(doc["spec"]["external_port"], 8080);
        assert_eq!(doc["spec"]["hostname"], "a.example.com");
        assert_eq!(doc["spec"]["owner"], "o1");
        assert_eq!(doc["spec"]["provider"], "p1");
        assert_eq!(doc["spec"]["dseq"], 3);
        assert_eq!(doc["spec"]["gseq"], 1);
        assert_eq!(doc["spec"]["oseq"], 2);
    }

    #[test]
    fn provider_host_labels_carry_no_namespace() {
        let record = RoutingRecord::new(&lease(), "a.example.com", "foo", 8080, "ns1");
        let host = ProviderHost::from(&record);
        assert!(!host.metadata.labels.contains_key(crate::labels::NAMESPACE_LABEL));
        assert_eq!(host.metadata.labels.len(), 6);
    }
}
