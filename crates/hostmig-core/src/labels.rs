//! Lease identity labels carried by tenant namespaces and provider hosts.
//!
//! Tenant namespaces are tagged by the provider with the lease that owns
//! them. [`decode`] lifts those labels into a [`TenantIdentity`], and
//! [`encode`] turns an identity back into the label set stamped onto a
//! `ProviderHost` resource.

use std::collections::BTreeMap;
use std::str::FromStr;

use thiserror::Error;

use crate::types::TenantIdentity;

/// Label selecting every namespace (and resource) managed by the provider.
pub const MANAGED_LABEL: &str = "akash.network";
/// Value of [`MANAGED_LABEL`] on managed resources.
pub const MANAGED_LABEL_VALUE: &str = "true";

pub const PROVIDER_LABEL: &str = "akash.network/lease.id.provider";
pub const NAMESPACE_LABEL: &str = "akash.network/namespace";
pub const DSEQ_LABEL: &str = "akash.network/lease.id.dseq";
pub const OSEQ_LABEL: &str = "akash.network/lease.id.oseq";
pub const GSEQ_LABEL: &str = "akash.network/lease.id.gseq";
pub const OWNER_LABEL: &str = "akash.network/lease.id.owner";

/// Selector matching tenant namespaces.
pub const TENANT_NAMESPACE_SELECTOR: &str = "akash.network=true";
/// Selector matching ingresses created for a tenant namespace (key existence).
pub const TENANT_INGRESS_SELECTOR: &str = NAMESPACE_LABEL;

/// Expected shape of a tenant namespace name. Only checked advisorily.
pub const TENANT_NAMESPACE_PATTERN: &str = "^[a-z,0-9]{45}$";

/// Flat label mapping as found in resource metadata.
pub type Labels = BTreeMap<String, String>;

pub type LabelResult<T> = Result<T, LabelError>;

#[derive(Debug, Error)]
pub enum LabelError {
    #[error("label {key} has non-numeric value {value:?}")]
    MalformedLabel { key: &'static str, value: String },

    #[error("required label {key} is missing")]
    MissingLabel { key: &'static str },
}

/// Decode the lease identity labels. Absent labels stay absent.
pub fn decode(labels: &Labels) -> LabelResult<TenantIdentity> {
    Ok(TenantIdentity {
        provider: labels.get(PROVIDER_LABEL).cloned(),
        owner: labels.get(OWNER_LABEL).cloned(),
        dseq: parse_numeric(labels, DSEQ_LABEL)?,
        gseq: parse_numeric(labels, GSEQ_LABEL)?,
        oseq: parse_numeric(labels, OSEQ_LABEL)?,
    })
}

/// Encode an identity into labels, including the managed flag.
pub fn encode(identity: &TenantIdentity) -> Labels {
    let mut labels = Labels::new();
    labels.insert(MANAGED_LABEL.to_string(), MANAGED_LABEL_VALUE.to_string());
    if let Some(provider) = &identity.provider {
        labels.insert(PROVIDER_LABEL.to_string(), provider.clone());
    }
    if let Some(owner) = &identity.owner {
        labels.insert(OWNER_LABEL.to_string(), owner.clone());
    }
    if let Some(dseq) = identity.dseq {
        labels.insert(DSEQ_LABEL.to_string(), dseq.to_string());
    }
    if let Some(gseq) = identity.gseq {
        labels.insert(GSEQ_LABEL.to_string(), gseq.to_string());
    }
    if let Some(oseq) = identity.oseq {
        labels.insert(OSEQ_LABEL.to_string(), oseq.to_string());
    }
    labels
}

fn parse_numeric<T: FromStr>(labels: &Labels, key: &'static str) -> LabelResult<Option<T>> {
    match labels.get(key) {
        None => Ok(None),
        // Base-10 digits only: `str::parse` alone would accept a leading '+'.
        Some(value) if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) => value
            .parse()
            .map(Some)
            .map_err(|_| LabelError::MalformedLabel {
                key,
                value: value.clone(),
            }),
        Some(value) => Err(LabelError::MalformedLabel {
            key,
            value: value.clone(),
        }),
    }
}
