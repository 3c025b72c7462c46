//! Error types for the migration phases.

use hostmig_core::LabelError;
use hostmig_kube::GatewayError;
use hostmig_store::StoreError;
use thiserror::Error;

pub type MigrateResult<T> = Result<T, MigrateError>;

/// Every variant aborts the running phase.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("namespace {namespace}: {source}")]
    Label {
        namespace: String,
        #[source]
        source: LabelError,
    },

    #[error("{kind} {namespace}/{name} has an unexpected shape: {reason}")]
    MalformedResource {
        kind: &'static str,
        namespace: String,
        name: String,
        reason: String,
    },

    #[error("failed to write ingress backup: {0}")]
    Backup(#[source] std::io::Error),

    #[error("invalid namespace name pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl MigrateError {
    pub(crate) fn malformed(
        kind: &'static str,
        namespace: &str,
        name: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedResource {
            kind,
            namespace: namespace.to_string(),
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
