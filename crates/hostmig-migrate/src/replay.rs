//! Replay phase: turn every stored record into a `ProviderHost` resource.
//!
//! Apply is create-or-update on the cluster, so replaying the same store
//! twice re-applies identical documents and changes nothing.

use std::io::Read;

use hostmig_core::ProviderHost;
use hostmig_kube::ClusterGateway;
use hostmig_store::RecordReader;
use tracing::info;

use crate::error::{MigrateError, MigrateResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
}

/// Apply one `ProviderHost` per record, in store order, into `target_namespace`.
pub fn replay<G: ClusterGateway, R: Read>(
    gateway: G,
    reader: &mut RecordReader<R>,
    target_namespace: &str,
) -> MigrateResult<ReplaySummary> {
    let mut summary = ReplaySummary::default();
    while let Some(record) = reader.read_next()? {
        let document = serde_json::to_value(ProviderHost::from(&record)).map_err(|e| {
            MigrateError::malformed("providerhost", target_namespace, &record.hostname, e.to_string())
        })?;
        gateway.apply(target_namespace, &document)?;
        summary.applied += 1;
        info!(
            hostname = %record.hostname,
            service = %record.service_name,
            port = record.service_port,
            namespace = target_namespace,
            "provider host applied"
        );
    }
    info!(applied = summary.applied, "replay complete");
    Ok(summary)
}
