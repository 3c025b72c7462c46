//! Discovery phase: walk tenant namespaces and record their ingress routes.
//!
//! Records are appended to the store as soon as they are found, so an
//! interrupted run leaves a valid prefix behind. Order follows the order
//! the cluster lists namespaces and ingresses in.

use std::io::Write;

use hostmig_core::labels::{
    self, TENANT_INGRESS_SELECTOR, TENANT_NAMESPACE_PATTERN, TENANT_NAMESPACE_SELECTOR,
};
use hostmig_core::{RoutingRecord, TenantIdentity};
use hostmig_kube::ClusterGateway;
use hostmig_store::RecordWriter;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::backup::BackupLog;
use crate::error::{MigrateError, MigrateResult};
use crate::resources::{Ingress, Namespace, ResourceList};

/// A namespace selected as tenant-managed, with its decoded lease labels.
#[derive(Debug, Clone, PartialEq)]
pub struct TenantNamespace {
    pub name: String,
    pub identity: TenantIdentity,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoverySummary {
    pub namespaces: usize,
    pub ingresses: usize,
    pub records: usize,
}

pub struct Discovery<G> {
    gateway: G,
    name_pattern: Regex,
}

impl<G: ClusterGateway> Discovery<G> {
    pub fn new(gateway: G) -> MigrateResult<Self> {
        Ok(Self {
            gateway,
            name_pattern: Regex::new(TENANT_NAMESPACE_PATTERN)?,
        })
    }

    /// List namespaces carrying the managed label.
    pub fn tenant_namespaces(&self) -> MigrateResult<Vec<TenantNamespace>> {
        let response = self
            .gateway
            .get("namespaces", None, TENANT_NAMESPACE_SELECTOR)?;
        let list: ResourceList<Namespace> = serde_json::from_value(response)
            .map_err(|e| MigrateError::malformed("namespace list", "", "", e.to_string()))?;

        let mut namespaces = Vec::with_capacity(list.items.len());
        for item in list.items {
            let name = item.metadata.name;
            info!(namespace = %name, "found namespace");
            // Advisory only: a mismatch is reported but the namespace is kept.
            if !self.name_pattern.is_match(&name) {
                warn!(
                    namespace = %name,
                    pattern = TENANT_NAMESPACE_PATTERN,
                    "namespace name does not match the tenant namespace pattern"
                );
            }
            let identity =
                labels::decode(&item.metadata.labels).map_err(|source| MigrateError::Label {
                    namespace: name.clone(),
                    source,
                })?;
            namespaces.push(TenantNamespace { name, identity });
        }
        Ok(namespaces)
    }

    /// Run discovery, appending every route to `store` and every ingress to `backup`.
    pub fn run<S: Write, B: Write>(
        &self,
        store: &mut RecordWriter<S>,
        backup: &mut BackupLog<B>,
    ) -> MigrateResult<DiscoverySummary> {
        let mut summary = DiscoverySummary::default();
        for namespace in self.tenant_namespaces()? {
            summary.namespaces += 1;
            self.scan_namespace(&namespace, store, backup, &mut summary)?;
        }
        info!(
            namespaces = summary.namespaces,
            ingresses = summary.ingresses,
            records = summary.records,
            "discovery complete"
        );
        Ok(summary)
    }

    fn scan_namespace<S: Write, B: Write>(
        &self,
        namespace: &TenantNamespace,
        store: &mut RecordWriter<S>,
        backup: &mut BackupLog<B>,
        summary: &mut DiscoverySummary,
    ) -> MigrateResult<()> {
        info!(namespace = %namespace.name, "checking namespace for ingress resources");
        let response =
            self.gateway
                .get("ingress", Some(namespace.name.as_str()), TENANT_INGRESS_SELECTOR)?;
        let items = match response {
            Value::Object(mut list) => match list.remove("items") {
                Some(Value::Array(items)) => items,
                Some(Value::Null) | None => Vec::new(),
                Some(_) => {
                    return Err(MigrateError::malformed(
                        "ingress list",
                        &namespace.name,
                        "",
                        "items is not an array",
                    ));
                }
            },
            _ => {
                return Err(MigrateError::malformed(
                    "ingress list",
                    &namespace.name,
                    "",
                    "response is not an object",
                ));
            }
        };

        for item in items {
            backup.append(&item)?;
            summary.ingresses += 1;

            let ingress: Ingress = serde_json::from_value(item).map_err(|e| {
                MigrateError::malformed("ingress", &namespace.name, "", e.to_string())
            })?;
            let routes = ingress.routes(&namespace.name)?;
            if routes.is_empty() {
                debug!(
                    namespace = %namespace.name,
                    ingress = %ingress.metadata.name,
                    "ingress has no rules"
                );
                continue;
            }

            let lease = namespace
                .identity
                .lease_id()
                .map_err(|source| MigrateError::Label {
                    namespace: namespace.name.clone(),
                    source,
                })?;

            for route in routes {
                info!(
                    hostname = %route.hostname,
                    service = %route.service_name,
                    port = route.service_port,
                    "found existing ingress"
                );
                let record = RoutingRecord::new(
                    &lease,
                    route.hostname,
                    route.service_name,
                    route.service_port,
                    namespace.name.clone(),
                );
                store.append(&record)?;
                summary.records += 1;
            }
        }
        Ok(())
    }
}
