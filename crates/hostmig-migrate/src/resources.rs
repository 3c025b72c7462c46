//! The parts of the namespace and ingress JSON that the migration reads.
//!
//! Only the consumed fields are modelled; everything else in the cluster
//! response is ignored (and preserved verbatim in the backup log).

use hostmig_core::labels::Labels;
use serde::Deserialize;

use crate::error::{MigrateError, MigrateResult};

/// `kubectl get ... --output=json` list envelope.
#[derive(Debug, Deserialize)]
pub struct ResourceList<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub labels: Labels,
}

#[derive(Debug, Deserialize)]
pub struct Namespace {
    pub metadata: ObjectMeta,
}

#[derive(Debug, Deserialize)]
pub struct Ingress {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: IngressSpec,
}

#[derive(Debug, Default, Deserialize)]
pub struct IngressSpec {
    #[serde(default)]
    pub rules: Vec<IngressRule>,
}

#[derive(Debug, Deserialize)]
pub struct IngressRule {
    pub host: Option<String>,
    pub http: Option<HttpRule>,
}

#[derive(Debug, Deserialize)]
pub struct HttpRule {
    #[serde(default)]
    pub paths: Vec<HttpPath>,
}

#[derive(Debug, Deserialize)]
pub struct HttpPath {
    pub backend: Backend,
}

#[derive(Debug, Deserialize)]
pub struct Backend {
    pub service: Option<ServiceBackend>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceBackend {
    pub name: String,
    pub port: ServicePort,
}

#[derive(Debug, Deserialize)]
pub struct ServicePort {
    pub number: Option<i64>,
    pub name: Option<String>,
}

/// One hostname → service:port mapping taken from an ingress rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub hostname: String,
    pub service_name: String,
    pub service_port: u16,
}

impl Ingress {
    /// One route per rule, in rule order.
    ///
    /// Only the first path of each rule is used; further paths are ignored.
    pub fn routes(&self, namespace: &str) -> MigrateResult<Vec<Route>> {
        self.spec
            .rules
            .iter()
            .enumerate()
            .map(|(index, rule)| self.route(namespace, index, rule))
            .collect()
    }

    fn route(&self, namespace: &str, index: usize, rule: &IngressRule) -> MigrateResult<Route> {
        let malformed =
            |reason: String| MigrateError::malformed("ingress", namespace, &self.metadata.name, reason);

        let hostname = rule
            .host
            .clone()
            .ok_or_else(|| malformed(format!("rule {index} has no host")))?;
        let path = rule
            .http
            .as_ref()
            .and_then(|http| http.paths.first())
            .ok_or_else(|| malformed(format!("rule {index} ({hostname}) has no http paths")))?;
        let service = path.backend.service.as_ref().ok_or_else(|| {
            malformed(format!("rule {index} ({hostname}) has no service backend"))
        })?;

        let number = match (&service.port.number, &service.port.name) {
            (Some(number), _) => *number,
            (None, Some(name)) => {
                return Err(malformed(format!(
                    "rule {index} ({hostname}) uses named port {name:?}"
                )));
            }
            (None, None) => {
                return Err(malformed(format!("rule {index} ({hostname}) has no port")));
            }
        };
        let service_port = u16::try_from(number)
            .ok()
            .filter(|port| *port != 0)
            .ok_or_else(|| {
                malformed(format!("rule {index} ({hostname}) has invalid port {number}"))
            })?;

        Ok(Route {
            hostname,
            service_name: service.name.clone(),
            service_port,
        })
    }
}
