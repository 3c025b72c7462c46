//! In-memory cluster used by the phase tests.

use std::cell::RefCell;

use hostmig_core::labels::{
    DSEQ_LABEL, GSEQ_LABEL, MANAGED_LABEL, NAMESPACE_LABEL, OSEQ_LABEL, OWNER_LABEL, PROVIDER_LABEL,
};
use hostmig_kube::gateway::display_command;
use hostmig_kube::{ClusterGateway, GatewayError, GatewayResponse, GatewayResult};
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub verb: String,
    pub args: Vec<String>,
    pub input: Option<Value>,
}

#[derive(Default)]
pub struct FakeCluster {
    namespaces: Vec<Value>,
    ingresses: Vec<(String, Value)>,
    fail_on: Option<String>,
    pub calls: RefCell<Vec<Invocation>>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: Value) -> Self {
        self.namespaces.push(namespace);
        self
    }

    pub fn with_ingress(mut self, namespace: &str, ingress: Value) -> Self {
        self.ingresses.push((namespace.to_string(), ingress));
        self
    }

    /// Fail any call whose command line contains `needle`.
    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on = Some(needle.to_string());
        self
    }

    pub fn calls_with_verb(&self, verb: &str) -> Vec<Invocation> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.verb == verb)
            .cloned()
            .collect()
    }
}

impl ClusterGateway for FakeCluster {
    fn invoke(
        &self,
        verb: &str,
        args: &[String],
        expect_json: bool,
        input: Option<&[u8]>,
    ) -> GatewayResult<GatewayResponse> {
        let command = display_command(verb, args);
        self.calls.borrow_mut().push(Invocation {
            verb: verb.to_string(),
            args: args.to_vec(),
            input: input.map(|bytes| serde_json::from_slice(bytes).unwrap()),
        });

        if let Some(needle) = &self.fail_on {
            if command.contains(needle.as_str()) {
                return Err(GatewayError::Failed {
                    command,
                    code: 1,
                    stderr: "injected failure".to_string(),
                });
            }
        }

        let body = match (verb, args.first().map(String::as_str)) {
            ("get", Some("namespaces")) => json!({"items": self.namespaces}),
            ("get", Some("ingress")) => {
                let namespace = args
                    .iter()
                    .find_map(|arg| arg.strip_prefix("--namespace="))
                    .unwrap_or_default();
                let items: Vec<&Value> = self
                    .ingresses
                    .iter()
                    .filter(|(ns, _)| ns == namespace)
                    .map(|(_, ingress)| ingress)
                    .collect();
                json!({"items": items})
            }
            ("apply", _) => input
                .map(|bytes| serde_json::from_slice(bytes).unwrap())
                .unwrap_or(Value::Null),
            ("delete", _) => {
                let name = args.get(1).cloned().unwrap_or_default();
                return Ok(GatewayResponse::Raw(
                    format!("ingress.networking.k8s.io \"{name}\" deleted\n").into_bytes(),
                ));
            }
            _ => Value::Null,
        };

        if expect_json {
            Ok(GatewayResponse::Json(body))
        } else {
            Ok(GatewayResponse::Raw(body.to_string().into_bytes()))
        }
    }
}

pub fn tenant_namespace(name: &str, provider: &str, owner: &str, dseq: u64, gseq: u32, oseq: u32) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "labels": {
                MANAGED_LABEL: "true",
                PROVIDER_LABEL: provider,
                OWNER_LABEL: owner,
                DSEQ_LABEL: dseq.to_string(),
                GSEQ_LABEL: gseq.to_string(),
                OSEQ_LABEL: oseq.to_string(),
            },
        },
    })
}

pub fn ingress_with_rules(name: &str, rules: &[(&str, &str, u16)]) -> Value {
    let rules: Vec<Value> = rules
        .iter()
        .map(|(host, service, port)| {
            json!({
                "host": host,
                "http": {"paths": [{
                    "path": "/",
                    "pathType": "Prefix",
                    "backend": {"service": {"name": service, "port": {"number": port}}},
                }]},
            })
        })
        .collect();
    json!({
        "apiVersion": "networking.k8s.io/v1",
        "kind": "Ingress",
        "metadata": {"name": name, "labels": {NAMESPACE_LABEL: "tenant"}},
        "spec": {"ingressClassName": "akash-ingress-class", "rules": rules},
    })
}
