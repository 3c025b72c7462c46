//! Scripted cluster for the end-to-end tests.

use std::cell::RefCell;

use hostmig_kube::{ClusterGateway, GatewayResponse, GatewayResult};
use serde_json::{Value, json};

pub struct ScriptedCluster {
    namespaces: Value,
    ingresses: Vec<(String, Value)>,
    pub calls: RefCell<Vec<(String, Vec<String>, Option<Value>)>>,
}

impl ScriptedCluster {
    pub fn new(namespaces: Value, ingresses: Vec<(&str, Value)>) -> Self {
        Self {
            namespaces,
            ingresses: ingresses
                .into_iter()
                .map(|(ns, ingress)| (ns.to_string(), ingress))
                .collect(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn count(&self, verb: &str) -> usize {
        self.calls.borrow().iter().filter(|(v, _, _)| v == verb).count()
    }
}

impl ClusterGateway for ScriptedCluster {
    fn invoke(
        &self,
        verb: &str,
        args: &[String],
        expect_json: bool,
        input: Option<&[u8]>,
    ) -> GatewayResult<GatewayResponse> {
        let input: Option<Value> = input.map(|bytes| serde_json::from_slice(bytes).unwrap());
        self.calls
            .borrow_mut()
            .push((verb.to_string(), args.to_vec(), input.clone()));

        let body = match (verb, args[0].as_str()) {
            ("get", "namespaces") => self.namespaces.clone(),
            ("get", "ingress") => {
                let wanted = args[1].trim_start_matches("--namespace=");
                let items: Vec<&Value> = self
                    .ingresses
                    .iter()
                    .filter(|(ns, _)| ns == wanted)
                    .map(|(_, ingress)| ingress)
                    .collect();
                json!({"items": items})
            }
            ("apply", _) => input.unwrap_or(Value::Null),
            _ => Value::Null,
        };

        if expect_json {
            Ok(GatewayResponse::Json(body))
        } else {
            Ok(GatewayResponse::Raw(Vec::new()))
        }
    }
}
