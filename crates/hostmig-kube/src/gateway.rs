//! The gateway trait and the argument shapes of the calls the phases make.

use serde_json::Value;

use crate::error::{GatewayError, GatewayResult};

/// Output of a single gateway call.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayResponse {
    /// Decoded `--output=json` response.
    Json(Value),
    /// Raw stdout, for calls that do not request JSON.
    Raw(Vec<u8>),
}

/// A control-plane client able to run one `kubectl`-shaped call at a time.
///
/// Implementors only provide [`invoke`](ClusterGateway::invoke); the
/// provided methods fix the argument layout used by the migration.
pub trait ClusterGateway {
    /// Run `verb args...`. When `expect_json` is set the response must be
    /// decoded JSON. `input` is piped to the client's stdin.
    fn invoke(
        &self,
        verb: &str,
        args: &[String],
        expect_json: bool,
        input: Option<&[u8]>,
    ) -> GatewayResult<GatewayResponse>;

    /// `get <kind> [--namespace=<ns>] --selector=<selector>` as JSON.
    fn get(&self, kind: &str, namespace: Option<&str>, selector: &str) -> GatewayResult<Value> {
        let mut args = vec![kind.to_string()];
        if let Some(namespace) = namespace {
            args.push(format!("--namespace={namespace}"));
        }
        args.push(format!("--selector={selector}"));
        expect_json("get", &args, self.invoke("get", &args, true, None)?)
    }

    /// `apply -n <namespace> -f -` with `document` on stdin.
    fn apply(&self, namespace: &str, document: &Value) -> GatewayResult<Value> {
        let args = vec![
            "-n".to_string(),
            namespace.to_string(),
            "-f".to_string(),
            "-".to_string(),
        ];
        let input = document.to_string();
        expect_json(
            "apply",
            &args,
            self.invoke("apply", &args, true, Some(input.as_bytes()))?,
        )
    }

    /// `delete <kind> <name> --namespace=<ns>`. A missing resource is an error.
    fn delete(&self, kind: &str, name: &str, namespace: &str) -> GatewayResult<Vec<u8>> {
        let args = vec![
            kind.to_string(),
            name.to_string(),
            format!("--namespace={namespace}"),
        ];
        match self.invoke("delete", &args, false, None)? {
            GatewayResponse::Raw(bytes) => Ok(bytes),
            GatewayResponse::Json(value) => Ok(value.to_string().into_bytes()),
        }
    }
}

impl<G: ClusterGateway + ?Sized> ClusterGateway for &G {
    fn invoke(
        &self,
        verb: &str,
        args: &[String],
        expect_json: bool,
        input: Option<&[u8]>,
    ) -> GatewayResult<GatewayResponse> {
        (**self).invoke(verb, args, expect_json, input)
    }
}

/// Human-readable `verb args...` used in diagnostics.
pub fn display_command(verb: &str, args: &[String]) -> String {
    std::iter::once(verb)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

fn expect_json(verb: &str, args: &[String], response: GatewayResponse) -> GatewayResult<Value> {
    match response {
        GatewayResponse::Json(value) => Ok(value),
        GatewayResponse::Raw(_) => Err(GatewayError::NotJson {
            command: display_command(verb, args),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    struct Call {
        verb: String,
        args: Vec<String>,
        expect_json: bool,
        input: Option<String>,
    }

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<Call>>,
        raw: bool,
    }

    impl ClusterGateway for Recorder {
        fn invoke(
            &self,
            verb: &str,
            args: &[String],
            expect_json: bool,
            input: Option<&[u8]>,
        ) -> GatewayResult<GatewayResponse> {
            self.calls.borrow_mut().push(Call {
                verb: verb.to_string(),
                args: args.to_vec(),
                expect_json,
                input: input.map(|b| String::from_utf8_lossy(b).into_owned()),
            });
            if self.raw {
                Ok(GatewayResponse::Raw(b"ok".to_vec()))
            } else {
                Ok(GatewayResponse::Json(json!({"items": []})))
            }
        }
    }

    #[test]
    fn get_namespaces_shape() {
        let gw = Recorder::default();
        gw.get("namespaces", None, "akash.network=true").unwrap();

        let calls = gw.calls.borrow();
        assert_eq!(calls[0].verb, "get");
        assert_eq!(calls[0].args, vec!["namespaces", "--selector=akash.network=true"]);
        assert!(calls[0].expect_json);
    }

    #[test]
    fn get_ingress_in_namespace_shape() {
        let gw = Recorder::default();
        gw.get("ingress", Some("ns1"), "akash.network/namespace").unwrap();

        assert_eq!(
            gw.calls.borrow()[0].args,
            vec!["ingress", "--namespace=ns1", "--selector=akash.network/namespace"]
        );
    }

    #[test]
    fn apply_pipes_document() {
        let gw = Recorder::default();
        let doc = json!({"kind": "ProviderHost"});
        gw.apply("lease", &doc).unwrap();

        let call = gw.calls.borrow()[0].clone();
        assert_eq!(call.verb, "apply");
        assert_eq!(call.args, vec!["-n", "lease", "-f", "-"]);
        assert!(call.expect_json);
        let sent: Value = serde_json::from_str(call.input.as_deref().unwrap()).unwrap();
        assert_eq!(sent, doc);
    }

    #[test]
    fn delete_requests_raw_output() {
        let gw = Recorder {
            raw: true,
            ..Default::default()
        };
        let out = gw.delete("ingress", "web", "ns1").unwrap();

        assert_eq!(out, b"ok");
        let call = gw.calls.borrow()[0].clone();
        assert_eq!(call.args, vec!["ingress", "web", "--namespace=ns1"]);
        assert!(!call.expect_json);
        assert!(call.input.is_none());
    }

    #[test]
    fn raw_response_to_json_call_is_an_error() {
        let gw = Recorder {
            raw: true,
            ..Default::default()
        };
        let err = gw.get("namespaces", None, "akash.network=true").unwrap_err();
        assert!(matches!(err, GatewayError::NotJson { .. }));
        assert!(err.to_string().contains("get namespaces"));
    }

    #[test]
    fn references_delegate() {
        fn list<G: ClusterGateway>(gateway: G) -> Value {
            gateway.get("namespaces", None, "x").unwrap()
        }

        let gw = Recorder::default();
        assert_eq!(list(&gw), json!({"items": []}));
        assert_eq!(gw.calls.borrow().len(), 1);
    }
}
