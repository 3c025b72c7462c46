//! Server-side dry run for mutating calls.

use tracing::info;

use crate::error::GatewayResult;
use crate::gateway::{ClusterGateway, GatewayResponse};

const MUTATING_VERBS: &[&str] = &["apply", "delete"];

/// Forwards every call to the wrapped gateway, adding `--dry-run=server`
/// to mutating verbs so the API server validates without persisting.
pub struct DryRun<G> {
    inner: G,
}

impl<G: ClusterGateway> DryRun<G> {
    pub fn new(inner: G) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> G {
        self.inner
    }
}

impl<G: ClusterGateway> ClusterGateway for DryRun<G> {
    fn invoke(
        &self,
        verb: &str,
        args: &[String],
        expect_json: bool,
        input: Option<&[u8]>,
    ) -> GatewayResult<GatewayResponse> {
        if !MUTATING_VERBS.contains(&verb) {
            return self.inner.invoke(verb, args, expect_json, input);
        }
        info!(verb, "dry run, changes will not be persisted");
        let mut args = args.to_vec();
        args.push("--dry-run=server".to_string());
        self.inner.invoke(verb, &args, expect_json, input)
    }
}
