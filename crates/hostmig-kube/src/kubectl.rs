//! `kubectl` subprocess gateway.
//!
//! Each call spawns the configured binary, pipes the optional input to its
//! stdin, and waits for it to exit. A non-zero exit is reported with the
//! captured stderr. Connection setup, auth and retries are left to kubectl.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use hostmig_core::KubectlConfig;
use tracing::{debug, error, info};

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::{ClusterGateway, GatewayResponse};

#[derive(Debug, Clone)]
pub struct Kubectl {
    binary: PathBuf,
    context: Option<String>,
    kubeconfig: Option<PathBuf>,
}

impl Kubectl {
    pub fn new(config: &KubectlConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            context: config.context.clone(),
            kubeconfig: config.kubeconfig.clone(),
        }
    }

    /// Full argument list passed to the binary for one call.
    pub fn command_args(&self, verb: &str, args: &[String], expect_json: bool) -> Vec<String> {
        let mut full = Vec::with_capacity(args.len() + 6);
        if let Some(kubeconfig) = &self.kubeconfig {
            full.push(format!("--kubeconfig={}", kubeconfig.display()));
        }
        if let Some(context) = &self.context {
            full.push(format!("--context={context}"));
        }
        full.push(verb.to_string());
        full.extend(args.iter().cloned());
        if expect_json {
            full.push("--output=json".to_string());
        }
        full
    }

    fn command_line(&self, args: &[String]) -> String {
        std::iter::once(self.binary.display().to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for Kubectl {
    fn default() -> Self {
        Self::new(&KubectlConfig::default())
    }
}

impl ClusterGateway for Kubectl {
    fn invoke(
        &self,
        verb: &str,
        args: &[String],
        expect_json: bool,
        input: Option<&[u8]>,
    ) -> GatewayResult<GatewayResponse> {
        let args = self.command_args(verb, args, expect_json);
        let command = self.command_line(&args);
        info!(%command, "running");

        let mut cmd = Command::new(&self.binary);
        cmd.args(&args)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| GatewayError::Spawn {
            command: command.clone(),
            source,
        })?;

        // A write error is held until the child has exited so its stderr is not lost.
        let written = match (input, child.stdin.take()) {
            (Some(input), Some(mut stdin)) => stdin.write_all(input),
            _ => Ok(()),
        };

        let output = child
            .wait_with_output()
            .map_err(|source| GatewayError::Spawn {
                command: command.clone(),
                source,
            })?;

        if let Err(source) = written {
            if output.status.success() {
                return Err(GatewayError::Stdin { command, source });
            }
            debug!(%command, error = %source, "stdin write failed before kubectl exited");
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!(%command, %stderr, "kubectl failed");
            return Err(GatewayError::Failed {
                command,
                code: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        debug!(%command, bytes = output.stdout.len(), "kubectl succeeded");

        if expect_json {
            let value = serde_json::from_slice(&output.stdout)
                .map_err(|source| GatewayError::Decode { command, source })?;
            Ok(GatewayResponse::Json(value))
        } else {
            Ok(GatewayResponse::Raw(output.stdout))
        }
    }
}
