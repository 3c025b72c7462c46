//! hostmig-kube: every cluster read and write goes through here.
//!
//! [`ClusterGateway`] is the seam between the migration phases and the
//! control plane. [`Kubectl`] drives the real `kubectl` binary; [`DryRun`]
//! wraps any gateway so mutating calls are validated server-side without
//! being persisted.

pub mod dry_run;
pub mod error;
pub mod gateway;
pub mod kubectl;

pub use dry_run::DryRun;
pub use error::{GatewayError, GatewayResult};
pub use gateway::{ClusterGateway, GatewayResponse};
pub use kubectl::Kubectl;
