//! hostmig-migrate: the three migration phases.
//!
//! ```text
//! backup  : cluster ──get──▶ discovery ──append──▶ record store (+ backup log)
//! create  : record store ──read──▶ replay ──apply──▶ ProviderHost resources
//! purge   : record store ──read──▶ purge  ──delete─▶ original ingresses
//! ```
//!
//! The record store is the only state shared between phases. Each phase
//! runs start to finish on one thread and stops at the first error.

pub mod backup;
pub mod discovery;
pub mod error;
pub mod purge;
pub mod replay;
pub mod resources;

#[cfg(test)]
pub(crate) mod fake;

pub use backup::BackupLog;
pub use discovery::{Discovery, DiscoverySummary, TenantNamespace};
pub use error::{MigrateError, MigrateResult};
pub use purge::{PurgeSummary, purge};
pub use replay::{ReplaySummary, replay};
