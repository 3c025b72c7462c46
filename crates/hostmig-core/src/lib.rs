pub mod config;
pub mod labels;
pub mod types;

pub use config::{KubectlConfig, MigrateConfig};
pub use labels::{LabelError, LabelResult};
pub use types::*;
