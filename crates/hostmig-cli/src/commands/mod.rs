pub mod backup;
pub mod create;
pub mod purge;
pub mod show;
