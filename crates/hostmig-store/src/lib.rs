//! hostmig-store: the record file shared by every migration phase.
//!
//! # Format
//!
//! The file is a flat sequence of frames:
//!
//! ```text
//! [u32 big-endian length][payload of that many bytes]
//! ```
//!
//! Each payload is a JSON envelope `{"version":1,"record":{...}}` holding one
//! [`RoutingRecord`](hostmig_core::RoutingRecord). Only the framing is a
//! stable contract; the payload is versioned so it can evolve.
//!
//! End of file is only clean between frames. A file cut short inside a
//! frame surfaces as [`StoreError::Truncated`].

pub mod error;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use store::{RecordReader, RecordWriter, digest_file};
