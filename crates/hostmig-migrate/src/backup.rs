//! Newline-delimited JSON copy of every ingress seen during discovery.
//!
//! The log is advisory: it is appended as discovery goes and a crash may
//! leave a partial last line.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::Value;

use crate::error::{MigrateError, MigrateResult};

pub struct BackupLog<W: Write> {
    inner: W,
    entries: u64,
}

impl BackupLog<BufWriter<File>> {
    /// Create (or truncate) the backup log at `path`.
    pub fn create(path: &Path) -> MigrateResult<Self> {
        let file = File::create(path).map_err(MigrateError::Backup)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> BackupLog<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, entries: 0 }
    }

    /// Write `resource` as one compact JSON line.
    pub fn append(&mut self, resource: &Value) -> MigrateResult<()> {
        serde_json::to_writer(&mut self.inner, resource)
            .map_err(|e| MigrateError::Backup(e.into()))?;
        self.inner.write_all(b"\n").map_err(MigrateError::Backup)?;
        self.inner.flush().map_err(MigrateError::Backup)?;
        self.entries += 1;
        Ok(())
    }

    pub fn entries(&self) -> u64 {
        self.entries
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
