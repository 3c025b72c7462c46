//! Sequential writer and reader for the record file.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use hostmig_core::RoutingRecord;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Payload version written by this build.
pub const PAYLOAD_VERSION: u32 = 1;

/// Upper bound on a single payload. A record is a few hundred bytes, so a
/// larger prefix means the file is corrupt.
pub const MAX_RECORD_LEN: usize = 16 * 1024 * 1024;

const PREFIX_LEN: usize = 4;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    record: &'a RoutingRecord,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    record: serde_json::Value,
}

// ── Writer ─────────────────────────────────────────────────────────

/// Appends framed records. Every append is flushed before it returns.
pub struct RecordWriter<W: Write> {
    inner: W,
    written: u64,
}

impl RecordWriter<BufWriter<File>> {
    /// Create (or truncate) the record file at `path`.
    pub fn create(path: &Path) -> StoreResult<Self> {
        let file = File::create(path)?;
        debug!(?path, "record store created");
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> RecordWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    pub fn append(&mut self, record: &RoutingRecord) -> StoreResult<()> {
        let payload = serde_json::to_vec(&EnvelopeRef {
            version: PAYLOAD_VERSION,
            record,
        })
        .map_err(|e| StoreError::Encode(e.to_string()))?;

        if payload.len() > MAX_RECORD_LEN {
            return Err(StoreError::RecordTooLarge {
                index: self.written,
                length: payload.len(),
                limit: MAX_RECORD_LEN,
            });
        }
        // MAX_RECORD_LEN fits in a u32, checked above.
        let prefix = (payload.len() as u32).to_be_bytes();

        self.inner.write_all(&prefix)?;
        self.inner.write_all(&payload)?;
        self.inner.flush()?;
        self.written += 1;
        debug!(
            index = self.written - 1,
            bytes = payload.len(),
            hostname = %record.hostname,
            "record appended"
        );
        Ok(())
    }

    /// Number of records appended through this writer.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

// ── Reader ─────────────────────────────────────────────────────────

/// Reads framed records back in the order they were appended.
pub struct RecordReader<R: Read> {
    inner: R,
    index: u64,
}

impl RecordReader<BufReader<File>> {
    pub fn open(path: &Path) -> StoreResult<Self> {
        let file = File::open(path)?;
        debug!(?path, "record store opened");
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, index: 0 }
    }

    /// Read the next record, or `None` at a clean end of file.
    pub fn read_next(&mut self) -> StoreResult<Option<RoutingRecord>> {
        let index = self.index;
        let Some(prefix) = self.read_prefix()? else {
            return Ok(None);
        };

        let length = u32::from_be_bytes(prefix) as usize;
        if length > MAX_RECORD_LEN {
            return Err(StoreError::RecordTooLarge {
                index,
                length,
                limit: MAX_RECORD_LEN,
            });
        }

        let mut payload = Vec::with_capacity(length);
        (&mut self.inner)
            .take(length as u64)
            .read_to_end(&mut payload)?;
        if payload.len() < length {
            return Err(StoreError::Truncated {
                index,
                expected: length,
                actual: payload.len(),
            });
        }

        let record = decode_payload(index, &payload)?;
        self.index += 1;
        Ok(Some(record))
    }

    /// Number of records read so far.
    pub fn position(&self) -> u64 {
        self.index
    }

    fn read_prefix(&mut self) -> StoreResult<Option<[u8; PREFIX_LEN]>> {
        let mut prefix = [0u8; PREFIX_LEN];
        let mut filled = 0;
        while filled < PREFIX_LEN {
            match self.inner.read(&mut prefix[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        match filled {
            0 => Ok(None),
            PREFIX_LEN => Ok(Some(prefix)),
            actual => Err(StoreError::Truncated {
                index: self.index,
                expected: PREFIX_LEN,
                actual,
            }),
        }
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = StoreResult<RoutingRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next().transpose()
    }
}

fn decode_payload(index: u64, payload: &[u8]) -> StoreResult<RoutingRecord> {
    let envelope: Envelope = serde_json::from_slice(payload).map_err(|e| StoreError::Decode {
        index,
        message: e.to_string(),
    })?;
    if envelope.version != PAYLOAD_VERSION {
        return Err(StoreError::UnsupportedVersion {
            index,
            version: envelope.version,
        });
    }
    serde_json::from_value(envelope.record).map_err(|e| StoreError::Decode {
        index,
        message: e.to_string(),
    })
}

/// SHA-256 hex digest of the file at `path`.
pub fn digest_file(path: &Path) -> StoreResult<String> {
    let bytes = std::fs::read(path)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}
