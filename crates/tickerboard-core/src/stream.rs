//! # Dashboard Event Stream
//!
//! Newline-delimited JSON (NDJSON) for orchestrator state changes.
//!
//! | Event | Payload |
//! |-------|---------|
//! | `quotes` | [`QuoteState`](crate::QuoteState) |
//! | `chart` | [`ChartState`](crate::ChartState) |
//! | `sectors` | [`SectorState`](crate::SectorState) |
//!
//! Every line carries a sequence number starting at 1 and a UTC timestamp.

use std::io::Write;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::UtcDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamEventType {
    Quotes,
    Chart,
    Sectors,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamEvent {
    pub event: StreamEventType,
    /// Monotonically increasing, starting from 1.
    pub seq: u64,
    pub ts: UtcDateTime,
    pub data: Value,
}

/// Writes one event per line and flushes after each.
///
/// Not synchronized; give each producer its own writer.
pub struct NdjsonStreamWriter<W: Write> {
    writer: W,
    next_seq: u64,
}

impl<W: Write> NdjsonStreamWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            next_seq: 1,
        }
    }

    pub fn emit<T: Serialize>(
        &mut self,
        event: StreamEventType,
        data: &T,
    ) -> Result<(), StreamError> {
        let event = StreamEvent {
            event,
            seq: self.next_seq,
            ts: UtcDateTime::now(),
            data: serde_json::to_value(data)?,
        };
        self.next_seq += 1;

        let payload = serde_json::to_string(&event)?;
        self.writer.write_all(payload.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
