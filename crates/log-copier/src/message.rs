// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use std::borrow::Cow;

/// One chunk of log data read from a named source, tagged with its provenance.
///
/// `line` is an owned copy of exactly the bytes returned by a single read; the
/// copier's scratch buffer is never handed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Identifier of the process or container that owns the streams
    pub container_id: String,
    /// Name of the originating stream, e.g. "stdout" or "stderr"
    pub source: String,
    /// Raw bytes of one read, never empty when produced by the copier
    pub line: Vec<u8>,
    /// UTC instant captured right after the read completed
    pub timestamp: DateTime<Utc>,
}

impl Message {
    #[must_use]
    pub fn new(
        container_id: impl Into<String>,
        source: impl Into<String>,
        line: Vec<u8>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Message {
            container_id: container_id.into(),
            source: source.into(),
            line,
            timestamp,
        }
    }

    /// Returns the chunk as text, replacing invalid UTF-8 sequences.
    pub fn line_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.line)
    }
}
