// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Readable byte streams a copier drains.
//!
//! A single read may return data together with a terminal condition (end of
//! stream or error). [`ReadOutcome`] carries both so the copier can forward the
//! data before acting on the terminal condition.

use std::collections::HashMap;
use std::io::ErrorKind;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Named sources handed to a copier, e.g. `"stdout"` and `"stderr"`.
pub type Sources = HashMap<String, Box<dyn LogSource>>;

/// Why a stream stopped producing data.
#[derive(Debug)]
pub enum StreamEnd {
    /// Clean end of stream
    Eof,
    /// Any other read failure
    Error(std::io::Error),
}

/// Result of one read: how many bytes landed in the buffer, and whether the
/// stream ended with this read.
#[derive(Debug)]
pub struct ReadOutcome {
    pub bytes_read: usize,
    pub end: Option<StreamEnd>,
}

impl ReadOutcome {
    #[must_use]
    pub fn data(bytes_read: usize) -> Self {
        ReadOutcome {
            bytes_read,
            end: None,
        }
    }

    #[must_use]
    pub fn eof() -> Self {
        ReadOutcome {
            bytes_read: 0,
            end: Some(StreamEnd::Eof),
        }
    }

    #[must_use]
    pub fn error(err: std::io::Error) -> Self {
        ReadOutcome {
            bytes_read: 0,
            end: Some(StreamEnd::Error(err)),
        }
    }

    /// Data and terminal condition delivered by the same read.
    #[must_use]
    pub fn with_end(bytes_read: usize, end: StreamEnd) -> Self {
        ReadOutcome {
            bytes_read,
            end: Some(end),
        }
    }
}

/// A blocking byte stream owned exclusively by one copier worker.
#[async_trait]
pub trait LogSource: Send {
    /// Reads into `buf`, waiting until data or a terminal condition is available.
    /// `bytes_read` must not exceed `buf.len()`.
    async fn read(&mut self, buf: &mut [u8]) -> ReadOutcome;
}

/// Adapts any tokio reader to [`LogSource`].
///
/// `Ok(0)` is the end of stream and interrupted reads are retried.
pub struct ReaderSource<R> {
    reader: R,
}

impl<R> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        ReaderSource { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R> ReaderSource<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    /// Wraps `reader` ready for insertion into [`Sources`].
    pub fn boxed(reader: R) -> Box<dyn LogSource> {
        Box::new(ReaderSource::new(reader))
    }
}

#[async_trait]
impl<R> LogSource for ReaderSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    async fn read(&mut self, buf: &mut [u8]) -> ReadOutcome {
        loop {
            match self.reader.read(buf).await {
                Ok(0) => return ReadOutcome::eof(),
                Ok(n) => return ReadOutcome::data(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return ReadOutcome::error(e),
            }
        }
    }
}
