// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The capability a copier forwards tagged messages to.

use async_trait::async_trait;

use crate::message::Message;

/// Errors a sink reports when it fails to accept a message.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sink is closed")]
    Closed,

    #[error("Message rejected: {0}")]
    Rejected(String),
}

/// Destination for tagged log messages (file, network, structured backend...).
///
/// Every worker of a copier calls `log` on the same sink concurrently and the
/// copier does no locking around it. Implementations must serialize
/// internally if their backend requires it.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Accepts one message. A failure is reported to diagnostics and the
    /// worker moves on to the next read. Sinks that keep the message past
    /// this call clone it.
    async fn log(&self, msg: &Message) -> Result<(), SinkError>;

    /// Name used to identify this sink in diagnostics.
    fn name(&self) -> &str;
}
