// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Failure reporting for copier workers.
//!
//! Workers never log through a process-wide logger directly. Each copier holds
//! a [`Diagnostics`] handle supplied at construction; the default forwards to
//! `tracing`, tests usually inject a recorder.

use crate::message::Message;
use crate::sink::SinkError;
use tracing::error;

/// Receives the non-fatal and fatal failures observed by copier workers.
pub trait Diagnostics: Send + Sync {
    /// The sink failed to accept `msg`. The worker keeps reading.
    fn sink_failed(&self, sink_name: &str, msg: &Message, err: &SinkError);

    /// Reading `source` failed. The worker for that source has stopped.
    fn read_failed(&self, container_id: &str, source: &str, err: &std::io::Error);
}

/// Reports failures as `tracing` error events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn sink_failed(&self, sink_name: &str, msg: &Message, err: &SinkError) {
        error!(
            container_id = %msg.container_id,
            source = %msg.source,
            "Failed to log msg {:?} for logger {}: {}",
            msg.line_lossy(),
            sink_name,
            err
        );
    }

    fn read_failed(&self, container_id: &str, source: &str, err: &std::io::Error) {
        error!(
            container_id = %container_id,
            source = %source,
            "Error scanning log stream: {}",
            err
        );
    }
}
