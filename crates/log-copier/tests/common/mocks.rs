// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Mock sinks, sources and diagnostics for copier tests

use async_trait::async_trait;
use log_copier::{Diagnostics, LogSource, Message, ReadOutcome, Sink, SinkError, StreamEnd};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::oneshot;

/// Sink that records every message it accepts. Messages whose line equals
/// one of `reject` fail with `SinkError::Rejected` and are not recorded.
#[derive(Default)]
pub struct RecordingSink {
    pub messages: Mutex<Vec<Message>>,
    pub attempts: Mutex<usize>,
    reject: Vec<Vec<u8>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn rejecting(lines: &[&str]) -> Self {
        RecordingSink {
            reject: lines.iter().map(|l| l.as_bytes().to_vec()).collect(),
            ..Default::default()
        }
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().unwrap().clone()
    }

    /// Lines received from `source`, in delivery order
    pub fn lines_from(&self, source: &str) -> Vec<Vec<u8>> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.source == source)
            .map(|m| m.line.clone())
            .collect()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl Sink for RecordingSink {
    async fn log(&self, msg: &Message) -> Result<(), SinkError> {
        *self.attempts.lock().unwrap() += 1;
        if self.reject.contains(&msg.line) {
            return Err(SinkError::Rejected("unwanted line".to_string()));
        }
        self.messages.lock().unwrap().push(msg.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Source that replays a fixed script of reads, then reports end of stream.
pub struct ScriptedSource {
    steps: VecDeque<(Vec<u8>, Option<StreamEnd>)>,
}

#[allow(dead_code)]
impl ScriptedSource {
    pub fn new(steps: Vec<(&str, Option<StreamEnd>)>) -> Self {
        ScriptedSource {
            steps: steps
                .into_iter()
                .map(|(data, end)| (data.as_bytes().to_vec(), end))
                .collect(),
        }
    }

    /// Each chunk is returned by its own read, followed by a bare end of stream.
    pub fn lines(lines: &[&str]) -> Self {
        Self::chunks(lines.iter().map(|l| l.as_bytes().to_vec()).collect())
    }

    pub fn chunks(chunks: Vec<Vec<u8>>) -> Self {
        ScriptedSource {
            steps: chunks.into_iter().map(|c| (c, None)).collect(),
        }
    }
}

#[async_trait]
impl LogSource for ScriptedSource {
    async fn read(&mut self, buf: &mut [u8]) -> ReadOutcome {
        // Yield so workers interleave on the runtime.
        tokio::task::yield_now().await;
        match self.steps.pop_front() {
            Some((data, end)) => {
                buf[..data.len()].copy_from_slice(&data);
                ReadOutcome {
                    bytes_read: data.len(),
                    end,
                }
            }
            None => ReadOutcome::eof(),
        }
    }
}

/// Source whose first read blocks until the paired sender fires or is dropped.
pub struct GatedSource {
    gate: Option<oneshot::Receiver<()>>,
}

#[allow(dead_code)]
impl GatedSource {
    pub fn new() -> (oneshot::Sender<()>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, GatedSource { gate: Some(rx) })
    }
}

#[async_trait]
impl LogSource for GatedSource {
    async fn read(&mut self, _buf: &mut [u8]) -> ReadOutcome {
        if let Some(gate) = self.gate.take() {
            let _ = gate.await;
        }
        ReadOutcome::eof()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    SinkFailed {
        sink: String,
        source: String,
        line: Vec<u8>,
    },
    ReadFailed {
        container_id: String,
        source: String,
        error: String,
    },
}

/// Diagnostics that keep every report for later inspection.
#[derive(Default)]
pub struct RecordingDiagnostics {
    pub reports: Mutex<Vec<Report>>,
}

#[allow(dead_code)]
impl RecordingDiagnostics {
    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().unwrap().clone()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn sink_failed(&self, sink_name: &str, msg: &Message, _err: &SinkError) {
        self.reports.lock().unwrap().push(Report::SinkFailed {
            sink: sink_name.to_string(),
            source: msg.source.clone(),
            line: msg.line.clone(),
        });
    }

    fn read_failed(&self, container_id: &str, source: &str, err: &std::io::Error) {
        self.reports.lock().unwrap().push(Report::ReadFailed {
            container_id: container_id.to_string(),
            source: source.to_string(),
            error: err.to_string(),
        });
    }
}
