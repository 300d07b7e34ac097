// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Fan-in of named log streams into a single sink.
//!
//! A [`Copier`] owns a set of named sources (typically a process's stdout and
//! stderr) and one shared [`Sink`]. [`Copier::run`] spawns one task per source;
//! each task reads chunks, tags them with the container id, source name and a
//! UTC timestamp, and hands them to the sink until its stream ends.
//!
//! ```text
//!   stdout ──► worker ──┐
//!                       ├──► Sink::log(&Message)
//!   stderr ──► worker ──┘
//! ```
//!
//! Ordering is FIFO within a source and unspecified across sources. Worker
//! failures never reach the caller: sink errors and read errors go to the
//! injected [`Diagnostics`], and [`Copier::wait`] simply resolves once every
//! worker has stopped. There is no cancellation; closing a source stream is
//! the only way to stop its worker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;
use tracing::{debug, trace};

use crate::config::CopierConfig;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::errors::CopierError;
use crate::message::Message;
use crate::sink::Sink;
use crate::source::{LogSource, ReadOutcome, Sources, StreamEnd};

/// Copies logs from named sources to a sink, tagging each chunk with the
/// container id, source name and timestamp.
///
/// Sink calls are made concurrently from all workers, see [`Sink`].
pub struct Copier {
    container_id: String,
    source_names: Vec<String>,
    sources: Mutex<Sources>,
    sink: Arc<dyn Sink>,
    diagnostics: Arc<dyn Diagnostics>,
    config: CopierConfig,
    started: AtomicBool,
    copy_jobs: TaskTracker,
}

impl Copier {
    /// Creates a copier with the default configuration, reporting failures
    /// through `tracing`. No validation is performed; an empty `sources` map
    /// yields a copier with nothing to do.
    pub fn new(container_id: impl Into<String>, sources: Sources, sink: Arc<dyn Sink>) -> Self {
        Copier::from_parts(
            container_id.into(),
            sources,
            sink,
            Arc::new(TracingDiagnostics),
            CopierConfig::default(),
        )
    }

    pub fn builder(
        container_id: impl Into<String>,
        sources: Sources,
        sink: Arc<dyn Sink>,
    ) -> CopierBuilder {
        CopierBuilder {
            container_id: container_id.into(),
            sources,
            sink,
            diagnostics: None,
            config: CopierConfig::default(),
        }
    }

    fn from_parts(
        container_id: String,
        sources: Sources,
        sink: Arc<dyn Sink>,
        diagnostics: Arc<dyn Diagnostics>,
        config: CopierConfig,
    ) -> Self {
        let mut source_names: Vec<String> = sources.keys().cloned().collect();
        source_names.sort();

        // Stays open until `run` has spawned every worker.
        let copy_jobs = TaskTracker::new();

        Copier {
            container_id,
            source_names,
            sources: Mutex::new(sources),
            sink,
            diagnostics,
            config,
            started: AtomicBool::new(false),
            copy_jobs,
        }
    }

    /// Starts one worker per source and returns without blocking.
    ///
    /// Must be called from within a tokio runtime. Every worker is registered
    /// with the completion barrier before this returns. Starting twice is a
    /// usage error and schedules nothing.
    pub fn run(&self) -> Result<(), CopierError> {
        let runtime = Handle::try_current().map_err(|_| CopierError::NoRuntime)?;
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(CopierError::AlreadyStarted);
        }

        let sources = std::mem::take(
            &mut *self
                .sources
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );

        debug!(
            container_id = %self.container_id,
            "Starting log copier for {} sources into {}",
            sources.len(),
            self.sink.name()
        );

        for (name, source) in sources {
            let worker = Worker {
                container_id: self.container_id.clone(),
                name,
                sink: Arc::clone(&self.sink),
                diagnostics: Arc::clone(&self.diagnostics),
                buffer_size: self.config.buffer_size,
            };
            self.copy_jobs.spawn_on(worker.copy_src(source), &runtime);
        }
        // Only now can the tracker read as finished.
        self.copy_jobs.close();

        Ok(())
    }

    /// Waits until every worker started by [`Copier::run`] has stopped.
    ///
    /// Resolves immediately if called again after it already returned, or if
    /// the copier was never started.
    pub async fn wait(&self) {
        if !self.is_started() {
            return;
        }
        self.copy_jobs.wait().await;
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// Names of the sources this copier was built with, sorted.
    pub fn source_names(&self) -> &[String] {
        &self.source_names
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    pub fn config(&self) -> &CopierConfig {
        &self.config
    }
}

/// Builder for a [`Copier`] with a custom configuration or diagnostics.
pub struct CopierBuilder {
    container_id: String,
    sources: Sources,
    sink: Arc<dyn Sink>,
    diagnostics: Option<Arc<dyn Diagnostics>>,
    config: CopierConfig,
}

impl CopierBuilder {
    #[must_use]
    pub fn config(mut self, config: CopierConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Builds the copier, rejecting an invalid configuration.
    pub fn build(self) -> Result<Copier, CopierError> {
        self.config.validate()?;
        Ok(Copier::from_parts(
            self.container_id,
            self.sources,
            self.sink,
            self.diagnostics.unwrap_or_else(|| Arc::new(TracingDiagnostics)),
            self.config,
        ))
    }
}

/// State owned by the task draining a single source.
struct Worker {
    container_id: String,
    name: String,
    sink: Arc<dyn Sink>,
    diagnostics: Arc<dyn Diagnostics>,
    buffer_size: usize,
}

impl Worker {
    async fn copy_src(self, mut source: Box<dyn LogSource>) {
        debug!(
            container_id = %self.container_id,
            source = %self.name,
            "Copying log stream"
        );

        let mut buf = vec![0u8; self.buffer_size];
        let mut last_timestamp = DateTime::<Utc>::MIN_UTC;
        loop {
            let ReadOutcome { bytes_read, end } = source.read(&mut buf).await;
            // Wall clock steps backwards must not reorder timestamps within a source.
            let timestamp = Utc::now().max(last_timestamp);
            last_timestamp = timestamp;

            // Data bundled with a terminal condition is forwarded first.
            let bytes_read = bytes_read.min(buf.len());
            if bytes_read > 0 {
                let msg = Message {
                    container_id: self.container_id.clone(),
                    source: self.name.clone(),
                    line: buf[..bytes_read].to_vec(),
                    timestamp,
                };
                self.forward(msg).await;
            }

            match end {
                None => {}
                Some(StreamEnd::Eof) => break,
                Some(StreamEnd::Error(e)) => {
                    self.diagnostics.read_failed(&self.container_id, &self.name, &e);
                    break;
                }
            }
        }

        debug!(
            container_id = %self.container_id,
            source = %self.name,
            "Log stream finished"
        );
    }

    async fn forward(&self, msg: Message) {
        trace!(
            source = %self.name,
            "Forwarding {} bytes to {}",
            msg.line.len(),
            self.sink.name()
        );
        if let Err(e) = self.sink.log(&msg).await {
            self.diagnostics.sink_failed(self.sink.name(), &msg, &e);
        }
    }
}
