// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Log multiplexing core: drains several named byte streams concurrently,
//! tags every chunk with its origin, and forwards it to a pluggable sink.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod config;
pub mod copier;
pub mod diagnostics;
pub mod errors;
pub mod message;
pub mod sink;
pub mod source;

pub use config::CopierConfig;
pub use copier::{Copier, CopierBuilder};
pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub use errors::CopierError;
pub use message::Message;
pub use sink::{Sink, SinkError};
pub use source::{LogSource, ReadOutcome, ReaderSource, Sources, StreamEnd};
