// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Error types surfaced to the owner of a [`crate::copier::Copier`].
//!
//! Failures that happen inside a worker (sink writes, stream reads) are never
//! returned here; they are reported through [`crate::diagnostics::Diagnostics`].

/// Errors returned by copier construction and start-up.
#[derive(Debug, thiserror::Error)]
pub enum CopierError {
    #[error("Copier already started")]
    AlreadyStarted,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Copier must be started from within a tokio runtime")]
    NoRuntime,
}
