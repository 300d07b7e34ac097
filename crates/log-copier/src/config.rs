// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::errors::CopierError;
use std::env;

/// Scratch buffer size used by each worker. Large enough to keep the number of
/// read calls low on chatty streams, small enough that a partial line reaches
/// the sink without waiting for more output.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Upper bound accepted by [`CopierConfig::validate`].
pub const MAX_BUFFER_SIZE: usize = 1024 * 1024;

const BUFFER_SIZE_ENV: &str = "LOG_COPIER_BUFFER_SIZE";

/// Configuration for a log copier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopierConfig {
    /// Size in bytes of the per-source read buffer; also the largest chunk a
    /// single message can carry
    pub buffer_size: usize,
}

impl Default for CopierConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl CopierConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, CopierError> {
        let buffer_size = env::var(BUFFER_SIZE_ENV)
            .ok()
            .and_then(|size| size.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_BUFFER_SIZE);

        let config = Self { buffer_size };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), CopierError> {
        if self.buffer_size == 0 {
            return Err(CopierError::InvalidConfig(
                "buffer size must be greater than 0".to_string(),
            ));
        }

        if self.buffer_size > MAX_BUFFER_SIZE {
            return Err(CopierError::InvalidConfig(format!(
                "buffer size {} exceeds maximum of {} bytes",
                self.buffer_size, MAX_BUFFER_SIZE
            )));
        }

        Ok(())
    }
}
