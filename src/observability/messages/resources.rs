// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for file-lock and port-pool events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A file lock stayed contended past the acquire timeout.
///
/// # Log Level
/// `error!` - Fails the enclosing group
pub struct LockAcquireTimedOut<'a> {
    pub path: &'a str,
    pub timeout: Duration,
}

impl Display for LockAcquireTimedOut<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Timed out acquiring lock for '{}' after {:?}",
            self.path, self.timeout
        )
    }
}

impl StructuredLog for LockAcquireTimedOut<'_> {
    fn log(&self) {
        tracing::error!(
            path = self.path,
            timeout_ms = self.timeout.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "lock_timeout",
            span_name = name,
            path = self.path,
            timeout_ms = self.timeout.as_millis() as u64,
        )
    }
}

/// The port pool could not satisfy an atomic allocation.
///
/// # Log Level
/// `error!` - Fails the enclosing group
pub struct PortPoolExhausted {
    pub requested: usize,
    pub available: usize,
}

impl Display for PortPoolExhausted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Port pool exhausted: requested {}, {} available",
            self.requested, self.available
        )
    }
}

impl StructuredLog for PortPoolExhausted {
    fn log(&self) {
        tracing::error!(
            requested = self.requested,
            available = self.available,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "port_exhausted",
            span_name = name,
            requested = self.requested,
            available = self.available,
        )
    }
}
