// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging and tracing.
//!
//! Each message type implements:
//!
//! * `Display` - human-readable output
//! * `StructuredLog` - machine-readable fields + span creation
//!
//! # Usage
//!
//! ```rust
//! use agile_flow::observability::messages::{StructuredLog, engine::ExecutionStarted};
//!
//! let msg = ExecutionStarted {
//!     task_count: 5,
//!     layer_count: 3,
//!     max_parallel: 4,
//! };
//!
//! // Emits the human-readable message AND structured fields
//! msg.log();
//! ```

pub mod analysis;
pub mod engine;
pub mod resources;

use tracing::Span;

/// Trait for messages that support structured logging and tracing.
///
/// `log()` emits a log event at the level matching the message's semantic
/// meaning (progress notices at `info!`, recoverable anomalies at `warn!`,
/// group failures at `error!`), carrying both the `Display` rendering and
/// the message's fields. `span()` creates a tracing span with the same
/// fields as attributes for callers that want nested timing context.
pub trait StructuredLog {
    /// Emit a log event with structured fields.
    fn log(&self);

    /// Create a span with the message fields as attributes.
    fn span(&self, name: &str) -> Span;
}
