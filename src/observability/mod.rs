// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Centralized message types for the executor's diagnostic and progress
//! output. Message types follow a struct-based pattern with `Display` plus
//! the [`messages::StructuredLog`] trait so every event carries both a
//! human-readable line and machine-readable fields.
//!
//! Messages are organized by subsystem:
//! * `messages::engine` - executor lifecycle, group and task launch events
//! * `messages::analysis` - dependency resolution, layer plan, conflict and
//!   cycle warnings
//! * `messages::resources` - file lock and port pool events
//!
//! The log format is not a stable contract; callers should consume results,
//! not log lines.

pub mod messages;
