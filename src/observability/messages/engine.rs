// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for executor lifecycle and execution events.
//!
//! This module contains message types for logging events related to:
//! * Batch execution lifecycle (start, completion)
//! * Group (chunk) launch within a layer
//! * Individual task launch and port assignment
//! * Conflict-driven serialized fallback

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Batch execution started with a computed layer plan.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use agile_flow::observability::messages::engine::ExecutionStarted;
///
/// let msg = ExecutionStarted {
///     task_count: 5,
///     layer_count: 3,
///     max_parallel: 4,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ExecutionStarted {
    pub task_count: usize,
    pub layer_count: usize,
    pub max_parallel: usize,
}

impl Display for ExecutionStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting parallel flow: {} tasks across {} layers, max_parallel={}",
            self.task_count, self.layer_count, self.max_parallel
        )
    }
}

impl StructuredLog for ExecutionStarted {
    fn log(&self) {
        tracing::info!(
            task_count = self.task_count,
            layer_count = self.layer_count,
            max_parallel = self.max_parallel,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "execution",
            span_name = name,
            task_count = self.task_count,
            layer_count = self.layer_count,
            max_parallel = self.max_parallel,
        )
    }
}

/// A chunk of a layer is starting on the parallel path.
///
/// # Log Level
/// `info!` - Important operational event
pub struct GroupStarted<'a> {
    pub layer: usize,
    pub task_ids: &'a [&'a str],
}

impl Display for GroupStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Layer {}: executing group of {} task(s): {}",
            self.layer,
            self.task_ids.len(),
            self.task_ids.join(", ")
        )
    }
}

impl StructuredLog for GroupStarted<'_> {
    fn log(&self) {
        tracing::info!(
            layer = self.layer,
            group_size = self.task_ids.len(),
            task_ids = self.task_ids.join(", "),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "group",
            span_name = name,
            layer = self.layer,
            group_size = self.task_ids.len(),
        )
    }
}

/// An individual task has been launched under supervision.
///
/// # Log Level
/// `info!` - Important operational event
pub struct TaskLaunched<'a> {
    pub task_id: &'a str,
    pub port: Option<u16>,
}

impl Display for TaskLaunched<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.port {
            Some(port) => write!(f, "Launching task '{}' on port {}", self.task_id, port),
            None => write!(f, "Launching task '{}'", self.task_id),
        }
    }
}

impl StructuredLog for TaskLaunched<'_> {
    fn log(&self) {
        tracing::info!(task_id = self.task_id, port = self.port, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "task",
            span_name = name,
            task_id = self.task_id,
            port = self.port,
        )
    }
}

/// A group fell back to serialized execution because of file conflicts.
///
/// # Log Level
/// `warn!` - Recoverable anomaly; throughput degrades but the group proceeds
pub struct ConflictFallback {
    pub layer: usize,
    pub conflict_count: usize,
}

impl Display for ConflictFallback {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Layer {}: {} file conflict(s) detected, executing group serially",
            self.layer, self.conflict_count
        )
    }
}

impl StructuredLog for ConflictFallback {
    fn log(&self) {
        tracing::warn!(
            layer = self.layer,
            conflict_count = self.conflict_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "conflict_fallback",
            span_name = name,
            layer = self.layer,
            conflict_count = self.conflict_count,
        )
    }
}

/// Batch execution finished; every input task has a result.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ExecutionCompleted {
    pub completed: usize,
    pub timed_out: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl Display for ExecutionCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Parallel flow finished in {:?}: {} completed, {} timed out, {} failed",
            self.elapsed, self.completed, self.timed_out, self.failed
        )
    }
}

impl StructuredLog for ExecutionCompleted {
    fn log(&self) {
        tracing::info!(
            completed = self.completed,
            timed_out = self.timed_out,
            failed = self.failed,
            elapsed_ms = self.elapsed.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "execution_completed",
            span_name = name,
            completed = self.completed,
            timed_out = self.timed_out,
            failed = self.failed,
        )
    }
}
