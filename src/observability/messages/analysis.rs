// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for dependency analysis warnings and plan output.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// One task's resolved dependency edges, emitted while logging the graph.
///
/// # Log Level
/// `info!` - Plan output
pub struct TaskDependenciesResolved<'a> {
    pub task_id: &'a str,
    pub depends_on: &'a [String],
}

impl Display for TaskDependenciesResolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.depends_on.is_empty() {
            write!(f, "{} (no dependencies)", self.task_id)
        } else {
            write!(f, "{} -> {}", self.task_id, self.depends_on.join(", "))
        }
    }
}

impl StructuredLog for TaskDependenciesResolved<'_> {
    fn log(&self) {
        tracing::info!(
            task_id = self.task_id,
            dependency_count = self.depends_on.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "dependencies",
            span_name = name,
            task_id = self.task_id,
            dependency_count = self.depends_on.len(),
        )
    }
}

/// The layered execution plan, one line per layer.
///
/// # Log Level
/// `info!` - Plan output
pub struct LayerPlanComputed<'a> {
    pub layer: usize,
    pub task_ids: &'a [String],
}

impl Display for LayerPlanComputed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Layer {}: {}", self.layer, self.task_ids.join(", "))
    }
}

impl StructuredLog for LayerPlanComputed<'_> {
    fn log(&self) {
        tracing::info!(
            layer = self.layer,
            layer_size = self.task_ids.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "layer_plan",
            span_name = name,
            layer = self.layer,
            layer_size = self.task_ids.len(),
        )
    }
}

/// A declared dependency references an id absent from the batch.
///
/// The edge is dropped and execution proceeds.
///
/// # Log Level
/// `warn!` - Recoverable anomaly
pub struct UnknownDependencyDropped<'a> {
    pub task_id: &'a str,
    pub missing_dependency: &'a str,
}

impl Display for UnknownDependencyDropped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}' depends on '{}' which is not in the batch; dropping edge",
            self.task_id, self.missing_dependency
        )
    }
}

impl StructuredLog for UnknownDependencyDropped<'_> {
    fn log(&self) {
        tracing::warn!(
            task_id = self.task_id,
            missing_dependency = self.missing_dependency,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "unknown_dependency",
            span_name = name,
            task_id = self.task_id,
            missing_dependency = self.missing_dependency,
        )
    }
}

/// Layering stalled on a dependency cycle and the deterministic break rule
/// promoted one task.
///
/// # Log Level
/// `warn!` - Recoverable anomaly
pub struct CycleBroken<'a> {
    pub promoted: &'a str,
    pub blocked: &'a [String],
}

impl Display for CycleBroken<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dependency cycle among [{}]; promoting '{}' to break it",
            self.blocked.join(", "),
            self.promoted
        )
    }
}

impl StructuredLog for CycleBroken<'_> {
    fn log(&self) {
        tracing::warn!(
            promoted = self.promoted,
            blocked_count = self.blocked.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "cycle_broken",
            span_name = name,
            promoted = self.promoted,
            blocked_count = self.blocked.len(),
        )
    }
}

/// Two tasks in one group declare the same file.
///
/// # Log Level
/// `warn!` - Forces the serialized path for the group
pub struct FileConflictDetected<'a> {
    pub file: &'a str,
    pub first: &'a str,
    pub second: &'a str,
}

impl Display for FileConflictDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "File conflict on '{}': {} vs {}",
            self.file, self.first, self.second
        )
    }
}

impl StructuredLog for FileConflictDetected<'_> {
    fn log(&self) {
        tracing::warn!(
            file = self.file,
            first = self.first,
            second = self.second,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "file_conflict",
            span_name = name,
            file = self.file,
            first = self.first,
            second = self.second,
        )
    }
}
