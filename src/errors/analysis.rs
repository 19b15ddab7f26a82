// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors raised by the dependency analyzer.
///
/// Only strict-mode analysis produces errors; the permissive default logs a
/// warning and breaks cycles deterministically instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The dependency graph contains a cycle and strict mode is enabled.
    ///
    /// `remaining` lists the task ids still blocked when the layering pass
    /// stalled, in lexicographic order.
    #[error("dependency cycle detected among tasks: {}", .remaining.join(", "))]
    CycleDetected { remaining: Vec<String> },
}
