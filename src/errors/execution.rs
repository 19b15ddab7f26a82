// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error types and failure policy for batch execution.

use crate::errors::AnalysisError;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the parallel executor.
///
/// Item-level failures (a single action erroring or timing out) are recorded
/// in that item's [`crate::model::TaskResult`] and never appear here. This
/// enum covers group- and batch-level failures: resource acquisition that
/// fails a whole chunk, strict-mode aborts, and internal supervision faults.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The OS advisory lock for `path` stayed contended past the configured
    /// acquire timeout. Fails the enclosing group.
    #[error("timed out acquiring file lock for '{path}' after {timeout:?}")]
    LockTimeout { path: String, timeout: Duration },

    /// The port pool could not satisfy an atomic allocation. Fails the
    /// enclosing group; the pool is left unchanged.
    #[error("port pool exhausted: requested {requested}, {available} available (in use: {in_use:?})")]
    PortExhausted {
        requested: usize,
        available: usize,
        in_use: Vec<u16>,
    },

    /// A task did not complete and the failure strategy is
    /// [`FailureStrategy::FailFast`].
    #[error("task '{task_id}' failed: {error}")]
    TaskFailed { task_id: String, error: String },

    /// Strict-mode dependency analysis rejected the batch.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// Supervision machinery fault (e.g. a join error on a spawned action).
    #[error("internal executor error: {message}")]
    Internal { message: String },
}

/// How the executor reacts to a non-completed task result.
///
/// The default is permissive: every task in the batch runs and failures are
/// reported per item. `FailFast` aborts the flow at the first task that does
/// not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailureStrategy {
    #[default]
    ContinueOnError,
    FailFast,
}
