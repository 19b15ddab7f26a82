// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Terminal state of a supervised task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Completed,
    Timeout,
    Error,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Timeout => write!(f, "timeout"),
            TaskStatus::Error => write!(f, "error"),
        }
    }
}

/// Outcome of one task within a batch.
///
/// Every batch execution produces exactly one `TaskResult` per input task.
/// A port is present only for tasks that completed on the parallel path;
/// serialized and failed tasks carry `port: None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
    pub task_id: String,
    pub status: TaskStatus,
    pub port: Option<u16>,
    pub error: Option<String>,
}

impl TaskResult {
    pub fn completed(task_id: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            task_id: task_id.into(),
            status: TaskStatus::Completed,
            port,
            error: None,
        }
    }

    pub fn timed_out(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            status: TaskStatus::Timeout,
            port: None,
            error: Some("deadline exceeded".to_string()),
        }
    }

    pub fn failed(task_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            status: TaskStatus::Error,
            port: None,
            error: Some(error.into()),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}
