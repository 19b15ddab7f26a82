// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Errors that can occur during flow-file validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Two tasks in the batch share the same id
    DuplicateTaskId {
        /// The duplicate task id
        task_id: String,
    },
    /// A task was declared with an empty id
    EmptyTaskId,
    /// The configured port range cannot hold a single port
    ZeroPortCapacity,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateTaskId { task_id } => {
                write!(f, "Duplicate task id: '{}'", task_id)
            }
            ValidationError::EmptyTaskId => {
                write!(f, "Task declared with an empty id")
            }
            ValidationError::ZeroPortCapacity => {
                write!(f, "Port range capacity must be at least 1")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
