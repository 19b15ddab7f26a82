// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::fmt;

/// Task priority, ordered from most to least urgent (`P0 < P1 < P2 < P3`).
///
/// The executor carries priority as pass-through metadata; scheduling order
/// comes from the dependency graph, not from priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum Priority {
    P0,
    P1,
    P2,
    P3,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::P2
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::P0 => write!(f, "P0"),
            Priority::P1 => write!(f, "P1"),
            Priority::P2 => write!(f, "P2"),
            Priority::P3 => write!(f, "P3"),
        }
    }
}

/// A declared unit of work.
///
/// A task names the ids it depends on and the file paths it intends to
/// mutate. Both collections are owned copies, deduplicated on construction;
/// declaring the same dependency or file twice is idempotent.
///
/// # Example
/// ```
/// use agile_flow::model::{Priority, Task};
///
/// let task = Task::new("TASK-002", "implement user management", Priority::P1, "pending")
///     .with_dependencies(["TASK-001"])
///     .with_files(["src/api/users.py"]);
///
/// assert_eq!(task.dependencies, vec!["TASK-001".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Unique identifier within a batch.
    pub id: String,
    /// Free text; consumed only by heuristic edge inference.
    pub description: String,
    pub priority: Priority,
    /// Opaque to the executor; carried through untouched.
    pub status: String,
    /// Ids of tasks this task depends on.
    pub dependencies: Vec<String>,
    /// File paths this task intends to mutate.
    pub files: Vec<String>,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            priority,
            status: status.into(),
            dependencies: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dedup_preserving_order(dependencies);
        self
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = dedup_preserving_order(files);
        self
    }
}

fn dedup_preserving_order<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for value in values {
        let value = value.into();
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_ordering_is_total() {
        assert!(Priority::P0 < Priority::P1);
        assert!(Priority::P1 < Priority::P2);
        assert!(Priority::P2 < Priority::P3);
    }

    #[test]
    fn duplicate_dependencies_are_idempotent() {
        let task = Task::new("T1", "demo", Priority::P1, "pending")
            .with_dependencies(["T0", "T0", "T2"]);
        assert_eq!(task.dependencies, vec!["T0", "T2"]);
    }

    #[test]
    fn duplicate_files_are_idempotent() {
        let task = Task::new("T1", "demo", Priority::P1, "pending")
            .with_files(["src/a.py", "src/a.py"]);
        assert_eq!(task.files, vec!["src/a.py"]);
    }
}
