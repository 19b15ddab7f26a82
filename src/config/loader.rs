// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::engine::ExecutorConfig;
use crate::errors::FailureStrategy;
use crate::model::{Priority, Task};

/// Root structure of a flow file.
///
/// A flow file declares a batch of tasks plus the executor options to run
/// them with. It is typically loaded from YAML by the demo binary; library
/// embedders construct [`ExecutorConfig`] and [`Task`] values directly and
/// never touch this layer.
///
/// # Example
/// ```yaml
/// failure_strategy: continue_on_error
/// executor_options:
///   max_parallel: 3
///   task_timeout_seconds: 60
/// tasks:
///   - id: "TASK-001"
///     description: "implement auth"
///     priority: P1
///     files: ["src/auth/login.py"]
///   - id: "TASK-002"
///     description: "implement user management"
///     depends_on: ["TASK-001"]
///     files: ["src/api/users.py"]
/// ```
#[derive(Debug, Deserialize)]
pub struct FlowConfig {
    #[serde(default)]
    pub failure_strategy: FailureStrategy,
    #[serde(default)]
    pub executor_options: ExecutorOptions,
    pub tasks: Vec<TaskConfig>,
}

/// Executor-specific options from a flow file.
///
/// Every field is optional; [`ExecutorOptions::resolve`] fills in the same
/// defaults [`ExecutorConfig::default`] uses.
#[derive(Debug, Default, Deserialize)]
pub struct ExecutorOptions {
    pub project_path: Option<PathBuf>,
    pub max_parallel: Option<usize>,
    pub task_timeout_seconds: Option<u64>,
    pub lock_timeout_seconds: Option<u64>,
    pub lock_dir: Option<PathBuf>,
    pub port_range_start: Option<u16>,
    pub port_range_capacity: Option<usize>,
}

impl ExecutorOptions {
    /// Merge these options over the built-in defaults.
    pub fn resolve(&self, failure_strategy: FailureStrategy) -> ExecutorConfig {
        let defaults = ExecutorConfig::default();
        ExecutorConfig {
            project_path: self
                .project_path
                .clone()
                .unwrap_or(defaults.project_path),
            max_parallel: self.max_parallel.unwrap_or(defaults.max_parallel),
            task_timeout: self
                .task_timeout_seconds
                .map(Duration::from_secs)
                .unwrap_or(defaults.task_timeout),
            lock_timeout: self
                .lock_timeout_seconds
                .map(Duration::from_secs)
                .unwrap_or(defaults.lock_timeout),
            lock_dir: self.lock_dir.clone().unwrap_or(defaults.lock_dir),
            port_range_start: self
                .port_range_start
                .unwrap_or(defaults.port_range_start),
            port_range_capacity: self
                .port_range_capacity
                .unwrap_or(defaults.port_range_capacity),
            failure_strategy,
            analyzer: defaults.analyzer,
        }
    }
}

/// One task declaration in a flow file.
#[derive(Debug, Deserialize)]
pub struct TaskConfig {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
}

fn default_status() -> String {
    "pending".to_string()
}

impl TaskConfig {
    pub fn to_task(&self) -> Task {
        Task::new(&self.id, &self.description, self.priority, &self.status)
            .with_dependencies(self.depends_on.iter().cloned())
            .with_files(self.files.iter().cloned())
    }
}

/// Load a flow file from YAML
pub fn load_flow<P: AsRef<Path>>(path: P) -> Result<FlowConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let flow: FlowConfig = serde_yaml::from_str(&content)?;
    Ok(flow)
}

/// Load and validate a flow file from YAML
///
/// Loads the flow and runs batch validation so duplicate or empty task ids
/// are rejected before anything executes.
pub fn load_and_validate_flow<P: AsRef<Path>>(
    path: P,
) -> Result<FlowConfig, Box<dyn std::error::Error>> {
    let flow = load_flow(path)?;

    if let Err(validation_errors) = crate::config::validate_flow(&flow) {
        let error_messages: Vec<String> =
            validation_errors.iter().map(|e| e.to_string()).collect();
        let combined_error = format!(
            "Flow validation failed:\n{}",
            error_messages.join("\n")
        );
        return Err(combined_error.into());
    }

    Ok(flow)
}
