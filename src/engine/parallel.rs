// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Layer-by-layer parallel executor with resource arbitration.
//!
//! The executor turns a batch of declared tasks into a safe parallel run:
//! it asks the analyzer for a layered schedule, then walks the layers in
//! order, splitting each layer into chunks of at most `max_parallel` tasks.
//! A chunk whose tasks share no files runs on the parallel path: every
//! declared file is exclusively locked, a port is reserved per task, and all
//! actions run concurrently under per-task deadlines. A chunk with file
//! conflicts falls back to serialized execution, where the one-at-a-time
//! discipline makes locks and ports unnecessary.
//!
//! ## Execution Phases
//!
//! 1. **Analysis**: dependency graph + layer plan, logged up front
//! 2. **Layer iteration**: layers run strictly in order; a layer starts only
//!    after the previous one has fully completed
//! 3. **Group execution**: conflict check, all-or-nothing resource
//!    acquisition, supervised concurrent launch, ordered collection
//! 4. **Release on every exit path**: ports are returned once the last
//!    action has settled, locks are released last, whether the group
//!    completed, timed out item-wise, or failed acquisition
//!
//! ## Failure Model
//!
//! One task's error or timeout never aborts its siblings; it becomes that
//! task's result. A group-level resource failure (lock timeout, port
//! exhaustion) marks every task in the group as failed with the shared
//! cause, and execution proceeds to the next chunk. The batch therefore
//! always produces exactly one result per input task, unless the
//! [`FailureStrategy::FailFast`] strict mode is selected, which aborts the
//! flow at the first non-completed result.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::analysis::{
    detect_file_conflicts, AnalyzerOptions, TaskDependencyAnalyzer,
};
use crate::errors::{ExecutionError, FailureStrategy};
use crate::model::{Task, TaskResult, TaskStatus};
use crate::observability::messages::analysis::{
    FileConflictDetected, LayerPlanComputed, TaskDependenciesResolved,
};
use crate::observability::messages::engine::{
    ConflictFallback, ExecutionCompleted, ExecutionStarted, GroupStarted, TaskLaunched,
};
use crate::observability::messages::resources::{LockAcquireTimedOut, PortPoolExhausted};
use crate::observability::messages::StructuredLog;
use crate::resources::{FileLockManager, PortPool};
use crate::traits::TaskAction;

/// Configuration for a [`ParallelExecutor`] instance.
///
/// All state is explicitly injected; there is no process-global storage.
/// The lock manager and port pool are created from these values and live
/// exactly as long as the executor.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Root of the project the batch operates on; carried for context only.
    pub project_path: PathBuf,
    /// Upper bound on the size of one concurrently-running chunk.
    pub max_parallel: usize,
    /// Per-task deadline on the supervised action.
    pub task_timeout: Duration,
    /// Per-file bound on lock acquisition for a group.
    pub lock_timeout: Duration,
    /// Directory holding lock files; created on demand.
    pub lock_dir: PathBuf,
    pub port_range_start: u16,
    pub port_range_capacity: usize,
    pub failure_strategy: FailureStrategy,
    pub analyzer: AnalyzerOptions,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            project_path: PathBuf::from("."),
            max_parallel: 3,
            task_timeout: Duration::from_secs(60),
            lock_timeout: Duration::from_secs(30),
            lock_dir: std::env::temp_dir().join("agile-flow-locks"),
            port_range_start: 3000,
            port_range_capacity: 10,
            failure_strategy: FailureStrategy::default(),
            analyzer: AnalyzerOptions::default(),
        }
    }
}

/// Supervises batches of declared tasks over a caller-supplied action.
pub struct ParallelExecutor {
    config: ExecutorConfig,
    analyzer: TaskDependencyAnalyzer,
    file_locks: FileLockManager,
    port_pool: PortPool,
    action: Arc<dyn TaskAction>,
}

impl ParallelExecutor {
    pub fn new(config: ExecutorConfig, action: Arc<dyn TaskAction>) -> Self {
        let config = ExecutorConfig {
            max_parallel: config.max_parallel.max(1), // Ensure at least 1
            ..config
        };
        let analyzer = TaskDependencyAnalyzer::new(config.analyzer);
        let file_locks = FileLockManager::new(&config.lock_dir);
        let port_pool = PortPool::new(config.port_range_start, config.port_range_capacity);
        Self {
            config,
            analyzer,
            file_locks,
            port_pool,
            action,
        }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn file_locks(&self) -> &FileLockManager {
        &self.file_locks
    }

    pub fn port_pool(&self) -> &PortPool {
        &self.port_pool
    }

    /// Execute a batch and return one result per input task.
    ///
    /// Results arrive in schedule order: layer by layer, chunk by chunk,
    /// input order within a chunk. Every task id from the batch appears
    /// exactly once. On return, no file locks are held and no ports remain
    /// reserved, regardless of how individual tasks fared.
    pub async fn execute_parallel_flow(
        &self,
        tasks: &[Task],
    ) -> Result<Vec<TaskResult>, ExecutionError> {
        let started = Instant::now();

        let graph = self.analyzer.analyze(tasks);
        for task in tasks {
            if let Some(deps) = graph.dependencies_of(&task.id) {
                TaskDependenciesResolved {
                    task_id: &task.id,
                    depends_on: deps,
                }
                .log();
            }
        }

        let layers = self.analyzer.parallel_layers(&graph)?;
        for (index, layer) in layers.iter().enumerate() {
            LayerPlanComputed {
                layer: index + 1,
                task_ids: layer,
            }
            .log();
        }
        ExecutionStarted {
            task_count: tasks.len(),
            layer_count: layers.len(),
            max_parallel: self.config.max_parallel,
        }
        .log();

        let mut results: Vec<TaskResult> = Vec::with_capacity(tasks.len());
        for (index, layer) in layers.iter().enumerate() {
            let layer_tasks: Vec<&Task> =
                tasks.iter().filter(|t| layer.contains(&t.id)).collect();

            for chunk in layer_tasks.chunks(self.config.max_parallel) {
                let chunk_results = self.execute_group(index + 1, chunk).await;

                if self.config.failure_strategy == FailureStrategy::FailFast {
                    if let Some(failed) = chunk_results.iter().find(|r| !r.is_completed()) {
                        return Err(ExecutionError::TaskFailed {
                            task_id: failed.task_id.clone(),
                            error: failed
                                .error
                                .clone()
                                .unwrap_or_else(|| failed.status.to_string()),
                        });
                    }
                }

                results.extend(chunk_results);
            }
        }

        ExecutionCompleted {
            completed: count_status(&results, TaskStatus::Completed),
            timed_out: count_status(&results, TaskStatus::Timeout),
            failed: count_status(&results, TaskStatus::Error),
            elapsed: started.elapsed(),
        }
        .log();

        Ok(results)
    }

    /// Execute one chunk of a layer.
    ///
    /// Conflict-free chunks take the parallel path: declared files are
    /// locked in sorted order (all-or-nothing), ports are allocated
    /// atomically, and every task runs concurrently under its deadline.
    /// Chunks with internal file conflicts run serialized instead. Either
    /// way the chunk's results come back in input order.
    async fn execute_group(&self, layer: usize, chunk: &[&Task]) -> Vec<TaskResult> {
        let ids: Vec<&str> = chunk.iter().map(|t| t.id.as_str()).collect();
        GroupStarted {
            layer,
            task_ids: &ids,
        }
        .log();

        let conflicts = detect_file_conflicts(chunk.iter().copied());
        if !conflicts.is_empty() {
            for conflict in &conflicts {
                FileConflictDetected {
                    file: &conflict.file,
                    first: &conflict.first,
                    second: &conflict.second,
                }
                .log();
            }
            ConflictFallback {
                layer,
                conflict_count: conflicts.len(),
            }
            .log();
            return self.execute_serialized(chunk).await;
        }

        // Stable acquisition order; released in reverse. Chunks never nest
        // acquisitions, so no hold-and-wait can occur across groups.
        let mut lock_paths: Vec<&str> = chunk
            .iter()
            .flat_map(|t| t.files.iter().map(String::as_str))
            .collect();
        lock_paths.sort_unstable();
        lock_paths.dedup();

        let mut acquired: Vec<&str> = Vec::with_capacity(lock_paths.len());
        for path in lock_paths.iter().copied() {
            if self.file_locks.acquire(path, self.config.lock_timeout).await {
                acquired.push(path);
            } else {
                LockAcquireTimedOut {
                    path,
                    timeout: self.config.lock_timeout,
                }
                .log();
                self.release_locks(&acquired);
                let cause = ExecutionError::LockTimeout {
                    path: path.to_string(),
                    timeout: self.config.lock_timeout,
                };
                return fail_group(chunk, &cause);
            }
        }

        let ports = match self.port_pool.allocate(chunk.len()) {
            Ok(ports) => ports,
            Err(cause) => {
                if let ExecutionError::PortExhausted {
                    requested,
                    available,
                    ..
                } = &cause
                {
                    PortPoolExhausted {
                        requested: *requested,
                        available: *available,
                    }
                    .log();
                }
                self.release_locks(&acquired);
                return fail_group(chunk, &cause);
            }
        };

        let mut handles = Vec::with_capacity(chunk.len());
        for (task, port) in chunk.iter().zip(&ports) {
            TaskLaunched {
                task_id: &task.id,
                port: Some(*port),
            }
            .log();

            let action = Arc::clone(&self.action);
            let task = (*task).clone();
            let port = *port;
            let deadline = self.config.task_timeout;
            handles.push(tokio::spawn(async move {
                supervise(action, &task, Some(port), deadline).await
            }));
        }

        let mut results = Vec::with_capacity(chunk.len());
        for (task, handle) in chunk.iter().zip(handles) {
            match handle.await {
                Ok(result) => results.push(result),
                // A panicking action fails itself, never its siblings.
                Err(join_error) => results.push(TaskResult::failed(
                    &task.id,
                    format!("supervision failed: {join_error}"),
                )),
            }
        }

        // Ports after the last action settles, locks last.
        self.port_pool.release(&ports);
        self.release_locks(&acquired);

        results
    }

    /// Conflict fallback: run the chunk one task at a time.
    ///
    /// No ports are assigned and no locks are taken; the serial discipline
    /// already guarantees exclusion within the group, and cross-group
    /// exclusion is handled by layer ordering.
    async fn execute_serialized(&self, chunk: &[&Task]) -> Vec<TaskResult> {
        let mut results = Vec::with_capacity(chunk.len());
        for task in chunk.iter().copied() {
            TaskLaunched {
                task_id: &task.id,
                port: None,
            }
            .log();
            let result = supervise(
                Arc::clone(&self.action),
                task,
                None,
                self.config.task_timeout,
            )
            .await;
            results.push(result);
        }
        results
    }

    fn release_locks(&self, acquired: &[&str]) {
        for path in acquired.iter().rev() {
            self.file_locks.release(path);
        }
    }
}

/// Run one action under its deadline and convert the outcome to a result.
async fn supervise(
    action: Arc<dyn TaskAction>,
    task: &Task,
    port: Option<u16>,
    deadline: Duration,
) -> TaskResult {
    match tokio::time::timeout(deadline, action.invoke(task, port)).await {
        Ok(Ok(())) => TaskResult::completed(&task.id, port),
        Ok(Err(error)) => TaskResult::failed(&task.id, error.to_string()),
        Err(_) => TaskResult::timed_out(&task.id),
    }
}

fn fail_group(chunk: &[&Task], cause: &ExecutionError) -> Vec<TaskResult> {
    chunk
        .iter()
        .map(|task| TaskResult::failed(&task.id, cause.to_string()))
        .collect()
}

fn count_status(results: &[TaskResult], status: TaskStatus) -> usize {
    results.iter().filter(|r| r.status == status).count()
}
