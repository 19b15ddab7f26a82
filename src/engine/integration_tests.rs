use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::engine::{ExecutorConfig, ParallelExecutor};
use crate::errors::FailureStrategy;
use crate::model::{Priority, Task, TaskStatus};
use crate::traits::TaskAction;

/// Integration tests driving the executor end-to-end through
/// `execute_parallel_flow` with real lock directories and port pools.
#[cfg(test)]
mod tests {
    use super::*;

    struct InstantAction;

    #[async_trait]
    impl TaskAction for InstantAction {
        async fn invoke(&self, _task: &Task, _port: Option<u16>) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct SleepAction {
        delay: Duration,
    }

    #[async_trait]
    impl TaskAction for SleepAction {
        async fn invoke(&self, _task: &Task, _port: Option<u16>) -> anyhow::Result<()> {
            tokio::time::sleep(self.delay).await;
            Ok(())
        }
    }

    fn task(id: &str, description: &str) -> Task {
        Task::new(id, description, Priority::P1, "pending")
    }

    fn executor_with(
        lock_dir: &std::path::Path,
        configure: impl FnOnce(ExecutorConfig) -> ExecutorConfig,
    ) -> ParallelExecutor {
        let config = configure(ExecutorConfig {
            lock_dir: lock_dir.to_path_buf(),
            ..ExecutorConfig::default()
        });
        ParallelExecutor::new(config, Arc::new(InstantAction))
    }

    #[tokio::test]
    async fn test_independent_tasks_run_in_one_layer() {
        let dir = tempfile::tempdir().unwrap();
        let executor = executor_with(dir.path(), |c| c);

        let tasks = vec![
            task("T1", "first"),
            task("T2", "second"),
            task("T3", "third"),
        ];
        let results = executor.execute_parallel_flow(&tasks).await.unwrap();

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.status == TaskStatus::Completed));
    }

    #[tokio::test]
    async fn test_linear_chain_completes_in_dependency_order() {
        let dir = tempfile::tempdir().unwrap();
        let executor = executor_with(dir.path(), |c| c);

        let tasks = vec![
            task("A", "base layer"),
            task("B", "middle layer").with_dependencies(["A"]),
            task("C", "final layer").with_dependencies(["B"]),
        ];
        let results = executor.execute_parallel_flow(&tasks).await.unwrap();

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.status == TaskStatus::Completed));
        // Schedule order: one layer per task, so results arrive A, B, C.
        let ids: Vec<&str> = results.iter().map(|r| r.task_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_file_conflict_serializes_the_group() {
        let dir = tempfile::tempdir().unwrap();
        let executor = executor_with(dir.path(), |c| c);

        let tasks = vec![
            task("X", "edit user api").with_files(["src/users.py"]),
            task("Y", "edit user api again").with_files(["src/users.py"]),
        ];
        let results = executor.execute_parallel_flow(&tasks).await.unwrap();

        assert_eq!(results.len(), 2);
        for result in &results {
            assert_eq!(result.status, TaskStatus::Completed);
            assert_eq!(result.port, None);
        }
        assert_eq!(executor.file_locks().held_count(), 0);
        assert_eq!(executor.port_pool().reserved_count(), 0);
    }

    #[tokio::test]
    async fn test_port_exhaustion_fails_the_whole_group() {
        let dir = tempfile::tempdir().unwrap();
        let executor = executor_with(dir.path(), |c| ExecutorConfig {
            max_parallel: 10,
            port_range_start: 4000,
            port_range_capacity: 5,
            ..c
        });

        let tasks: Vec<Task> = (1..=10)
            .map(|i| task(&format!("TASK-{i:03}"), "independent"))
            .collect();
        let results = executor.execute_parallel_flow(&tasks).await.unwrap();

        assert_eq!(results.len(), 10);
        for result in &results {
            assert_eq!(result.status, TaskStatus::Error);
            assert!(result.error.as_deref().unwrap().contains("port pool exhausted"));
        }
        assert_eq!(executor.port_pool().reserved_count(), 0);
        assert_eq!(executor.file_locks().held_count(), 0);
    }

    #[tokio::test]
    async fn test_deadline_exceeded_is_reported_as_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExecutorConfig {
            lock_dir: dir.path().to_path_buf(),
            task_timeout: Duration::from_millis(100),
            ..ExecutorConfig::default()
        };
        let executor = ParallelExecutor::new(
            config,
            Arc::new(SleepAction {
                delay: Duration::from_secs(5),
            }),
        );

        let results = executor
            .execute_parallel_flow(&[task("SLOW", "sleeps past the deadline")])
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, TaskStatus::Timeout);
    }

    #[tokio::test]
    async fn test_full_cycle_is_broken_deterministically() {
        let dir = tempfile::tempdir().unwrap();
        let executor = executor_with(dir.path(), |c| c);

        // A -> B -> C -> A in flow order: B waits on A, C waits on B, and
        // A waits on C, closing the loop.
        let tasks = vec![
            task("A", "first").with_dependencies(["C"]),
            task("B", "second").with_dependencies(["A"]),
            task("C", "third").with_dependencies(["B"]),
        ];
        let results = executor.execute_parallel_flow(&tasks).await.unwrap();

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.status == TaskStatus::Completed));
        // Lexicographic break promotes A; the chain then unblocks in order.
        let ids: Vec<&str> = results.iter().map(|r| r.task_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_results_cover_the_batch_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let executor = executor_with(dir.path(), |c| ExecutorConfig {
            max_parallel: 4,
            ..c
        });

        let tasks: Vec<Task> = (1..=10)
            .map(|i| {
                task(&format!("TASK-{i:03}"), "bulk work")
                    .with_files([format!("src/module{i}.py")])
            })
            .collect();
        let results = executor.execute_parallel_flow(&tasks).await.unwrap();

        assert_eq!(results.len(), tasks.len());
        let mut result_ids: Vec<&str> = results.iter().map(|r| r.task_id.as_str()).collect();
        result_ids.sort_unstable();
        let mut input_ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        input_ids.sort_unstable();
        assert_eq!(result_ids, input_ids);

        assert!(results.iter().all(|r| r.status == TaskStatus::Completed));
        assert_eq!(executor.file_locks().held_count(), 0);
        assert_eq!(executor.port_pool().reserved_count(), 0);
    }

    #[tokio::test]
    async fn test_ports_within_a_chunk_are_distinct_and_in_range() {
        let dir = tempfile::tempdir().unwrap();
        let executor = executor_with(dir.path(), |c| ExecutorConfig {
            max_parallel: 3,
            port_range_start: 3000,
            port_range_capacity: 10,
            ..c
        });

        let tasks = vec![
            task("T1", "first"),
            task("T2", "second"),
            task("T3", "third"),
        ];
        let results = executor.execute_parallel_flow(&tasks).await.unwrap();

        let mut ports: Vec<u16> = results.iter().map(|r| r.port.unwrap()).collect();
        ports.sort_unstable();
        ports.dedup();
        assert_eq!(ports.len(), 3);
        assert!(ports.iter().all(|p| (3000..3010).contains(p)));
    }

    #[tokio::test]
    async fn test_serial_degeneration_matches_parallel_outcomes() {
        let tasks = vec![
            task("A", "auth groundwork"),
            task("B", "user screens").with_dependencies(["A"]),
            task("C", "standalone report"),
        ];

        let parallel_dir = tempfile::tempdir().unwrap();
        let parallel = executor_with(parallel_dir.path(), |c| c);
        let serial_dir = tempfile::tempdir().unwrap();
        let serial = executor_with(serial_dir.path(), |c| ExecutorConfig {
            max_parallel: 1,
            ..c
        });

        let mut parallel_ids: Vec<String> = parallel
            .execute_parallel_flow(&tasks)
            .await
            .unwrap()
            .into_iter()
            .filter(|r| r.status == TaskStatus::Completed)
            .map(|r| r.task_id)
            .collect();
        let mut serial_ids: Vec<String> = serial
            .execute_parallel_flow(&tasks)
            .await
            .unwrap()
            .into_iter()
            .filter(|r| r.status == TaskStatus::Completed)
            .map(|r| r.task_id)
            .collect();

        parallel_ids.sort();
        serial_ids.sort();
        assert_eq!(parallel_ids, serial_ids);
    }

    #[tokio::test]
    async fn test_strict_cycle_mode_propagates_the_error() {
        let dir = tempfile::tempdir().unwrap();
        let executor = executor_with(dir.path(), |c| ExecutorConfig {
            analyzer: crate::analysis::AnalyzerOptions {
                infer_heuristic_edges: false,
                strict_cycles: true,
            },
            ..c
        });

        let tasks = vec![
            task("A", "first").with_dependencies(["B"]),
            task("B", "second").with_dependencies(["A"]),
        ];
        let err = executor.execute_parallel_flow(&tasks).await.unwrap_err();
        assert!(matches!(
            err,
            crate::errors::ExecutionError::Analysis(_)
        ));
    }

    #[tokio::test]
    async fn test_locked_files_block_a_second_executor() {
        let dir = tempfile::tempdir().unwrap();

        // A long-running task holds its file lock; a second executor sharing
        // the lock directory must fail the group on that file.
        let slow_config = ExecutorConfig {
            lock_dir: dir.path().to_path_buf(),
            task_timeout: Duration::from_secs(10),
            ..ExecutorConfig::default()
        };
        let slow = Arc::new(ParallelExecutor::new(
            slow_config,
            Arc::new(SleepAction {
                delay: Duration::from_millis(800),
            }),
        ));

        let contender_config = ExecutorConfig {
            lock_dir: dir.path().to_path_buf(),
            lock_timeout: Duration::from_millis(150),
            ..ExecutorConfig::default()
        };
        let contender = ParallelExecutor::new(contender_config, Arc::new(InstantAction));

        let slow_clone = Arc::clone(&slow);
        let holder = tokio::spawn(async move {
            slow_clone
                .execute_parallel_flow(&[
                    task("HOLDER", "keeps the lock").with_files(["src/shared.py"])
                ])
                .await
        });

        // Give the holder time to acquire before contending.
        tokio::time::sleep(Duration::from_millis(200)).await;
        let contended = contender
            .execute_parallel_flow(&[
                task("WAITER", "wants the same file").with_files(["src/shared.py"])
            ])
            .await
            .unwrap();

        assert_eq!(contended.len(), 1);
        assert_eq!(contended[0].status, TaskStatus::Error);
        assert!(contended[0]
            .error
            .as_deref()
            .unwrap()
            .contains("timed out acquiring file lock"));

        let held = holder.await.unwrap().unwrap();
        assert!(held.iter().all(|r| r.status == TaskStatus::Completed));
        assert_eq!(slow.file_locks().held_count(), 0);
        assert_eq!(contender.file_locks().held_count(), 0);
    }

    #[tokio::test]
    async fn test_fail_fast_strategy_stops_the_flow() {
        struct FailSecond;

        #[async_trait]
        impl TaskAction for FailSecond {
            async fn invoke(&self, task: &Task, _port: Option<u16>) -> anyhow::Result<()> {
                if task.id == "B" {
                    anyhow::bail!("intentional failure");
                }
                Ok(())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let config = ExecutorConfig {
            lock_dir: dir.path().to_path_buf(),
            failure_strategy: FailureStrategy::FailFast,
            ..ExecutorConfig::default()
        };
        let executor = ParallelExecutor::new(config, Arc::new(FailSecond));

        let tasks = vec![
            task("A", "fine"),
            task("B", "fails").with_dependencies(["A"]),
            task("C", "never reached").with_dependencies(["B"]),
        ];
        let err = executor.execute_parallel_flow(&tasks).await.unwrap_err();
        match err {
            crate::errors::ExecutionError::TaskFailed { task_id, .. } => {
                assert_eq!(task_id, "B");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(executor.file_locks().held_count(), 0);
        assert_eq!(executor.port_pool().reserved_count(), 0);
    }
}
