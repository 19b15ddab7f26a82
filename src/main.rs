// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use agile_flow::config::load_and_validate_flow;
use agile_flow::engine::{ExecutorConfig, ParallelExecutor};
use agile_flow::model::{Priority, Task, TaskStatus};
use agile_flow::traits::TaskAction;

/// Demo action: logs the task, simulates a second of work on its assigned
/// port, and completes. Real embedders supply their own [`TaskAction`].
struct DemoAction;

#[async_trait]
impl TaskAction for DemoAction {
    async fn invoke(&self, task: &Task, port: Option<u16>) -> anyhow::Result<()> {
        match port {
            Some(port) => println!("  🔧 {}: {} (port {})", task.id, task.description, port),
            None => println!("  🔧 {}: {}", task.id, task.description),
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
        Ok(())
    }
}

/// The canned demo batch: an auth → users → permissions chain plus two
/// independent tasks, exercising both layering and parallelism.
fn demo_tasks() -> Vec<Task> {
    vec![
        Task::new("TASK-001", "implement user authentication", Priority::P1, "pending")
            .with_files(["src/auth/login.py"]),
        Task::new("TASK-002", "implement user management", Priority::P1, "pending")
            .with_dependencies(["TASK-001"])
            .with_files(["src/api/users.py"]),
        Task::new("TASK-003", "implement stock data API", Priority::P1, "pending")
            .with_files(["src/api/stocks.py"]),
        Task::new("TASK-004", "implement report generation", Priority::P2, "pending")
            .with_files(["src/services/report.py"]),
        Task::new("TASK-005", "implement permission management", Priority::P2, "pending")
            .with_dependencies(["TASK-002"])
            .with_files(["src/api/permissions.py"]),
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    println!("🚀 agile-flow Parallel Executor Demo");
    println!("════════════════════════════════════");

    let (config, tasks) = match args.get(1) {
        Some(flow_file) => {
            println!("📋 Flow file: {}", flow_file);
            let flow = load_and_validate_flow(flow_file)
                .map_err(|e| anyhow::anyhow!("failed to load flow: {e}"))?;
            let config = flow.executor_options.resolve(flow.failure_strategy);
            let tasks: Vec<Task> = flow.tasks.iter().map(|t| t.to_task()).collect();
            (config, tasks)
        }
        None => {
            println!("📋 No flow file given, running the built-in demo batch");
            println!("   Usage: {} [flow.yaml]", args[0]);
            (ExecutorConfig::default(), demo_tasks())
        }
    };

    println!("⚙️  Max parallel: {}", config.max_parallel);
    println!("⏱️  Task timeout: {:?}", config.task_timeout);
    println!();

    let executor = ParallelExecutor::new(config, Arc::new(DemoAction));

    let started = Instant::now();
    let results = executor.execute_parallel_flow(&tasks).await?;
    let elapsed = started.elapsed();

    println!("\n📊 Results:");
    for result in &results {
        let marker = match result.status {
            TaskStatus::Completed => "✅",
            TaskStatus::Timeout => "⏰",
            TaskStatus::Error => "❌",
        };
        match (&result.port, &result.error) {
            (Some(port), _) => println!("  {} {} ({}) on port {}", marker, result.task_id, result.status, port),
            (None, Some(error)) => println!("  {} {} ({}): {}", marker, result.task_id, result.status, error),
            (None, None) => println!("  {} {} ({})", marker, result.task_id, result.status),
        }
    }

    let completed = results.iter().filter(|r| r.is_completed()).count();
    println!(
        "\n🎉 {}/{} tasks completed in {:?}",
        completed,
        results.len(),
        elapsed
    );

    Ok(())
}
