use async_trait::async_trait;

use crate::model::Task;

/// The caller-supplied operation the executor supervises for each task.
///
/// The executor is agnostic to what an action does. It guarantees that when
/// `invoke` runs, every file the task declared is exclusively locked on this
/// host and `port` (when present) is reserved to this task alone. A normal
/// return is recorded as `completed`; an error return as `error`; exceeding
/// the per-task deadline as `timeout`. Actions should tolerate cancellation
/// at await points, which is how deadline enforcement is delivered.
#[async_trait]
pub trait TaskAction: Send + Sync {
    async fn invoke(&self, task: &Task, port: Option<u16>) -> anyhow::Result<()>;
}
