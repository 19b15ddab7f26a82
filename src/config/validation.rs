// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Flow-file validation.
//!
//! Validation rejects batches the executor cannot schedule sanely:
//! duplicate or empty task ids, and a port range with no capacity. Unknown
//! dependency references are deliberately *not* validation errors: the
//! analyzer warns and drops them at execution time, matching the executor's
//! permissive failure model.

use std::collections::HashSet;

use crate::config::FlowConfig;
use crate::errors::ValidationError;

/// Validate a flow, collecting every problem rather than stopping at the
/// first.
pub fn validate_flow(flow: &FlowConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen_ids: HashSet<&str> = HashSet::new();
    for task in &flow.tasks {
        if task.id.is_empty() {
            errors.push(ValidationError::EmptyTaskId);
            continue;
        }
        if !seen_ids.insert(task.id.as_str()) {
            errors.push(ValidationError::DuplicateTaskId {
                task_id: task.id.clone(),
            });
        }
    }

    if flow.executor_options.port_range_capacity == Some(0) {
        errors.push(ValidationError::ZeroPortCapacity);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExecutorOptions, TaskConfig};
    use crate::errors::FailureStrategy;
    use crate::model::Priority;

    fn task_config(id: &str) -> TaskConfig {
        TaskConfig {
            id: id.to_string(),
            description: "demo".to_string(),
            priority: Priority::P1,
            status: "pending".to_string(),
            depends_on: vec![],
            files: vec![],
        }
    }

    fn flow_with(tasks: Vec<TaskConfig>) -> FlowConfig {
        FlowConfig {
            failure_strategy: FailureStrategy::default(),
            executor_options: ExecutorOptions::default(),
            tasks,
        }
    }

    #[test]
    fn unique_ids_pass_validation() {
        let flow = flow_with(vec![task_config("A"), task_config("B")]);
        assert!(validate_flow(&flow).is_ok());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let flow = flow_with(vec![task_config("A"), task_config("A")]);
        let errors = validate_flow(&flow).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateTaskId {
                task_id: "A".to_string()
            }]
        );
    }

    #[test]
    fn empty_ids_are_rejected() {
        let flow = flow_with(vec![task_config("")]);
        let errors = validate_flow(&flow).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyTaskId]);
    }

    #[test]
    fn zero_port_capacity_is_rejected() {
        let mut flow = flow_with(vec![task_config("A")]);
        flow.executor_options.port_range_capacity = Some(0);
        let errors = validate_flow(&flow).unwrap_err();
        assert_eq!(errors, vec![ValidationError::ZeroPortCapacity]);
    }
}
