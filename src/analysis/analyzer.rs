// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dependency analysis: edge construction and layered scheduling.
//!
//! The analyzer turns a batch of tasks into a [`DependencyGraph`] and
//! partitions it into layers of mutually independent tasks using Kahn-style
//! topological layering. Tasks in one layer may run concurrently; layer
//! `k + 1` starts only after layer `k` completes.
//!
//! Edges come from two sources: the ids each task declares, and a closed set
//! of substring heuristics over task descriptions ([`HEURISTIC_RULES`]).
//! The heuristics encode a domain convention (auth precedes user features,
//! user features precede permissions, data sources precede analysis) and can
//! be disabled wholesale via [`AnalyzerOptions::infer_heuristic_edges`].
//!
//! The analyzer is pure: it never mutates its inputs and performs no I/O
//! beyond tracing output, so analyzing the same batch twice yields identical
//! graphs and layers.

use std::collections::{BTreeMap, HashSet};

use crate::errors::AnalysisError;
use crate::model::Task;
use crate::observability::messages::analysis::{CycleBroken, UnknownDependencyDropped};
use crate::observability::messages::StructuredLog;

use super::DependencyGraph;

/// The closed set of heuristic edge rules.
///
/// For tasks `t` and `u` with lowercased descriptions, a pair
/// `(needle_in_t, needle_in_u)` adds the edge `t -> u` (t depends on u).
/// These rules are a product decision, not emergent behavior; do not extend
/// this table without documenting the new convention at the API surface.
pub const HEURISTIC_RULES: [(&str, &str); 3] = [
    ("user", "auth"),
    ("permission", "user"),
    ("analysis", "data"),
];

/// Knobs for edge inference and cycle handling.
#[derive(Debug, Clone, Copy)]
pub struct AnalyzerOptions {
    /// Apply [`HEURISTIC_RULES`] in addition to declared dependencies.
    pub infer_heuristic_edges: bool,
    /// Treat a dependency cycle as fatal instead of breaking it.
    pub strict_cycles: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            infer_heuristic_edges: true,
            strict_cycles: false,
        }
    }
}

/// Builds dependency graphs and layered schedules from task batches.
pub struct TaskDependencyAnalyzer {
    options: AnalyzerOptions,
}

impl TaskDependencyAnalyzer {
    pub fn new(options: AnalyzerOptions) -> Self {
        Self { options }
    }

    /// Build the dependency graph for a batch.
    ///
    /// Declared dependency ids that are absent from the batch are logged as
    /// warnings and dropped. Heuristic edges never point a task at itself
    /// and never duplicate a declared edge.
    pub fn analyze(&self, tasks: &[Task]) -> DependencyGraph {
        let batch_ids: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        let mut graph = DependencyGraph::new();

        for task in tasks {
            let mut deps: Vec<String> = Vec::new();

            for dep_id in &task.dependencies {
                if !batch_ids.contains(dep_id.as_str()) {
                    UnknownDependencyDropped {
                        task_id: &task.id,
                        missing_dependency: dep_id,
                    }
                    .log();
                    continue;
                }
                if !deps.contains(dep_id) {
                    deps.push(dep_id.clone());
                }
            }

            if self.options.infer_heuristic_edges {
                let task_desc = task.description.to_lowercase();
                for other in tasks {
                    if other.id == task.id || deps.contains(&other.id) {
                        continue;
                    }
                    let other_desc = other.description.to_lowercase();
                    let implied = HEURISTIC_RULES.iter().any(|(needle_t, needle_u)| {
                        task_desc.contains(needle_t) && other_desc.contains(needle_u)
                    });
                    if implied {
                        deps.push(other.id.clone());
                    }
                }
            }

            graph.insert(task.id.clone(), deps);
        }

        graph
    }

    /// Partition the graph into parallelizable layers.
    ///
    /// Kahn-style: repeatedly emit the set of tasks with no outstanding
    /// dependencies, then remove them from the remaining dependency lists.
    /// When the remaining set is non-empty but nothing is ready, a cycle
    /// exists; the permissive default promotes the lexicographically
    /// smallest blocked id and logs a warning, so the break is reproducible.
    /// With [`AnalyzerOptions::strict_cycles`] the cycle is fatal instead.
    ///
    /// For acyclic input the result is a valid topological partition, and in
    /// every case the concatenation of layers is a permutation of the input
    /// ids. Layers come out sorted, which keeps plans stable across runs.
    pub fn parallel_layers(
        &self,
        graph: &DependencyGraph,
    ) -> Result<Vec<Vec<String>>, AnalysisError> {
        // BTreeMap keeps iteration (and therefore the cycle-break choice)
        // deterministic.
        let mut remaining: BTreeMap<String, Vec<String>> = graph
            .iter()
            .map(|(id, deps)| (id.clone(), deps.clone()))
            .collect();
        let mut layers: Vec<Vec<String>> = Vec::new();

        while !remaining.is_empty() {
            let mut ready: Vec<String> = remaining
                .iter()
                .filter(|(_, deps)| deps.is_empty())
                .map(|(id, _)| id.clone())
                .collect();

            if ready.is_empty() {
                let blocked: Vec<String> = remaining.keys().cloned().collect();
                if self.options.strict_cycles {
                    return Err(AnalysisError::CycleDetected { remaining: blocked });
                }
                // First key of a BTreeMap is the lexicographic minimum.
                let promoted = blocked[0].clone();
                CycleBroken {
                    promoted: &promoted,
                    blocked: &blocked,
                }
                .log();
                ready = vec![promoted];
            }

            for id in &ready {
                remaining.remove(id);
            }
            let ready_set: HashSet<&str> = ready.iter().map(String::as_str).collect();
            for deps in remaining.values_mut() {
                deps.retain(|dep| !ready_set.contains(dep.as_str()));
            }

            layers.push(ready);
        }

        Ok(layers)
    }
}

impl Default for TaskDependencyAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerOptions::default())
    }
}
