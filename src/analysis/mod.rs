// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod analyzer;
mod conflicts;
mod dependency_graph;

pub use analyzer::{AnalyzerOptions, TaskDependencyAnalyzer, HEURISTIC_RULES};
pub use conflicts::{detect_file_conflicts, FileConflict};
pub use dependency_graph::DependencyGraph;
