// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

#[cfg(test)]
pub mod integration_tests;
pub mod parallel;

pub use parallel::{ExecutorConfig, ParallelExecutor};
