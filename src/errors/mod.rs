// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod analysis;
mod config;
mod execution;

pub use analysis::AnalysisError;
pub use config::ValidationError;
pub use execution::{ExecutionError, FailureStrategy};
