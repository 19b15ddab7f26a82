// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod result;
mod task;

pub use result::{TaskResult, TaskStatus};
pub use task::{Priority, Task};
