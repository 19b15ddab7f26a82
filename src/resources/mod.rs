// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod file_lock;
mod port_pool;

pub use file_lock::FileLockManager;
pub use port_pool::PortPool;
