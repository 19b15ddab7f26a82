// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use crate::errors::ExecutionError;

/// Bounded allocator over the contiguous port range `[start, start + capacity)`.
///
/// Allocation is all-or-nothing: `allocate(n)` either reserves exactly `n`
/// ports or leaves the pool unchanged. The scan and the reservation happen
/// under one critical section, so the union of outstanding reservations is
/// always disjoint even with many concurrent callers.
pub struct PortPool {
    start: u16,
    capacity: usize,
    reserved: Mutex<HashSet<u16>>,
}

impl PortPool {
    /// Create a pool over `[start, start + capacity)`. The capacity is
    /// clamped so the range never runs past `u16::MAX`.
    pub fn new(start: u16, capacity: usize) -> Self {
        let capacity = capacity.min(usize::from(u16::MAX) - usize::from(start) + 1);
        Self {
            start,
            capacity,
            reserved: Mutex::new(HashSet::new()),
        }
    }

    /// Reserve the first `count` free ports, in ascending order.
    ///
    /// Fails with [`ExecutionError::PortExhausted`] when fewer than `count`
    /// ports are free; the pool is left untouched in that case.
    pub fn allocate(&self, count: usize) -> Result<Vec<u16>, ExecutionError> {
        let mut reserved = self
            .reserved
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let free: Vec<u16> = self
            .range()
            .filter(|port| !reserved.contains(port))
            .collect();

        if free.len() < count {
            let mut in_use: Vec<u16> = reserved.iter().copied().collect();
            in_use.sort_unstable();
            return Err(ExecutionError::PortExhausted {
                requested: count,
                available: free.len(),
                in_use,
            });
        }

        let allocated: Vec<u16> = free.into_iter().take(count).collect();
        reserved.extend(&allocated);
        Ok(allocated)
    }

    /// Return ports to the pool. Ports not currently reserved are ignored,
    /// so releasing twice is harmless.
    pub fn release(&self, ports: &[u16]) {
        let mut reserved = self
            .reserved
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for port in ports {
            reserved.remove(port);
        }
    }

    /// Number of ports currently reserved.
    pub fn reserved_count(&self) -> usize {
        self.reserved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn range(&self) -> impl Iterator<Item = u16> + '_ {
        (0..self.capacity).map(|offset| self.start + offset as u16)
    }
}
