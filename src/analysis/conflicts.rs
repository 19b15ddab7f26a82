// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::model::Task;

/// Two tasks declaring the same file path.
///
/// `first` is the task that claimed the file earliest in batch order;
/// `second` is a later claimant. A file declared by `n` tasks produces
/// `n - 1` conflicts, all naming the first claimant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileConflict {
    pub file: String,
    pub first: String,
    pub second: String,
}

/// Scan a task set for shared file footprints.
///
/// Pure pairwise detection: no locks are consulted and no state is kept
/// between calls. The executor uses a non-empty result to route a group
/// onto the serialized path.
pub fn detect_file_conflicts<'a, I>(tasks: I) -> Vec<FileConflict>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut first_claimant: Vec<(&str, &str)> = Vec::new();
    let mut conflicts = Vec::new();

    for task in tasks {
        for file in &task.files {
            match first_claimant.iter().find(|(f, _)| f == file) {
                Some((_, owner)) => conflicts.push(FileConflict {
                    file: file.clone(),
                    first: (*owner).to_string(),
                    second: task.id.clone(),
                }),
                None => first_claimant.push((file, &task.id)),
            }
        }
    }

    conflicts
}
