//! Task Store
//!
//! The authoritative in-memory task collection for the current session,
//! overlaid with in-flight optimistic edits. Responses are gated by two
//! counters so that reordered completions cannot clobber newer state:
//! a per-task mutation sequence (latest issued wins) and a store-wide
//! generation bumped by every locally-applied mutation (a `list()` refresh
//! is accepted only if nothing mutated while it was in flight).

use std::collections::HashMap;

use crate::models::{Task, TaskStatus};

#[derive(Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    loading: bool,
    seq: HashMap<i64, u64>,
    generation: u64,
}

/// Full-collection snapshot taken before an optimistic status change,
/// retained until that change's round-trip resolves.
pub struct PendingMove {
    pub task_id: i64,
    pub seq: u64,
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the collection from a `list()` response issued at
    /// `at_generation`. Returns false (and leaves the collection untouched)
    /// when a local mutation has been applied since — the refresh is stale.
    pub fn accept_refresh(&mut self, tasks: Vec<Task>, at_generation: u64) -> bool {
        if self.generation != at_generation {
            log::debug!("dropping stale task refresh ({} tasks)", tasks.len());
            return false;
        }
        self.tasks = tasks;
        true
    }

    /// In-place field update after a confirmed edit. At most one task per
    /// id, so the first match is the only match.
    pub fn apply_edit(&mut self, id: i64, title: String, content: String, status: TaskStatus) {
        self.generation += 1;
        if let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) {
            task.title = title;
            task.content = content;
            task.status = status;
        }
    }

    pub fn remove(&mut self, id: i64) {
        self.generation += 1;
        self.tasks.retain(|task| task.id != id);
    }

    pub fn clear(&mut self) {
        self.generation += 1;
        self.tasks.clear();
        self.seq.clear();
    }

    /// Snapshot the collection and optimistically apply a status change.
    /// Returns `None` when the task is unknown or already at `status`.
    pub fn begin_move(&mut self, id: i64, status: TaskStatus) -> Option<PendingMove> {
        let current = self.get(id)?;
        if current.status == status {
            return None;
        }

        let seq = self.seq.entry(id).or_insert(0);
        *seq += 1;
        let pending = PendingMove {
            task_id: id,
            seq: *seq,
            tasks: self.tasks.clone(),
        };

        self.generation += 1;
        if let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) {
            task.status = status;
        }
        Some(pending)
    }

    /// Whether a move's round-trip is still the latest issued for its task.
    /// Superseded responses must be discarded, success or failure.
    pub fn is_current(&self, pending: &PendingMove) -> bool {
        self.seq.get(&pending.task_id).copied() == Some(pending.seq)
    }

    /// Full rollback to the pre-move collection.
    pub fn rollback(&mut self, pending: PendingMove) {
        self.generation += 1;
        self.tasks = pending.tasks;
    }
}
