//! Deferred alignment work.
//!
//! Alignment cascades (a moved vertex asking its neighbours to re-align,
//! a detached bundle endpoint asking to be re-aligned) are not run
//! recursively. They are pushed onto a [`TaskQueue`] and drained in batches
//! by [`Editor::settle`](crate::Editor::settle).

use indexmap::IndexSet;

use crate::{align::AlignMode, drawing::VertexId};

/// One pending alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlignTask {
    vertex: VertexId,
    mode: AlignMode,
}

impl AlignTask {
    pub fn new(vertex: VertexId, mode: AlignMode) -> Self {
        Self { vertex, mode }
    }

    pub fn vertex(&self) -> VertexId {
        self.vertex
    }

    pub fn mode(&self) -> AlignMode {
        self.mode
    }
}

/// FIFO of alignment tasks. Pushing a task that is already queued is a no-op.
#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: IndexSet<AlignTask>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a task. Returns `false` if it was already pending.
    pub fn push(&mut self, task: AlignTask) -> bool {
        self.tasks.insert(task)
    }

    /// Takes every pending task, oldest first.
    pub fn drain_batch(&mut self) -> Vec<AlignTask> {
        self.tasks.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}
