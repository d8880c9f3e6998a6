//! Logical processors
//!
//! A processor is a scheduling resource, not an execution thread: it owns a
//! run queue and nothing else.

use std::fmt;
use super::queue::{RunQueue, Task, TaskId};

/// Unique identifier for a processor, also its index in the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessorId(pub usize);

impl ProcessorId {
    /// Get the numeric ID
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ProcessorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// A logical processor owning one run queue
#[derive(Debug, Clone)]
pub struct Processor {
    id: ProcessorId,
    queue: RunQueue,
}

impl Processor {
    /// Create a processor with an empty queue
    pub fn new(id: ProcessorId) -> Self {
        Self {
            id,
            queue: RunQueue::new(),
        }
    }

    /// Get processor ID
    pub fn id(&self) -> ProcessorId {
        self.id
    }

    /// Read access to the run queue
    pub fn queue(&self) -> &RunQueue {
        &self.queue
    }

    /// Mutable access to the run queue
    pub fn queue_mut(&mut self) -> &mut RunQueue {
        &mut self.queue
    }

    /// Enqueue a task at the tail
    pub fn push(&mut self, task: Task) {
        self.queue.push(task);
    }

    /// Number of queued tasks
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Check if the processor has no queued work
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Task ids from head to tail
    pub fn task_ids(&self) -> Vec<TaskId> {
        self.queue.task_ids()
    }
}
