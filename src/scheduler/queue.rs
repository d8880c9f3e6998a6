//! Tasks and per-processor run queues
//!
//! A run queue is FIFO for its owner (the head task runs, a task that yields
//! goes back to the tail) while thieves take from the tail.

use std::collections::VecDeque;
use std::fmt;

/// Unique identifier for a simulated task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub usize);

impl TaskId {
    /// Get the numeric ID
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G{}", self.0)
    }
}

/// A unit of simulated work with a remaining-cost counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    remaining_cost: u32,
}

impl Task {
    /// Create a new task; a zero cost is raised to one slice
    pub fn new(id: TaskId, cost: u32) -> Self {
        Self {
            id,
            remaining_cost: cost.max(1),
        }
    }

    /// Get task ID
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Slices still needed before the task completes
    pub fn remaining_cost(&self) -> u32 {
        self.remaining_cost
    }

    /// Execute one slice. Returns `true` once the task has no cost left.
    pub fn run_slice(&mut self) -> bool {
        self.remaining_cost = self.remaining_cost.saturating_sub(1);
        self.remaining_cost == 0
    }

    /// Whether the task has completed
    pub fn is_finished(&self) -> bool {
        self.remaining_cost == 0
    }
}

/// Ordered, owned collection of tasks belonging to one processor
#[derive(Debug, Default, Clone)]
pub struct RunQueue {
    tasks: VecDeque<Task>,
}

impl RunQueue {
    /// Create an empty run queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task at the tail
    pub fn push(&mut self, task: Task) {
        self.tasks.push_back(task);
    }

    /// Take the task at the head (the one that runs next)
    pub fn pop(&mut self) -> Option<Task> {
        self.tasks.pop_front()
    }

    /// Take the newest task from the tail, for stealing
    pub fn steal_tail(&mut self) -> Option<Task> {
        self.tasks.pop_back()
    }

    /// Peek at the head task
    pub fn head(&self) -> Option<&Task> {
        self.tasks.front()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of queued tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Iterate tasks from head to tail
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Task ids from head to tail
    pub fn task_ids(&self) -> Vec<TaskId> {
        self.tasks.iter().map(Task::id).collect()
    }
}
