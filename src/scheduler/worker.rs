//! Simulated worker threads
//!
//! Each worker is statically bound to one processor and, once per tick, runs a
//! single slice of the head task of that processor's queue. Several workers
//! may share a processor to model oversubscription.

use std::fmt;
use super::processor::ProcessorId;

/// Unique identifier for a worker, also its index in the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(pub usize);

impl WorkerId {
    /// Get the numeric ID
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.0)
    }
}

/// What a worker did during its most recent scheduling opportunity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Has not been visited yet
    Fresh,
    /// Ran a slice of a task
    Running,
    /// Found no local work and nothing to steal
    Idle,
}

/// Statistics for a worker
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    /// Number of slices executed
    pub slices_run: usize,
    /// Number of tasks this worker completed
    pub tasks_finished: usize,
    /// Number of tasks stolen on behalf of this worker's processor
    pub tasks_stolen: usize,
    /// Ticks spent without work
    pub idle_ticks: usize,
}

/// A simulated OS thread bound to one processor
#[derive(Debug, Clone)]
pub struct Worker {
    id: WorkerId,
    processor: ProcessorId,
    state: WorkerState,
    stats: WorkerStats,
}

impl Worker {
    /// Create a worker bound to `processor`
    pub fn new(id: WorkerId, processor: ProcessorId) -> Self {
        Self {
            id,
            processor,
            state: WorkerState::Fresh,
            stats: WorkerStats::default(),
        }
    }

    /// Get worker ID
    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// The processor this worker is bound to
    pub fn processor(&self) -> ProcessorId {
        self.processor
    }

    /// State after the most recent tick
    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Get worker statistics
    pub fn stats(&self) -> WorkerStats {
        self.stats
    }

    pub(crate) fn record_slice(&mut self, finished: bool) {
        self.state = WorkerState::Running;
        self.stats.slices_run += 1;
        if finished {
            self.stats.tasks_finished += 1;
        }
    }

    pub(crate) fn record_steal(&mut self) {
        self.stats.tasks_stolen += 1;
    }

    pub(crate) fn record_idle(&mut self) {
        self.state = WorkerState::Idle;
        self.stats.idle_ticks += 1;
    }
}
