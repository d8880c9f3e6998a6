//! Scheduling trace events and observers
//!
//! The engine reports what it did through a [`SchedulerObserver`]. Observers
//! only watch; nothing they do feeds back into scheduling decisions.

use std::fmt;
use std::sync::Arc;
use parking_lot::Mutex;
use super::processor::ProcessorId;
use super::queue::TaskId;
use super::worker::WorkerId;

/// Log target used for per-event trace lines
pub const TRACE_TARGET: &str = "routine_sim::trace";

/// Something the scheduler did during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerEvent {
    /// A worker ran one slice of a task that still has cost left
    Ran {
        /// Tick index
        tick: u64,
        /// Executing worker
        worker: WorkerId,
        /// Processor whose queue held the task
        processor: ProcessorId,
        /// The task
        task: TaskId,
        /// Cost left after this slice
        remaining: u32,
    },
    /// A worker ran the final slice of a task
    Finished {
        /// Tick index
        tick: u64,
        /// Executing worker
        worker: WorkerId,
        /// Processor whose queue held the task
        processor: ProcessorId,
        /// The task
        task: TaskId,
    },
    /// A worker moved a task from a donor onto its own processor
    Stole {
        /// Tick index
        tick: u64,
        /// Stealing worker
        worker: WorkerId,
        /// Receiving processor
        processor: ProcessorId,
        /// The relocated task
        task: TaskId,
        /// Processor the task came from
        donor: ProcessorId,
    },
}

impl SchedulerEvent {
    /// Tick the event happened in
    pub fn tick(&self) -> u64 {
        match *self {
            SchedulerEvent::Ran { tick, .. }
            | SchedulerEvent::Finished { tick, .. }
            | SchedulerEvent::Stole { tick, .. } => tick,
        }
    }

    /// Task the event concerns
    pub fn task(&self) -> TaskId {
        match *self {
            SchedulerEvent::Ran { task, .. }
            | SchedulerEvent::Finished { task, .. }
            | SchedulerEvent::Stole { task, .. } => task,
        }
    }
}

impl fmt::Display for SchedulerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerEvent::Ran { tick, worker, processor, task, remaining } => {
                write!(
                    f,
                    "t{:02} {} {} run {} slice, remaining {}",
                    tick, worker, processor, task, remaining
                )
            }
            SchedulerEvent::Finished { tick, worker, processor, task } => {
                write!(f, "t{:02} {} {} finish {}", tick, worker, processor, task)
            }
            SchedulerEvent::Stole { tick, worker, processor, task, donor } => {
                write!(f, "t{:02} {} {} steal {} from {}", tick, worker, processor, task, donor)
            }
        }
    }
}

/// Receives scheduler events
pub trait SchedulerObserver: Send {
    /// Called once per event, in the order events happen
    fn on_event(&mut self, event: &SchedulerEvent);
}

impl<F> SchedulerObserver for F
where
    F: FnMut(&SchedulerEvent) + Send,
{
    fn on_event(&mut self, event: &SchedulerEvent) {
        self(event)
    }
}

/// Writes every event through the `log` facade at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl SchedulerObserver for LogObserver {
    fn on_event(&mut self, event: &SchedulerEvent) {
        log::info!(target: TRACE_TARGET, "{}", event);
    }
}

/// Collects events into a shared buffer
///
/// Clones share the same buffer, so one handle can be given to the engine
/// while another is kept to read the trace afterwards.
#[derive(Debug, Default, Clone)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<SchedulerEvent>>>,
}

impl EventRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all events recorded so far
    pub fn events(&self) -> Vec<SchedulerEvent> {
        self.events.lock().clone()
    }

    /// Number of events recorded so far
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Check if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Discard recorded events
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl SchedulerObserver for EventRecorder {
    fn on_event(&mut self, event: &SchedulerEvent) {
        self.events.lock().push(*event);
    }
}
