//! Discrete-time P/M/G scheduler simulation
//!
//! Processors own run queues, workers are bound to processors and execute one
//! slice per tick, and idle workers steal from the busiest processor.

pub mod worker;
pub mod queue;
pub mod processor;
pub mod core;
pub mod steal;
pub mod event;

pub use self::core::{
    SchedulerConfig, SchedulerEngine, SchedulerStats, SimOutcome, DEFAULT_MAX_TICKS,
};
pub use worker::{Worker, WorkerId, WorkerState, WorkerStats};
pub use processor::{Processor, ProcessorId};
pub use queue::{RunQueue, Task, TaskId};
pub use steal::{Steal, StealPolicy, StealStats, StealStrategy};
pub use event::{EventRecorder, LogObserver, SchedulerEvent, SchedulerObserver};
