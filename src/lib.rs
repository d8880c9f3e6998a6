//! # routine-sim
//!
//! A discrete-time simulation of a work-stealing scheduler built around the
//! processor / OS thread / lightweight task triad of modern runtimes.
//!
//! ## Features
//!
//! - **Processors**: scheduling resources that own a FIFO run queue
//! - **Workers**: simulated threads statically bound to one processor
//! - **Stealing**: idle workers take the newest task from the busiest processor
//! - **Determinism**: seeded task costs and a fixed visiting order make every run reproducible
//! - **Runtime demo**: a real multi-threaded CPU-work comparison across parallelism widths
//!
//! ## Quick Start
//!
//! ```rust
//! use routine_sim::prelude::*;
//!
//! let recorder = EventRecorder::new();
//! let mut engine = SchedulerEngine::new(SchedulerConfig::default())
//!     .with_observer(recorder.clone());
//!
//! let outcome = engine.run();
//! assert!(outcome.is_completed());
//! assert_eq!(engine.remaining(), 0);
//! assert!(!recorder.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod error;
pub mod scheduler;
pub mod runtime;

/// Convenient re-exports for common functionality
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::scheduler::{
        EventRecorder, LogObserver, SchedulerConfig, SchedulerEngine, SchedulerEvent,
        SchedulerObserver, SimOutcome, StealStrategy,
    };
    pub use crate::runtime::{run_runtime_demo, RuntimeConfig, RuntimeReport};
}

// Re-export the prelude at crate root for convenience
pub use prelude::*;
