//! Error types for routine-sim
//!
//! The simulation itself is infallible; a stall is reported as a
//! [`SimOutcome`](crate::scheduler::SimOutcome), not an error. Only the
//! threaded CPU-work benchmark can fail.

use thiserror::Error;

/// Main error type for routine-sim operations
#[derive(Error, Debug)]
pub enum Error {
    /// A benchmark worker thread could not be spawned
    #[error("Failed to spawn worker thread: {reason}")]
    SpawnError {
        /// Reason for the spawn failure
        reason: String,
    },

    /// Runtime error
    #[error("Runtime error: {reason}")]
    RuntimeError {
        /// Reason for the runtime error
        reason: String,
    },
}

/// Convenient result type alias
pub type Result<T> = std::result::Result<T, Error>;
