//! Work-stealing algorithm implementation
//!
//! An idle worker relocates one task from the busiest other processor onto
//! its own processor. Donor selection is deterministic: the strictly largest
//! non-empty queue wins and ties keep the lowest processor id.

use super::processor::{Processor, ProcessorId};
use super::queue::TaskId;

/// Work-stealing strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StealStrategy {
    /// Steal from the processor with the longest queue (default)
    #[default]
    MostLoaded,
    /// Never steal; idle workers simply wait
    Disabled,
}

/// Work-stealing statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StealStats {
    /// Total steal attempts (not counted while stealing is disabled)
    pub steal_attempts: usize,
    /// Successful steals
    pub successful_steals: usize,
    /// Failed steals (no donor had work)
    pub failed_steals: usize,
}

/// A completed steal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Steal {
    /// The relocated task
    pub task: TaskId,
    /// The processor it was taken from
    pub donor: ProcessorId,
}

/// Steal policy used by idle workers
#[derive(Debug, Default, Clone)]
pub struct StealPolicy {
    strategy: StealStrategy,
    stats: StealStats,
}

impl StealPolicy {
    /// Create a new steal policy with the given strategy
    pub fn new(strategy: StealStrategy) -> Self {
        Self {
            strategy,
            stats: StealStats::default(),
        }
    }

    /// Pick the donor for `thief`, without mutating anything.
    ///
    /// Scans every other processor in id order and keeps the first one whose
    /// queue is strictly longer than the best seen so far, starting from zero.
    /// A thief that is not among `processors` gets no donor.
    pub fn select_donor(
        &self,
        thief: ProcessorId,
        processors: &[Processor],
    ) -> Option<ProcessorId> {
        self.donor_index(thief, processors).map(|i| processors[i].id())
    }

    fn donor_index(&self, thief: ProcessorId, processors: &[Processor]) -> Option<usize> {
        if self.strategy == StealStrategy::Disabled {
            return None;
        }
        if !processors.iter().any(|p| p.id() == thief) {
            return None;
        }

        let mut donor = None;
        let mut max = 0;
        for (index, processor) in processors.iter().enumerate() {
            if processor.id() == thief {
                continue;
            }
            if processor.len() > max {
                max = processor.len();
                donor = Some(index);
            }
        }
        donor
    }

    /// Move the tail task of the selected donor onto the tail of `thief`.
    ///
    /// Returns `None` without touching any queue when no other processor has
    /// work; that is transient starvation, not an error. With stealing
    /// disabled nothing is attempted and no counter moves.
    pub fn steal(&mut self, thief: ProcessorId, processors: &mut [Processor]) -> Option<Steal> {
        if self.strategy == StealStrategy::Disabled {
            return None;
        }
        self.stats.steal_attempts += 1;

        let thief_index = processors.iter().position(|p| p.id() == thief);
        let donor_index = self.donor_index(thief, processors);
        let (Some(thief_index), Some(donor_index)) = (thief_index, donor_index) else {
            self.stats.failed_steals += 1;
            return None;
        };

        let donor = processors[donor_index].id();
        let Some(task) = processors[donor_index].queue_mut().steal_tail() else {
            self.stats.failed_steals += 1;
            return None;
        };
        let task_id = task.id();
        processors[thief_index].push(task);

        self.stats.successful_steals += 1;
        Some(Steal {
            task: task_id,
            donor,
        })
    }

    /// Get stealing statistics
    pub fn stats(&self) -> StealStats {
        self.stats
    }

    /// Get the current strategy
    pub fn strategy(&self) -> StealStrategy {
        self.strategy
    }

    /// Update the stealing strategy
    pub fn set_strategy(&mut self, strategy: StealStrategy) {
        self.strategy = strategy;
    }
}
