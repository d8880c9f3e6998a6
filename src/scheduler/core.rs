//! Scheduler engine and tick loop
//!
//! Owns every processor and worker, advances simulated time one tick at a
//! time and detects completion or a stall. Processors and workers live in
//! plain vectors and refer to each other by index.

use std::fmt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use super::event::{SchedulerEvent, SchedulerObserver};
use super::processor::{Processor, ProcessorId};
use super::queue::{Task, TaskId};
use super::steal::{StealPolicy, StealStats, StealStrategy};
use super::worker::{Worker, WorkerId, WorkerStats};

/// Tick budget used when none is configured
pub const DEFAULT_MAX_TICKS: u64 = 200;

/// Scheduler configuration
///
/// Zero counts are placeholders for their defaults; see [`SchedulerConfig::normalized`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Number of processors (0 = 1)
    pub num_processors: usize,
    /// Number of workers (0 = one per processor)
    pub num_workers: usize,
    /// Number of tasks (0 = one per processor)
    pub num_tasks: usize,
    /// Seed for task cost generation
    pub seed: u64,
    /// Smallest task cost, inclusive
    pub min_cost: u32,
    /// Largest task cost, inclusive
    pub max_cost: u32,
    /// Tick budget for [`SchedulerEngine::run`] (0 = 200)
    pub max_ticks: u64,
    /// Work-stealing strategy
    pub steal_strategy: StealStrategy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            num_processors: 2,
            num_workers: 2,
            num_tasks: 6,
            seed: 1,
            min_cost: 2,
            max_cost: 5,
            max_ticks: DEFAULT_MAX_TICKS,
            steal_strategy: StealStrategy::MostLoaded,
        }
    }
}

impl SchedulerConfig {
    /// Apply the silent coercions that make any configuration runnable
    pub fn normalized(&self) -> Self {
        let num_processors = self.num_processors.max(1);
        let min_cost = self.min_cost.max(1);
        Self {
            num_processors,
            num_workers: if self.num_workers == 0 { num_processors } else { self.num_workers },
            num_tasks: if self.num_tasks == 0 { num_processors } else { self.num_tasks },
            seed: self.seed,
            min_cost,
            max_cost: self.max_cost.max(min_cost),
            max_ticks: if self.max_ticks == 0 { DEFAULT_MAX_TICKS } else { self.max_ticks },
            steal_strategy: self.steal_strategy,
        }
    }

    /// Build a configuration from signed counts, treating non-positive values as unset
    pub fn from_counts(processors: i64, workers: i64, tasks: i64, seed: u64) -> Self {
        let count = |value: i64| usize::try_from(value).unwrap_or(0);
        Self {
            num_processors: count(processors),
            num_workers: count(workers),
            num_tasks: count(tasks),
            seed,
            ..Default::default()
        }
        .normalized()
    }
}

/// How a simulation run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimOutcome {
    /// Every task finished; `tick` is the index of the tick that finished the last one
    Completed {
        /// Completion tick index
        tick: u64,
    },
    /// The tick budget ran out with work left
    Stalled {
        /// Ticks executed by the run
        ticks: u64,
        /// Tasks still unfinished
        remaining: usize,
    },
}

impl SimOutcome {
    /// Whether the run completed
    pub fn is_completed(&self) -> bool {
        matches!(self, SimOutcome::Completed { .. })
    }
}

impl fmt::Display for SimOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimOutcome::Completed { tick } => write!(f, "sim done at t{:02}", tick),
            SimOutcome::Stalled { remaining, .. } => write!(
                f,
                "sim stopped: too many ticks (possible deadlock), {} tasks remaining",
                remaining
            ),
        }
    }
}

/// Scheduler statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Ticks executed
    pub ticks: u64,
    /// Tasks created at setup
    pub tasks_scheduled: usize,
    /// Tasks finished
    pub tasks_completed: usize,
    /// Slices executed across all workers
    pub slices_run: usize,
    /// Worker-ticks spent idle
    pub idle_ticks: usize,
    /// Work-stealing counters
    pub steals: StealStats,
}

/// The engine that owns processors and workers and drives the tick loop
pub struct SchedulerEngine {
    config: SchedulerConfig,
    processors: Vec<Processor>,
    workers: Vec<Worker>,
    stealer: StealPolicy,
    observer: Option<Box<dyn SchedulerObserver>>,
    /// Unfinished tasks; only decremented when a task completes
    remaining: usize,
    tasks_scheduled: usize,
    next_tick: u64,
}

impl SchedulerEngine {
    /// Create an engine with seeded random task costs
    pub fn new(config: SchedulerConfig) -> Self {
        let config = config.normalized();
        let mut rng = StdRng::seed_from_u64(config.seed);
        let costs: Vec<u32> = (0..config.num_tasks)
            .map(|_| rng.gen_range(config.min_cost..=config.max_cost))
            .collect();
        Self::build(config, &costs)
    }

    /// Create an engine with explicit task costs instead of random ones.
    ///
    /// `costs.len()` tasks are created, overriding `num_tasks`.
    pub fn with_costs(config: SchedulerConfig, costs: &[u32]) -> Self {
        let mut config = config.normalized();
        config.num_tasks = costs.len();
        Self::build(config, costs)
    }

    fn build(config: SchedulerConfig, costs: &[u32]) -> Self {
        let mut processors: Vec<Processor> = (0..config.num_processors)
            .map(|i| Processor::new(ProcessorId(i)))
            .collect();

        for (i, &cost) in costs.iter().enumerate() {
            processors[i % config.num_processors].push(Task::new(TaskId(i), cost));
        }

        let workers = (0..config.num_workers)
            .map(|i| Worker::new(WorkerId(i), ProcessorId(i % config.num_processors)))
            .collect();

        log::debug!(
            "Scheduler created with {} processors, {} workers and {} tasks",
            config.num_processors,
            config.num_workers,
            costs.len()
        );

        Self {
            stealer: StealPolicy::new(config.steal_strategy),
            config,
            processors,
            workers,
            observer: None,
            remaining: costs.len(),
            tasks_scheduled: costs.len(),
            next_tick: 0,
        }
    }

    /// Attach an observer, replacing any previous one
    pub fn with_observer<O>(mut self, observer: O) -> Self
    where
        O: SchedulerObserver + 'static,
    {
        self.set_observer(observer);
        self
    }

    /// Attach an observer, replacing any previous one
    pub fn set_observer<O>(&mut self, observer: O)
    where
        O: SchedulerObserver + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    /// Run one tick. Returns `true` once no task remains.
    ///
    /// Workers are visited by ascending id and each mutation is applied
    /// immediately, so a later worker's steal sees the queues as an earlier
    /// worker left them.
    pub fn tick(&mut self, tick: u64) -> bool {
        for index in 0..self.workers.len() {
            let worker_id = self.workers[index].id();
            let processor_id = self.workers[index].processor();
            let p = processor_id.as_usize();

            if self.processors[p].is_empty() {
                if let Some(steal) = self.stealer.steal(processor_id, &mut self.processors) {
                    self.workers[index].record_steal();
                    self.emit(SchedulerEvent::Stole {
                        tick,
                        worker: worker_id,
                        processor: processor_id,
                        task: steal.task,
                        donor: steal.donor,
                    });
                }
            }

            let Some(mut task) = self.processors[p].queue_mut().pop() else {
                self.workers[index].record_idle();
                continue;
            };

            let finished = task.run_slice();
            self.workers[index].record_slice(finished);

            if finished {
                self.complete_task();
                self.emit(SchedulerEvent::Finished {
                    tick,
                    worker: worker_id,
                    processor: processor_id,
                    task: task.id(),
                });
            } else {
                let event = SchedulerEvent::Ran {
                    tick,
                    worker: worker_id,
                    processor: processor_id,
                    task: task.id(),
                    remaining: task.remaining_cost(),
                };
                self.processors[p].push(task);
                self.emit(event);
            }
        }

        self.next_tick = self.next_tick.max(tick.saturating_add(1));
        self.remaining == 0
    }

    /// Run with the configured tick budget
    pub fn run(&mut self) -> SimOutcome {
        self.run_for(self.config.max_ticks)
    }

    /// Run at most `max_ticks` ticks, continuing from the last tick executed
    pub fn run_for(&mut self, max_ticks: u64) -> SimOutcome {
        if self.remaining == 0 {
            return SimOutcome::Completed {
                tick: self.next_tick.saturating_sub(1),
            };
        }

        let start = self.next_tick;
        for tick in start..start.saturating_add(max_ticks) {
            if self.tick(tick) {
                log::debug!("All {} tasks finished at tick {}", self.tasks_scheduled, tick);
                return SimOutcome::Completed { tick };
            }
        }

        log::debug!(
            "Tick budget of {} exhausted with {} tasks remaining",
            max_ticks,
            self.remaining
        );
        SimOutcome::Stalled {
            ticks: self.next_tick - start,
            remaining: self.remaining,
        }
    }

    fn complete_task(&mut self) {
        debug_assert!(self.remaining > 0, "task completed twice");
        self.remaining = self.remaining.saturating_sub(1);
    }

    fn emit(&mut self, event: SchedulerEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_event(&event);
        }
    }

    /// Tasks not yet finished
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Sum of all queue lengths
    pub fn queued_tasks(&self) -> usize {
        self.processors.iter().map(Processor::len).sum()
    }

    /// Index of the next tick `run` would execute
    pub fn next_tick(&self) -> u64 {
        self.next_tick
    }

    /// All processors, indexed by id
    pub fn processors(&self) -> &[Processor] {
        &self.processors
    }

    /// All workers, indexed by id
    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    /// Task ids per processor, head to tail
    pub fn queue_snapshot(&self) -> Vec<Vec<TaskId>> {
        self.processors.iter().map(Processor::task_ids).collect()
    }

    /// The normalized configuration in use
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Get scheduler statistics
    pub fn stats(&self) -> SchedulerStats {
        let totals = self
            .workers
            .iter()
            .map(Worker::stats)
            .fold(WorkerStats::default(), |acc, s| WorkerStats {
                slices_run: acc.slices_run + s.slices_run,
                tasks_finished: acc.tasks_finished + s.tasks_finished,
                tasks_stolen: acc.tasks_stolen + s.tasks_stolen,
                idle_ticks: acc.idle_ticks + s.idle_ticks,
            });

        SchedulerStats {
            ticks: self.next_tick,
            tasks_scheduled: self.tasks_scheduled,
            tasks_completed: totals.tasks_finished,
            slices_run: totals.slices_run,
            idle_ticks: totals.idle_ticks,
            steals: self.stealer.stats(),
        }
    }
}

impl fmt::Debug for SchedulerEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerEngine")
            .field("config", &self.config)
            .field("processors", &self.processors)
            .field("workers", &self.workers)
            .field("remaining", &self.remaining)
            .field("next_tick", &self.next_tick)
            .finish()
    }
}
