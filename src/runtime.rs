//! Synthetic CPU-work benchmark
//!
//! Runs independent units of arithmetic on a bounded pool of real OS threads
//! and reports wall time, to compare throughput under different parallelism
//! widths. Unlike the scheduler simulation this module does real work.

use std::fmt;
use std::hint::black_box;
use std::thread;
use std::time::{Duration, Instant};
use crossbeam::channel::unbounded;
use crossbeam::sync::WaitGroup;
use crate::error::{Error, Result};

/// Default thread name prefix for benchmark workers
pub const DEFAULT_THREAD_NAME: &str = "cpu-worker";

/// Work units queued per thread of parallelism
pub const UNITS_PER_THREAD: usize = 2;

/// Benchmark configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Arithmetic iterations per work unit
    pub work: u64,
    /// Width to compare against a single thread (0 = number of CPU cores)
    pub parallelism: usize,
    /// Thread name prefix for benchmark workers
    pub thread_name: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            work: 5_000_000,
            parallelism: num_cpus::get(),
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }
}

/// Elapsed times for one benchmark comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeReport {
    /// Parallel width used for the second measurement
    pub parallelism: usize,
    /// Iterations per work unit
    pub work: u64,
    /// Wall time with a single thread
    pub single: Duration,
    /// Wall time with `parallelism` threads
    pub parallel: Duration,
}

impl RuntimeReport {
    /// Single-thread time divided by parallel time
    pub fn speedup(&self) -> f64 {
        let parallel = self.parallel.as_secs_f64();
        if parallel > 0.0 {
            self.single.as_secs_f64() / parallel
        } else {
            0.0
        }
    }
}

impl fmt::Display for RuntimeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "runtime demo: width={} work={}", self.parallelism, self.work)?;
        writeln!(f, "parallelism=1: {:?}", self.single)?;
        writeln!(f, "parallelism={}: {:?}", self.parallelism, self.parallel)?;
        write!(f, "speedup: {:.2}x", self.speedup())
    }
}

/// Non-blocking arithmetic work
pub fn cpu_work(iters: u64) -> u64 {
    (0..iters).fold(0u64, |acc, i| acc.wrapping_add(i.wrapping_mul(i) % 7))
}

/// Run `parallelism * UNITS_PER_THREAD` work units on `parallelism` threads
/// and return the wall time until the last one finished.
pub fn run_with_parallelism(parallelism: usize, work: u64) -> Result<Duration> {
    run_named(parallelism, work, DEFAULT_THREAD_NAME)
}

fn run_named(parallelism: usize, work: u64, thread_name: &str) -> Result<Duration> {
    let parallelism = parallelism.max(1);
    let units = parallelism * UNITS_PER_THREAD;

    let (sender, receiver) = unbounded::<u64>();
    for _ in 0..units {
        sender.send(work).map_err(|e| Error::RuntimeError {
            reason: format!("Failed to queue work unit: {}", e),
        })?;
    }
    drop(sender);

    let start = Instant::now();
    let barrier = WaitGroup::new();
    let mut handles = Vec::with_capacity(parallelism);

    for i in 0..parallelism {
        let receiver = receiver.clone();
        let barrier = barrier.clone();
        let handle = thread::Builder::new()
            .name(format!("{}-{}", thread_name, i))
            .spawn(move || {
                for iters in receiver.iter() {
                    black_box(cpu_work(iters));
                }
                drop(barrier);
            })
            .map_err(|e| Error::SpawnError {
                reason: e.to_string(),
            })?;
        handles.push(handle);
    }

    barrier.wait();
    let elapsed = start.elapsed();

    for handle in handles {
        handle.join().map_err(|_| Error::RuntimeError {
            reason: "Benchmark worker thread panicked".to_string(),
        })?;
    }

    log::debug!("parallelism={} ran {} units in {:?}", parallelism, units, elapsed);
    Ok(elapsed)
}

/// Measure one thread against `config.parallelism` threads
pub fn run_runtime_demo(config: &RuntimeConfig) -> Result<RuntimeReport> {
    let parallelism = if config.parallelism == 0 {
        num_cpus::get()
    } else {
        config.parallelism
    };

    log::info!("Running CPU work with parallelism 1 and {}", parallelism);

    let single = run_named(1, config.work, &config.thread_name)?;
    let parallel = run_named(parallelism, config.work, &config.thread_name)?;

    Ok(RuntimeReport {
        parallelism,
        work: config.work,
        single,
        parallel,
    })
}
