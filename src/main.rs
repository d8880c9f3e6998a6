//! Command-line launcher for the scheduler simulation and the CPU-work demo.

use std::io::Write;
use clap::{ArgAction, Parser, ValueEnum};
use routine_sim::prelude::*;
use routine_sim::scheduler::DEFAULT_MAX_TICKS;

/// What to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Run the scheduler simulation
    Sim,
    /// Compare CPU-bound work at parallelism 1 and N
    Runtime,
}

/// Work-stealing scheduler simulation.
#[derive(Parser, Debug)]
#[command(name = "routine-sim", about = "Discrete-time P/M/G work-stealing scheduler simulation")]
struct CliArgs {
    /// sim or runtime
    #[arg(long, value_enum, default_value_t = Mode::Sim)]
    mode: Mode,

    /// Number of processors (non-positive means 1)
    #[arg(short = 'p', default_value_t = 2, allow_negative_numbers = true)]
    processors: i64,

    /// Number of workers (non-positive means one per processor)
    #[arg(short = 'm', default_value_t = 2, allow_negative_numbers = true)]
    workers: i64,

    /// Number of tasks (non-positive means one per processor)
    #[arg(short = 'g', default_value_t = 6, allow_negative_numbers = true)]
    tasks: i64,

    /// Seed for task costs
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Print per-event trace lines
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    log: bool,

    /// CPU work iterations per unit in runtime mode
    #[arg(long, default_value_t = 5_000_000)]
    work: u64,

    /// Tick budget before the simulation reports a stall
    #[arg(long, default_value_t = DEFAULT_MAX_TICKS)]
    max_ticks: u64,

    /// Disable work stealing
    #[arg(long)]
    no_steal: bool,
}

impl CliArgs {
    fn scheduler_config(&self) -> SchedulerConfig {
        let count = |value: i64| usize::try_from(value).unwrap_or(0);
        SchedulerConfig {
            num_processors: count(self.processors),
            num_workers: count(self.workers),
            num_tasks: count(self.tasks),
            seed: self.seed,
            max_ticks: self.max_ticks,
            steal_strategy: if self.no_steal {
                StealStrategy::Disabled
            } else {
                StealStrategy::MostLoaded
            },
            ..Default::default()
        }
        .normalized()
    }
}

fn init_logger(enabled: bool) {
    let default_filter = if enabled { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .target(env_logger::Target::Stdout)
        .init();
}

fn run_sim(args: &CliArgs) {
    let config = args.scheduler_config();
    let mut engine = SchedulerEngine::new(config.clone());
    if args.log {
        engine.set_observer(LogObserver);
        log::info!(
            "sim start: P={} M={} G={}",
            config.num_processors,
            config.num_workers,
            config.num_tasks
        );
    }

    let outcome = engine.run();
    println!("{}", outcome);

    let stats = engine.stats();
    log::info!(
        "stats: slices={} completed={}/{} steals={} idle={}",
        stats.slices_run,
        stats.tasks_completed,
        stats.tasks_scheduled,
        stats.steals.successful_steals,
        stats.idle_ticks
    );
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logger(args.log);

    match args.mode {
        Mode::Sim => run_sim(&args),
        Mode::Runtime => {
            let config = RuntimeConfig {
                work: args.work,
                ..Default::default()
            };
            let report = run_runtime_demo(&config)?;
            println!("{}", report);
        }
    }

    Ok(())
}
