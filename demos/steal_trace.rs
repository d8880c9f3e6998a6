//! Work-stealing trace example
//!
//! Runs the same unbalanced workload with and without stealing and prints
//! the trace of the stealing run.

use routine_sim::prelude::*;

fn main() -> Result<()> {
    println!("=== Work-Stealing Trace Example ===\n");

    // Round-robin puts the long tasks on P0 and the short ones on P1
    let costs = [5, 1, 5, 1, 5, 1];
    let config = SchedulerConfig {
        num_processors: 2,
        num_workers: 2,
        ..Default::default()
    };

    println!("1. Stealing enabled:");
    let recorder = EventRecorder::new();
    let mut engine =
        SchedulerEngine::with_costs(config.clone(), &costs).with_observer(recorder.clone());
    let stealing = engine.run();
    for event in recorder.events() {
        println!("   {}", event);
    }
    println!("   {}", stealing);
    println!("   steals: {}\n", engine.stats().steals.successful_steals);

    println!("2. Stealing disabled:");
    let mut engine = SchedulerEngine::with_costs(
        SchedulerConfig {
            steal_strategy: StealStrategy::Disabled,
            ..config
        },
        &costs,
    );
    let idle = engine.run();
    println!("   {}", idle);
    println!("   idle worker-ticks: {}\n", engine.stats().idle_ticks);

    match (stealing, idle) {
        (SimOutcome::Completed { tick: a }, SimOutcome::Completed { tick: b }) => {
            println!("Stealing finished {} ticks earlier", b.saturating_sub(a));
        }
        _ => println!("One of the runs stalled"),
    }

    Ok(())
}
