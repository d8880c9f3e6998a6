//! Common test harness for routine-sim tests
//!
//! Provides logger setup plus helpers that drive an engine tick by tick
//! while checking the bookkeeping invariants after every tick.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Once;
use routine_sim::scheduler::{
    EventRecorder, SchedulerConfig, SchedulerEngine, SchedulerEvent, SimOutcome, TaskId,
};

/// Initialize the test environment once
static INIT: Once = Once::new();

/// Initialize test environment (logger routed through the test harness)
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Build an engine that records every event
pub fn recorded_engine(config: SchedulerConfig) -> (SchedulerEngine, EventRecorder) {
    init_test_env();
    let recorder = EventRecorder::new();
    let engine = SchedulerEngine::new(config).with_observer(recorder.clone());
    (engine, recorder)
}

/// Same as [`recorded_engine`] with explicit task costs
pub fn recorded_engine_with_costs(
    config: SchedulerConfig,
    costs: &[u32],
) -> (SchedulerEngine, EventRecorder) {
    init_test_env();
    let recorder = EventRecorder::new();
    let engine = SchedulerEngine::with_costs(config, costs).with_observer(recorder.clone());
    (engine, recorder)
}

/// Check conservation and ownership at a tick boundary
pub fn assert_invariants(engine: &SchedulerEngine, finished: &HashSet<TaskId>, total_tasks: usize) {
    assert_eq!(
        engine.queued_tasks(),
        engine.remaining(),
        "queued tasks must equal remaining count"
    );

    let mut seen = HashSet::new();
    for queue in engine.queue_snapshot() {
        for id in queue {
            assert!(seen.insert(id), "{} is queued twice", id);
            assert!(!finished.contains(&id), "{} is queued after finishing", id);
        }
    }
    assert_eq!(seen.len() + finished.len(), total_tasks, "a task was lost");
}

/// Drive `engine` one tick at a time up to `max_ticks`, checking invariants
/// after each tick. Returns the outcome and the recorded trace.
pub fn run_checked(
    engine: &mut SchedulerEngine,
    recorder: &EventRecorder,
    max_ticks: u64,
) -> (SimOutcome, Vec<SchedulerEvent>) {
    let total_tasks = engine.remaining();
    let mut finished = HashSet::new();
    let mut last_remaining = engine.remaining();
    let mut seen_events = 0;

    assert_invariants(engine, &finished, total_tasks);

    for tick in 0..max_ticks {
        let done = engine.tick(tick);

        let events = recorder.events();
        for event in &events[seen_events..] {
            if let SchedulerEvent::Finished { task, .. } = event {
                assert!(finished.insert(*task), "{} finished twice", task);
            }
        }
        seen_events = events.len();

        assert!(engine.remaining() <= last_remaining, "remaining count went up");
        last_remaining = engine.remaining();
        assert_invariants(engine, &finished, total_tasks);

        if done {
            return (SimOutcome::Completed { tick }, recorder.events());
        }
    }

    (
        SimOutcome::Stalled {
            ticks: max_ticks,
            remaining: engine.remaining(),
        },
        recorder.events(),
    )
}
