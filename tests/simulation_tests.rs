//! Integration tests for the scheduler simulation
//!
//! These drive whole simulations and check the bookkeeping invariants tick by
//! tick: conservation of tasks, determinism, steal selection and idle safety.

mod common;

use routine_sim::scheduler::{
    ProcessorId, SchedulerConfig, SchedulerEngine, SchedulerEvent, SimOutcome, StealStrategy,
    TaskId, WorkerId, WorkerState,
};

fn config(processors: usize, workers: usize) -> SchedulerConfig {
    SchedulerConfig {
        num_processors: processors,
        num_workers: workers,
        ..Default::default()
    }
}

fn steals(events: &[SchedulerEvent]) -> Vec<SchedulerEvent> {
    events
        .iter()
        .filter(|e| matches!(e, SchedulerEvent::Stole { .. }))
        .copied()
        .collect()
}

fn task_costs(engine: &SchedulerEngine) -> Vec<u32> {
    engine
        .processors()
        .iter()
        .flat_map(|p| p.queue().iter().map(|t| t.remaining_cost()))
        .collect()
}

#[test]
fn test_default_scenario_completes() {
    let (mut engine, recorder) = common::recorded_engine(SchedulerConfig::from_counts(2, 2, 6, 1));

    // 3 tasks per processor, costs within range
    assert_eq!(engine.processors()[0].len(), 3);
    assert_eq!(engine.processors()[1].len(), 3);
    let total_cost: u32 = task_costs(&engine).iter().sum();

    let (outcome, events) = common::run_checked(&mut engine, &recorder, 200);

    assert!(outcome.is_completed());
    assert_eq!(engine.remaining(), 0);
    assert_eq!(engine.queued_tasks(), 0);
    assert!(engine.processors().iter().all(|p| p.is_empty()));

    // Every slice of every task ran exactly once
    let slices = events.iter().filter(|e| !matches!(e, SchedulerEvent::Stole { .. })).count();
    assert_eq!(slices as u32, total_cost);
    assert_eq!(engine.stats().slices_run as u32, total_cost);
    assert_eq!(engine.stats().tasks_completed, 6);
}

#[test]
fn test_run_matches_manual_ticks() {
    let (mut manual, recorder) = common::recorded_engine(SchedulerConfig::default());
    let (manual_outcome, _) = common::run_checked(&mut manual, &recorder, 200);

    let mut engine = SchedulerEngine::new(SchedulerConfig::default());
    assert_eq!(engine.run(), manual_outcome);
}

#[test]
fn test_single_task_single_processor() {
    let (mut engine, recorder) = common::recorded_engine_with_costs(config(1, 1), &[3]);

    let outcome = engine.run();

    // Three ticks: t00, t01, t02
    assert_eq!(outcome, SimOutcome::Completed { tick: 2 });
    assert!(steals(&recorder.events()).is_empty());
    assert_eq!(engine.stats().steals.steal_attempts, 0);

    let lines: Vec<String> = recorder.events().iter().map(|e| e.to_string()).collect();
    assert_eq!(
        lines,
        vec![
            "t00 M0 P0 run G0 slice, remaining 2",
            "t01 M0 P0 run G0 slice, remaining 1",
            "t02 M0 P0 finish G0",
        ]
    );
}

#[test]
fn test_zero_tasks_normalized_to_processor_count() {
    let config = SchedulerConfig::from_counts(3, 2, 0, 42);
    assert_eq!(config.num_tasks, 3);

    let first = SchedulerEngine::new(config.clone());
    let second = SchedulerEngine::new(config);

    assert_eq!(first.remaining(), 3);
    assert_eq!(first.queue_snapshot(), second.queue_snapshot());

    assert_eq!(task_costs(&first), task_costs(&second));
}

#[test]
fn test_runs_are_deterministic() {
    for seed in [1, 7, 1234] {
        let config = SchedulerConfig {
            num_processors: 3,
            num_workers: 4,
            num_tasks: 11,
            seed,
            ..Default::default()
        };

        let (mut a, recorder_a) = common::recorded_engine(config.clone());
        let (mut b, recorder_b) = common::recorded_engine(config);

        assert_eq!(a.run(), b.run());
        assert_eq!(recorder_a.events(), recorder_b.events());
        assert_eq!(a.stats(), b.stats());
    }
}

#[test]
fn test_invariants_hold_across_layouts() {
    for (processors, workers, tasks) in [(1, 1, 5), (2, 1, 9), (3, 3, 10), (4, 8, 13), (5, 2, 3)] {
        let (mut engine, recorder) = common::recorded_engine(SchedulerConfig {
            num_processors: processors,
            num_workers: workers,
            num_tasks: tasks,
            seed: 99,
            ..Default::default()
        });

        let (outcome, events) = common::run_checked(&mut engine, &recorder, 500);
        assert!(outcome.is_completed(), "P={} M={} G={} stalled", processors, workers, tasks);

        let finished = events
            .iter()
            .filter(|e| matches!(e, SchedulerEvent::Finished { .. }))
            .count();
        assert_eq!(finished, tasks);

        for event in steals(&events) {
            if let SchedulerEvent::Stole { processor, donor, .. } = event {
                assert_ne!(processor, donor);
            }
        }
    }
}

#[test]
fn test_steal_takes_tail_of_longest_queue() {
    // P0: G0(3) G3(3) G6(3); P1: G1(3) G4(1); P2: G2(1) G5(1)
    let (mut engine, recorder) =
        common::recorded_engine_with_costs(config(3, 3), &[3, 3, 1, 3, 1, 1, 3]);

    engine.tick(0);
    engine.tick(1);
    assert!(steals(&recorder.events()).is_empty());

    // P2 drained; P0 holds [G6, G0, G3] before M0 runs, [G0, G3, G6] after
    engine.tick(2);
    assert_eq!(
        steals(&recorder.events()),
        vec![SchedulerEvent::Stole {
            tick: 2,
            worker: WorkerId(2),
            processor: ProcessorId(2),
            task: TaskId(6),
            donor: ProcessorId(0),
        }]
    );
    assert_eq!(engine.queue_snapshot()[0], vec![TaskId(0), TaskId(3)]);
}

#[test]
fn test_steal_tie_break_and_same_tick_visibility() {
    // P0: G0(1); P1: G1(3); P2: G2(3)
    let (mut engine, recorder) = common::recorded_engine_with_costs(config(3, 3), &[1, 3, 3]);

    engine.tick(0);
    engine.tick(1);

    // M0 finds P1 and P2 tied and picks P1; M1 then sees P1 empty and P0
    // holding the task M0 just took, and takes it back
    assert_eq!(
        steals(&recorder.events()),
        vec![
            SchedulerEvent::Stole {
                tick: 1,
                worker: WorkerId(0),
                processor: ProcessorId(0),
                task: TaskId(1),
                donor: ProcessorId(1),
            },
            SchedulerEvent::Stole {
                tick: 1,
                worker: WorkerId(1),
                processor: ProcessorId(1),
                task: TaskId(1),
                donor: ProcessorId(0),
            },
        ]
    );
}

#[test]
fn test_idle_worker_without_donor() {
    let (mut engine, recorder) = common::recorded_engine_with_costs(config(2, 2), &[1]);

    let done = engine.tick(0);

    assert!(done);
    assert!(steals(&recorder.events()).is_empty());
    assert_eq!(engine.workers()[1].state(), WorkerState::Idle);
    assert_eq!(engine.workers()[1].stats().idle_ticks, 1);

    let steal_stats = engine.stats().steals;
    assert_eq!(steal_stats.steal_attempts, 1);
    assert_eq!(steal_stats.failed_steals, 1);
}

#[test]
fn test_oversubscribed_processor() {
    // Three workers share P0
    let (mut engine, recorder) = common::recorded_engine_with_costs(config(1, 3), &[2, 2, 2]);

    let outcome = engine.run();

    assert_eq!(outcome, SimOutcome::Completed { tick: 1 });
    assert_eq!(recorder.len(), 6);
    for worker in engine.workers() {
        assert_eq!(worker.processor(), ProcessorId(0));
        assert_eq!(worker.stats().slices_run, 2);
        assert_eq!(worker.stats().tasks_finished, 1);
    }
}

#[test]
fn test_stealing_shortens_unbalanced_run() {
    // P0 gets three long tasks, P1 two short ones
    let costs = [5, 1, 5, 1, 5];

    let mut without = SchedulerEngine::with_costs(
        SchedulerConfig {
            steal_strategy: StealStrategy::Disabled,
            ..config(2, 2)
        },
        &costs,
    );
    let mut with = SchedulerEngine::with_costs(config(2, 2), &costs);

    assert_eq!(without.run(), SimOutcome::Completed { tick: 14 });
    assert_eq!(without.stats().steals.successful_steals, 0);

    match with.run() {
        SimOutcome::Completed { tick } => assert!(tick < 14),
        other => panic!("unexpected outcome {:?}", other),
    }
    assert!(with.stats().steals.successful_steals > 0);
}

#[test]
fn test_stall_is_reported_not_fatal() {
    let (mut engine, recorder) = common::recorded_engine_with_costs(
        SchedulerConfig {
            max_ticks: 3,
            ..config(1, 1)
        },
        &[10],
    );

    let outcome = engine.run();

    assert_eq!(outcome, SimOutcome::Stalled { ticks: 3, remaining: 1 });
    assert_eq!(recorder.len(), 3);
    assert_eq!(engine.queued_tasks(), 1);
    assert!(outcome.to_string().contains("possible deadlock"));
}
