//! Trial scheduling end to end on the kinematic scene.

#![allow(clippy::unwrap_used)]

use std::path::Path;

use scenario_core::{
    EpisodeRunner, KinematicScene, MemorySink, OrchestratorBuilder, ScenarioEvent,
};
use scenario_optim::{OptimizationRequest, Result as OptimResult};
use scenario_types::{
    ModelConfig, ObjectKind, OptimizerParams, Point3, Pose, RunConfig, ScenarioConfig,
    SimulationMode, TrialParams,
};

/// Shelf at slot 0, manipulated book, two books 20 units either side of x = 0.
///
/// Book boxes are 20 wide and 28 tall; the shelf top is at z = 90.
fn shelf_scenario(trials: TrialParams) -> ScenarioConfig {
    let book = |x: f64| Pose::from_position(Point3::new(x, 0.0, 104.0));
    ScenarioConfig::new("container", SimulationMode::Optimised)
        .with_optimizer(OptimizerParams::new(
            "unused.py",
            "request.txt",
            "response.txt",
            "keys.txt",
        ))
        .with_model(ModelConfig::new("shelf", ObjectKind::Bookshelf, Pose::default()))
        .with_model(ModelConfig::new(
            "manipulated_book",
            ObjectKind::Book,
            Pose::from_position(Point3::new(0.0, 200.0, 104.0)),
        ))
        .with_model(ModelConfig::new("left_book", ObjectKind::Book, book(-30.0)))
        .with_model(ModelConfig::new("right_book", ObjectKind::Book, book(30.0)))
        .with_trials(trials)
}

fn runner(
    copies: usize,
    trials: TrialParams,
    target: Pose,
    sink: &MemorySink,
) -> EpisodeRunner<KinematicScene> {
    let config = RunConfig::new(copies, "delta.log", shelf_scenario(trials));
    let optimizer = move |_: &OptimizationRequest| -> OptimResult<Vec<Pose>> { Ok(vec![target]) };
    let orchestrator = OrchestratorBuilder::new(config)
        .with_optimizer(optimizer)
        .with_event_sink(sink.clone())
        .build(KinematicScene::new())
        .unwrap();
    EpisodeRunner::new(orchestrator).unwrap()
}

fn between_books() -> Pose {
    Pose::from_position(Point3::new(0.0, 0.0, 104.0))
}

fn on_the_floor() -> Pose {
    Pose::from_position(Point3::new(0.0, 0.0, -300.0))
}

fn run_to_end(runner: &mut EpisodeRunner<KinematicScene>, max_steps: usize) {
    for _ in 0..max_steps {
        if runner.is_halted() {
            return;
        }
        runner.step().unwrap();
    }
    assert!(runner.is_halted(), "trials did not finish in {max_steps} steps");
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn successful_trials_reassign_copies() {
    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("results.txt");
    let sink = MemorySink::new();
    let mut runner = runner(2, TrialParams::new(5, 2, &results), between_books(), &sink);

    runner.step().unwrap();
    let scheduler = runner.scheduler().unwrap();
    assert_eq!(scheduler.completed_count(), 2);
    assert_eq!(scheduler.trial_for_copy(0), Some(2));
    assert_eq!(scheduler.trial_for_copy(1), Some(3));

    run_to_end(&mut runner, 10);
    assert_eq!(runner.steps(), 3);
    assert_eq!(read(&results), "1\n1\n1\n1\n1\n");

    let scheduler = runner.scheduler().unwrap();
    assert_eq!(scheduler.success_count(), 5);
    assert!(scheduler.records().iter().all(|r| r.attempts == 1));

    let events = sink.events();
    let completed = events
        .iter()
        .filter(|e| matches!(e, ScenarioEvent::TrialCompleted { success: true, .. }))
        .count();
    assert_eq!(completed, 5);
    assert!(matches!(
        events.last(),
        Some(ScenarioEvent::TrialsFinished {
            total: 5,
            succeeded: 5,
            ..
        })
    ));
}

#[test]
fn failed_trials_use_full_attempt_budget() {
    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("results.txt");
    let sink = MemorySink::new();
    let mut runner = runner(2, TrialParams::new(3, 2, &results), on_the_floor(), &sink);

    runner.step().unwrap();
    let scheduler = runner.scheduler().unwrap();
    assert_eq!(scheduler.completed_count(), 0);
    assert_eq!(scheduler.record(0).unwrap().attempts, 2);

    run_to_end(&mut runner, 10);
    assert_eq!(runner.steps(), 4);
    assert_eq!(read(&results), "0\n0\n0\n");

    let scheduler = runner.scheduler().unwrap();
    assert_eq!(scheduler.completed_count(), 3);
    assert_eq!(scheduler.success_count(), 0);
    assert!(scheduler.records().iter().all(|r| r.attempts <= 2));
}

#[test]
fn halted_runner_ignores_further_steps() {
    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("results.txt");
    let sink = MemorySink::new();
    let mut runner = runner(3, TrialParams::new(2, 1, &results), on_the_floor(), &sink);

    run_to_end(&mut runner, 5);
    let records = runner.scheduler().unwrap().records().to_vec();
    let steps = runner.steps();

    runner.step().unwrap();
    assert!(!runner.tick(100.0).unwrap());
    assert_eq!(runner.steps(), steps);
    assert_eq!(runner.scheduler().unwrap().records(), records.as_slice());
    // Copy 2 never had a trial.
    assert_eq!(runner.scheduler().unwrap().trial_for_copy(2), None);

    let finished = sink
        .events()
        .iter()
        .filter(|e| matches!(e, ScenarioEvent::TrialsFinished { .. }))
        .count();
    assert_eq!(finished, 1);
}

#[test]
fn moved_neighbour_fails_the_attempt() {
    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("results.txt");
    let sink = MemorySink::new();
    let mut runner = runner(1, TrialParams::new(1, 3, &results), between_books(), &sink);

    let left = runner.orchestrator().instance(0).unwrap().actor(2).unwrap();
    runner
        .orchestrator_mut()
        .scene_mut()
        .displace(left, scenario_types::Vector3::new(-5.0, 0.0, 0.0))
        .unwrap();
    runner.step().unwrap();

    let record = *runner.scheduler().unwrap().record(0).unwrap();
    assert!(!record.completed);
    assert_eq!(record.attempts, 2);

    // The neighbour is back in place after the update, so the retry succeeds.
    runner.step().unwrap();
    assert!(runner.is_halted());
    assert_eq!(read(&results), "1\n");
}
