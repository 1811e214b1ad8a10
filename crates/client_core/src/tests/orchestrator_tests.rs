use super::*;

use std::time::Duration;

use shared::domain::Algorithm;

use crate::{
    error::ApiFailure,
    test_support::{self, ScriptedSolver},
};

fn orchestrator(solver: ScriptedSolver) -> (RequestOrchestrator, Arc<ScriptedSolver>) {
    let solver = Arc::new(solver);
    (RequestOrchestrator::new(solver.clone()), solver)
}

#[tokio::test]
async fn solve_sends_model_snapshot() {
    let (mut orchestrator, solver) =
        orchestrator(ScriptedSolver::new().with_solve(Ok(test_support::itinerary("greedy", 2))));
    let mut model = ParameterModel::default();
    model.select_dataset("medium");
    model.select_algorithm(Algorithm::SimulatedAnnealing);

    let pending = orchestrator.submit_solve(&model).expect("submit");
    model.select_dataset("large");
    let completion = orchestrator.finish_solve(pending.resolve().await);

    assert_eq!(completion, Completion::Applied);
    let requests = solver.solve_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].dataset, DatasetRef::builtin("medium"));
    assert_eq!(requests[0].algorithm, Algorithm::SimulatedAnnealing);
    assert_eq!(requests[0].params, model.snapshot());
}

#[tokio::test]
async fn second_solve_while_loading_is_rejected_without_a_call() {
    let (mut orchestrator, solver) =
        orchestrator(ScriptedSolver::new().with_solve(Ok(test_support::itinerary("greedy", 1))));
    let model = ParameterModel::default();

    let pending = orchestrator.submit_solve(&model).expect("first submit");
    let rejected = orchestrator.submit_solve(&model).err();
    orchestrator.finish_solve(pending.resolve().await);

    assert_eq!(rejected, Some(ActionRejected::InFlight(ActionKind::Solve)));
    assert_eq!(solver.calls().await, ["solve:small:greedy"]);
    assert!(!orchestrator.solve().is_loading());
}

#[tokio::test]
async fn stalled_solve_is_replaced_by_resubmission() {
    let solver = Arc::new(
        ScriptedSolver::new().with_solve(Ok(test_support::itinerary("greedy", 1))),
    );
    let mut orchestrator =
        RequestOrchestrator::new(solver.clone()).with_stall_timeout(Duration::ZERO);
    let model = ParameterModel::default();

    let stalled = orchestrator.submit_solve(&model).expect("first submit");
    let current = orchestrator.submit_solve(&model).expect("takeover");

    let finished = stalled.resolve().await;
    assert_eq!(finished.outcome, Err(ApiFailure::Cancelled));
    assert_eq!(orchestrator.finish_solve(finished), Completion::Stale);
    assert!(orchestrator.solve().is_loading());

    assert_eq!(orchestrator.finish_solve(current.resolve().await), Completion::Applied);
    assert_eq!(solver.calls().await, ["solve:small:greedy"]);
    assert_eq!(orchestrator.solve().error(), None);
}

#[tokio::test]
async fn failed_solve_keeps_previous_itinerary() {
    let previous = test_support::itinerary("greedy", 2);
    let (mut orchestrator, _solver) = orchestrator(
        ScriptedSolver::new()
            .with_solve(Ok(previous.clone()))
            .with_solve(Err(ApiFailure::Rejected {
                status: 422,
                message: Some("daily_time_budget too small".into()),
            })),
    );
    let model = ParameterModel::default();

    let pending = orchestrator.submit_solve(&model).expect("submit");
    orchestrator.finish_solve(pending.resolve().await);
    let pending = orchestrator.submit_solve(&model).expect("resubmit");
    let completion = orchestrator.finish_solve(pending.resolve().await);

    assert_eq!(completion, Completion::Failed);
    assert_eq!(orchestrator.solve().last_result(), Some(&previous));
    assert_eq!(orchestrator.solve().error(), Some("daily_time_budget too small"));
}

#[tokio::test]
async fn channels_run_independently() {
    let (mut orchestrator, _solver) =
        orchestrator(ScriptedSolver::new().with_benchmark(Ok(test_support::benchmark_result())));
    let model = ParameterModel::default();

    let solve = orchestrator.submit_solve(&model).expect("solve");
    let benchmark = orchestrator.submit_benchmark(&model).expect("benchmark");
    assert!(orchestrator.solve().is_loading());
    assert!(orchestrator.benchmark().is_loading());

    let completion = orchestrator.finish_benchmark(benchmark.resolve().await);

    assert_eq!(completion, Completion::Applied);
    assert!(orchestrator.solve().is_loading());
    assert!(orchestrator.benchmark().last_result().is_some());

    assert!(orchestrator.cancel(ActionKind::Solve));
    assert_eq!(
        orchestrator.finish_solve(solve.resolve().await),
        Completion::Stale
    );
    assert_eq!(orchestrator.solve().last_result(), None);
}

#[tokio::test]
async fn blank_dataset_is_refused_before_any_call() {
    let (mut orchestrator, solver) = orchestrator(ScriptedSolver::new());
    let mut model = ParameterModel::default();
    model.select_dataset("  ");

    assert_eq!(
        orchestrator.submit_solve(&model).err(),
        Some(ActionRejected::NoDataset)
    );
    assert_eq!(
        orchestrator.submit_benchmark(&model).err(),
        Some(ActionRejected::NoDataset)
    );
    assert!(!orchestrator.solve().is_loading());
    assert!(solver.calls().await.is_empty());
}

#[tokio::test]
async fn dataset_listing_populates_known_datasets() {
    let (mut orchestrator, _solver) = orchestrator(
        ScriptedSolver::new().with_datasets(Ok(test_support::datasets(&["small", "large"]))),
    );
    assert!(orchestrator.known_datasets().is_empty());

    let pending = orchestrator.submit_datasets().expect("submit");
    orchestrator.finish_datasets(pending.resolve().await);

    let names: Vec<_> = orchestrator
        .known_datasets()
        .iter()
        .map(|info| info.name.as_str())
        .collect();
    assert_eq!(names, ["small", "large"]);
}

#[test]
fn experiments_are_not_cancelled_here() {
    let (mut orchestrator, _solver) = orchestrator(ScriptedSolver::new());

    assert!(!orchestrator.cancel(ActionKind::Experiment));
}
