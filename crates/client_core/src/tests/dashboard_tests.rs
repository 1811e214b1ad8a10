use super::*;

use crate::test_support::{self, ScriptedSolver};

fn dashboard(solver: ScriptedSolver) -> (Dashboard, Arc<ScriptedSolver>) {
    let solver = Arc::new(solver);
    let settings = DashboardSettings::default();
    (Dashboard::new(solver.clone(), &settings), solver)
}

#[tokio::test]
async fn dataset_listing_reconciles_selection_and_clears_banner() {
    let (mut dashboard, _solver) = dashboard(
        ScriptedSolver::new()
            .with_datasets(Err(ApiFailure::Unreachable("connection refused".into())))
            .with_datasets(Ok(test_support::datasets(&["medium", "large"]))),
    );

    let job = dashboard.load_datasets().expect("load");
    dashboard.run_job(job).await;
    let banner = dashboard.connection_banner().expect("banner after refused connection");
    assert!(banner.contains("http://localhost:3000/api"), "{banner}");

    let job = dashboard.load_datasets().expect("reload");
    dashboard.run_job(job).await;

    assert_eq!(dashboard.connection_banner(), None);
    assert_eq!(dashboard.params().dataset(), "medium");
    assert_eq!(dashboard.datasets().len(), 2);
}

#[tokio::test]
async fn server_rejection_does_not_raise_connection_banner() {
    let (mut dashboard, _solver) = dashboard(ScriptedSolver::new().with_solve(Err(
        ApiFailure::Rejected {
            status: 400,
            message: Some("num_days must be positive".into()),
        },
    )));

    let job = dashboard.solve().expect("solve");
    dashboard.run_job(job).await;

    assert_eq!(dashboard.connection_banner(), None);
    assert_eq!(
        dashboard.orchestrator().solve().error(),
        Some("num_days must be positive")
    );
}

#[tokio::test]
async fn solve_switches_to_itinerary_and_resets_expansion() {
    let (mut dashboard, _solver) = dashboard(
        ScriptedSolver::new()
            .with_solve(Ok(test_support::itinerary("greedy", 2)))
            .with_benchmark(Ok(test_support::benchmark_result())),
    );

    let job = dashboard.benchmark().expect("benchmark");
    dashboard.run_job(job).await;
    assert_eq!(dashboard.view(), ResultView::Benchmark);

    dashboard.toggle_day(2);
    let job = dashboard.solve().expect("solve");
    dashboard.run_job(job).await;

    assert_eq!(dashboard.view(), ResultView::Itinerary);
    let view = dashboard.itinerary_view().expect("itinerary view");
    let expanded: Vec<_> = view.days.iter().map(|day| day.expanded).collect();
    assert_eq!(expanded, [true, false]);
}

#[tokio::test]
async fn experiments_switch_view_on_start() {
    let (mut dashboard, solver) = dashboard(
        ScriptedSolver::new()
            .with_datasets(Ok(test_support::datasets(&["small", "medium"])))
            .with_experiment("small", Ok(test_support::experiment_result("small")))
            .with_experiment("medium", Ok(test_support::experiment_result("medium"))),
    );
    let job = dashboard.load_datasets().expect("load");
    dashboard.run_job(job).await;
    dashboard.set_experiment_runs(20);

    let job = dashboard.run_experiments().expect("experiments");
    assert_eq!(dashboard.view(), ResultView::Experiment);
    assert!(dashboard.is_busy());
    dashboard.run_job(job).await;

    assert!(!dashboard.is_busy());
    assert_eq!(dashboard.experiments().results().len(), 2);
    assert_eq!(
        solver.calls().await,
        ["datasets", "experiment:small:20", "experiment:medium:20"]
    );
}

#[tokio::test]
async fn map_click_respects_capture_mode() {
    let (mut dashboard, _solver) = dashboard(ScriptedSolver::new());
    let point = LatLng::new(13.7, 100.6);

    assert_eq!(dashboard.map_click(point), None);

    dashboard.arm_end_capture();
    assert_eq!(dashboard.map_click(point), Some(CaptureTarget::End));
    assert_eq!(dashboard.params().get().end, Some(point));
    assert_eq!(dashboard.capture().armed_target(), None);
}

#[tokio::test]
async fn cancel_routes_to_owning_channel() {
    let (mut dashboard, _solver) = dashboard(ScriptedSolver::new());
    let solve = dashboard.solve().expect("solve");
    let experiments = dashboard.run_experiments().expect("experiments");

    assert!(dashboard.cancel(ActionKind::Solve));
    assert!(dashboard.cancel(ActionKind::Experiment));
    assert!(!dashboard.is_busy());

    dashboard.run_job(solve).await;
    dashboard.run_job(experiments).await;

    assert_eq!(dashboard.itinerary(), None);
    assert_eq!(dashboard.connection_banner(), None);
    dashboard.dismiss_error(ActionKind::Solve);
    assert_eq!(dashboard.orchestrator().solve().error(), None);
}

#[test]
fn abandoned_job_reports_dispatch_failure() {
    let (mut dashboard, _solver) = dashboard(ScriptedSolver::new());
    let job = dashboard.benchmark().expect("benchmark");
    assert_eq!(job.kind(), ActionKind::Benchmark);

    let event = job.abandon(ApiFailure::Dispatch("queue full".into()));

    assert_eq!(dashboard.apply(event), Completion::Failed);
    assert!(!dashboard.is_busy());
    assert_eq!(dashboard.connection_banner(), None);
}
