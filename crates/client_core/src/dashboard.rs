//! Composition root: one parameter model, three result workflows.
//!
//! Every mutation happens through `&mut Dashboard` on the thread that owns it.
//! Network work leaves as a [`Job`] and comes back as [`JobEvent`]s.

use std::{sync::Arc, time::Duration};

use shared::{
    domain::{Algorithm, DatasetInfo, LatLng},
    protocol::{BenchmarkResult, Itinerary},
};
use tracing::{info, warn};

use crate::{
    action::{Completion, Finished, PendingRequest},
    api::SolverApi,
    config::DashboardSettings,
    error::{ActionKind, ActionRejected, ApiFailure},
    experiment::{ExperimentRunner, ExperimentSweep, SweepEvent},
    orchestrator::RequestOrchestrator,
    params::{ParameterModel, ParamsPatch},
    point_capture::{CaptureTarget, PointCapture},
    presenter::{ItineraryPresenter, ItineraryView},
};

/// Slack past the HTTP timeout before an in-flight call counts as stalled.
const STALL_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultView {
    #[default]
    Itinerary,
    Benchmark,
    Experiment,
}

impl ResultView {
    pub const ALL: [ResultView; 3] = [
        ResultView::Itinerary,
        ResultView::Benchmark,
        ResultView::Experiment,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Itinerary => "Itinerary",
            Self::Benchmark => "Benchmark",
            Self::Experiment => "Experiments",
        }
    }
}

/// Network work handed to an executor.
pub enum Job {
    Datasets(PendingRequest<Vec<DatasetInfo>>),
    Solve(PendingRequest<Itinerary>),
    Benchmark(PendingRequest<BenchmarkResult>),
    Experiment(ExperimentSweep),
}

#[derive(Debug)]
pub enum JobEvent {
    Datasets(Finished<Vec<DatasetInfo>>),
    Solve(Finished<Itinerary>),
    Benchmark(Finished<BenchmarkResult>),
    Experiment(SweepEvent),
}

impl JobEvent {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Datasets(_) => ActionKind::Datasets,
            Self::Solve(_) => ActionKind::Solve,
            Self::Benchmark(_) => ActionKind::Benchmark,
            Self::Experiment(_) => ActionKind::Experiment,
        }
    }
}

impl Job {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Datasets(_) => ActionKind::Datasets,
            Self::Solve(_) => ActionKind::Solve,
            Self::Benchmark(_) => ActionKind::Benchmark,
            Self::Experiment(_) => ActionKind::Experiment,
        }
    }

    pub async fn run<F>(self, mut emit: F)
    where
        F: FnMut(JobEvent),
    {
        match self {
            Self::Datasets(pending) => emit(JobEvent::Datasets(pending.resolve().await)),
            Self::Solve(pending) => emit(JobEvent::Solve(pending.resolve().await)),
            Self::Benchmark(pending) => emit(JobEvent::Benchmark(pending.resolve().await)),
            Self::Experiment(sweep) => {
                sweep
                    .drive(|event| emit(JobEvent::Experiment(event)))
                    .await;
            }
        }
    }

    /// Settles the job without running it.
    pub fn abandon(self, failure: ApiFailure) -> JobEvent {
        match self {
            Self::Datasets(pending) => JobEvent::Datasets(pending.abandon(failure)),
            Self::Solve(pending) => JobEvent::Solve(pending.abandon(failure)),
            Self::Benchmark(pending) => JobEvent::Benchmark(pending.abandon(failure)),
            Self::Experiment(sweep) => JobEvent::Experiment(sweep.abandon(failure)),
        }
    }
}

pub struct Dashboard {
    model: ParameterModel,
    capture: PointCapture,
    orchestrator: RequestOrchestrator,
    experiments: ExperimentRunner,
    presenter: ItineraryPresenter,
    view: ResultView,
    connection_banner: Option<String>,
    api_label: String,
}

impl Dashboard {
    pub fn new(api: Arc<dyn SolverApi>, settings: &DashboardSettings) -> Self {
        let stall_after = settings.request_timeout + STALL_GRACE;
        Self {
            model: ParameterModel::new(
                Default::default(),
                settings.default_dataset.clone(),
                settings.default_algorithm,
            ),
            capture: PointCapture::default(),
            orchestrator: RequestOrchestrator::new(api).with_stall_timeout(stall_after),
            experiments: ExperimentRunner::new(settings.experiment_runs)
                .with_stall_timeout(stall_after),
            presenter: ItineraryPresenter::default(),
            view: ResultView::default(),
            connection_banner: None,
            api_label: settings.api_base_url.clone(),
        }
    }

    pub fn params(&self) -> &ParameterModel {
        &self.model
    }

    pub fn set_params(&mut self, patch: ParamsPatch) {
        self.model.set(patch);
    }

    pub fn select_dataset(&mut self, name: impl Into<String>) {
        self.model.select_dataset(name);
    }

    pub fn select_algorithm(&mut self, algorithm: Algorithm) {
        self.model.select_algorithm(algorithm);
    }

    pub fn capture(&self) -> &PointCapture {
        &self.capture
    }

    pub fn arm_start_capture(&mut self) {
        self.capture.arm_start();
    }

    pub fn arm_end_capture(&mut self) {
        self.capture.arm_end();
    }

    pub fn cancel_capture(&mut self) {
        self.capture.cancel();
    }

    pub fn map_click(&mut self, point: LatLng) -> Option<CaptureTarget> {
        self.capture.on_map_click(point, &mut self.model)
    }

    pub fn orchestrator(&self) -> &RequestOrchestrator {
        &self.orchestrator
    }

    pub fn experiments(&self) -> &ExperimentRunner {
        &self.experiments
    }

    pub fn set_experiment_runs(&mut self, n_runs: u32) {
        self.experiments.set_n_runs(n_runs);
    }

    pub fn datasets(&self) -> &[DatasetInfo] {
        self.orchestrator.known_datasets()
    }

    pub fn view(&self) -> ResultView {
        self.view
    }

    pub fn select_view(&mut self, view: ResultView) {
        self.view = view;
    }

    /// Base url of the solver service, as configured.
    pub fn api_label(&self) -> &str {
        &self.api_label
    }

    pub fn connection_banner(&self) -> Option<&str> {
        self.connection_banner.as_deref()
    }

    pub fn dismiss_banner(&mut self) {
        self.connection_banner = None;
    }

    /// True while any channel has a request in flight.
    pub fn is_busy(&self) -> bool {
        self.orchestrator.datasets().is_loading()
            || self.orchestrator.solve().is_loading()
            || self.orchestrator.benchmark().is_loading()
            || self.experiments.is_loading()
    }

    pub fn itinerary(&self) -> Option<&Itinerary> {
        self.orchestrator.solve().last_result()
    }

    pub fn itinerary_view(&self) -> Option<ItineraryView<'_>> {
        self.itinerary().map(|itinerary| self.presenter.view(itinerary))
    }

    pub fn toggle_day(&mut self, day: u32) {
        self.presenter.toggle(day);
    }

    pub fn load_datasets(&mut self) -> Result<Job, ActionRejected> {
        self.orchestrator.submit_datasets().map(Job::Datasets)
    }

    pub fn solve(&mut self) -> Result<Job, ActionRejected> {
        self.orchestrator.submit_solve(&self.model).map(Job::Solve)
    }

    pub fn benchmark(&mut self) -> Result<Job, ActionRejected> {
        self.orchestrator
            .submit_benchmark(&self.model)
            .map(Job::Benchmark)
    }

    pub fn run_experiments(&mut self) -> Result<Job, ActionRejected> {
        let sweep = self.experiments.start(
            self.orchestrator.api(),
            self.orchestrator.known_datasets(),
            self.model.snapshot(),
        )?;
        self.view = ResultView::Experiment;
        Ok(Job::Experiment(sweep))
    }

    pub fn cancel(&mut self, kind: ActionKind) -> bool {
        match kind {
            ActionKind::Experiment => self.experiments.cancel(),
            other => self.orchestrator.cancel(other),
        }
    }

    pub fn dismiss_error(&mut self, kind: ActionKind) {
        match kind {
            ActionKind::Experiment => self.experiments.dismiss_error(),
            other => self.orchestrator.dismiss_error(other),
        }
    }

    pub fn apply(&mut self, event: JobEvent) -> Completion {
        let kind = event.kind();
        let transport_failure = match &event {
            JobEvent::Datasets(finished) => finished.outcome.as_ref().err(),
            JobEvent::Solve(finished) => finished.outcome.as_ref().err(),
            JobEvent::Benchmark(finished) => finished.outcome.as_ref().err(),
            JobEvent::Experiment(SweepEvent::Finished { outcome, .. }) => outcome.as_ref().err(),
            JobEvent::Experiment(SweepEvent::DatasetCompleted { .. }) => None,
        }
        .filter(|failure| failure.is_transport())
        .cloned();

        let completion = match event {
            JobEvent::Datasets(finished) => {
                let completion = self.orchestrator.finish_datasets(finished);
                if completion == Completion::Applied {
                    self.connection_banner = None;
                    let datasets = self.orchestrator.known_datasets().to_vec();
                    self.model.reconcile_datasets(&datasets);
                    info!(count = datasets.len(), "datasets loaded");
                }
                completion
            }
            JobEvent::Solve(finished) => {
                let completion = self.orchestrator.finish_solve(finished);
                if completion == Completion::Applied {
                    if let Some(itinerary) = self.orchestrator.solve().last_result() {
                        self.presenter.present(itinerary);
                    }
                    self.view = ResultView::Itinerary;
                }
                completion
            }
            JobEvent::Benchmark(finished) => {
                let completion = self.orchestrator.finish_benchmark(finished);
                if completion == Completion::Applied {
                    self.view = ResultView::Benchmark;
                }
                completion
            }
            JobEvent::Experiment(event) => self.experiments.apply(event),
        };

        if let (Completion::Failed, Some(failure)) = (completion, transport_failure) {
            warn!(action = kind.label(), "solver service unreachable: {failure}");
            self.connection_banner = Some(format!(
                "Cannot reach the solver service at {}. Start the server, then retry.",
                self.api_label
            ));
        }
        completion
    }

    /// Runs `job` to completion on the current task, applying each event as
    /// it arrives.
    pub async fn run_job(&mut self, job: Job) {
        job.run(|event| {
            self.apply(event);
        })
        .await;
    }
}

#[cfg(test)]
#[path = "tests/dashboard_tests.rs"]
mod tests;
