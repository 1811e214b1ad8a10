//! Issues dataset/solve/benchmark calls through independent action channels.

use std::{sync::Arc, time::Duration};

use shared::{
    domain::DatasetInfo,
    protocol::{BenchmarkRequest, BenchmarkResult, DatasetRef, Itinerary, SolveRequest},
};
use tracing::info;

use crate::{
    action::{ActionChannel, Completion, Finished, PendingRequest},
    api::SolverApi,
    error::{ActionKind, ActionRejected},
    params::ParameterModel,
};

pub struct RequestOrchestrator {
    api: Arc<dyn SolverApi>,
    datasets: ActionChannel<Vec<DatasetInfo>>,
    solve: ActionChannel<Itinerary>,
    benchmark: ActionChannel<BenchmarkResult>,
}

impl RequestOrchestrator {
    pub fn new(api: Arc<dyn SolverApi>) -> Self {
        Self {
            api,
            datasets: ActionChannel::new(ActionKind::Datasets),
            solve: ActionChannel::new(ActionKind::Solve),
            benchmark: ActionChannel::new(ActionKind::Benchmark),
        }
    }

    /// Lets a resubmission replace a call that has been in flight for `after`.
    pub fn with_stall_timeout(mut self, after: Duration) -> Self {
        self.datasets = self.datasets.with_stall_timeout(after);
        self.solve = self.solve.with_stall_timeout(after);
        self.benchmark = self.benchmark.with_stall_timeout(after);
        self
    }

    pub fn api(&self) -> Arc<dyn SolverApi> {
        Arc::clone(&self.api)
    }

    pub fn datasets(&self) -> &ActionChannel<Vec<DatasetInfo>> {
        &self.datasets
    }

    pub fn solve(&self) -> &ActionChannel<Itinerary> {
        &self.solve
    }

    pub fn benchmark(&self) -> &ActionChannel<BenchmarkResult> {
        &self.benchmark
    }

    /// Datasets reported by the last successful listing.
    pub fn known_datasets(&self) -> &[DatasetInfo] {
        self.datasets
            .last_result()
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn submit_datasets(&mut self) -> Result<PendingRequest<Vec<DatasetInfo>>, ActionRejected> {
        let ticket = self.datasets.begin()?;
        let api = self.api();
        Ok(PendingRequest::new(
            ticket,
            Box::pin(async move { api.list_datasets().await }),
        ))
    }

    /// Snapshots the model and prepares a solve for the selected algorithm
    /// and dataset.
    pub fn submit_solve(
        &mut self,
        model: &ParameterModel,
    ) -> Result<PendingRequest<Itinerary>, ActionRejected> {
        let dataset = selected_dataset(model)?;
        let ticket = self.solve.begin()?;
        let request = SolveRequest {
            algorithm: model.algorithm(),
            dataset,
            params: model.snapshot(),
        };
        info!(
            algorithm = %request.algorithm,
            dataset = %request.dataset.name,
            "submitting solve"
        );
        let api = self.api();
        Ok(PendingRequest::new(
            ticket,
            Box::pin(async move { api.solve(&request).await }),
        ))
    }

    pub fn submit_benchmark(
        &mut self,
        model: &ParameterModel,
    ) -> Result<PendingRequest<BenchmarkResult>, ActionRejected> {
        let dataset = selected_dataset(model)?;
        let ticket = self.benchmark.begin()?;
        let request = BenchmarkRequest {
            dataset,
            params: model.snapshot(),
        };
        info!(dataset = %request.dataset.name, "submitting benchmark");
        let api = self.api();
        Ok(PendingRequest::new(
            ticket,
            Box::pin(async move { api.benchmark(&request).await }),
        ))
    }

    pub fn finish_datasets(&mut self, finished: Finished<Vec<DatasetInfo>>) -> Completion {
        self.datasets.complete(&finished.ticket, finished.outcome)
    }

    pub fn finish_solve(&mut self, finished: Finished<Itinerary>) -> Completion {
        self.solve.complete(&finished.ticket, finished.outcome)
    }

    pub fn finish_benchmark(&mut self, finished: Finished<BenchmarkResult>) -> Completion {
        self.benchmark.complete(&finished.ticket, finished.outcome)
    }

    /// Cancels the in-flight request of `kind`. Experiments are owned by the
    /// experiment runner and are not handled here.
    pub fn cancel(&mut self, kind: ActionKind) -> bool {
        match kind {
            ActionKind::Datasets => self.datasets.cancel(),
            ActionKind::Solve => self.solve.cancel(),
            ActionKind::Benchmark => self.benchmark.cancel(),
            ActionKind::Experiment => false,
        }
    }

    pub fn dismiss_error(&mut self, kind: ActionKind) {
        match kind {
            ActionKind::Datasets => self.datasets.dismiss_error(),
            ActionKind::Solve => self.solve.dismiss_error(),
            ActionKind::Benchmark => self.benchmark.dismiss_error(),
            ActionKind::Experiment => {}
        }
    }
}

fn selected_dataset(model: &ParameterModel) -> Result<DatasetRef, ActionRejected> {
    let name = model.dataset().trim();
    if name.is_empty() {
        return Err(ActionRejected::NoDataset);
    }
    Ok(DatasetRef::builtin(name))
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
