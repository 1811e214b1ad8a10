//! Scripted solver and result fixtures for unit tests.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use shared::{
    domain::{AttractionId, DatasetInfo},
    protocol::{
        AlgorithmStats, BenchmarkRequest, BenchmarkResult, ConvergencePoint, DayPlan,
        ExperimentRequest, ExperimentResult, Itinerary, SolveRequest, Visit,
    },
};
use tokio::sync::Mutex;

use crate::{api::SolverApi, error::ApiFailure};

/// Replies from queued scripts. A call with nothing scripted never resolves,
/// which is how tests keep a request in flight.
#[derive(Default)]
pub(crate) struct ScriptedSolver {
    datasets: Mutex<VecDeque<Result<Vec<DatasetInfo>, ApiFailure>>>,
    solves: Mutex<VecDeque<Result<Itinerary, ApiFailure>>>,
    benchmarks: Mutex<VecDeque<Result<BenchmarkResult, ApiFailure>>>,
    experiments: Mutex<HashMap<String, Result<ExperimentResult, ApiFailure>>>,
    calls: Mutex<Vec<String>>,
    solve_requests: Mutex<Vec<SolveRequest>>,
}

impl ScriptedSolver {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_datasets(mut self, reply: Result<Vec<DatasetInfo>, ApiFailure>) -> Self {
        self.datasets.get_mut().push_back(reply);
        self
    }

    pub(crate) fn with_solve(mut self, reply: Result<Itinerary, ApiFailure>) -> Self {
        self.solves.get_mut().push_back(reply);
        self
    }

    pub(crate) fn with_benchmark(mut self, reply: Result<BenchmarkResult, ApiFailure>) -> Self {
        self.benchmarks.get_mut().push_back(reply);
        self
    }

    pub(crate) fn with_experiment(
        mut self,
        dataset: &str,
        reply: Result<ExperimentResult, ApiFailure>,
    ) -> Self {
        self.experiments.get_mut().insert(dataset.to_string(), reply);
        self
    }

    pub(crate) async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    pub(crate) async fn solve_requests(&self) -> Vec<SolveRequest> {
        self.solve_requests.lock().await.clone()
    }

    async fn record(&self, call: String) {
        self.calls.lock().await.push(call);
    }
}

async fn next_or_hang<T>(queue: &Mutex<VecDeque<Result<T, ApiFailure>>>) -> Result<T, ApiFailure> {
    let scripted = queue.lock().await.pop_front();
    match scripted {
        Some(reply) => reply,
        None => std::future::pending().await,
    }
}

#[async_trait]
impl SolverApi for ScriptedSolver {
    async fn list_datasets(&self) -> Result<Vec<DatasetInfo>, ApiFailure> {
        self.record("datasets".to_string()).await;
        next_or_hang(&self.datasets).await
    }

    async fn solve(&self, request: &SolveRequest) -> Result<Itinerary, ApiFailure> {
        self.record(format!("solve:{}:{}", request.dataset.name, request.algorithm))
            .await;
        self.solve_requests.lock().await.push(request.clone());
        next_or_hang(&self.solves).await
    }

    async fn benchmark(&self, request: &BenchmarkRequest) -> Result<BenchmarkResult, ApiFailure> {
        self.record(format!("benchmark:{}", request.dataset.name))
            .await;
        next_or_hang(&self.benchmarks).await
    }

    async fn experiment(
        &self,
        request: &ExperimentRequest,
    ) -> Result<ExperimentResult, ApiFailure> {
        self.record(format!("experiment:{}:{}", request.dataset, request.n_runs))
            .await;
        let scripted = self.experiments.lock().await.remove(&request.dataset);
        match scripted {
            Some(reply) => reply,
            None => std::future::pending().await,
        }
    }
}

pub(crate) fn datasets(names: &[&str]) -> Vec<DatasetInfo> {
    names
        .iter()
        .zip(1usize..)
        .map(|(name, rank)| DatasetInfo {
            name: (*name).to_string(),
            size: rank * 25,
        })
        .collect()
}

const CATEGORIES: [&str; 3] = ["Museum", "Street Food", "Park"];

/// Three visits per day. Attraction ids run downwards so any client-side
/// sorting would be visible.
pub(crate) fn itinerary(algorithm: &str, num_days: u32) -> Itinerary {
    let days: Vec<DayPlan> = (1..=num_days)
        .map(|day| {
            let visits: Vec<Visit> = (0..3u32)
                .map(|slot| Visit {
                    attraction_id: AttractionId(day * 100 - slot),
                    attraction_name: format!("Day {day} stop {}", slot + 1),
                    arrival_time: 540 + slot * 90,
                    departure_time: 600 + slot * 90,
                    fee: f64::from(slot) * 5.0,
                    preference: 0.3 + f64::from(slot) * 0.2,
                    category: CATEGORIES[slot as usize].to_string(),
                    lat: (slot == 0).then_some(13.5 + f64::from(day) * 0.25),
                    lng: (slot == 0).then_some(100.50),
                })
                .collect();
            DayPlan {
                day,
                total_travel_time: 45,
                total_cost: visits.iter().map(|visit| visit.fee).sum(),
                total_satisfaction: visits.iter().map(|visit| visit.preference).sum(),
                visits,
            }
        })
        .collect();
    Itinerary {
        total_satisfaction: days.iter().map(|plan| plan.total_satisfaction).sum(),
        total_cost: days.iter().map(|plan| plan.total_cost).sum(),
        total_attractions: days.iter().map(|plan| plan.visits.len()).sum(),
        days,
        algorithm_used: algorithm.to_string(),
        computation_ms: 12,
        convergence_data: None,
    }
}

pub(crate) fn annealed_itinerary(num_days: u32) -> Itinerary {
    let mut itinerary = itinerary("simulated_annealing", num_days);
    itinerary.total_satisfaction += 0.5;
    itinerary.computation_ms = 340;
    itinerary.convergence_data = Some(
        (0..4u32)
            .map(|step| ConvergencePoint {
                iteration: step * 100,
                satisfaction: 1.0 + f64::from(step) * 0.25,
                temperature: 100.0 / f64::from(step + 1),
            })
            .collect(),
    );
    itinerary
}

pub(crate) fn benchmark_result() -> BenchmarkResult {
    BenchmarkResult {
        greedy: itinerary("greedy", 2),
        simulated_annealing: annealed_itinerary(2),
    }
}

fn stats(mean_satisfaction: f64, valid_runs: usize) -> AlgorithmStats {
    AlgorithmStats {
        mean_satisfaction,
        std_satisfaction: 0.12,
        mean_ms: 4.27,
        valid_runs,
        mean_attractions: 6.0,
        mean_cost: 42.0,
    }
}

pub(crate) fn experiment_result(dataset: &str) -> ExperimentResult {
    ExperimentResult {
        dataset_name: dataset.to_string(),
        dataset_size: 50,
        greedy: stats(2.0, 10),
        sa: stats(2.5, 10),
        sa_improvement_pct: 25.0,
    }
}
