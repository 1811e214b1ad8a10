//! Solver double shared by the dashboard's unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use client_core::{ApiFailure, Dashboard, DashboardSettings, SolverApi};
use shared::{
    domain::DatasetInfo,
    protocol::{
        BenchmarkRequest, BenchmarkResult, ExperimentRequest, ExperimentResult, Itinerary,
        SolveRequest,
    },
};

/// Every call fails at once as unreachable.
pub struct OfflineSolver;

#[async_trait]
impl SolverApi for OfflineSolver {
    async fn list_datasets(&self) -> Result<Vec<DatasetInfo>, ApiFailure> {
        Err(ApiFailure::Unreachable("offline".into()))
    }

    async fn solve(&self, _request: &SolveRequest) -> Result<Itinerary, ApiFailure> {
        Err(ApiFailure::Unreachable("offline".into()))
    }

    async fn benchmark(&self, _request: &BenchmarkRequest) -> Result<BenchmarkResult, ApiFailure> {
        Err(ApiFailure::Unreachable("offline".into()))
    }

    async fn experiment(
        &self,
        _request: &ExperimentRequest,
    ) -> Result<ExperimentResult, ApiFailure> {
        Err(ApiFailure::Unreachable("offline".into()))
    }
}

pub fn offline_dashboard() -> Dashboard {
    Dashboard::new(Arc::new(OfflineSolver), &DashboardSettings::default())
}
