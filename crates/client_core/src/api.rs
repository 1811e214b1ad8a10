//! REST boundary to the external route solver.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::DatasetInfo,
    error::extract_error_message,
    protocol::{
        BenchmarkRequest, BenchmarkResult, ExperimentRequest, ExperimentResult, Itinerary,
        SolveRequest, SolveResponse,
    },
};
use tracing::{debug, warn};

use crate::error::ApiFailure;

#[async_trait]
pub trait SolverApi: Send + Sync {
    async fn list_datasets(&self) -> Result<Vec<DatasetInfo>, ApiFailure>;
    async fn solve(&self, request: &SolveRequest) -> Result<Itinerary, ApiFailure>;
    async fn benchmark(&self, request: &BenchmarkRequest) -> Result<BenchmarkResult, ApiFailure>;
    async fn experiment(&self, request: &ExperimentRequest)
        -> Result<ExperimentResult, ApiFailure>;
}

pub struct HttpSolverClient {
    http: Client,
    base_url: String,
}

impl HttpSolverClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build solver http client")?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        route: &'static str,
        request: RequestBuilder,
    ) -> Result<T, ApiFailure> {
        debug!(route, "solver request");
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(route, "solver request failed: {err}");
                return Err(err.into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body);
            warn!(route, status = status.as_u16(), ?message, "solver rejected request");
            return Err(ApiFailure::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        debug!(route, status = status.as_u16(), "solver response");
        response.json::<T>().await.map_err(|err| {
            if err.is_timeout() {
                warn!(route, "solver response body timed out: {err}");
                return ApiFailure::from(err);
            }
            warn!(route, "undecodable solver response: {err}");
            ApiFailure::Decode(err.to_string())
        })
    }
}

#[async_trait]
impl SolverApi for HttpSolverClient {
    async fn list_datasets(&self) -> Result<Vec<DatasetInfo>, ApiFailure> {
        self.fetch("datasets", self.http.get(self.endpoint("datasets")))
            .await
    }

    async fn solve(&self, request: &SolveRequest) -> Result<Itinerary, ApiFailure> {
        let response: SolveResponse = self
            .fetch("solve", self.http.post(self.endpoint("solve")).json(request))
            .await?;
        Ok(response.itinerary)
    }

    async fn benchmark(&self, request: &BenchmarkRequest) -> Result<BenchmarkResult, ApiFailure> {
        self.fetch(
            "benchmark",
            self.http.post(self.endpoint("benchmark")).json(request),
        )
        .await
    }

    async fn experiment(
        &self,
        request: &ExperimentRequest,
    ) -> Result<ExperimentResult, ApiFailure> {
        self.fetch(
            "experiment",
            self.http.post(self.endpoint("experiment")).json(request),
        )
        .await
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
