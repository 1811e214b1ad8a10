//! The single trip configuration store shared by every dashboard workflow.

use shared::{
    domain::{Algorithm, DatasetInfo, LatLng},
    protocol::SolveParams,
};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EndpointPatch {
    Set(LatLng),
    Clear,
}

/// A partial edit; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamsPatch {
    pub num_days: Option<u32>,
    pub daily_time_budget: Option<u32>,
    pub total_budget: Option<f64>,
    pub start_time: Option<u32>,
    pub start: Option<LatLng>,
    pub end: Option<EndpointPatch>,
}

impl ParamsPatch {
    pub fn start(point: LatLng) -> Self {
        Self {
            start: Some(point),
            ..Self::default()
        }
    }

    pub fn end(point: LatLng) -> Self {
        Self {
            end: Some(EndpointPatch::Set(point)),
            ..Self::default()
        }
    }

    pub fn clear_end() -> Self {
        Self {
            end: Some(EndpointPatch::Clear),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Owns the current [`SolveParams`] plus the dataset and algorithm selection.
///
/// No business validation happens here: out-of-range values are stored as
/// given and left for the solver to reject.
#[derive(Debug, Clone)]
pub struct ParameterModel {
    params: SolveParams,
    dataset: String,
    algorithm: Algorithm,
    revision: u64,
}

impl ParameterModel {
    pub fn new(params: SolveParams, dataset: impl Into<String>, algorithm: Algorithm) -> Self {
        Self {
            params,
            dataset: dataset.into(),
            algorithm,
            revision: 0,
        }
    }

    pub fn get(&self) -> &SolveParams {
        &self.params
    }

    pub fn snapshot(&self) -> SolveParams {
        self.params.clone()
    }

    /// Bumped on every effective change; lets views skip redundant work.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set(&mut self, patch: ParamsPatch) {
        if patch.is_empty() {
            return;
        }
        let ParamsPatch {
            num_days,
            daily_time_budget,
            total_budget,
            start_time,
            start,
            end,
        } = patch;

        if let Some(v) = num_days {
            self.params.num_days = v;
        }
        if let Some(v) = daily_time_budget {
            self.params.daily_time_budget = v;
        }
        if let Some(v) = total_budget {
            self.params.total_budget = v;
        }
        if let Some(v) = start_time {
            self.params.start_time = v;
        }
        if let Some(point) = start {
            self.params.start = point;
        }
        match end {
            Some(EndpointPatch::Set(point)) => self.params.end = Some(point),
            Some(EndpointPatch::Clear) => self.params.end = None,
            None => {}
        }
        self.revision += 1;
        debug!(revision = self.revision, "trip parameters updated");
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn select_dataset(&mut self, name: impl Into<String>) {
        let name = name.into();
        if name != self.dataset {
            self.dataset = name;
            self.revision += 1;
        }
    }

    pub fn select_algorithm(&mut self, algorithm: Algorithm) {
        if algorithm != self.algorithm {
            self.algorithm = algorithm;
            self.revision += 1;
        }
    }

    /// Keeps the selected dataset when the server still offers it, otherwise
    /// falls back to the first one listed. Returns whether the selection moved.
    pub fn reconcile_datasets(&mut self, datasets: &[DatasetInfo]) -> bool {
        if datasets.iter().any(|info| info.name == self.dataset) {
            return false;
        }
        match datasets.first() {
            Some(first) => {
                debug!(from = %self.dataset, to = %first.name, "selected dataset not offered");
                self.select_dataset(first.name.clone());
                true
            }
            None => false,
        }
    }
}

impl Default for ParameterModel {
    fn default() -> Self {
        Self::new(SolveParams::default(), "small", Algorithm::default())
    }
}

#[cfg(test)]
#[path = "tests/params_tests.rs"]
mod tests;
