use serde::{Deserialize, Serialize};

use crate::{
    domain::{Algorithm, AttractionId, LatLng},
    error::ProtocolError,
};

/// Trip configuration sent with every solver call.
///
/// On the wire the coordinates are flattened into `hotel_lat`/`hotel_lng` and
/// an optional `end_lat`/`end_lng` pair; a payload with only one half of the
/// end pair is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "SolveParamsWire", try_from = "SolveParamsWire")]
pub struct SolveParams {
    pub num_days: u32,
    /// Minutes available per day.
    pub daily_time_budget: u32,
    pub total_budget: f64,
    /// Minutes after midnight.
    pub start_time: u32,
    pub start: LatLng,
    /// `None` means the day ends where it started.
    pub end: Option<LatLng>,
}

impl SolveParams {
    pub fn effective_end(&self) -> LatLng {
        self.end.unwrap_or(self.start)
    }
}

impl Default for SolveParams {
    fn default() -> Self {
        Self {
            num_days: 2,
            daily_time_budget: 600,
            total_budget: 100.0,
            start_time: 540,
            start: LatLng::new(13.7563, 100.5018),
            end: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SolveParamsWire {
    num_days: u32,
    daily_time_budget: u32,
    total_budget: f64,
    start_time: u32,
    hotel_lat: f64,
    hotel_lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_lng: Option<f64>,
}

impl From<SolveParams> for SolveParamsWire {
    fn from(value: SolveParams) -> Self {
        Self {
            num_days: value.num_days,
            daily_time_budget: value.daily_time_budget,
            total_budget: value.total_budget,
            start_time: value.start_time,
            hotel_lat: value.start.lat,
            hotel_lng: value.start.lng,
            end_lat: value.end.map(|end| end.lat),
            end_lng: value.end.map(|end| end.lng),
        }
    }
}

impl TryFrom<SolveParamsWire> for SolveParams {
    type Error = ProtocolError;

    fn try_from(value: SolveParamsWire) -> Result<Self, Self::Error> {
        let end = match (value.end_lat, value.end_lng) {
            (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)),
            (None, None) => None,
            _ => return Err(ProtocolError::UnpairedEndCoordinate),
        };
        Ok(Self {
            num_days: value.num_days,
            daily_time_budget: value.daily_time_budget,
            total_budget: value.total_budget,
            start_time: value.start_time,
            start: LatLng::new(value.hotel_lat, value.hotel_lng),
            end,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub attraction_id: AttractionId,
    pub attraction_name: String,
    pub arrival_time: u32,
    pub departure_time: u32,
    pub fee: f64,
    pub preference: f64,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl Visit {
    /// Real attraction coordinates, when the solver reported them.
    pub fn location(&self) -> Option<LatLng> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: u32,
    pub visits: Vec<Visit>,
    pub total_travel_time: u32,
    pub total_cost: f64,
    pub total_satisfaction: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergencePoint {
    pub iteration: u32,
    pub satisfaction: f64,
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub days: Vec<DayPlan>,
    pub total_satisfaction: f64,
    pub total_cost: f64,
    pub total_attractions: usize,
    pub algorithm_used: String,
    pub computation_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convergence_data: Option<Vec<ConvergencePoint>>,
}

impl Itinerary {
    pub fn algorithm(&self) -> Option<Algorithm> {
        Algorithm::from_wire(&self.algorithm_used)
    }

    pub fn convergence(&self) -> &[ConvergencePoint] {
        self.convergence_data.as_deref().unwrap_or_default()
    }

    /// True when the day indices read `1, 2, .., n` in list order.
    pub fn has_contiguous_days(&self) -> bool {
        self.days
            .iter()
            .zip(1u32..)
            .all(|(plan, expected)| plan.day == expected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    Builtin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRef {
    #[serde(rename = "type")]
    pub kind: DatasetKind,
    pub name: String,
}

impl DatasetRef {
    pub fn builtin(name: impl Into<String>) -> Self {
        Self {
            kind: DatasetKind::Builtin,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveRequest {
    pub algorithm: Algorithm,
    pub dataset: DatasetRef,
    pub params: SolveParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResponse {
    pub itinerary: Itinerary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRequest {
    pub dataset: DatasetRef,
    pub params: SolveParams,
}

/// Both algorithms run against the same dataset and parameter snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub greedy: Itinerary,
    pub simulated_annealing: Itinerary,
}

impl BenchmarkResult {
    pub fn for_algorithm(&self, algorithm: Algorithm) -> &Itinerary {
        match algorithm {
            Algorithm::Greedy => &self.greedy,
            Algorithm::SimulatedAnnealing => &self.simulated_annealing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRequest {
    pub dataset: String,
    pub n_runs: u32,
    pub params: SolveParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmStats {
    pub mean_satisfaction: f64,
    pub std_satisfaction: f64,
    pub mean_ms: f64,
    pub valid_runs: usize,
    pub mean_attractions: f64,
    pub mean_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResult {
    pub dataset_name: String,
    pub dataset_size: usize,
    pub greedy: AlgorithmStats,
    pub sa: AlgorithmStats,
    pub sa_improvement_pct: f64,
}

impl ExperimentResult {
    pub fn stats(&self, algorithm: Algorithm) -> &AlgorithmStats {
        match algorithm {
            Algorithm::Greedy => &self.greedy,
            Algorithm::SimulatedAnnealing => &self.sa,
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
