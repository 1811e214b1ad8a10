use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttractionId(pub u32);

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    #[default]
    Greedy,
    SimulatedAnnealing,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::Greedy, Algorithm::SimulatedAnnealing];

    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Greedy => "greedy",
            Self::SimulatedAnnealing => "simulated_annealing",
        }
    }

    /// Selector label used by the control panel.
    pub fn label(self) -> &'static str {
        match self {
            Self::Greedy => "Greedy (Baseline)",
            Self::SimulatedAnnealing => "Simulated Annealing",
        }
    }

    pub fn short_label(self) -> &'static str {
        match self {
            Self::Greedy => "Greedy",
            Self::SimulatedAnnealing => "SA",
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.wire_name() == name)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A dataset the solver knows about. `name` doubles as the API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub name: String,
    pub size: usize,
}

impl DatasetInfo {
    pub fn label(&self) -> String {
        format!("{} ({} attractions)", self.name, self.size)
    }
}
