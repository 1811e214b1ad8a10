//! Renderable views over solver results.

use std::collections::BTreeSet;

use shared::{
    domain::{Algorithm, LatLng},
    protocol::{
        AlgorithmStats, BenchmarkResult, ConvergencePoint, DayPlan, ExperimentResult, Itinerary,
        Visit,
    },
};
use tracing::warn;

pub const FALLBACK_GLYPH: &str = "📍";

const CATEGORY_GLYPHS: [(&str, &str); 6] = [
    ("Museum", "🏛️"),
    ("Restaurant", "🍽️"),
    ("Landmark", "🗿"),
    ("Park", "🌳"),
    ("Shopping", "🛍️"),
    ("Entertainment", "🎭"),
];

/// Blue, green, amber, red, purple, pink, teal.
pub const DAY_COLORS: [[u8; 3]; 7] = [
    [0x3B, 0x82, 0xF6],
    [0x10, 0xB9, 0x81],
    [0xF5, 0x9E, 0x0B],
    [0xEF, 0x44, 0x44],
    [0x8B, 0x5C, 0xF6],
    [0xEC, 0x48, 0x99],
    [0x14, 0xB8, 0xA6],
];

/// Glyph for a visit category; unknown categories get [`FALLBACK_GLYPH`].
pub fn category_glyph(category: &str) -> &'static str {
    CATEGORY_GLYPHS
        .iter()
        .find(|(label, _)| *label == category)
        .map_or(FALLBACK_GLYPH, |&(_, glyph)| glyph)
}

pub fn day_color(day: u32) -> [u8; 3] {
    let slot = day.saturating_sub(1) as usize % DAY_COLORS.len();
    DAY_COLORS[slot]
}

/// Minutes after midnight as `HH:MM`.
pub fn format_clock(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// `600` → `10h 0m per day`.
pub fn format_daily_budget(minutes: u32) -> String {
    format!("{}h {}m per day", minutes / 60, minutes % 60)
}

pub fn algorithm_badge(algorithm_used: &str) -> &'static str {
    match Algorithm::from_wire(algorithm_used) {
        Some(Algorithm::Greedy) => "Greedy Algorithm",
        _ => "Simulated Annealing",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryView<'a> {
    pub total_satisfaction: f64,
    pub total_attractions: usize,
    pub total_cost: f64,
    pub algorithm_badge: &'static str,
    pub algorithm_used: &'a str,
    pub computation_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisitView<'a> {
    pub ordinal: usize,
    pub glyph: &'static str,
    pub name: &'a str,
    pub category: &'a str,
    pub arrival: String,
    pub departure: String,
    pub fee: f64,
    pub preference: f64,
    pub location: Option<LatLng>,
}

impl VisitView<'_> {
    /// Width of the preference bar, 0.0 to 1.0.
    pub fn preference_fraction(&self) -> f32 {
        self.preference.clamp(0.0, 1.0) as f32
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayView<'a> {
    pub day: u32,
    pub color: [u8; 3],
    pub expanded: bool,
    pub stop_count: usize,
    pub total_cost: f64,
    pub total_travel_time: u32,
    pub total_satisfaction: f64,
    pub visits: Vec<VisitView<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryView<'a> {
    pub summary: SummaryView<'a>,
    pub days: Vec<DayView<'a>>,
    /// Only present when the solver reported a non-empty trace.
    pub convergence: Option<&'a [ConvergencePoint]>,
}

/// Tracks which days of the presented itinerary are expanded.
#[derive(Debug, Clone)]
pub struct ItineraryPresenter {
    expanded: BTreeSet<u32>,
}

impl Default for ItineraryPresenter {
    fn default() -> Self {
        Self {
            expanded: BTreeSet::from([1]),
        }
    }
}

impl ItineraryPresenter {
    /// Resets expansion for a newly arrived itinerary: day 1 open, rest closed.
    pub fn present(&mut self, itinerary: &Itinerary) {
        if !itinerary.has_contiguous_days() {
            warn!(
                days = ?itinerary.days.iter().map(|plan| plan.day).collect::<Vec<_>>(),
                "itinerary day indices are not 1..n; showing them as received"
            );
        }
        self.expanded = BTreeSet::from([1]);
    }

    pub fn toggle(&mut self, day: u32) {
        if !self.expanded.remove(&day) {
            self.expanded.insert(day);
        }
    }

    pub fn is_expanded(&self, day: u32) -> bool {
        self.expanded.contains(&day)
    }

    pub fn expanded_days(&self) -> impl Iterator<Item = u32> + '_ {
        self.expanded.iter().copied()
    }

    /// Builds the view in the solver's day and visit order.
    pub fn view<'a>(&self, itinerary: &'a Itinerary) -> ItineraryView<'a> {
        let convergence = itinerary.convergence();
        ItineraryView {
            summary: SummaryView {
                total_satisfaction: itinerary.total_satisfaction,
                total_attractions: itinerary.total_attractions,
                total_cost: itinerary.total_cost,
                algorithm_badge: algorithm_badge(&itinerary.algorithm_used),
                algorithm_used: &itinerary.algorithm_used,
                computation_ms: itinerary.computation_ms,
            },
            days: itinerary
                .days
                .iter()
                .map(|plan| self.day_view(plan))
                .collect(),
            convergence: (!convergence.is_empty()).then_some(convergence),
        }
    }

    fn day_view<'a>(&self, plan: &'a DayPlan) -> DayView<'a> {
        DayView {
            day: plan.day,
            color: day_color(plan.day),
            expanded: self.is_expanded(plan.day),
            stop_count: plan.visits.len(),
            total_cost: plan.total_cost,
            total_travel_time: plan.total_travel_time,
            total_satisfaction: plan.total_satisfaction,
            visits: plan
                .visits
                .iter()
                .enumerate()
                .map(|(index, visit)| visit_view(index + 1, visit))
                .collect(),
        }
    }
}

fn visit_view(ordinal: usize, visit: &Visit) -> VisitView<'_> {
    VisitView {
        ordinal,
        glyph: category_glyph(&visit.category),
        name: &visit.attraction_name,
        category: &visit.category,
        arrival: format_clock(visit.arrival_time),
        departure: format_clock(visit.departure_time),
        fee: visit.fee,
        preference: visit.preference,
        location: visit.location(),
    }
}

/// One map polyline per day through the visits that carry real coordinates.
/// Visits without coordinates are left off the map.
#[derive(Debug, Clone, PartialEq)]
pub struct DayRoute {
    pub day: u32,
    pub color: [u8; 3],
    pub stops: Vec<(usize, LatLng)>,
}

pub fn day_routes(itinerary: &Itinerary) -> Vec<DayRoute> {
    itinerary
        .days
        .iter()
        .map(|plan| DayRoute {
            day: plan.day,
            color: day_color(plan.day),
            stops: plan
                .visits
                .iter()
                .enumerate()
                .filter_map(|(index, visit)| visit.location().map(|point| (index + 1, point)))
                .collect(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRow {
    pub algorithm: Algorithm,
    pub total_satisfaction: f64,
    pub computation_ms: u64,
    pub total_attractions: usize,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkView {
    pub rows: Vec<BenchmarkRow>,
    /// SA satisfaction relative to greedy, in percent; `None` when greedy
    /// scored zero.
    pub improvement_pct: Option<f64>,
}

pub fn benchmark_view(result: &BenchmarkResult) -> BenchmarkView {
    let rows = Algorithm::ALL
        .into_iter()
        .map(|algorithm| {
            let itinerary = result.for_algorithm(algorithm);
            BenchmarkRow {
                algorithm,
                total_satisfaction: itinerary.total_satisfaction,
                computation_ms: itinerary.computation_ms,
                total_attractions: itinerary.total_attractions,
                total_cost: itinerary.total_cost,
            }
        })
        .collect();
    let baseline = result.greedy.total_satisfaction;
    let improvement_pct = (baseline > 0.0).then(|| {
        (result.simulated_annealing.total_satisfaction - baseline) / baseline * 100.0
    });
    BenchmarkView {
        rows,
        improvement_pct,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsCell {
    /// `μ ± σ` satisfaction.
    pub satisfaction: String,
    pub mean_ms: String,
    pub mean_satisfaction: f64,
    pub std_satisfaction: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentRow<'a> {
    pub dataset: &'a str,
    pub size: usize,
    pub greedy: StatsCell,
    pub sa: StatsCell,
    pub improvement: String,
    pub improved: bool,
}

fn stats_cell(stats: &AlgorithmStats) -> StatsCell {
    StatsCell {
        satisfaction: format!(
            "{:.2} ± {:.2}",
            stats.mean_satisfaction, stats.std_satisfaction
        ),
        mean_ms: format!("{:.1}", stats.mean_ms),
        mean_satisfaction: stats.mean_satisfaction,
        std_satisfaction: stats.std_satisfaction,
    }
}

pub fn experiment_rows(results: &[ExperimentResult]) -> Vec<ExperimentRow<'_>> {
    results
        .iter()
        .map(|result| {
            let improved = result.sa_improvement_pct > 0.0;
            ExperimentRow {
                dataset: &result.dataset_name,
                size: result.dataset_size,
                greedy: stats_cell(&result.greedy),
                sa: stats_cell(&result.sa),
                improvement: format!(
                    "{}{:.1}%",
                    if improved { "+" } else { "" },
                    result.sa_improvement_pct
                ),
                improved,
            }
        })
        .collect()
}

/// e.g. `Valid runs: greedy 10/10, SA 9/10 (3 datasets)`.
pub fn valid_runs_summary(results: &[ExperimentResult], n_runs: u32) -> Option<String> {
    if results.is_empty() {
        return None;
    }
    let min_valid = |algorithm: Algorithm| {
        results
            .iter()
            .map(|result| result.stats(algorithm).valid_runs)
            .min()
            .unwrap_or_default()
    };
    Some(format!(
        "Valid runs: greedy {}/{n_runs}, SA {}/{n_runs} ({} datasets)",
        min_valid(Algorithm::Greedy),
        min_valid(Algorithm::SimulatedAnnealing),
        results.len()
    ))
}

#[cfg(test)]
#[path = "tests/presenter_tests.rs"]
mod tests;
