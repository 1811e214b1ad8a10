//! Interaction and orchestration core of the route planning dashboard.
//!
//! Everything here is toolkit-agnostic: the desktop shell and the CLI drive
//! the same [`Dashboard`] and execute the [`Job`]s it hands out.

pub mod action;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod experiment;
pub mod orchestrator;
pub mod params;
pub mod point_capture;
pub mod presenter;

#[cfg(test)]
mod test_support;

pub use action::{ActionChannel, ActionTicket, Completion, Finished, PendingRequest};
pub use api::{HttpSolverClient, SolverApi};
pub use config::{load_settings, DashboardSettings, SettingsError, SettingsOverrides};
pub use dashboard::{Dashboard, Job, JobEvent, ResultView};
pub use error::{ActionKind, ActionRejected, ApiFailure};
pub use experiment::{ExperimentRunner, ExperimentSweep, SweepEvent, SweepSummary};
pub use orchestrator::RequestOrchestrator;
pub use params::{EndpointPatch, ParameterModel, ParamsPatch};
pub use point_capture::{CaptureMode, CaptureTarget, PointCapture};
pub use presenter::ItineraryPresenter;
