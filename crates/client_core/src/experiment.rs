//! Multi-run experiments across every known dataset.
//!
//! Datasets are visited one at a time, in list order. Each result is
//! published as soon as it arrives, and the first failure ends the sweep while
//! keeping what was already collected.

use std::{sync::Arc, time::Duration};

use shared::{
    domain::DatasetInfo,
    protocol::{ExperimentRequest, ExperimentResult, SolveParams},
};
use tracing::{info, warn};

use crate::{
    action::{ActionChannel, ActionTicket, Completion},
    api::SolverApi,
    error::{ActionKind, ActionRejected, ApiFailure},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepSummary {
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug)]
pub enum SweepEvent {
    DatasetCompleted {
        ticket: ActionTicket,
        result: ExperimentResult,
    },
    Finished {
        ticket: ActionTicket,
        outcome: Result<SweepSummary, ApiFailure>,
    },
}

impl SweepEvent {
    pub fn ticket(&self) -> &ActionTicket {
        match self {
            Self::DatasetCompleted { ticket, .. } | Self::Finished { ticket, .. } => ticket,
        }
    }
}

/// A started sweep, ready to be driven on an executor.
pub struct ExperimentSweep {
    ticket: ActionTicket,
    api: Arc<dyn SolverApi>,
    datasets: Vec<String>,
    n_runs: u32,
    params: SolveParams,
}

impl ExperimentSweep {
    pub fn ticket(&self) -> &ActionTicket {
        &self.ticket
    }

    pub fn total(&self) -> usize {
        self.datasets.len()
    }

    /// Requests every dataset in order, reporting through `emit`. Exactly one
    /// `Finished` event is emitted, always last.
    pub async fn drive<F>(self, mut emit: F)
    where
        F: FnMut(SweepEvent),
    {
        let Self {
            ticket,
            api,
            datasets,
            n_runs,
            params,
        } = self;
        let total = datasets.len();
        let cancel = ticket.cancel_token().clone();
        let mut completed = 0;

        for dataset in datasets {
            info!(dataset = %dataset, position = completed + 1, total, n_runs, "running experiment");
            let request = ExperimentRequest {
                dataset,
                n_runs,
                params: params.clone(),
            };
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(ApiFailure::Cancelled),
                result = api.experiment(&request) => result,
            };
            match outcome {
                Ok(result) => {
                    completed += 1;
                    emit(SweepEvent::DatasetCompleted {
                        ticket: ticket.clone(),
                        result,
                    });
                }
                Err(failure) => {
                    warn!(
                        dataset = %request.dataset,
                        completed,
                        total,
                        "experiment sweep aborted: {failure}"
                    );
                    emit(SweepEvent::Finished {
                        ticket,
                        outcome: Err(failure),
                    });
                    return;
                }
            }
        }

        info!(completed, total, "experiment sweep finished");
        emit(SweepEvent::Finished {
            ticket,
            outcome: Ok(SweepSummary { completed, total }),
        });
    }

    pub fn abandon(self, failure: ApiFailure) -> SweepEvent {
        SweepEvent::Finished {
            ticket: self.ticket,
            outcome: Err(failure),
        }
    }
}

pub struct ExperimentRunner {
    gate: ActionChannel<SweepSummary>,
    results: Vec<ExperimentResult>,
    total: usize,
    n_runs: u32,
}

impl ExperimentRunner {
    pub fn new(n_runs: u32) -> Self {
        Self {
            gate: ActionChannel::new(ActionKind::Experiment),
            results: Vec::new(),
            total: 0,
            n_runs,
        }
    }

    /// A sweep that reports no dataset for `after` may be replaced by a new one.
    pub fn with_stall_timeout(mut self, after: Duration) -> Self {
        self.gate = self.gate.with_stall_timeout(after);
        self
    }

    pub fn n_runs(&self) -> u32 {
        self.n_runs
    }

    /// Ignored while a sweep is running; the running sweep keeps its count.
    pub fn set_n_runs(&mut self, n_runs: u32) {
        if !self.gate.is_loading() {
            self.n_runs = n_runs;
        }
    }

    pub fn is_loading(&self) -> bool {
        self.gate.is_loading()
    }

    pub fn is_stalled(&self) -> bool {
        self.gate.is_stalled()
    }

    pub fn error(&self) -> Option<&str> {
        self.gate.error()
    }

    pub fn results(&self) -> &[ExperimentResult] {
        &self.results
    }

    /// `(completed, total)` for the current or last sweep.
    pub fn progress(&self) -> (usize, usize) {
        (self.results.len(), self.total)
    }

    pub fn last_summary(&self) -> Option<&SweepSummary> {
        self.gate.last_result()
    }

    /// Clears previous results and prepares a sweep over `datasets`.
    pub fn start(
        &mut self,
        api: Arc<dyn SolverApi>,
        datasets: &[DatasetInfo],
        params: SolveParams,
    ) -> Result<ExperimentSweep, ActionRejected> {
        let ticket = self.gate.begin()?;
        self.results.clear();
        self.total = datasets.len();
        info!(total = self.total, n_runs = self.n_runs, "starting experiment sweep");
        Ok(ExperimentSweep {
            ticket,
            api,
            datasets: datasets.iter().map(|info| info.name.clone()).collect(),
            n_runs: self.n_runs,
            params,
        })
    }

    pub fn apply(&mut self, event: SweepEvent) -> Completion {
        match event {
            SweepEvent::DatasetCompleted { ticket, result } => {
                if !self.gate.accepts(&ticket) {
                    return Completion::Stale;
                }
                self.gate.record_progress();
                self.results.push(result);
                Completion::Applied
            }
            SweepEvent::Finished { ticket, outcome } => self.gate.complete(&ticket, outcome),
        }
    }

    pub fn cancel(&mut self) -> bool {
        self.gate.cancel()
    }

    pub fn dismiss_error(&mut self) {
        self.gate.dismiss_error();
    }

    /// Button caption, e.g. `Running... (2/5)`.
    pub fn progress_label(&self) -> String {
        if self.is_loading() {
            let (completed, total) = self.progress();
            format!("Running... ({completed}/{total})")
        } else {
            "Run All Experiments".to_string()
        }
    }
}

#[cfg(test)]
#[path = "tests/experiment_tests.rs"]
mod tests;
