use std::fmt;

use thiserror::Error;

/// The independent request channels the dashboard tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Datasets,
    Solve,
    Benchmark,
    Experiment,
}

impl ActionKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Datasets => "dataset list",
            Self::Solve => "solve",
            Self::Benchmark => "benchmark",
            Self::Experiment => "experiment",
        }
    }

    fn verb_phrase(self) -> &'static str {
        match self {
            Self::Datasets => "load the dataset list",
            Self::Solve => "solve the itinerary",
            Self::Benchmark => "run the benchmark",
            Self::Experiment => "run the experiments",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a solver call did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiFailure {
    #[error("could not reach solver service: {0}")]
    Unreachable(String),
    #[error("solver service timed out")]
    TimedOut,
    #[error("solver service rejected the request with HTTP {status}")]
    Rejected {
        status: u16,
        message: Option<String>,
    },
    #[error("unexpected response from solver service: {0}")]
    Decode(String),
    #[error("request cancelled")]
    Cancelled,
    #[error("backend worker unavailable: {0}")]
    Dispatch(String),
}

impl ApiFailure {
    /// Failures that mean the service could not be talked to at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Unreachable(_) | Self::TimedOut)
    }

    /// Text for the action's error slot. A message supplied by the server
    /// wins; otherwise the text names the action and the failure category.
    pub fn user_message(&self, action: ActionKind) -> String {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Rejected {
                status,
                message: None,
            } => format!(
                "The server rejected the {} request (HTTP {status}).",
                action.label()
            ),
            Self::Unreachable(_) => format!(
                "Could not reach the server to {}. Check that the solver service is running and retry.",
                action.verb_phrase()
            ),
            Self::TimedOut => format!(
                "The server took too long to {}. Retry, or pick a smaller dataset.",
                action.verb_phrase()
            ),
            Self::Decode(_) => format!(
                "The server sent an unreadable response to the {} request.",
                action.label()
            ),
            Self::Cancelled => format!("The {} request was cancelled.", action.label()),
            Self::Dispatch(_) => format!(
                "Could not start the {} request: the background worker is not running. Restart the dashboard.",
                action.label()
            ),
        }
    }
}

impl From<reqwest::Error> for ApiFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::TimedOut
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Rejected {
                status: status.as_u16(),
                message: None,
            }
        } else {
            Self::Unreachable(err.to_string())
        }
    }
}

/// An action that was refused before any request was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionRejected {
    #[error("{0} request already in progress")]
    InFlight(ActionKind),
    #[error("no dataset selected")]
    NoDataset,
}
