//! UI/backend events and error modeling for the dashboard controller.

use client_core::JobEvent;

pub enum UiEvent {
    Info(String),
    Error(UiError),
    Job(JobEvent),
}

/// Where a worker-level error came from. Request failures never get here;
/// they land in their action channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Dispatch,
}

impl UiErrorContext {
    pub fn label(self) -> &'static str {
        match self {
            Self::BackendStartup => "Backend",
            Self::Dispatch => "Connection",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            context,
            message: message.into(),
        }
    }

    /// Errors that leave the dashboard unable to run any job.
    pub fn is_fatal(&self) -> bool {
        self.context == UiErrorContext::BackendStartup
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_line(&self) -> String {
        format!("{} error: {}", self.context.label(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_build_failure_is_fatal() {
        let err = UiError::new(
            UiErrorContext::BackendStartup,
            "backend worker startup failure: failed to build runtime: out of threads",
        );
        assert!(err.is_fatal());
        assert_eq!(
            err.status_line(),
            "Backend error: backend worker startup failure: failed to build runtime: out of threads"
        );
    }

    #[test]
    fn dispatch_failure_is_a_connection_error() {
        let err = UiError::new(
            UiErrorContext::Dispatch,
            "Backend worker disconnected; restart the dashboard",
        );
        assert!(!err.is_fatal());
        assert_eq!(err.context(), UiErrorContext::Dispatch);
        assert_eq!(
            err.status_line(),
            "Connection error: Backend worker disconnected; restart the dashboard"
        );
    }
}
