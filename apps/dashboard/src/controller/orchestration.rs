//! Hands jobs from UI actions to the backend command queue.

use client_core::{ActionRejected, ApiFailure, Dashboard, Job};
use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext};

/// Queues a freshly submitted job. A job the queue refuses is settled on the
/// spot so its action does not stay loading, and the refusal is returned.
pub fn dispatch_job(
    cmd_tx: &Sender<BackendCommand>,
    dashboard: &mut Dashboard,
    submitted: Result<Job, ActionRejected>,
    status: &mut String,
) -> Option<UiError> {
    let job = match submitted {
        Ok(job) => job,
        Err(rejected) => {
            tracing::debug!("action not started: {rejected}");
            *status = format!("Not started: {rejected}");
            return None;
        }
    };

    let cmd = BackendCommand::Execute(job);
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend job");
            *status = format!("Running {cmd_name}...");
            None
        }
        Err(TrySendError::Full(cmd)) => {
            tracing::warn!(command = cmd_name, "ui->backend command queue is full");
            settle_refused(dashboard, cmd, "command queue is full");
            Some(UiError::new(
                UiErrorContext::Dispatch,
                "UI command queue is full; please retry",
            ))
        }
        Err(TrySendError::Disconnected(cmd)) => {
            tracing::error!(command = cmd_name, "backend command processor disconnected");
            settle_refused(dashboard, cmd, "backend worker disconnected");
            Some(UiError::new(
                UiErrorContext::Dispatch,
                "Backend worker disconnected; restart the dashboard",
            ))
        }
    }
}

fn settle_refused(dashboard: &mut Dashboard, cmd: BackendCommand, reason: &str) {
    if let BackendCommand::Execute(job) = cmd {
        dashboard.apply(job.abandon(ApiFailure::Dispatch(reason.to_string())));
    }
}

pub fn request_shutdown(cmd_tx: &Sender<BackendCommand>) {
    if cmd_tx.try_send(BackendCommand::Shutdown).is_err() {
        tracing::debug!("backend worker already gone at shutdown");
    }
}
