//! Loading/error/last-result bookkeeping shared by every request channel.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{ActionKind, ActionRejected, ApiFailure};

/// Identifies one invocation of a channel. Completions are only accepted
/// from the ticket of the invocation currently in flight.
#[derive(Debug, Clone)]
pub struct ActionTicket {
    kind: ActionKind,
    generation: u64,
    cancel: CancellationToken,
}

impl ActionTicket {
    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Failed,
    /// The ticket was superseded or cancelled; nothing changed.
    Stale,
}

#[derive(Debug, Clone)]
struct Stored<T> {
    value: T,
    stored_at: DateTime<Local>,
}

#[derive(Debug)]
pub struct ActionChannel<T> {
    kind: ActionKind,
    loading: bool,
    error: Option<String>,
    last: Option<Stored<T>>,
    generation: u64,
    in_flight: Option<CancellationToken>,
    started_at: Option<Instant>,
    stall_after: Option<Duration>,
}

impl<T> ActionChannel<T> {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            loading: false,
            error: None,
            last: None,
            generation: 0,
            in_flight: None,
            started_at: None,
            stall_after: None,
        }
    }

    /// A call in flight for longer than `after` counts as stalled: the next
    /// `begin` trips its token and takes over instead of being refused.
    pub fn with_stall_timeout(mut self, after: Duration) -> Self {
        self.stall_after = Some(after);
        self
    }

    /// True when a resubmission would replace the call in flight.
    pub fn is_stalled(&self) -> bool {
        match (self.stall_after, self.started_at) {
            (Some(after), Some(started_at)) => started_at.elapsed() >= after,
            _ => false,
        }
    }

    /// Restarts the stall clock; used by multi-step calls that are still
    /// making progress.
    pub(crate) fn record_progress(&mut self) {
        if self.loading {
            self.started_at = Some(Instant::now());
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_result(&self) -> Option<&T> {
        self.last.as_ref().map(|stored| &stored.value)
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last.as_ref().map(|stored| stored.stored_at)
    }

    /// Starts an invocation. Refused while one is already in flight, unless
    /// that call has stalled; then its token is tripped and its completion
    /// will be ignored.
    pub fn begin(&mut self) -> Result<ActionTicket, ActionRejected> {
        if self.loading {
            if !self.is_stalled() {
                debug!(action = self.kind.label(), "rejected duplicate submission");
                return Err(ActionRejected::InFlight(self.kind));
            }
            if let Some(token) = self.in_flight.take() {
                token.cancel();
            }
            warn!(
                action = self.kind.label(),
                generation = self.generation,
                "cancelled stalled request for a new submission"
            );
        }
        self.generation += 1;
        self.loading = true;
        self.error = None;
        let cancel = CancellationToken::new();
        self.in_flight = Some(cancel.clone());
        self.started_at = Some(Instant::now());
        debug!(action = self.kind.label(), generation = self.generation, "action started");
        Ok(ActionTicket {
            kind: self.kind,
            generation: self.generation,
            cancel,
        })
    }

    pub fn accepts(&self, ticket: &ActionTicket) -> bool {
        self.loading && ticket.kind == self.kind && ticket.generation == self.generation
    }

    /// Settles the in-flight invocation. A failure leaves the previous result
    /// in place next to the new error.
    pub fn complete(&mut self, ticket: &ActionTicket, outcome: Result<T, ApiFailure>) -> Completion {
        if !self.accepts(ticket) {
            debug!(
                action = self.kind.label(),
                generation = ticket.generation,
                "dropping stale completion"
            );
            return Completion::Stale;
        }
        self.loading = false;
        self.in_flight = None;
        self.started_at = None;
        match outcome {
            Ok(value) => {
                self.last = Some(Stored {
                    value,
                    stored_at: Local::now(),
                });
                info!(action = self.kind.label(), "action succeeded");
                Completion::Applied
            }
            Err(failure) => {
                warn!(action = self.kind.label(), "action failed: {failure}");
                self.error = Some(failure.user_message(self.kind));
                Completion::Failed
            }
        }
    }

    /// Aborts the in-flight invocation, if any.
    pub fn cancel(&mut self) -> bool {
        let Some(token) = self.in_flight.take() else {
            return false;
        };
        token.cancel();
        self.loading = false;
        self.started_at = None;
        self.error = Some(ApiFailure::Cancelled.user_message(self.kind));
        info!(action = self.kind.label(), "action cancelled");
        true
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}

/// A request future bound to the ticket of the invocation that created it.
pub struct PendingRequest<T> {
    ticket: ActionTicket,
    call: BoxFuture<'static, Result<T, ApiFailure>>,
}

/// What came back for a [`PendingRequest`].
#[derive(Debug)]
pub struct Finished<T> {
    pub ticket: ActionTicket,
    pub outcome: Result<T, ApiFailure>,
}

impl<T> PendingRequest<T> {
    pub fn new(ticket: ActionTicket, call: BoxFuture<'static, Result<T, ApiFailure>>) -> Self {
        Self { ticket, call }
    }

    pub fn ticket(&self) -> &ActionTicket {
        &self.ticket
    }

    /// Runs the call until it settles or the ticket is cancelled.
    pub async fn resolve(self) -> Finished<T> {
        let Self { ticket, call } = self;
        let cancel = ticket.cancel.clone();
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ApiFailure::Cancelled),
            result = call => result,
        };
        Finished { ticket, outcome }
    }

    /// Settles without running the call, e.g. when it could not be handed to
    /// an executor.
    pub fn abandon(self, failure: ApiFailure) -> Finished<T> {
        Finished {
            ticket: self.ticket,
            outcome: Err(failure),
        }
    }
}

#[cfg(test)]
#[path = "tests/action_tests.rs"]
mod tests;
