//! Worker thread owning the tokio runtime. Jobs run concurrently; their
//! events are forwarded to the UI queue in the order each job emits them.

use std::thread;

use client_core::JobEvent;
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn spawn_backend_thread(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("solver-backend")
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Execute(job) => {
                        tracing::debug!(action = job.kind().label(), "starting backend job");
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            job.run(|event| forward_job_event(&ui_tx, event)).await;
                        });
                    }
                    BackendCommand::Shutdown => {
                        tracing::info!("backend worker shutting down");
                        break;
                    }
                }
            }
        });
    })
}

/// Waits for room instead of dropping: a lost completion would leave its
/// action loading until restart. The wait runs off the async workers so a
/// slow UI does not starve the other jobs.
fn forward_job_event(ui_tx: &Sender<UiEvent>, event: JobEvent) {
    let action = event.kind().label();
    let sent = tokio::task::block_in_place(|| ui_tx.send(UiEvent::Job(event)));
    if sent.is_err() {
        tracing::warn!(action, "ui event queue closed; dropping job event");
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crossbeam_channel::bounded;

    use super::*;
    use crate::test_support::offline_dashboard;

    fn next_job_event(ui_rx: &Receiver<UiEvent>, deadline: Instant) -> JobEvent {
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            match ui_rx.recv_timeout(left).expect("job event before deadline") {
                UiEvent::Job(event) => return event,
                UiEvent::Info(_) => continue,
                UiEvent::Error(err) => panic!("unexpected worker error: {}", err.message()),
            }
        }
    }

    #[test]
    fn full_ui_queue_delays_events_without_losing_them() {
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(1);
        let mut dashboard = offline_dashboard();
        let worker = spawn_backend_thread(cmd_rx, ui_tx);

        for job in [dashboard.solve(), dashboard.benchmark(), dashboard.load_datasets()] {
            let job = job.expect("job starts");
            assert!(cmd_tx.send(BackendCommand::Execute(job)).is_ok());
        }
        std::thread::sleep(Duration::from_millis(200));

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut kinds: Vec<_> = (0..3)
            .map(|_| next_job_event(&ui_rx, deadline))
            .map(|event| {
                let kind = event.kind().label();
                dashboard.apply(event);
                kind
            })
            .collect();
        kinds.sort_unstable();

        assert_eq!(kinds, ["benchmark", "dataset list", "solve"]);
        assert!(!dashboard.is_busy());
        assert!(cmd_tx.send(BackendCommand::Shutdown).is_ok());
        assert!(worker.join().is_ok());
    }
}
