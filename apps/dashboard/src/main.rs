use std::{path::PathBuf, sync::Arc};

mod backend_bridge;
mod controller;
#[cfg(test)]
mod test_support;
mod ui;

use anyhow::{anyhow, Context};
use clap::Parser;
use client_core::{
    config::{load_settings_from, DEFAULT_SETTINGS_FILE},
    Dashboard, HttpSolverClient, SettingsOverrides, SolverApi,
};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::{commands::BackendCommand, runtime::spawn_backend_thread};
use crate::controller::events::UiEvent;
use crate::ui::DashboardApp;

#[derive(Parser, Debug)]
#[command(about = "Desktop dashboard for the tourist route planning service")]
struct Args {
    /// Solver API base url, e.g. http://localhost:8000/api
    #[arg(long)]
    api_url: Option<String>,
    /// Settings file read before environment overrides.
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(long)]
    experiment_runs: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let mut settings = load_settings_from(&args.config, |key| std::env::var(key).ok())
        .with_context(|| format!("loading settings from {}", args.config.display()))?;
    settings.apply_overrides(SettingsOverrides {
        api_base_url: args.api_url,
        request_timeout_secs: args.timeout_secs,
        experiment_runs: args.experiment_runs,
    })?;
    tracing::info!(api = %settings.api_base_url, "starting dashboard");

    let api: Arc<dyn SolverApi> = Arc::new(HttpSolverClient::new(
        settings.api_base_url.clone(),
        settings.request_timeout,
    )?);
    let dashboard = Dashboard::new(api, &settings);

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    spawn_backend_thread(cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Tourist Route Planner")
            .with_inner_size([1360.0, 860.0])
            .with_min_inner_size([1024.0, 680.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Tourist Route Planner",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(dashboard, cmd_tx, ui_rx)))),
    )
    .map_err(|err| anyhow!("dashboard window failed: {err}"))
}
