use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use client_core::{
    config::{load_settings_from, DEFAULT_SETTINGS_FILE},
    presenter, ActionKind, ActionRejected, Dashboard, EndpointPatch, HttpSolverClient, Job,
    ParamsPatch, SettingsOverrides, SolverApi,
};
use shared::domain::{Algorithm, LatLng};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Command-line front end for the tourist route planning service")]
struct Args {
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Print raw results as JSON instead of tables.
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the datasets the solver offers.
    Datasets,
    /// Plan an itinerary.
    Solve {
        #[command(flatten)]
        trip: TripArgs,
        #[arg(long, value_parser = parse_algorithm)]
        algorithm: Option<Algorithm>,
    },
    /// Run both algorithms on one trip.
    Benchmark {
        #[command(flatten)]
        trip: TripArgs,
    },
    /// Compare both algorithms over every dataset.
    Experiment {
        #[command(flatten)]
        trip: TripArgs,
        #[arg(long)]
        runs: Option<u32>,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Datasets => "datasets",
            Self::Solve { .. } => "solve",
            Self::Benchmark { .. } => "benchmark",
            Self::Experiment { .. } => "experiment",
        }
    }
}

#[derive(ClapArgs, Debug)]
struct TripArgs {
    #[arg(long)]
    dataset: Option<String>,
    #[arg(long)]
    days: Option<u32>,
    /// Minutes available per day.
    #[arg(long)]
    daily_minutes: Option<u32>,
    #[arg(long)]
    budget: Option<f64>,
    /// Day start as HH:MM.
    #[arg(long, value_parser = parse_clock)]
    start_time: Option<u32>,
    /// Start point as `lat,lng`.
    #[arg(long, value_parser = parse_lat_lng)]
    start: Option<LatLng>,
    /// End point as `lat,lng`; defaults to the start point.
    #[arg(long, value_parser = parse_lat_lng)]
    end: Option<LatLng>,
}

impl TripArgs {
    fn apply(self, dashboard: &mut Dashboard) {
        if let Some(dataset) = self.dataset {
            dashboard.select_dataset(dataset);
        }
        dashboard.set_params(ParamsPatch {
            num_days: self.days,
            daily_time_budget: self.daily_minutes,
            total_budget: self.budget,
            start_time: self.start_time,
            start: self.start,
            end: self.end.map(EndpointPatch::Set),
        });
    }
}

fn parse_algorithm(raw: &str) -> Result<Algorithm, String> {
    Algorithm::from_wire(raw).ok_or_else(|| {
        format!("unknown algorithm `{raw}`; expected `greedy` or `simulated_annealing`")
    })
}

fn parse_clock(raw: &str) -> Result<u32, String> {
    let (hours, minutes) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected HH:MM, got `{raw}`"))?;
    let hours: u32 = hours.trim().parse().map_err(|_| format!("bad hour in `{raw}`"))?;
    let minutes: u32 = minutes
        .trim()
        .parse()
        .map_err(|_| format!("bad minute in `{raw}`"))?;
    if hours > 23 || minutes > 59 {
        return Err(format!("`{raw}` is not a time of day"));
    }
    Ok(hours * 60 + minutes)
}

fn parse_lat_lng(raw: &str) -> Result<LatLng, String> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected lat,lng, got `{raw}`"))?;
    let lat: f64 = lat.trim().parse().map_err(|_| format!("bad latitude in `{raw}`"))?;
    let lng: f64 = lng.trim().parse().map_err(|_| format!("bad longitude in `{raw}`"))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(format!("`{raw}` is outside valid coordinates"));
    }
    Ok(LatLng::new(lat, lng))
}

/// Runs one job and turns a channel error into a failed command.
async fn execute(
    dashboard: &mut Dashboard,
    submitted: Result<Job, ActionRejected>,
) -> Result<()> {
    let job = submitted?;
    let kind = job.kind();
    info!(action = kind.label(), "running request");
    dashboard.run_job(job).await;

    let error = match kind {
        ActionKind::Experiment => dashboard.experiments().error(),
        ActionKind::Datasets => dashboard.orchestrator().datasets().error(),
        ActionKind::Solve => dashboard.orchestrator().solve().error(),
        ActionKind::Benchmark => dashboard.orchestrator().benchmark().error(),
    };
    match error {
        Some(message) => {
            warn!(action = kind.label(), "request failed: {message}");
            bail!("{message}")
        }
        None => {
            info!(action = kind.label(), "request finished");
            Ok(())
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_datasets(dashboard: &Dashboard) {
    let selected = dashboard.params().dataset();
    for info in dashboard.datasets() {
        let marker = if info.name == selected { "*" } else { " " };
        println!("{marker} {}", info.label());
    }
}

fn print_itinerary(dashboard: &Dashboard) -> Result<()> {
    let view = dashboard
        .itinerary_view()
        .ok_or_else(|| anyhow!("solver returned no itinerary"))?;
    let summary = &view.summary;
    println!(
        "{}  satisfaction {:.2}  attractions {}  cost ${:.2}  ({} ms)",
        summary.algorithm_badge,
        summary.total_satisfaction,
        summary.total_attractions,
        summary.total_cost,
        summary.computation_ms
    );
    for day in &view.days {
        println!(
            "\nDay {}: {} stops, ${:.2}, {} min travel, satisfaction {:.2}",
            day.day, day.stop_count, day.total_cost, day.total_travel_time, day.total_satisfaction
        );
        for visit in &day.visits {
            println!(
                "  {:>2}. {} {:<32} {}-{}  ${:<7.2} pref {:.2}  [{}]",
                visit.ordinal,
                visit.glyph,
                visit.name,
                visit.arrival,
                visit.departure,
                visit.fee,
                visit.preference,
                visit.category
            );
        }
    }
    if let Some(points) = view.convergence {
        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            println!(
                "\nConverged from {:.2} to {:.2} over {} iterations",
                first.satisfaction, last.satisfaction, last.iteration
            );
        }
    }
    Ok(())
}

fn print_benchmark(dashboard: &Dashboard) -> Result<()> {
    let result = dashboard
        .orchestrator()
        .benchmark()
        .last_result()
        .ok_or_else(|| anyhow!("solver returned no benchmark"))?;
    let view = presenter::benchmark_view(result);
    println!(
        "{:<22} {:>12} {:>10} {:>12} {:>10}",
        "algorithm", "satisfaction", "time ms", "attractions", "cost"
    );
    for row in &view.rows {
        println!(
            "{:<22} {:>12.2} {:>10} {:>12} {:>10.2}",
            row.algorithm.label(),
            row.total_satisfaction,
            row.computation_ms,
            row.total_attractions,
            row.total_cost
        );
    }
    match view.improvement_pct {
        Some(pct) => println!("SA vs greedy: {pct:+.1}%"),
        None => println!("SA vs greedy: n/a (greedy scored zero)"),
    }
    Ok(())
}

fn print_experiments(dashboard: &Dashboard) {
    let runner = dashboard.experiments();
    println!(
        "{:<16} {:>6} {:>16} {:>16} {:>10} {:>10} {:>9}",
        "dataset", "size", "greedy", "sa", "greedy ms", "sa ms", "sa gain"
    );
    for row in presenter::experiment_rows(runner.results()) {
        println!(
            "{:<16} {:>6} {:>16} {:>16} {:>10} {:>10} {:>9}",
            row.dataset,
            row.size,
            row.greedy.satisfaction,
            row.sa.satisfaction,
            row.greedy.mean_ms,
            row.sa.mean_ms,
            row.improvement
        );
    }
    if let Some(summary) = presenter::valid_runs_summary(runner.results(), runner.n_runs()) {
        println!("{summary}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings_from(&args.config, |key| std::env::var(key).ok())
        .with_context(|| format!("loading settings from {}", args.config.display()))?;
    let experiment_runs = match &args.command {
        Command::Experiment { runs, .. } => *runs,
        _ => None,
    };
    settings.apply_overrides(SettingsOverrides {
        api_base_url: args.api_url,
        request_timeout_secs: args.timeout_secs,
        experiment_runs,
    })?;

    let api: Arc<dyn SolverApi> = Arc::new(HttpSolverClient::new(
        settings.api_base_url.clone(),
        settings.request_timeout,
    )?);
    let mut dashboard = Dashboard::new(api, &settings);
    let command = args.command.name();
    info!(command, api = %settings.api_base_url, "starting command");

    let submitted = dashboard.load_datasets();
    execute(&mut dashboard, submitted).await?;

    match args.command {
        Command::Datasets => {
            if args.json {
                print_json(&dashboard.datasets())?;
            } else {
                print_datasets(&dashboard);
            }
        }
        Command::Solve { trip, algorithm } => {
            trip.apply(&mut dashboard);
            if let Some(algorithm) = algorithm {
                dashboard.select_algorithm(algorithm);
            }
            let submitted = dashboard.solve();
            execute(&mut dashboard, submitted).await?;
            match (args.json, dashboard.itinerary()) {
                (true, Some(itinerary)) => print_json(itinerary)?,
                _ => print_itinerary(&dashboard)?,
            }
        }
        Command::Benchmark { trip } => {
            trip.apply(&mut dashboard);
            let submitted = dashboard.benchmark();
            execute(&mut dashboard, submitted).await?;
            match (args.json, dashboard.orchestrator().benchmark().last_result()) {
                (true, Some(result)) => print_json(result)?,
                _ => print_benchmark(&dashboard)?,
            }
        }
        Command::Experiment { trip, .. } => {
            trip.apply(&mut dashboard);
            let submitted = dashboard.run_experiments();
            let outcome = execute(&mut dashboard, submitted).await;
            if args.json {
                print_json(&dashboard.experiments().results())?;
            } else {
                print_experiments(&dashboard);
            }
            outcome?;
        }
    }
    info!(command, "command finished");
    Ok(())
}
