use std::time::Duration;

use client_core::{
    config::EXPERIMENT_RUN_CHOICES,
    presenter::{self, DayView, ItineraryView},
    ActionChannel, ActionKind, ActionRejected, CaptureTarget, Completion, Dashboard, Job,
    ParamsPatch, ResultView,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{Algorithm, LatLng};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::{dispatch_job, request_shutdown};
use crate::ui::{
    charts::{self, Bar},
    map::{self, MapLayers, MapViewport},
    rgb,
};

const SA_COLOR: egui::Color32 = egui::Color32::from_rgb(0x8B, 0x5C, 0xF6);
const GREEDY_COLOR: egui::Color32 = egui::Color32::from_rgb(0x3B, 0x82, 0xF6);
const IMPROVED: egui::Color32 = egui::Color32::from_rgb(0x10, 0xB9, 0x81);
const REGRESSED: egui::Color32 = egui::Color32::from_rgb(0xEF, 0x44, 0x44);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusBannerSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone)]
struct StatusBanner {
    severity: StatusBannerSeverity,
    message: String,
}

#[derive(Default)]
struct RowClicks {
    start: bool,
    cancel: bool,
    dismiss: bool,
}

pub struct DashboardApp {
    dashboard: Dashboard,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    map: MapViewport,
    map_aspect: f64,
    status: String,
    status_banner: Option<StatusBanner>,
}

impl DashboardApp {
    pub fn new(dashboard: Dashboard, cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        let map = MapViewport::around(dashboard.params().get().start);
        let mut app = Self {
            dashboard,
            cmd_tx,
            ui_rx,
            map,
            map_aspect: 1.6,
            status: "Starting...".to_string(),
            status_banner: None,
        };
        app.submit(Dashboard::load_datasets);
        app
    }

    fn submit(&mut self, action: impl FnOnce(&mut Dashboard) -> Result<Job, ActionRejected>) {
        let submitted = action(&mut self.dashboard);
        let refused = dispatch_job(&self.cmd_tx, &mut self.dashboard, submitted, &mut self.status);
        if let Some(err) = refused {
            self.show_error(err);
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Error(err) => self.show_error(err),
                UiEvent::Job(event) => {
                    let kind = event.kind();
                    let completion = self.dashboard.apply(event);
                    self.after_completion(kind, completion);
                }
            }
        }
    }

    fn show_error(&mut self, err: UiError) {
        tracing::warn!(context = ?err.context(), "{}", err.message());
        self.status = err.status_line();
        if err.is_fatal() || err.context() == UiErrorContext::Dispatch {
            self.status_banner = Some(StatusBanner {
                severity: StatusBannerSeverity::Error,
                message: self.status.clone(),
            });
        }
    }

    fn after_completion(&mut self, kind: ActionKind, completion: Completion) {
        match completion {
            Completion::Applied if kind == ActionKind::Experiment => {
                let runner = self.dashboard.experiments();
                self.status = if runner.is_loading() {
                    runner.progress_label()
                } else {
                    let (completed, total) = runner.progress();
                    format!("Experiments finished ({completed}/{total})")
                };
            }
            Completion::Applied => {
                if kind == ActionKind::Solve {
                    self.fit_map_to_itinerary();
                }
                self.status = format!("{kind} updated");
            }
            Completion::Failed => {
                self.status = format!("{kind} failed");
            }
            Completion::Stale => {}
        }
    }

    fn fit_map_to_itinerary(&mut self) {
        let params = self.dashboard.params().get();
        let mut points = vec![params.start, params.effective_end()];
        if let Some(itinerary) = self.dashboard.itinerary() {
            points.extend(
                itinerary
                    .days
                    .iter()
                    .flat_map(|plan| plan.visits.iter().filter_map(|visit| visit.location())),
            );
        }
        self.map.fit(points, self.map_aspect);
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let connection = self.dashboard.connection_banner().map(|message| StatusBanner {
            severity: StatusBannerSeverity::Warning,
            message: message.to_string(),
        });
        for (is_connection, banner) in [(true, connection), (false, self.status_banner.clone())] {
            let Some(banner) = banner else {
                continue;
            };
            let (fill, stroke) = match banner.severity {
                StatusBannerSeverity::Error => (
                    egui::Color32::from_rgb(111, 53, 53),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
                ),
                StatusBannerSeverity::Warning => (
                    egui::Color32::from_rgb(110, 84, 32),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(190, 150, 70)),
                ),
            };

            let (mut dismissed, mut retry) = (false, false);
            egui::Frame::NONE
                .fill(fill)
                .stroke(stroke)
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            dismissed = ui.button("Dismiss").clicked();
                            if is_connection {
                                retry = ui.button("Retry").clicked();
                            }
                        });
                    });
                });
            if retry {
                self.submit(Dashboard::load_datasets);
            }
            if dismissed {
                if is_connection {
                    self.dashboard.dismiss_banner();
                } else {
                    self.status_banner = None;
                }
            }
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("dashboard_header").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.heading("Tourist Route Planner");
                ui.label(egui::RichText::new(self.dashboard.api_label()).weak().monospace());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.dashboard.is_busy() {
                        ui.spinner();
                    }
                    ui.small(egui::RichText::new(&self.status).weak());
                });
            });
            self.show_status_banner(ui);
            ui.add_space(4.0);
        });
    }

    fn show_control_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("control_panel")
            .resizable(true)
            .default_width(330.0)
            .min_width(280.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.show_dataset_section(ui);
                    ui.separator();
                    self.show_trip_parameters(ui);
                    ui.separator();
                    self.show_locations(ui);
                    ui.separator();
                    self.show_actions(ui);
                });
            });
    }

    fn show_dataset_section(&mut self, ui: &mut egui::Ui) {
        section_title(ui, "Dataset");
        let datasets = self.dashboard.datasets().to_vec();
        let selected = self.dashboard.params().dataset().to_string();
        let mut chosen = selected.clone();
        let selected_text = datasets
            .iter()
            .find(|info| info.name == selected)
            .map(|info| info.label())
            .unwrap_or_else(|| selected.clone());

        ui.horizontal(|ui| {
            egui::ComboBox::from_id_salt("dataset_select")
                .selected_text(selected_text)
                .width(200.0)
                .show_ui(ui, |ui| {
                    for info in &datasets {
                        ui.selectable_value(&mut chosen, info.name.clone(), info.label());
                    }
                });
        });
        if chosen != selected {
            self.dashboard.select_dataset(chosen);
        }
        if datasets.is_empty() {
            ui.small("No datasets loaded yet.");
        }
        let clicks = action_row(ui, "Reload datasets", self.dashboard.orchestrator().datasets());
        self.handle_row(ActionKind::Datasets, clicks, Dashboard::load_datasets);

        ui.add_space(6.0);
        section_title(ui, "Algorithm");
        let current = self.dashboard.params().algorithm();
        let mut algorithm = current;
        egui::ComboBox::from_id_salt("algorithm_select")
            .selected_text(algorithm.label())
            .width(200.0)
            .show_ui(ui, |ui| {
                for option in Algorithm::ALL {
                    ui.selectable_value(&mut algorithm, option, option.label());
                }
            });
        if algorithm != current {
            self.dashboard.select_algorithm(algorithm);
        }
    }

    fn show_trip_parameters(&mut self, ui: &mut egui::Ui) {
        section_title(ui, "Trip");
        let params = self.dashboard.params().get().clone();
        let mut patch = ParamsPatch::default();

        let mut num_days = params.num_days;
        if ui
            .add(egui::Slider::new(&mut num_days, 1..=7).text("days"))
            .changed()
        {
            patch.num_days = Some(num_days);
        }

        let mut daily = params.daily_time_budget;
        if ui
            .add(
                egui::Slider::new(&mut daily, 120..=720)
                    .step_by(30.0)
                    .text("minutes per day"),
            )
            .changed()
        {
            patch.daily_time_budget = Some(daily);
        }
        ui.small(presenter::format_daily_budget(daily));

        let mut start_time = params.start_time;
        if ui
            .add(
                egui::Slider::new(&mut start_time, 0..=1425)
                    .step_by(15.0)
                    .custom_formatter(|minutes, _| presenter::format_clock(minutes as u32))
                    .text("day starts"),
            )
            .changed()
        {
            patch.start_time = Some(start_time);
        }

        let mut budget = params.total_budget;
        ui.horizontal(|ui| {
            ui.label("Total budget");
            if ui
                .add(
                    egui::DragValue::new(&mut budget)
                        .range(0.0..=100_000.0)
                        .speed(5.0)
                        .prefix("$"),
                )
                .changed()
            {
                patch.total_budget = Some(budget);
            }
        });

        self.dashboard.set_params(patch);
    }

    fn show_locations(&mut self, ui: &mut egui::Ui) {
        section_title(ui, "Locations");
        let params = self.dashboard.params().get();
        let (start, end) = (params.start, params.end);
        let armed = self.dashboard.capture().armed_target();
        let (mut pick_start, mut pick_end, mut clear_end, mut cancel_pick) =
            (false, false, false, false);

        egui::Grid::new("locations_grid")
            .num_columns(3)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                ui.label(egui::RichText::new("Start").color(map::START_MARKER));
                ui.monospace(start.to_string());
                pick_start = ui
                    .add(egui::Button::new("Pick on map").selected(armed == Some(CaptureTarget::Start)))
                    .clicked();
                ui.end_row();

                ui.label(egui::RichText::new("End").color(map::END_MARKER));
                match end {
                    Some(end) => ui.monospace(end.to_string()),
                    None => ui.weak("Same as start"),
                };
                ui.horizontal(|ui| {
                    pick_end = ui
                        .add(egui::Button::new("Pick on map").selected(armed == Some(CaptureTarget::End)))
                        .clicked();
                    clear_end = ui.add_enabled(end.is_some(), egui::Button::new("Clear")).clicked();
                });
                ui.end_row();
            });

        if let Some(hint) = self.dashboard.capture().hint() {
            ui.horizontal(|ui| {
                ui.colored_label(map::START_MARKER, hint);
                cancel_pick = ui.small_button("Cancel").clicked();
            });
        }

        if pick_start {
            self.dashboard.arm_start_capture();
        }
        if pick_end {
            self.dashboard.arm_end_capture();
        }
        if clear_end {
            self.dashboard.set_params(ParamsPatch::clear_end());
        }
        if cancel_pick {
            self.dashboard.cancel_capture();
        }
    }

    fn show_actions(&mut self, ui: &mut egui::Ui) {
        section_title(ui, "Run");
        let clicks = action_row(ui, "Solve Itinerary", self.dashboard.orchestrator().solve());
        self.handle_row(ActionKind::Solve, clicks, Dashboard::solve);

        let clicks = action_row(ui, "Run Benchmark", self.dashboard.orchestrator().benchmark());
        self.handle_row(ActionKind::Benchmark, clicks, Dashboard::benchmark);

        ui.add_space(6.0);
        section_title(ui, "Experiments");
        let runner = self.dashboard.experiments();
        let running = runner.is_loading();
        let mut n_runs = runner.n_runs();
        let label = runner.progress_label();
        let error = runner.error().map(str::to_string);
        let mut clicks = RowClicks::default();

        ui.add_enabled_ui(!running, |ui| {
            egui::ComboBox::from_id_salt("experiment_runs")
                .selected_text(format!("{n_runs} runs per algorithm"))
                .show_ui(ui, |ui| {
                    for choice in EXPERIMENT_RUN_CHOICES {
                        ui.selectable_value(&mut n_runs, choice, format!("{choice} runs"));
                    }
                });
        });
        ui.horizontal(|ui| {
            let startable = !running || runner.is_stalled();
            clicks.start = ui.add_enabled(startable, egui::Button::new(label)).clicked();
            if running {
                ui.spinner();
                clicks.cancel = ui.small_button("Cancel").clicked();
            }
        });
        if let Some(error) = error {
            clicks.dismiss = error_line(ui, &error);
        }

        if n_runs != self.dashboard.experiments().n_runs() {
            self.dashboard.set_experiment_runs(n_runs);
        }
        self.handle_row(ActionKind::Experiment, clicks, Dashboard::run_experiments);
    }

    fn handle_row(
        &mut self,
        kind: ActionKind,
        clicks: RowClicks,
        action: impl FnOnce(&mut Dashboard) -> Result<Job, ActionRejected>,
    ) {
        if clicks.start {
            self.submit(action);
        }
        if clicks.cancel && self.dashboard.cancel(kind) {
            self.status = format!("{kind} cancelled");
        }
        if clicks.dismiss {
            self.dashboard.dismiss_error(kind);
        }
    }

    fn show_workspace(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let map_height = (ui.available_height() * 0.45).max(220.0);
            self.show_map(ui, map_height);
            ui.add_space(6.0);

            let mut view = self.dashboard.view();
            ui.horizontal(|ui| {
                for option in ResultView::ALL {
                    ui.selectable_value(&mut view, option, option.label());
                }
            });
            if view != self.dashboard.view() {
                self.dashboard.select_view(view);
            }
            ui.separator();

            egui::ScrollArea::vertical()
                .id_salt("result_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| match view {
                    ResultView::Itinerary => self.show_itinerary(ui),
                    ResultView::Benchmark => self.show_benchmark(ui),
                    ResultView::Experiment => self.show_experiments(ui),
                });
        });
    }

    fn show_map(&mut self, ui: &mut egui::Ui, height: f32) {
        let routes = self
            .dashboard
            .itinerary()
            .map(presenter::day_routes)
            .unwrap_or_default();
        let params = self.dashboard.params().get();
        let layers = MapLayers {
            start: params.start,
            end: params.end,
            routes: &routes,
            hint: self.dashboard.capture().hint(),
        };
        let size = egui::vec2(ui.available_width(), height);
        self.map_aspect = f64::from(size.x / size.y.max(1.0));

        if let Some(point) = map::show_map(ui, &mut self.map, size, &layers) {
            self.place_point(point);
        }
    }

    fn place_point(&mut self, point: LatLng) {
        if let Some(target) = self.dashboard.map_click(point) {
            let which = match target {
                CaptureTarget::Start => "Start",
                CaptureTarget::End => "End",
            };
            self.status = format!("{which} set to {point}");
        }
    }

    fn show_itinerary(&mut self, ui: &mut egui::Ui) {
        let mut toggled = None;
        match self.dashboard.itinerary_view() {
            None => {
                let solving = self.dashboard.orchestrator().solve().is_loading();
                placeholder(
                    ui,
                    if solving {
                        "Solving..."
                    } else {
                        "Set up the trip and press Solve Itinerary."
                    },
                );
            }
            Some(view) => {
                show_summary(ui, &view);
                updated_at(ui, self.dashboard.orchestrator().solve());
                ui.add_space(8.0);
                for day in &view.days {
                    if day_header(ui, day) {
                        toggled = Some(day.day);
                    }
                    if day.expanded {
                        show_visits(ui, day);
                    }
                    ui.add_space(4.0);
                }
                if let Some(points) = view.convergence {
                    ui.add_space(8.0);
                    charts::convergence_chart(ui, points, SA_COLOR);
                }
            }
        }
        if let Some(day) = toggled {
            self.dashboard.toggle_day(day);
        }
    }

    fn show_benchmark(&mut self, ui: &mut egui::Ui) {
        let channel = self.dashboard.orchestrator().benchmark();
        let Some(result) = channel.last_result() else {
            placeholder(
                ui,
                if channel.is_loading() {
                    "Running both algorithms..."
                } else {
                    "Run a benchmark to compare greedy and simulated annealing on the same trip."
                },
            );
            return;
        };
        let view = presenter::benchmark_view(result);

        egui::Grid::new("benchmark_grid")
            .striped(true)
            .num_columns(5)
            .show(ui, |ui| {
                for heading in ["Algorithm", "Satisfaction", "Time (ms)", "Attractions", "Cost"] {
                    ui.strong(heading);
                }
                ui.end_row();
                for row in &view.rows {
                    ui.label(row.algorithm.label());
                    ui.monospace(format!("{:.2}", row.total_satisfaction));
                    ui.monospace(row.computation_ms.to_string());
                    ui.monospace(row.total_attractions.to_string());
                    ui.monospace(format!("${:.2}", row.total_cost));
                    ui.end_row();
                }
            });
        match view.improvement_pct {
            Some(pct) => {
                ui.colored_label(
                    if pct > 0.0 { IMPROVED } else { REGRESSED },
                    format!("SA vs greedy: {pct:+.1}% satisfaction"),
                );
            }
            None => {
                ui.weak("Greedy scored zero; no relative improvement.");
            }
        }
        updated_at(ui, channel);
        ui.add_space(8.0);

        let bar = |algorithm: Algorithm, value: f64| Bar {
            label: algorithm.short_label(),
            value,
            color: match algorithm {
                Algorithm::Greedy => GREEDY_COLOR,
                Algorithm::SimulatedAnnealing => SA_COLOR,
            },
        };
        let satisfaction: Vec<Bar<'_>> = view
            .rows
            .iter()
            .map(|row| bar(row.algorithm, row.total_satisfaction))
            .collect();
        charts::comparison_bars(ui, "Satisfaction", &satisfaction, |v| format!("{v:.2}"));
        let timing: Vec<Bar<'_>> = view
            .rows
            .iter()
            .map(|row| bar(row.algorithm, row.computation_ms as f64))
            .collect();
        charts::comparison_bars(ui, "Computation time", &timing, |v| format!("{v:.0} ms"));

        let trace = result.simulated_annealing.convergence();
        if !trace.is_empty() {
            ui.add_space(8.0);
            charts::convergence_chart(ui, trace, SA_COLOR);
        }
    }

    fn show_experiments(&mut self, ui: &mut egui::Ui) {
        let runner = self.dashboard.experiments();
        if runner.is_loading() {
            let (completed, total) = runner.progress();
            let fraction = if total == 0 { 0.0 } else { completed as f32 / total as f32 };
            ui.add(egui::ProgressBar::new(fraction).text(runner.progress_label()));
        }
        if let Some(error) = runner.error() {
            ui.colored_label(REGRESSED, error);
        }
        if runner.results().is_empty() {
            if !runner.is_loading() {
                placeholder(
                    ui,
                    "Run All Experiments to compare both algorithms across every dataset.",
                );
            }
            return;
        }

        egui::Grid::new("experiment_grid")
            .striped(true)
            .num_columns(6)
            .show(ui, |ui| {
                for heading in ["Dataset", "Size", "Greedy", "SA", "Mean ms (G / SA)", "SA gain"] {
                    ui.strong(heading);
                }
                ui.end_row();
                for row in presenter::experiment_rows(runner.results()) {
                    ui.label(row.dataset);
                    ui.monospace(row.size.to_string());
                    ui.monospace(&row.greedy.satisfaction);
                    ui.monospace(&row.sa.satisfaction);
                    ui.monospace(format!("{} / {}", row.greedy.mean_ms, row.sa.mean_ms));
                    ui.colored_label(
                        if row.improved { IMPROVED } else { REGRESSED },
                        &row.improvement,
                    );
                    ui.end_row();
                }
            });
        if let Some(summary) = presenter::valid_runs_summary(runner.results(), runner.n_runs()) {
            ui.small(summary);
        }
    }
}

fn section_title(ui: &mut egui::Ui, title: &str) {
    ui.label(egui::RichText::new(title).strong().size(15.0));
}

fn placeholder(ui: &mut egui::Ui, text: &str) {
    ui.add_space(24.0);
    ui.vertical_centered(|ui| {
        ui.weak(text);
    });
}

fn updated_at<T>(ui: &mut egui::Ui, channel: &ActionChannel<T>) {
    if let Some(at) = channel.last_updated() {
        ui.small(egui::RichText::new(format!("Updated {}", at.format("%H:%M:%S"))).weak());
    }
}

/// Returns true when the dismiss button was clicked.
fn error_line(ui: &mut egui::Ui, error: &str) -> bool {
    let mut dismissed = false;
    ui.horizontal_wrapped(|ui| {
        ui.colored_label(REGRESSED, error);
        dismissed = ui.small_button("✕").clicked();
    });
    dismissed
}

fn action_row<T>(ui: &mut egui::Ui, label: &str, channel: &ActionChannel<T>) -> RowClicks {
    let mut clicks = RowClicks::default();
    ui.horizontal(|ui| {
        clicks.start = ui
            .add_enabled(
                !channel.is_loading() || channel.is_stalled(),
                egui::Button::new(label).min_size(egui::vec2(150.0, 24.0)),
            )
            .clicked();
        if channel.is_loading() {
            ui.spinner();
            clicks.cancel = ui.small_button("Cancel").clicked();
        }
    });
    if let Some(error) = channel.error() {
        clicks.dismiss = error_line(ui, error);
    }
    clicks
}

fn show_summary(ui: &mut egui::Ui, view: &ItineraryView<'_>) {
    let summary = &view.summary;
    ui.horizontal_wrapped(|ui| {
        stat_card(ui, "Satisfaction", format!("{:.2}", summary.total_satisfaction));
        stat_card(ui, "Attractions", summary.total_attractions.to_string());
        stat_card(ui, "Total cost", format!("${:.2}", summary.total_cost));
        stat_card(ui, "Computed in", format!("{} ms", summary.computation_ms));
        egui::Frame::NONE
            .fill(SA_COLOR.gamma_multiply(0.35))
            .corner_radius(10.0)
            .inner_margin(egui::Margin::symmetric(8, 4))
            .show(ui, |ui| {
                ui.label(egui::RichText::new(summary.algorithm_badge).strong());
            });
    });
}

fn stat_card(ui: &mut egui::Ui, label: &str, value: String) {
    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::symmetric(10, 6))
        .show(ui, |ui| {
            ui.vertical(|ui| {
                ui.small(egui::RichText::new(label).weak());
                ui.label(egui::RichText::new(value).strong().size(16.0));
            });
        });
}

/// Returns true when the header was clicked.
fn day_header(ui: &mut egui::Ui, day: &DayView<'_>) -> bool {
    let color = rgb(day.color);
    let (rect, response) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), 30.0),
        egui::Sense::click(),
    );
    let fill = if response.hovered() {
        color.gamma_multiply(0.45)
    } else {
        color.gamma_multiply(0.3)
    };
    ui.painter().rect_filled(rect, egui::CornerRadius::same(6), fill);
    ui.painter().rect_filled(
        egui::Rect::from_min_size(rect.min, egui::vec2(5.0, rect.height())),
        egui::CornerRadius::same(2),
        color,
    );
    let arrow = if day.expanded { "▼" } else { "▶" };
    ui.painter().text(
        rect.left_center() + egui::vec2(14.0, 0.0),
        egui::Align2::LEFT_CENTER,
        format!(
            "{arrow}  Day {}  ·  {} stops  ·  ${:.2}  ·  {} min travel  ·  ★ {:.2}",
            day.day, day.stop_count, day.total_cost, day.total_travel_time, day.total_satisfaction
        ),
        egui::TextStyle::Button.resolve(ui.style()),
        ui.visuals().strong_text_color(),
    );
    response.clicked()
}

fn show_visits(ui: &mut egui::Ui, day: &DayView<'_>) {
    if day.visits.is_empty() {
        ui.weak("No attractions scheduled.");
        return;
    }
    egui::Grid::new(("visits", day.day))
        .striped(true)
        .num_columns(6)
        .spacing([12.0, 4.0])
        .show(ui, |ui| {
            for visit in &day.visits {
                ui.monospace(format!("{}.", visit.ordinal));
                ui.label(format!("{} {}", visit.glyph, visit.name));
                ui.weak(visit.category);
                ui.monospace(format!("{} – {}", visit.arrival, visit.departure));
                ui.monospace(if visit.fee > 0.0 {
                    format!("${:.2}", visit.fee)
                } else {
                    "free".to_string()
                });
                ui.add(
                    egui::ProgressBar::new(visit.preference_fraction())
                        .desired_width(80.0)
                        .text(format!("{:.2}", visit.preference)),
                );
                ui.end_row();
            }
        });
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_header(ctx);
        self.show_control_panel(ctx);
        self.show_workspace(ctx);

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.dashboard.cancel_capture();
        }

        if self.dashboard.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(50));
        } else {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}

impl Drop for DashboardApp {
    fn drop(&mut self) {
        request_shutdown(&self.cmd_tx);
    }
}
