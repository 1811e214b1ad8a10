//! UI layer: app shell, map canvas, and result charts.

pub mod app;
pub mod charts;
pub mod map;

pub use app::DashboardApp;

use eframe::egui;

pub(crate) fn rgb([r, g, b]: [u8; 3]) -> egui::Color32 {
    egui::Color32::from_rgb(r, g, b)
}
