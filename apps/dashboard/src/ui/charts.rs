//! Small painter-drawn charts for result views.

use eframe::egui;
use shared::protocol::ConvergencePoint;

const AXIS: egui::Color32 = egui::Color32::from_rgb(0x64, 0x74, 0x8B);

/// Maps `(x, y)` samples into `rect`, y growing upwards. A flat or single
/// sample range is centred instead of divided by zero.
fn scale_points(samples: &[(f64, f64)], rect: egui::Rect) -> Vec<egui::Pos2> {
    let bounds = |pick: fn(&(f64, f64)) -> f64| {
        samples
            .iter()
            .map(pick)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
    };
    let (x_min, x_max) = bounds(|s| s.0);
    let (y_min, y_max) = bounds(|s| s.1);
    let norm = |v: f64, lo: f64, hi: f64| {
        if hi > lo {
            ((v - lo) / (hi - lo)) as f32
        } else {
            0.5
        }
    };
    samples
        .iter()
        .map(|&(x, y)| {
            egui::pos2(
                rect.left() + norm(x, x_min, x_max) * rect.width(),
                rect.bottom() - norm(y, y_min, y_max) * rect.height(),
            )
        })
        .collect()
}

/// Satisfaction against iteration for a simulated annealing run.
pub fn convergence_chart(ui: &mut egui::Ui, points: &[ConvergencePoint], color: egui::Color32) {
    ui.label(egui::RichText::new("Convergence").strong());
    let size = egui::vec2(ui.available_width().min(640.0), 160.0);
    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
    let painter = ui.painter_at(rect);
    let plot = rect.shrink2(egui::vec2(36.0, 14.0));

    painter.line_segment(
        [plot.left_bottom(), plot.right_bottom()],
        egui::Stroke::new(1.0, AXIS),
    );
    painter.line_segment(
        [plot.left_bottom(), plot.left_top()],
        egui::Stroke::new(1.0, AXIS),
    );

    let samples: Vec<(f64, f64)> = points
        .iter()
        .map(|point| (f64::from(point.iteration), point.satisfaction))
        .collect();
    if samples.len() >= 2 {
        painter.line(scale_points(&samples, plot), egui::Stroke::new(2.0, color));
    }

    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        let font = egui::FontId::monospace(10.0);
        painter.text(
            plot.left_bottom() + egui::vec2(-4.0, 0.0),
            egui::Align2::RIGHT_BOTTOM,
            format!("{:.1}", first.satisfaction),
            font.clone(),
            AXIS,
        );
        painter.text(
            plot.right_top(),
            egui::Align2::RIGHT_TOP,
            format!("{:.1} @ {}", last.satisfaction, last.iteration),
            font,
            color,
        );
    }
}

pub struct Bar<'a> {
    pub label: &'a str,
    pub value: f64,
    pub color: egui::Color32,
}

/// Horizontal bars sharing one scale, labelled with `format`.
pub fn comparison_bars(
    ui: &mut egui::Ui,
    title: &str,
    bars: &[Bar<'_>],
    format: impl Fn(f64) -> String,
) {
    ui.label(egui::RichText::new(title).strong());
    let max = bars.iter().map(|bar| bar.value).fold(0.0_f64, f64::max);
    let width = ui.available_width().min(420.0);
    for bar in bars {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 22.0), egui::Sense::hover());
        let painter = ui.painter_at(rect);
        let track = egui::Rect::from_min_max(rect.left_top() + egui::vec2(70.0, 3.0), rect.right_bottom() - egui::vec2(70.0, 3.0));
        let fraction = if max > 0.0 { (bar.value / max) as f32 } else { 0.0 };
        painter.text(
            rect.left_center(),
            egui::Align2::LEFT_CENTER,
            bar.label,
            egui::FontId::proportional(12.0),
            ui.visuals().text_color(),
        );
        painter.rect_filled(track, egui::CornerRadius::same(3), ui.visuals().faint_bg_color);
        painter.rect_filled(
            egui::Rect::from_min_size(track.min, egui::vec2(track.width() * fraction, track.height())),
            egui::CornerRadius::same(3),
            bar.color,
        );
        painter.text(
            rect.right_center(),
            egui::Align2::RIGHT_CENTER,
            format(bar.value),
            egui::FontId::monospace(11.0),
            ui.visuals().text_color(),
        );
    }
}
