//! Equirectangular map canvas: viewport math plus marker and route drawing.

use client_core::presenter::DayRoute;
use eframe::egui;
use shared::domain::LatLng;

use crate::ui::rgb;

pub const START_MARKER: egui::Color32 = egui::Color32::from_rgb(0xF5, 0xB7, 0x01);
pub const END_MARKER: egui::Color32 = egui::Color32::from_rgb(0xDC, 0x26, 0x26);

const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0x1E, 0x29, 0x3B);
const GRID: egui::Color32 = egui::Color32::from_rgb(0x33, 0x41, 0x55);

/// What part of the world the canvas shows. Longitude and latitude share one
/// degrees-per-pixel scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub center: LatLng,
    /// Degrees of longitude across the canvas width.
    pub span_lng: f64,
}

impl MapViewport {
    pub const MIN_SPAN: f64 = 0.005;
    pub const MAX_SPAN: f64 = 90.0;

    pub fn around(center: LatLng) -> Self {
        Self {
            center,
            span_lng: 0.25,
        }
    }

    fn degrees_per_pixel(&self, rect: egui::Rect) -> f64 {
        self.span_lng / f64::from(rect.width().max(1.0))
    }

    pub fn project(&self, point: LatLng, rect: egui::Rect) -> egui::Pos2 {
        let dpp = self.degrees_per_pixel(rect);
        let center = rect.center();
        egui::pos2(
            (f64::from(center.x) + (point.lng - self.center.lng) / dpp) as f32,
            (f64::from(center.y) - (point.lat - self.center.lat) / dpp) as f32,
        )
    }

    pub fn unproject(&self, pos: egui::Pos2, rect: egui::Rect) -> LatLng {
        let dpp = self.degrees_per_pixel(rect);
        let center = rect.center();
        LatLng::new(
            self.center.lat - f64::from(pos.y - center.y) * dpp,
            self.center.lng + f64::from(pos.x - center.x) * dpp,
        )
    }

    pub fn pan_by(&mut self, delta: egui::Vec2, rect: egui::Rect) {
        let dpp = self.degrees_per_pixel(rect);
        self.center.lng -= f64::from(delta.x) * dpp;
        self.center.lat = (self.center.lat + f64::from(delta.y) * dpp).clamp(-85.0, 85.0);
    }

    /// `factor < 1.0` zooms in.
    pub fn zoom(&mut self, factor: f64) {
        self.span_lng = (self.span_lng * factor).clamp(Self::MIN_SPAN, Self::MAX_SPAN);
    }

    /// Centers on `points` with some margin. `aspect` is canvas width over
    /// height. An empty set leaves the view unchanged.
    pub fn fit(&mut self, points: impl IntoIterator<Item = LatLng>, aspect: f64) {
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return;
        };
        let (mut min, mut max) = (first, first);
        for point in points {
            min.lat = min.lat.min(point.lat);
            min.lng = min.lng.min(point.lng);
            max.lat = max.lat.max(point.lat);
            max.lng = max.lng.max(point.lng);
        }
        self.center = LatLng::new((min.lat + max.lat) / 2.0, (min.lng + max.lng) / 2.0);
        let needed = (max.lng - min.lng).max((max.lat - min.lat) * aspect.max(0.1));
        self.span_lng = (needed * 1.3).clamp(Self::MIN_SPAN, Self::MAX_SPAN);
    }
}

/// Grid spacing in degrees giving roughly six lines across `span`.
fn grid_step(span: f64) -> f64 {
    let raw = span / 6.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|mult| mult * magnitude)
        .find(|step| *step >= raw)
        .unwrap_or(10.0 * magnitude)
}

pub struct MapLayers<'a> {
    pub start: LatLng,
    pub end: Option<LatLng>,
    pub routes: &'a [DayRoute],
    pub hint: Option<&'static str>,
}

/// Draws the canvas and handles pan/zoom. Returns the clicked coordinate.
pub fn show_map(
    ui: &mut egui::Ui,
    viewport: &mut MapViewport,
    size: egui::Vec2,
    layers: &MapLayers<'_>,
) -> Option<LatLng> {
    let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
    let rect = response.rect;

    if response.dragged() {
        viewport.pan_by(response.drag_delta(), rect);
    }
    if response.hovered() {
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll != 0.0 {
            viewport.zoom((-f64::from(scroll) / 400.0).exp());
        }
    }

    painter.rect_filled(rect, egui::CornerRadius::same(6), BACKGROUND);
    draw_grid(&painter, viewport, rect);

    let end = layers.end.unwrap_or(layers.start);
    for route in layers.routes {
        if route.stops.is_empty() {
            continue;
        }
        let color = rgb(route.color);
        let mut line = vec![viewport.project(layers.start, rect)];
        line.extend(
            route
                .stops
                .iter()
                .map(|(_, point)| viewport.project(*point, rect)),
        );
        line.push(viewport.project(end, rect));
        painter.line(line, egui::Stroke::new(2.5, color));

        for (ordinal, point) in &route.stops {
            let pos = viewport.project(*point, rect);
            painter.circle_filled(pos, 9.0, color);
            painter.text(
                pos,
                egui::Align2::CENTER_CENTER,
                ordinal.to_string(),
                egui::FontId::proportional(11.0),
                egui::Color32::WHITE,
            );
        }
    }

    draw_marker(&painter, viewport.project(layers.start, rect), START_MARKER, "S");
    if let Some(end) = layers.end {
        draw_marker(&painter, viewport.project(end, rect), END_MARKER, "E");
    }

    if let Some(hint) = layers.hint {
        painter.text(
            rect.center_top() + egui::vec2(0.0, 14.0),
            egui::Align2::CENTER_CENTER,
            hint,
            egui::FontId::proportional(14.0),
            START_MARKER,
        );
    }
    if let Some(pos) = response.hover_pos() {
        painter.text(
            rect.right_bottom() - egui::vec2(8.0, 8.0),
            egui::Align2::RIGHT_BOTTOM,
            viewport.unproject(pos, rect).to_string(),
            egui::FontId::monospace(11.0),
            egui::Color32::LIGHT_GRAY,
        );
    }

    if response.clicked() {
        response
            .interact_pointer_pos()
            .map(|pos| viewport.unproject(pos, rect))
    } else {
        None
    }
}

fn draw_grid(painter: &egui::Painter, viewport: &MapViewport, rect: egui::Rect) {
    let top_left = viewport.unproject(rect.left_top(), rect);
    let bottom_right = viewport.unproject(rect.right_bottom(), rect);
    let step = grid_step(viewport.span_lng);
    let stroke = egui::Stroke::new(1.0, GRID);

    let mut lng = (top_left.lng / step).ceil() * step;
    while lng <= bottom_right.lng {
        let x = viewport.project(LatLng::new(viewport.center.lat, lng), rect).x;
        painter.line_segment([egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())], stroke);
        lng += step;
    }
    let mut lat = (bottom_right.lat / step).ceil() * step;
    while lat <= top_left.lat {
        let y = viewport.project(LatLng::new(lat, viewport.center.lng), rect).y;
        painter.line_segment([egui::pos2(rect.left(), y), egui::pos2(rect.right(), y)], stroke);
        lat += step;
    }
}

fn draw_marker(painter: &egui::Painter, pos: egui::Pos2, color: egui::Color32, label: &str) {
    painter.circle_filled(pos, 11.0, color);
    painter.circle_stroke(pos, 11.0, egui::Stroke::new(2.0, egui::Color32::WHITE));
    painter.text(
        pos,
        egui::Align2::CENTER_CENTER,
        label,
        egui::FontId::proportional(12.0),
        egui::Color32::BLACK,
    );
}
