//! Map point capture: the next map click fills either the start or the end
//! coordinate.

use shared::domain::LatLng;
use tracing::info;

use crate::params::{ParameterModel, ParamsPatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureMode {
    #[default]
    Idle,
    AwaitingStart,
    AwaitingEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureTarget {
    Start,
    End,
}

/// One mode at a time: arming a target disarms the other, arming the armed
/// target again turns capture off.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointCapture {
    mode: CaptureMode,
}

impl PointCapture {
    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn armed_target(&self) -> Option<CaptureTarget> {
        match self.mode {
            CaptureMode::Idle => None,
            CaptureMode::AwaitingStart => Some(CaptureTarget::Start),
            CaptureMode::AwaitingEnd => Some(CaptureTarget::End),
        }
    }

    pub fn arm_start(&mut self) {
        self.mode = match self.mode {
            CaptureMode::AwaitingStart => CaptureMode::Idle,
            CaptureMode::Idle | CaptureMode::AwaitingEnd => CaptureMode::AwaitingStart,
        };
    }

    pub fn arm_end(&mut self) {
        self.mode = match self.mode {
            CaptureMode::AwaitingEnd => CaptureMode::Idle,
            CaptureMode::Idle | CaptureMode::AwaitingStart => CaptureMode::AwaitingEnd,
        };
    }

    pub fn cancel(&mut self) {
        self.mode = CaptureMode::Idle;
    }

    /// Applies a map click. Returns the field that was written, or `None`
    /// when nothing was armed.
    pub fn on_map_click(
        &mut self,
        point: LatLng,
        model: &mut ParameterModel,
    ) -> Option<CaptureTarget> {
        let target = self.armed_target()?;
        let patch = match target {
            CaptureTarget::Start => ParamsPatch::start(point),
            CaptureTarget::End => ParamsPatch::end(point),
        };
        model.set(patch);
        self.mode = CaptureMode::Idle;
        info!(?target, %point, "captured map point");
        Some(target)
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self.mode {
            CaptureMode::Idle => None,
            CaptureMode::AwaitingStart => Some("Click the map to place the start point"),
            CaptureMode::AwaitingEnd => Some("Click the map to place the end point"),
        }
    }
}

#[cfg(test)]
#[path = "tests/point_capture_tests.rs"]
mod tests;
