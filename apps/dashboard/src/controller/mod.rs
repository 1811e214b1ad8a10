//! Controller layer: UI events, error modeling, and job dispatch.

pub mod events;
pub mod orchestration;
