//! Bridge between the UI thread and the backend worker that runs solver jobs.

pub mod commands;
pub mod runtime;
