//! Backend commands queued from UI to backend worker.

use client_core::Job;

pub enum BackendCommand {
    Execute(Job),
    Shutdown,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Execute(job) => job.kind().label(),
            Self::Shutdown => "shutdown",
        }
    }
}
