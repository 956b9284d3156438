//! Backend commands queued from UI to backend worker.

use intake_core::PendingSubmission;

pub enum BackendCommand {
    Submit(PendingSubmission),
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Submit(_) => "submit",
        }
    }
}
