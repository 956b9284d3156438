//! Brand-video intake: form state, validation, and the submission lifecycle
//! shared by the desktop and command-line front ends.

pub mod accept;
pub mod config;
pub mod controller;
pub mod files;
pub mod workflow;

pub use accept::{AcceptFilter, UploadPolicy, UploadRules, DEFAULT_ACCEPT};
pub use config::{env_settings, load_settings, IntakeSettings, SettingsOverrides};
pub use controller::{
    FormData, FormIntakeController, IntakeState, PendingSubmission, SubmissionOutcome,
    SubmissionPhase, PROCESSING_MESSAGE, SUCCESS_MESSAGE,
};
pub use files::{file_ref_from_path, FileRefError};
pub use workflow::{build_submitter, SimulatedWorkflow, WebhookWorkflow, WorkflowSubmitter};

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod controller_tests;

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod workflow_tests;

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod config_tests;
