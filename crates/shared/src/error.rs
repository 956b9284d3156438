use thiserror::Error;

use crate::domain::{FileRef, UploadField};

pub const VALIDATION_MESSAGE: &str = "Please upload a brand asset and provide a campaign brief.";
pub const SUBMISSION_FAILED_MESSAGE: &str =
    "An error occurred while processing your request. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown target mood: {0}")]
pub struct UnknownMood(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("brand asset is required")]
    MissingBrandAsset,
    #[error("campaign brief must not be blank")]
    BlankCampaignBrief,
}

impl ValidationError {
    /// Both failures share one user-facing message.
    pub fn user_message(&self) -> &'static str {
        VALIDATION_MESSAGE
    }
}

/// Failure reported by the outbound workflow call.
///
/// Detail is for logs only; users always see [`SUBMISSION_FAILED_MESSAGE`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("workflow transport error: {0}")]
    Transport(String),
    #[error("workflow request timed out")]
    Timeout,
    #[error("workflow rejected submission with status {status}")]
    Rejected { status: u16 },
    #[error("could not read {field} file '{name}': {reason}")]
    AssetUnreadable {
        field: UploadField,
        name: String,
        reason: String,
    },
    #[error("invalid workflow payload: {0}")]
    InvalidPayload(String),
    #[error("submission backend unavailable: {0}")]
    Unavailable(String),
}

impl SubmissionError {
    pub fn user_message(&self) -> &'static str {
        SUBMISSION_FAILED_MESSAGE
    }

    pub fn unreadable(field: UploadField, file: &FileRef, reason: impl ToString) -> Self {
        Self::AssetUnreadable {
            field,
            name: file.name.clone(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("a submission is already in flight")]
    InFlight,
}
