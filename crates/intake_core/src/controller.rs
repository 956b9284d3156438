//! Form intake controller: owns the form record, per-field upload status and
//! the submission lifecycle.
//!
//! The lifecycle is split into [`FormIntakeController::begin_submission`] and
//! [`FormIntakeController::complete_submission`] so a UI thread can hand the
//! request to a worker and feed the result back later.
//! [`FormIntakeController::submit`] runs both halves around an awaited
//! [`WorkflowSubmitter`] for callers that own an async context.

use chrono::Utc;
use shared::{
    domain::{
        FileRef, StatusMessage, SubmissionId, TargetMood, UploadEntry, UploadField, UploadStatus,
    },
    error::{SubmissionError, SubmitRejected, ValidationError},
    protocol::WorkflowRequest,
};
use tracing::{debug, info, warn};

use crate::{accept::UploadRules, workflow::WorkflowSubmitter};

pub const PROCESSING_MESSAGE: &str = "Processing your brand video creation request...";
pub const SUCCESS_MESSAGE: &str = "Your brand video creation request has been submitted successfully! You will receive a confirmation email shortly.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pub brand_asset: Option<FileRef>,
    pub avatar_picture: Option<FileRef>,
    pub campaign_brief: String,
    pub target_mood: TargetMood,
}

impl FormData {
    pub fn file(&self, field: UploadField) -> Option<&FileRef> {
        match field {
            UploadField::BrandAsset => self.brand_asset.as_ref(),
            UploadField::AvatarPicture => self.avatar_picture.as_ref(),
        }
    }

    fn file_slot(&mut self, field: UploadField) -> &mut Option<FileRef> {
        match field {
            UploadField::BrandAsset => &mut self.brand_asset,
            UploadField::AvatarPicture => &mut self.avatar_picture,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.brand_asset.is_none() {
            return Err(ValidationError::MissingBrandAsset);
        }
        if self.campaign_brief.trim().is_empty() {
            return Err(ValidationError::BlankCampaignBrief);
        }
        Ok(())
    }
}

/// Form record and upload status, replaced as one unit on reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntakeState {
    pub form: FormData,
    pub uploads: UploadStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitting {
        id: SubmissionId,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub id: SubmissionId,
    pub request: WorkflowRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Rejected(SubmitRejected),
    Succeeded,
    Failed(SubmissionError),
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

#[derive(Debug, Default)]
pub struct FormIntakeController {
    state: IntakeState,
    phase: SubmissionPhase,
    status_message: Option<StatusMessage>,
    rules: UploadRules,
}

impl FormIntakeController {
    pub fn new(rules: UploadRules) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    pub fn form(&self) -> &FormData {
        &self.state.form
    }

    pub fn upload_status(&self) -> &UploadStatus {
        &self.state.uploads
    }

    pub fn upload_entry(&self, field: UploadField) -> Option<&UploadEntry> {
        self.state.uploads.get(&field)
    }

    pub fn status_message(&self) -> Option<&StatusMessage> {
        self.status_message.as_ref()
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, SubmissionPhase::Submitting { .. })
    }

    pub fn rules(&self) -> &UploadRules {
        &self.rules
    }

    /// Takes the first file from a picker or drop payload and ignores the rest.
    /// Returns `true` when the field was updated.
    pub fn receive_files<I>(&mut self, field: UploadField, files: I) -> bool
    where
        I: IntoIterator<Item = FileRef>,
    {
        let mut files = files.into_iter();
        let Some(file) = files.next() else {
            debug!(%field, "file payload was empty");
            return false;
        };
        let ignored = files.count();
        if ignored > 0 {
            debug!(%field, ignored, "keeping first file of multi-file payload");
        }
        self.select_file(field, file)
    }

    pub fn select_file(&mut self, field: UploadField, file: FileRef) -> bool {
        if !self.rules.admits(&file) {
            warn!(%field, file = %file.name, "file refused by accept filter");
            self.status_message = Some(StatusMessage::Error(self.rules.rejection_message(&file)));
            return false;
        }

        debug!(%field, file = %file.name, "file selected");
        self.state
            .uploads
            .insert(field, UploadEntry::success(&file.name));
        *self.state.form.file_slot(field) = Some(file);
        true
    }

    pub fn set_campaign_brief(&mut self, brief: impl Into<String>) {
        self.state.form.campaign_brief = brief.into();
    }

    pub fn set_target_mood(&mut self, mood: TargetMood) {
        self.state.form.target_mood = mood;
    }

    /// Validates the form and, on success, moves into `Submitting` and returns
    /// a snapshot for the workflow.
    pub fn begin_submission(&mut self) -> Result<PendingSubmission, SubmitRejected> {
        if self.is_submitting() {
            debug!("submit ignored while a submission is in flight");
            return Err(SubmitRejected::InFlight);
        }

        if let Err(err) = self.state.form.validate() {
            return Err(self.reject(err));
        }
        let Some(brand_asset) = self.state.form.brand_asset.clone() else {
            return Err(self.reject(ValidationError::MissingBrandAsset));
        };

        let form = &self.state.form;
        let id = SubmissionId::new();
        let request = WorkflowRequest {
            submission_id: id,
            submitted_at: Utc::now(),
            brand_asset,
            avatar_picture: form.avatar_picture.clone(),
            campaign_brief: form.campaign_brief.clone(),
            target_mood: form.target_mood,
        };

        self.phase = SubmissionPhase::Submitting { id };
        self.status_message = Some(StatusMessage::Info(PROCESSING_MESSAGE.to_string()));
        info!(submission_id = %id, mood = %request.target_mood, "submission started");
        Ok(PendingSubmission { id, request })
    }

    fn reject(&mut self, err: ValidationError) -> SubmitRejected {
        info!(reason = %err, "submission rejected by validation");
        self.status_message = Some(StatusMessage::Error(err.user_message().to_string()));
        SubmitRejected::Validation(err)
    }

    /// Applies the workflow result. Results for anything other than the
    /// in-flight submission are dropped and `None` is returned.
    pub fn complete_submission(
        &mut self,
        id: SubmissionId,
        result: Result<(), SubmissionError>,
    ) -> Option<SubmissionOutcome> {
        match self.phase {
            SubmissionPhase::Submitting { id: in_flight } if in_flight == id => {}
            _ => {
                debug!(submission_id = %id, "ignoring stale submission result");
                return None;
            }
        }

        let outcome = match result {
            Ok(()) => {
                info!(submission_id = %id, "submission succeeded; resetting form");
                self.state = IntakeState::default();
                self.status_message = Some(StatusMessage::Success(SUCCESS_MESSAGE.to_string()));
                SubmissionOutcome::Succeeded
            }
            Err(err) => {
                warn!(submission_id = %id, error = %err, "submission failed; keeping form input");
                self.status_message = Some(StatusMessage::Error(err.user_message().to_string()));
                SubmissionOutcome::Failed(err)
            }
        };
        self.phase = SubmissionPhase::Idle;
        Some(outcome)
    }

    /// Runs one full validate, submit and resolve cycle.
    pub async fn submit<S>(&mut self, submitter: &S) -> SubmissionOutcome
    where
        S: WorkflowSubmitter + ?Sized,
    {
        let pending = match self.begin_submission() {
            Ok(pending) => pending,
            Err(rejected) => return SubmissionOutcome::Rejected(rejected),
        };
        let result = submitter.submit(&pending.request).await;
        self.complete_submission(pending.id, result)
            .unwrap_or_else(|| {
                SubmissionOutcome::Failed(SubmissionError::Unavailable(
                    "submission state changed while awaiting workflow".to_string(),
                ))
            })
    }
}
