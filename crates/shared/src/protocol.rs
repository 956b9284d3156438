use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{FileRef, SubmissionId, TargetMood, UploadField};

/// Snapshot of a validated form handed to a workflow submitter.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowRequest {
    pub submission_id: SubmissionId,
    pub submitted_at: DateTime<Utc>,
    pub brand_asset: FileRef,
    pub avatar_picture: Option<FileRef>,
    pub campaign_brief: String,
    pub target_mood: TargetMood,
}

impl WorkflowRequest {
    pub fn files(&self) -> impl Iterator<Item = (UploadField, &FileRef)> {
        std::iter::once((UploadField::BrandAsset, &self.brand_asset)).chain(
            self.avatar_picture
                .as_ref()
                .map(|file| (UploadField::AvatarPicture, file)),
        )
    }

    pub fn text_fields(&self) -> WorkflowTextFields {
        WorkflowTextFields {
            submission_id: self.submission_id,
            submitted_at: self.submitted_at,
            campaign_brief: self.campaign_brief.clone(),
            target_mood: self.target_mood,
        }
    }
}

/// Non-file parts of the workflow payload, in their wire names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowTextFields {
    pub submission_id: SubmissionId,
    pub submitted_at: DateTime<Utc>,
    pub campaign_brief: String,
    pub target_mood: TargetMood,
}

impl WorkflowTextFields {
    pub fn as_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("campaignBrief", self.campaign_brief.clone()),
            ("targetMood", self.target_mood.as_str().to_string()),
            ("submissionId", self.submission_id.to_string()),
            ("submittedAt", self.submitted_at.to_rfc3339()),
        ]
    }
}
