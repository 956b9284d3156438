use std::{collections::BTreeMap, fmt, path::PathBuf, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::UnknownMood;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub Uuid);

impl SubmissionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Emotional tone requested for the generated video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetMood {
    #[default]
    Authentic,
    Professional,
    Energetic,
    Inspirational,
    Hopeful,
    Informative,
    Luxury,
    Friendly,
}

impl TargetMood {
    pub const ALL: [TargetMood; 8] = [
        TargetMood::Authentic,
        TargetMood::Professional,
        TargetMood::Energetic,
        TargetMood::Inspirational,
        TargetMood::Hopeful,
        TargetMood::Informative,
        TargetMood::Luxury,
        TargetMood::Friendly,
    ];

    /// Wire value sent to the workflow.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Authentic => "authentic",
            Self::Professional => "professional",
            Self::Energetic => "energetic",
            Self::Inspirational => "inspirational",
            Self::Hopeful => "hopeful",
            Self::Informative => "informative",
            Self::Luxury => "luxury",
            Self::Friendly => "friendly",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Authentic => "Authentic",
            Self::Professional => "Professional",
            Self::Energetic => "Energetic",
            Self::Inspirational => "Inspirational",
            Self::Hopeful => "Hopeful",
            Self::Informative => "Informative",
            Self::Luxury => "Luxury",
            Self::Friendly => "Friendly",
        }
    }
}

impl fmt::Display for TargetMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetMood {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownMood(s.to_string()))
    }
}

/// The two upload slots on the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UploadField {
    BrandAsset,
    AvatarPicture,
}

impl UploadField {
    pub const ALL: [UploadField; 2] = [UploadField::BrandAsset, UploadField::AvatarPicture];

    /// Form field name, also used as the multipart part name.
    pub fn key(self) -> &'static str {
        match self {
            Self::BrandAsset => "brandAsset",
            Self::AvatarPicture => "avatarPicture",
        }
    }
}

impl fmt::Display for UploadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

/// Opaque file handed to the form: a display name plus where the bytes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub name: String,
    pub mime: Option<String>,
    pub size: Option<u64>,
    pub source: FileSource,
}

impl FileRef {
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            mime: None,
            size: Some(bytes.len() as u64),
            source: FileSource::Bytes(bytes),
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        let mime = mime.into();
        self.mime = (!mime.trim().is_empty()).then_some(mime);
        self
    }

    /// File extension of the display name, lowercased.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadState {
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadEntry {
    pub state: UploadState,
    pub message: String,
}

impl UploadEntry {
    pub fn success(file_name: &str) -> Self {
        Self {
            state: UploadState::Success,
            message: format!("{file_name} uploaded successfully"),
        }
    }
}

pub type UploadStatus = BTreeMap<UploadField, UploadEntry>;

/// The single top-level message shown under the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message", rename_all = "snake_case")]
pub enum StatusMessage {
    Info(String),
    Success(String),
    Error(String),
}

impl StatusMessage {
    pub fn text(&self) -> &str {
        match self {
            Self::Info(text) | Self::Success(text) | Self::Error(text) => text,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Info(_) => "info",
            Self::Success(_) => "success",
            Self::Error(_) => "error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}
