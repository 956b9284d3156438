//! Accept-filter handling for upload fields.
//!
//! The filter string uses the same shape as an HTML `accept` attribute
//! (`image/*,.pdf,.doc,.docx`). Whether it is enforced or only shown as a
//! picker hint is decided by [`UploadPolicy`].

use std::{fmt, str::FromStr};

use shared::domain::FileRef;

use crate::files::guess_mime;

pub const DEFAULT_ACCEPT: &str = "image/*,.pdf,.doc,.docx";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadPolicy {
    /// Filter is a picker hint only; every file is taken.
    #[default]
    Advisory,
    /// Files outside the filter are refused, including drag-and-drop.
    Enforce,
}

impl UploadPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Advisory => "advisory",
            Self::Enforce => "enforce",
        }
    }
}

impl fmt::Display for UploadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UploadPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "advisory" | "off" | "hint" => Ok(Self::Advisory),
            "enforce" | "strict" | "on" => Ok(Self::Enforce),
            other => Err(format!(
                "unknown upload policy '{other}' (expected 'advisory' or 'enforce')"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AcceptRule {
    /// `image/*`, stored as the top-level type.
    MimeFamily(String),
    Mime(String),
    /// `.pdf`, stored without the dot.
    Extension(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptFilter {
    raw: String,
    rules: Vec<AcceptRule>,
}

impl AcceptFilter {
    pub fn parse(raw: &str) -> Self {
        let rules = raw
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .filter_map(|token| {
                let token = token.to_ascii_lowercase();
                if let Some(ext) = token.strip_prefix('.') {
                    (!ext.is_empty()).then(|| AcceptRule::Extension(ext.to_string()))
                } else if let Some(family) = token.strip_suffix("/*") {
                    (!family.is_empty()).then(|| AcceptRule::MimeFamily(family.to_string()))
                } else if token.contains('/') {
                    Some(AcceptRule::Mime(token))
                } else {
                    tracing::debug!(token = %token, "ignoring malformed accept token");
                    None
                }
            })
            .collect();

        Self {
            raw: raw.trim().to_string(),
            rules,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// An empty filter accepts everything.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn matches(&self, file: &FileRef) -> bool {
        if self.rules.is_empty() {
            return true;
        }

        let extension = file.extension();
        let mut mimes: Vec<String> = file
            .mime
            .iter()
            .map(|mime| mime.to_ascii_lowercase())
            .collect();
        if let Some(guessed) = guess_mime(&file.name) {
            mimes.push(guessed.to_ascii_lowercase());
        }

        self.rules.iter().any(|rule| match rule {
            AcceptRule::Extension(ext) => extension.as_deref() == Some(ext.as_str()),
            AcceptRule::Mime(wanted) => mimes.iter().any(|mime| mime == wanted),
            AcceptRule::MimeFamily(family) => mimes.iter().any(|mime| {
                mime.split_once('/')
                    .is_some_and(|(top_level, _)| top_level == family)
            }),
        })
    }

    /// Extensions to offer in a native file dialog filter.
    pub fn picker_extensions(&self) -> Vec<String> {
        let mut extensions: Vec<String> = Vec::new();
        for rule in &self.rules {
            let found: Vec<String> = match rule {
                AcceptRule::Extension(ext) => vec![ext.clone()],
                AcceptRule::Mime(mime) => known_extensions(mime),
                AcceptRule::MimeFamily(family) => known_extensions(&format!("{family}/*")),
            };
            for ext in found {
                if !extensions.contains(&ext) {
                    extensions.push(ext);
                }
            }
        }
        extensions
    }
}

impl Default for AcceptFilter {
    fn default() -> Self {
        Self::parse(DEFAULT_ACCEPT)
    }
}

fn known_extensions(mime: &str) -> Vec<String> {
    mime_guess::get_mime_extensions_str(mime)
        .map(|exts| exts.iter().map(|ext| ext.to_string()).collect())
        .unwrap_or_default()
}

/// Accept filter paired with the policy that decides whether it binds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadRules {
    pub policy: UploadPolicy,
    pub accept: AcceptFilter,
}

impl UploadRules {
    pub fn new(policy: UploadPolicy, accept: AcceptFilter) -> Self {
        Self { policy, accept }
    }

    pub fn admits(&self, file: &FileRef) -> bool {
        match self.policy {
            UploadPolicy::Advisory => true,
            UploadPolicy::Enforce => self.accept.matches(file),
        }
    }

    pub fn rejection_message(&self, file: &FileRef) -> String {
        format!(
            "{} is not an accepted file type ({})",
            file.name,
            self.accept.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> FileRef {
        FileRef::from_bytes(name, vec![0u8; 4])
    }

    #[test]
    fn default_filter_matches_images_and_documents() {
        let filter = AcceptFilter::default();
        assert!(filter.matches(&named("logo.png")));
        assert!(filter.matches(&named("photo.JPEG")));
        assert!(filter.matches(&named("brief.pdf")));
        assert!(filter.matches(&named("brief.docx")));
        assert!(!filter.matches(&named("installer.exe")));
        assert!(!filter.matches(&named("notes")));
    }

    #[test]
    fn declared_mime_is_honoured_when_name_has_no_extension() {
        let filter = AcceptFilter::default();
        let dropped = named("clipboard-image").with_mime("image/png");
        assert!(filter.matches(&dropped));
    }

    #[test]
    fn advisory_policy_admits_anything() {
        let rules = UploadRules::default();
        assert!(rules.admits(&named("installer.exe")));

        let strict = UploadRules::new(UploadPolicy::Enforce, AcceptFilter::default());
        assert!(!strict.admits(&named("installer.exe")));
        assert_eq!(
            strict.rejection_message(&named("installer.exe")),
            "installer.exe is not an accepted file type (image/*,.pdf,.doc,.docx)"
        );
    }

    #[test]
    fn empty_filter_accepts_everything() {
        let filter = AcceptFilter::parse(" , ");
        assert!(filter.is_empty());
        assert!(filter.matches(&named("anything.bin")));
    }

    #[test]
    fn picker_extensions_keep_explicit_entries_in_order() {
        let filter = AcceptFilter::parse(".pdf,.doc,.PDF");
        assert_eq!(filter.picker_extensions(), vec!["pdf", "doc"]);

        let images = AcceptFilter::parse("image/*").picker_extensions();
        assert!(images.iter().any(|ext| ext == "png"));
    }

    #[test]
    fn policy_parses_aliases() {
        assert_eq!("Enforce".parse::<UploadPolicy>(), Ok(UploadPolicy::Enforce));
        assert_eq!("advisory".parse::<UploadPolicy>(), Ok(UploadPolicy::Advisory));
        assert!("sometimes".parse::<UploadPolicy>().is_err());
    }
}
