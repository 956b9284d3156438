pub mod domain;
pub mod error;
pub mod protocol;

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use serde_json::json;

    use crate::domain::{FileRef, StatusMessage, TargetMood, UploadEntry, UploadField};

    #[test]
    fn moods_parse_case_insensitively_and_reject_unknown_values() {
        for mood in TargetMood::ALL {
            assert_eq!(TargetMood::from_str(mood.as_str()), Ok(mood));
            assert_eq!(TargetMood::from_str(&mood.label().to_uppercase()), Ok(mood));
        }
        assert!(TargetMood::from_str("").is_err());
        assert!(TargetMood::from_str("gloomy").is_err());
        assert_eq!(TargetMood::default(), TargetMood::Authentic);
    }

    #[test]
    fn upload_entry_reports_file_name() {
        let entry = UploadEntry::success("logo.png");
        assert_eq!(entry.message, "logo.png uploaded successfully");
    }

    #[test]
    fn file_extension_ignores_dotfiles_and_is_lowercased() {
        assert_eq!(
            FileRef::from_bytes("Brief.DOCX", vec![1u8]).extension().as_deref(),
            Some("docx")
        );
        assert_eq!(FileRef::from_bytes(".bashrc", vec![1u8]).extension(), None);
        assert_eq!(FileRef::from_bytes("README", vec![1u8]).extension(), None);
    }

    #[test]
    fn status_message_serializes_with_type_and_message() {
        let message = StatusMessage::Error("nope".to_string());
        assert_eq!(
            serde_json::to_value(&message).expect("serialize"),
            json!({ "type": "error", "message": "nope" })
        );
        assert_eq!(
            serde_json::to_value(UploadField::AvatarPicture).expect("serialize"),
            json!("avatarPicture")
        );
    }
}
