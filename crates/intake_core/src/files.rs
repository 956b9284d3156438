use std::path::{Path, PathBuf};

use shared::{
    domain::{FileRef, FileSource, UploadField},
    error::SubmissionError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileRefError {
    #[error("file does not exist: {}", .0.display())]
    Missing(PathBuf),
    #[error("not a regular file: {}", .0.display())]
    NotAFile(PathBuf),
    #[error("failed to inspect {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn guess_mime(name: &str) -> Option<String> {
    mime_guess::from_path(name).first_raw().map(str::to_string)
}

/// Builds a [`FileRef`] for a file chosen from disk. Bytes stay on disk until
/// the workflow reads them.
pub fn file_ref_from_path(path: impl AsRef<Path>) -> Result<FileRef, FileRefError> {
    let path = path.as_ref();
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(FileRefError::Missing(path.to_path_buf()))
        }
        Err(source) => {
            return Err(FileRefError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    if !metadata.is_file() {
        return Err(FileRefError::NotAFile(path.to_path_buf()));
    }

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.bin".to_string());

    Ok(FileRef {
        mime: guess_mime(&name),
        size: Some(metadata.len()),
        name,
        source: FileSource::Path(path.to_path_buf()),
    })
}

/// Loads the bytes behind a file reference for transmission.
pub async fn read_file_bytes(field: UploadField, file: &FileRef) -> Result<Vec<u8>, SubmissionError> {
    match &file.source {
        FileSource::Bytes(bytes) => Ok(bytes.to_vec()),
        FileSource::Path(path) => tokio::fs::read(path)
            .await
            .map_err(|err| SubmissionError::unreadable(field, file, err)),
    }
}

pub fn human_readable_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format_scaled_unit(bytes, GB, "GB")
    } else if bytes >= MB {
        format_scaled_unit(bytes, MB, "MB")
    } else if bytes >= KB {
        format_scaled_unit(bytes, KB, "KB")
    } else {
        format!("{bytes} B")
    }
}

fn format_scaled_unit(bytes: u64, unit_size: u64, unit_label: &str) -> String {
    let value = bytes as f64 / unit_size as f64;
    let text = format!("{value:.1}");
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{text} {unit_label}")
}

#[cfg(test)]
mod tests {
    use std::{
        env, fs,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let dir = env::temp_dir().join(format!("intake_files_{label}_{suffix}"));
        fs::create_dir_all(&dir).expect("temp dir");
        dir
    }

    #[test]
    fn formats_sizes_readably() {
        assert_eq!(human_readable_bytes(0), "0 B");
        assert_eq!(human_readable_bytes(1023), "1023 B");
        assert_eq!(human_readable_bytes(1024), "1 KB");
        assert_eq!(human_readable_bytes(1536), "1.5 KB");
        assert_eq!(human_readable_bytes(2 * 1024 * 1024), "2 MB");
        assert_eq!(human_readable_bytes(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn file_ref_from_path_captures_name_size_and_mime() {
        let dir = temp_dir("meta");
        let path = dir.join("logo.png");
        fs::write(&path, [0u8; 12]).expect("write");

        let file = file_ref_from_path(&path).expect("file ref");
        assert_eq!(file.name, "logo.png");
        assert_eq!(file.size, Some(12));
        assert_eq!(file.mime.as_deref(), Some("image/png"));
        assert_eq!(file.source, FileSource::Path(path));

        fs::remove_dir_all(dir).expect("cleanup");
    }

    #[test]
    fn file_ref_from_path_rejects_missing_files_and_directories() {
        let dir = temp_dir("reject");
        assert!(matches!(
            file_ref_from_path(dir.join("absent.pdf")),
            Err(FileRefError::Missing(_))
        ));
        assert!(matches!(
            file_ref_from_path(&dir),
            Err(FileRefError::NotAFile(_))
        ));
        fs::remove_dir_all(dir).expect("cleanup");
    }

    #[tokio::test]
    async fn unreadable_path_maps_to_submission_error() {
        let file = FileRef {
            name: "gone.png".to_string(),
            mime: None,
            size: None,
            source: FileSource::Path(env::temp_dir().join("intake_definitely_missing.png")),
        };
        let err = read_file_bytes(UploadField::BrandAsset, &file)
            .await
            .expect_err("missing file");
        assert!(matches!(
            err,
            SubmissionError::AssetUnreadable {
                field: UploadField::BrandAsset,
                ..
            }
        ));
    }
}
