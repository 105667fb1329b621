use actix_multipart::{Field, Multipart};
use futures_util::TryStreamExt;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::error::ApiError;

/// A file part pulled out of a multipart request.
pub struct Upload {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Read the `file` part of a multipart upload. Missing part or empty
/// filename is a client error; the caller never reaches the model.
pub async fn read_file_upload(payload: &mut Multipart) -> Result<Upload, ApiError> {
    let mut upload: Option<Upload> = None;

    while let Some(field) = payload.try_next().await.unwrap_or(None) {
        match field.name() {
            Some("file") => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or_default()
                    .to_string();

                let data = read_field_data(field).await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read uploaded file: {e}"))
                })?;

                upload = Some(Upload { filename, data });
            }
            _ => continue,
        }
    }

    let upload = match upload {
        Some(u) => u,
        None => {
            warn!("Multipart request carried no file part");
            return Err(ApiError::BadRequest(
                "No file part in the request".to_string(),
            ));
        }
    };

    if upload.filename.is_empty() {
        warn!("Uploaded file has an empty filename");
        return Err(ApiError::BadRequest("No file selected".to_string()));
    }

    Ok(upload)
}

async fn read_field_data(mut field: Field) -> Result<Vec<u8>, actix_web::Error> {
    let mut data = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        data.extend_from_slice(&chunk);
    }
    debug!("Read field data: {} bytes", data.len());
    Ok(data)
}

/// Write the upload into a per-request temporary directory. Dropping the
/// returned `TempDir` deletes the file on every exit path.
pub fn spool_to_temp(upload: &Upload) -> anyhow::Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;

    // Keep only the final path component of the client's filename.
    let name = Path::new(&upload.filename)
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "upload.wav".into());

    let path = dir.path().join(name);
    std::fs::write(&path, &upload.data)?;
    debug!("Spooled {} bytes to {}", upload.data.len(), path.display());

    Ok((dir, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spooled_file_exists_only_while_scope_lives() {
        let upload = Upload {
            filename: "meeting.wav".to_string(),
            data: vec![1, 2, 3, 4],
        };

        let path = {
            let (dir, path) = spool_to_temp(&upload).unwrap();
            assert!(path.exists());
            assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3, 4]);
            drop(dir);
            path
        };

        assert!(!path.exists(), "temp file must be gone after scope ends");
    }

    #[test]
    fn spool_strips_path_components_from_filename() {
        let upload = Upload {
            filename: "../../etc/passwd".to_string(),
            data: vec![0],
        };
        let (_dir, path) = spool_to_temp(&upload).unwrap();
        assert_eq!(path.file_name().unwrap(), "passwd");
        assert!(path.exists());
    }
}
