//! # Local media storage
//!
//! Local filesystem implementation of `MediaStorage`.
//! Uploads are written as `<uuid>.<ext>` into one directory that the web
//! layer serves verbatim (e.g. `./public/img` under `/public/img`).

use std::path::PathBuf;

use async_trait::async_trait;
use domains::{DomainError, MediaStorage, Result, Upload};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

pub struct LocalMediaStore {
    /// Directory holding every upload (e.g., "./public/img")
    root_path: PathBuf,
    /// Public URL prefix (e.g., "/public/img")
    url_prefix: String,
}

impl LocalMediaStore {
    pub fn new(root: PathBuf, url_prefix: String) -> Self {
        Self {
            root_path: root,
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Resolves a stored filename, refusing anything that could escape the root.
    fn path_for(&self, filename: &str) -> Result<PathBuf> {
        if filename.is_empty()
            || filename.contains(['/', '\\'])
            || filename.starts_with('.')
        {
            return Err(DomainError::Validation(format!("invalid media filename: {filename}")));
        }
        Ok(self.root_path.join(filename))
    }
}

/// Detects the image format from the leading bytes; the declared content type is not trusted.
fn sniff_extension(data: &[u8]) -> Result<&'static str> {
    let format = image::guess_format(data)
        .map_err(|_| DomainError::Validation("upload is not a supported image".to_string()))?;
    format
        .extensions_str()
        .first()
        .copied()
        .ok_or_else(|| DomainError::Validation("upload is not a supported image".to_string()))
}

#[async_trait]
impl MediaStorage for LocalMediaStore {
    async fn save(&self, upload: Upload) -> Result<String> {
        let extension = sniff_extension(&upload.data)?;
        if let Some(declared) = upload
            .content_type
            .as_ref()
            .filter(|declared| declared.type_().as_str() != "image")
        {
            debug!(%declared, sniffed = extension, "declared content type ignored");
        }
        let filename = format!("{}.{extension}", Uuid::new_v4());

        fs::create_dir_all(&self.root_path)
            .await
            .map_err(DomainError::internal)?;
        fs::write(self.root_path.join(&filename), &upload.data)
            .await
            .map_err(DomainError::internal)?;

        debug!(
            %filename,
            bytes = upload.data.len(),
            original = upload.original_name.as_deref().unwrap_or(""),
            "upload written"
        );
        Ok(filename)
    }

    async fn delete(&self, filename: &str) -> Result<()> {
        let path = self.path_for(filename)?;
        fs::remove_file(&path)
            .await
            .map_err(DomainError::internal)?;
        debug!(%filename, "upload removed");
        Ok(())
    }

    fn public_url(&self, filename: &str) -> String {
        format!("{}/{}", self.url_prefix, filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn upload(data: &'static [u8]) -> Upload {
        Upload {
            data: bytes::Bytes::from_static(data),
            content_type: None,
            original_name: Some("foto.png".to_string()),
        }
    }

    #[tokio::test]
    async fn save_then_delete_round_trips_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("img");
        let store = LocalMediaStore::new(root.clone(), "/public/img/".into());

        let filename = store.save(upload(PNG_MAGIC)).await.unwrap();
        assert!(filename.ends_with(".png"));
        assert!(root.join(&filename).exists());
        assert_eq!(store.public_url(&filename), format!("/public/img/{filename}"));

        store.delete(&filename).await.unwrap();
        assert!(!root.join(&filename).exists());
    }

    #[tokio::test]
    async fn sniffed_bytes_win_over_the_declared_type() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path().to_path_buf(), "/public/img".into());
        let upload = Upload {
            content_type: Some(mime::TEXT_PLAIN),
            ..upload(PNG_MAGIC)
        };

        let filename = store.save(upload).await.unwrap();
        assert!(filename.ends_with(".png"));
    }

    #[tokio::test]
    async fn non_image_is_rejected_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("img");
        let store = LocalMediaStore::new(root.clone(), "/public/img".into());

        let err = store.save(upload(b"#!/bin/sh\necho hi")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(!root.exists());
    }

    #[tokio::test]
    async fn delete_refuses_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path().to_path_buf(), "/public/img".into());

        let err = store.delete("../Cargo.toml").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn deleting_a_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path().to_path_buf(), "/public/img".into());

        assert!(store.delete("gone.png").await.is_err());
    }
}
