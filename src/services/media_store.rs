//! src/services/media_store.rs
//!
//! MediaStore — token-addressed file storage for the media delivery service.
//! Uploads are streamed to disk under a fresh opaque UUID token and served
//! back by resolving the token against a flat storage root. This file holds
//! no structured metadata; titles, ratings and ownership live in an external
//! CRUD layer, the filesystem is the only source of truth here.

use bytes::Bytes;
use futures::{Stream, StreamExt, pin_mut};
use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
};
use tracing::debug;
use uuid::Uuid;

/// Media family a stored object belongs to. Each family owns one flat
/// storage root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Image,
}

#[derive(Debug, Error)]
pub enum MediaStoreError {
    #[error("refusing to store an empty upload")]
    EmptyUpload,
    #[error("no stored file matches token `{0}`")]
    NotFound(String),
    #[error("a stored file already begins with token `{0}`")]
    TokenCollision(Uuid),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type MediaResult<T> = Result<T, MediaStoreError>;

/// MediaStore provides the storage operations behind the media endpoints:
/// - Store an upload (streams bytes to disk under `<token>.<ext>`)
/// - Resolve a token back to the stored file's path
/// - Look up a stored file's byte length
///
/// The struct is cheap to clone and is shared as router state; handlers race
/// only at the granularity of individual file operations.
#[derive(Clone)]
pub struct MediaStore {
    /// Flat directory holding all video objects.
    pub video_root: PathBuf,

    /// Flat directory holding all image objects.
    pub image_root: PathBuf,
}

impl MediaStore {
    pub fn new(video_root: impl Into<PathBuf>, image_root: impl Into<PathBuf>) -> Self {
        Self {
            video_root: video_root.into(),
            image_root: image_root.into(),
        }
    }

    /// Storage root for a media family.
    pub fn root(&self, kind: MediaKind) -> &Path {
        match kind {
            MediaKind::Video => &self.video_root,
            MediaKind::Image => &self.image_root,
        }
    }

    /// Stream-store an upload and return its fresh token.
    ///
    /// - Writes chunks incrementally to a temporary file.
    /// - Counts bytes while streaming; a zero-byte upload is rejected.
    /// - Refuses to proceed if any stored file already carries the token.
    /// - Atomically renames into `<root>/<token>.<ext>`.
    ///
    /// Ensures durable writes (fsync) and removes the temp file on every
    /// error path.
    pub async fn store_stream<S>(
        &self,
        kind: MediaKind,
        original_name: &str,
        stream: S,
    ) -> MediaResult<Uuid>
    where
        S: Stream<Item = io::Result<Bytes>> + Send,
    {
        let root = self.root(kind);
        let token = Uuid::new_v4();
        let file_name = format!("{}.{}", token, file_extension(original_name));
        let final_path = root.join(&file_name);

        let tmp_path = root.join(format!(".tmp-{}", Uuid::new_v4()));
        let mut file = File::create(&tmp_path).await?;

        let mut size_bytes: u64 = 0;
        pin_mut!(stream);
        while let Some(chunk_res) = stream.next().await {
            let chunk = match chunk_res {
                Ok(chunk) => chunk,
                Err(err) => {
                    let _ = fs::remove_file(&tmp_path).await;
                    return Err(MediaStoreError::Io(err));
                }
            };
            size_bytes += chunk.len() as u64;
            if let Err(err) = file.write_all(&chunk).await {
                let _ = fs::remove_file(&tmp_path).await;
                return Err(MediaStoreError::Io(err));
            }
        }
        if let Err(err) = file.flush().await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(MediaStoreError::Io(err));
        }
        if let Err(err) = file.sync_all().await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(MediaStoreError::Io(err));
        }

        if size_bytes == 0 {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(MediaStoreError::EmptyUpload);
        }

        // Fresh v4 tokens never collide in practice; if one somehow does,
        // reject instead of silently overwriting the earlier object.
        let token_text = token.to_string();
        match scan_for_token(root, &token_text).await {
            Ok(None) => {}
            Ok(Some(_)) => {
                let _ = fs::remove_file(&tmp_path).await;
                return Err(MediaStoreError::TokenCollision(token));
            }
            Err(err) => {
                let _ = fs::remove_file(&tmp_path).await;
                return Err(MediaStoreError::Io(err));
            }
        }

        if let Err(err) = fs::rename(&tmp_path, &final_path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(MediaStoreError::Io(err));
        }

        debug!("stored {} byte upload as {}", size_bytes, file_name);
        Ok(token)
    }

    /// Resolve a token to the path of the stored file.
    ///
    /// Scans the root's immediate entries and returns the first whose name
    /// begins with the token; scan order is filesystem-dependent and
    /// correctness relies on token uniqueness. The token is only ever
    /// compared against entry names, never joined into a path.
    pub async fn resolve(&self, kind: MediaKind, token: &str) -> MediaResult<PathBuf> {
        let root = self.root(kind);
        match scan_for_token(root, token).await? {
            Some(path) => Ok(path),
            None => Err(MediaStoreError::NotFound(token.to_string())),
        }
    }

    /// Byte length of a stored file.
    pub async fn file_len(&self, path: &Path) -> io::Result<u64> {
        Ok(fs::metadata(path).await?.len())
    }
}

/// Non-recursive scan for the first entry whose file name starts with `token`.
async fn scan_for_token(root: &Path, token: &str) -> io::Result<Option<PathBuf>> {
    if token.is_empty() {
        return Ok(None);
    }
    let mut entries = fs::read_dir(root).await?;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_name().to_string_lossy().starts_with(token) {
            return Ok(Some(entry.path()));
        }
    }
    Ok(None)
}

/// Extension of an uploaded file: the substring after the last `.`, or the
/// empty string when no dot is present. The stored name keeps its `.`
/// separator either way, so `resolve` never depends on the extension.
fn file_extension(original_name: &str) -> &str {
    original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn byte_stream(data: &'static [u8]) -> impl Stream<Item = io::Result<Bytes>> + Send {
        stream::iter(vec![Ok(Bytes::from_static(data))])
    }

    fn temp_store() -> (tempfile::TempDir, MediaStore) {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("videos");
        let image = dir.path().join("images");
        std::fs::create_dir_all(&video).unwrap();
        std::fs::create_dir_all(&image).unwrap();
        let store = MediaStore::new(video, image);
        (dir, store)
    }

    #[test]
    fn extension_after_last_dot() {
        assert_eq!(file_extension("movie.mp4"), "mp4");
        assert_eq!(file_extension("archive.tar.gz"), "gz");
        assert_eq!(file_extension("noext"), "");
    }

    #[tokio::test]
    async fn store_then_resolve_round_trip() {
        let (_dir, store) = temp_store();

        let token = store
            .store_stream(MediaKind::Video, "a.mp4", byte_stream(b"0123456789"))
            .await
            .unwrap();

        let path = store
            .resolve(MediaKind::Video, &token.to_string())
            .await
            .unwrap();
        assert_eq!(path.extension().unwrap(), "mp4");
        assert_eq!(std::fs::read(&path).unwrap(), b"0123456789");
        assert_eq!(store.file_len(&path).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn empty_upload_is_rejected() {
        let (_dir, store) = temp_store();

        let err = store
            .store_stream(MediaKind::Video, "a.mp4", byte_stream(b""))
            .await
            .unwrap_err();
        assert!(matches!(err, MediaStoreError::EmptyUpload));

        // No temp file or object may be left behind.
        let mut entries = std::fs::read_dir(store.root(MediaKind::Video)).unwrap();
        assert!(entries.next().is_none());
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let (_dir, store) = temp_store();

        let err = store
            .resolve(MediaKind::Video, "deadbeef")
            .await
            .unwrap_err();
        assert!(matches!(err, MediaStoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn families_do_not_share_a_namespace() {
        let (_dir, store) = temp_store();

        let token = store
            .store_stream(MediaKind::Image, "poster.png", byte_stream(b"png bytes"))
            .await
            .unwrap();

        assert!(
            store
                .resolve(MediaKind::Video, &token.to_string())
                .await
                .is_err()
        );
        assert!(
            store
                .resolve(MediaKind::Image, &token.to_string())
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn extensionless_upload_still_resolves() {
        let (_dir, store) = temp_store();

        let token = store
            .store_stream(MediaKind::Video, "raw", byte_stream(b"data"))
            .await
            .unwrap();

        let path = store
            .resolve(MediaKind::Video, &token.to_string())
            .await
            .unwrap();
        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .ends_with(&format!("{}.", token))
        );
    }
}
