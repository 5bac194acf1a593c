// ktx-core/src/cache.rs
//! Run-scoped memory of which files have already been uploaded.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use ktx_common::error::Result;
use ktx_net::ArtifactUploader;
use tracing::debug;

/// Identifies one distinct upload: a lexically normalized path plus the
/// content type it was uploaded under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    path: PathBuf,
    content_type: String,
}

impl DedupKey {
    pub fn new(path: &Path, content_type: &str) -> Self {
        Self {
            path: normalize(path),
            content_type: content_type.to_string(),
        }
    }
}

/// Drops `.` and folds `name/..` pairs without touching the filesystem, so
/// symlinks are not resolved. Leading `..` of a relative path is kept.
fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                // `/..` is `/`.
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    parts.iter().collect()
}

/// Maps (path, content type) to the artifact id obtained for it.
///
/// Created empty for each run and never shared. `resolve` takes `&mut self`,
/// so a lookup, the upload on a miss and the store happen without any other
/// resolution in between.
#[derive(Debug, Default)]
pub struct UploadCache {
    ids: HashMap<DedupKey, String>,
}

impl UploadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for `path` under `content_type`, uploading it first if
    /// this run has not done so yet.
    pub async fn resolve<U>(&mut self, path: &Path, content_type: &str, uploader: &U) -> Result<String>
    where
        U: ArtifactUploader + ?Sized,
    {
        let key = DedupKey::new(path, content_type);
        if let Some(id) = self.ids.get(&key) {
            debug!("Reusing artifact {} for {} ({})", id, path.display(), content_type);
            return Ok(id.clone());
        }

        let id = uploader.upload(path, content_type).await?;
        self.ids.insert(key, id.clone());
        Ok(id)
    }

    /// Number of distinct uploads performed so far.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingUploader;

    #[tokio::test]
    async fn uploads_each_key_once() {
        let uploader = RecordingUploader::default();
        let mut cache = UploadCache::new();

        let first = cache
            .resolve(Path::new("out/a.json"), "application/json", &uploader)
            .await
            .unwrap();
        let again = cache
            .resolve(Path::new("./out//a.json"), "application/json", &uploader)
            .await
            .unwrap();

        assert_eq!(first, "ID1");
        assert_eq!(again, "ID1");
        assert_eq!(uploader.calls().len(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn normalizes_dot_segments() {
        let key = DedupKey::new(Path::new("out/a.json"), "application/json");
        assert_eq!(DedupKey::new(Path::new("out/../out/a.json"), "application/json"), key);
        assert_eq!(DedupKey::new(Path::new("./out/x/../a.json"), "application/json"), key);
        assert_eq!(normalize(Path::new("/../tmp/a")), PathBuf::from("/tmp/a"));
        assert_eq!(normalize(Path::new("../a/b/..")), PathBuf::from("../a"));
    }

    #[tokio::test]
    async fn content_type_is_part_of_the_key() {
        let uploader = RecordingUploader::default();
        let mut cache = UploadCache::new();

        let json = cache
            .resolve(Path::new("out/a.json"), "application/json", &uploader)
            .await
            .unwrap();
        let binary = cache
            .resolve(Path::new("out/a.json"), "application/octet-stream", &uploader)
            .await
            .unwrap();

        assert_ne!(json, binary);
        assert_eq!(uploader.calls().len(), 2);
    }

    #[tokio::test]
    async fn failed_upload_is_not_cached() {
        let uploader = RecordingUploader::failing_on("out/bad.bin");
        let mut cache = UploadCache::new();

        assert!(cache
            .resolve(Path::new("out/bad.bin"), "application/octet-stream", &uploader)
            .await
            .is_err());
        assert!(cache.is_empty());
    }
}
