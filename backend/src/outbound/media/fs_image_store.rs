//! Content-addressed image store on the local filesystem.
//!
//! Files are written to `<root>/<category>/<sha256>.<ext>` through a
//! capability-scoped [`Dir`], so uploads can never escape the media root.
//! Identical bytes map to the same file and URL.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ImageStore, ImageStoreError, MediaCategory};
use crate::domain::{ImageUpload, MediaUrl, TraceId};

/// [`ImageStore`] writing into a directory tree.
#[derive(Clone)]
pub struct FsImageStore {
    root: Arc<Dir>,
    url_prefix: String,
}

impl FsImageStore {
    /// Open (creating if needed) the media root.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the directory cannot be created
    /// or opened.
    pub fn open(root: impl AsRef<Path>, url_prefix: impl Into<String>) -> io::Result<Self> {
        let path = root.as_ref();
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self {
            root: Arc::new(dir),
            url_prefix: url_prefix.into().trim_end_matches('/').to_owned(),
        })
    }

    fn url_for(&self, category: MediaCategory, file_name: &str) -> MediaUrl {
        MediaUrl::new(format!(
            "{}/{}/{file_name}",
            self.url_prefix,
            category.dir_name()
        ))
    }
}

fn file_name(upload: &ImageUpload) -> String {
    let digest = Sha256::digest(&upload.bytes);
    format!("{}.{}", hex::encode(digest), upload.format.extension())
}

/// Write `bytes` to `target` via a uniquely named sibling and a rename.
fn write_atomically(dir: &Dir, category: &str, target: &str, bytes: &[u8]) -> io::Result<()> {
    dir.create_dir_all(category)?;
    let final_path = PathBuf::from(category).join(target);
    if dir.exists(&final_path) {
        return Ok(());
    }
    let staged = PathBuf::from(category).join(format!(".upload-{}", Uuid::new_v4().simple()));
    dir.write(&staged, bytes)?;
    if let Err(error) = dir.rename(&staged, dir, &final_path) {
        let _cleanup = dir.remove_file(&staged);
        return Err(error);
    }
    Ok(())
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn store(
        &self,
        category: MediaCategory,
        upload: &ImageUpload,
    ) -> Result<MediaUrl, ImageStoreError> {
        let name = file_name(upload);
        let root = Arc::clone(&self.root);
        let bytes = upload.bytes.clone();
        let target = name.clone();
        TraceId::spawn_blocking(move || {
            write_atomically(&root, category.dir_name(), &target, &bytes)
        })
        .await
        .map_err(|err| ImageStoreError::io(err.to_string()))?
        .map_err(|err| {
            debug!(error = %err, category = category.dir_name(), "image write failed");
            ImageStoreError::io(err.to_string())
        })?;
        Ok(self.url_for(category, &name))
    }
}
