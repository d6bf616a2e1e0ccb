//! Port for storing uploaded images.

use async_trait::async_trait;

use crate::domain::{ImageUpload, MediaUrl};

/// Errors raised by image store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageStoreError {
    /// Writing the image failed.
    #[error("image store write failed: {message}")]
    Io {
        /// Underlying I/O error text.
        message: String,
    },
}

impl ImageStoreError {
    /// Build [`Self::Io`].
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }
}

/// Folder an uploaded image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaCategory {
    /// Recipe photos.
    Recipes,
    /// Profile pictures.
    Avatars,
}

impl MediaCategory {
    /// Directory name beneath the media root.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Recipes => "recipes",
            Self::Avatars => "avatars",
        }
    }
}

/// Content-addressed storage for decoded uploads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist `upload` and return the URL it is served from.
    ///
    /// Storing identical bytes twice yields the same URL.
    async fn store(
        &self,
        category: MediaCategory,
        upload: &ImageUpload,
    ) -> Result<MediaUrl, ImageStoreError>;
}
