//! Media storage adapters.
//!
//! Uploaded images land on the local filesystem under a single media root
//! and are served back under a configurable URL prefix.

mod fs_image_store;

pub use fs_image_store::FsImageStore;
