//! Fixtures shared by unit tests and the integration suites in `tests/`.
//!
//! Integration tests reach this module through the `test-support` feature.

pub mod memory;

pub use memory::{InMemoryBackend, TickingClock};

pub mod media {
    //! Inspect a media root the way the image store writes it, through
    //! `cap_std` directory handles.

    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};

    /// Sorted file names stored under one image category.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cap_std::{ambient_authority, fs::Dir};
    /// use recipe_backend::test_support::media::stored_names;
    ///
    /// let root = tempfile::tempdir()?;
    /// let media = Dir::open_ambient_dir(root.path(), ambient_authority())?;
    /// media.create_dir("avatars")?;
    /// media.write("avatars/ab12.png", b"pixels")?;
    ///
    /// assert_eq!(stored_names(root.path(), "avatars")?, vec!["ab12.png".to_owned()]);
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn stored_names(media_root: &Path, category: &str) -> io::Result<Vec<String>> {
        let dir = Dir::open_ambient_dir(media_root, ambient_authority())?.open_dir(category)?;
        let mut names = Vec::new();
        for entry in dir.entries()? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    /// Bytes of one stored image.
    pub fn stored_bytes(media_root: &Path, category: &str, name: &str) -> io::Result<Vec<u8>> {
        Dir::open_ambient_dir(media_root, ambient_authority())?
            .open_dir(category)?
            .read(name)
    }
}

pub mod openapi {
    //! Read component schemas out of a generated OpenAPI document.

    use utoipa::openapi::schema::Schema;
    use utoipa::openapi::{OpenApi, RefOr};

    /// Property names of the object schema registered as `name`.
    ///
    /// `None` when the schema is missing or is not a plain object.
    pub fn schema_properties(doc: &OpenApi, name: &str) -> Option<Vec<String>> {
        let schema = doc.components.as_ref()?.schemas.get(name)?;
        match schema {
            RefOr::T(Schema::Object(object)) => Some(object.properties.keys().cloned().collect()),
            _ => None,
        }
    }
}
