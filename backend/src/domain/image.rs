//! Embedded image payloads and the media URLs they resolve to.
//!
//! Clients either send an inline `data:image/<fmt>;base64,<payload>` URI or
//! repeat an existing URL. Inline payloads are decoded here and handed to the
//! [`ImageStore`](super::ports::ImageStore) port; existing URLs pass through.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Upper bound on decoded image size.
pub const IMAGE_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Validation errors for image inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageValidationError {
    /// Input was blank.
    Empty,
    /// Neither a data URI nor an http(s)/absolute URL.
    UnsupportedScheme,
    /// Data URI header was not `data:image/<fmt>;base64`.
    MalformedDataUri,
    /// Image subtype is not one of the accepted formats.
    UnsupportedFormat {
        /// The rejected image subtype.
        format: String,
    },
    /// Payload was not valid base64.
    InvalidBase64,
    /// Decoded payload exceeded [`IMAGE_MAX_BYTES`].
    TooLarge {
        /// Maximum permitted size in bytes.
        max: usize,
    },
}

impl ImageValidationError {
    /// Stable machine-readable code for the failure.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Empty => "required",
            Self::UnsupportedScheme | Self::MalformedDataUri => "invalid_image",
            Self::UnsupportedFormat { .. } => "unsupported_image_format",
            Self::InvalidBase64 => "invalid_base64",
            Self::TooLarge { .. } => "too_large",
        }
    }
}

impl fmt::Display for ImageValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "image must not be empty"),
            Self::UnsupportedScheme => {
                write!(f, "image must be a data URI or an http(s) URL")
            }
            Self::MalformedDataUri => {
                write!(f, "image data URI must look like data:image/<fmt>;base64,<payload>")
            }
            Self::UnsupportedFormat { format } => {
                write!(f, "image format '{format}' is not supported")
            }
            Self::InvalidBase64 => write!(f, "image payload is not valid base64"),
            Self::TooLarge { max } => write!(f, "image must be at most {max} bytes"),
        }
    }
}

impl std::error::Error for ImageValidationError {}

/// Accepted raster formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// `image/png`.
    Png,
    /// `image/jpeg` or `image/jpg`.
    Jpeg,
    /// `image/gif`.
    Gif,
    /// `image/webp`.
    Webp,
}

impl ImageFormat {
    fn from_subtype(subtype: &str) -> Result<Self, ImageValidationError> {
        match subtype.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "gif" => Ok(Self::Gif),
            "webp" => Ok(Self::Webp),
            other => Err(ImageValidationError::UnsupportedFormat {
                format: other.to_owned(),
            }),
        }
    }

    /// File extension used when storing the image.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }
}

/// Public URL of a stored image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaUrl(String);

impl MediaUrl {
    /// Wrap a URL produced by the media store or loaded from storage.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }
}

impl AsRef<str> for MediaUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MediaUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decoded inline image ready for storage.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Format declared by the data URI.
    pub format: ImageFormat,
    /// Decoded payload.
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Image field as supplied on a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    /// Freshly uploaded bytes.
    Inline(ImageUpload),
    /// URL of an image that already exists.
    Existing(MediaUrl),
}

impl ImageInput {
    /// Parse a raw image field.
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::domain::{ImageFormat, ImageInput};
    ///
    /// let input = ImageInput::parse("data:image/png;base64,iVBORw0KGgo=").unwrap();
    /// match input {
    ///     ImageInput::Inline(upload) => assert_eq!(upload.format, ImageFormat::Png),
    ///     ImageInput::Existing(_) => unreachable!(),
    /// }
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ImageValidationError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(ImageValidationError::Empty);
        }
        if let Some(rest) = value.strip_prefix("data:") {
            return decode_data_uri(rest).map(Self::Inline);
        }
        if value.starts_with("http://") || value.starts_with("https://") || value.starts_with('/')
        {
            return Ok(Self::Existing(MediaUrl::new(value)));
        }
        Err(ImageValidationError::UnsupportedScheme)
    }
}

fn decode_data_uri(rest: &str) -> Result<ImageUpload, ImageValidationError> {
    let (header, payload) = rest
        .split_once(',')
        .ok_or(ImageValidationError::MalformedDataUri)?;
    let media_type = header
        .strip_suffix(";base64")
        .ok_or(ImageValidationError::MalformedDataUri)?;
    let subtype = media_type
        .strip_prefix("image/")
        .ok_or(ImageValidationError::MalformedDataUri)?;
    let format = ImageFormat::from_subtype(subtype)?;
    if base64::decoded_len_estimate(payload.len()) > IMAGE_MAX_BYTES + 3 {
        return Err(ImageValidationError::TooLarge {
            max: IMAGE_MAX_BYTES,
        });
    }
    let bytes = STANDARD
        .decode(payload)
        .map_err(|_| ImageValidationError::InvalidBase64)?;
    if bytes.is_empty() {
        return Err(ImageValidationError::Empty);
    }
    if bytes.len() > IMAGE_MAX_BYTES {
        return Err(ImageValidationError::TooLarge {
            max: IMAGE_MAX_BYTES,
        });
    }
    Ok(ImageUpload { format, bytes })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("data:image/jpg;base64,/9j/4AAQ", ImageFormat::Jpeg)]
    #[case("data:image/PNG;base64,iVBORw0KGgo=", ImageFormat::Png)]
    #[case("data:image/webp;base64,UklGRg==", ImageFormat::Webp)]
    fn decodes_inline_images(#[case] raw: &str, #[case] format: ImageFormat) {
        let ImageInput::Inline(upload) = ImageInput::parse(raw).expect("valid data URI") else {
            panic!("expected inline image");
        };
        assert_eq!(upload.format, format);
        assert!(!upload.bytes.is_empty());
    }

    #[rstest]
    #[case("https://cdn.example.com/a.png")]
    #[case("/media/recipes/abc.png")]
    fn keeps_existing_urls(#[case] raw: &str) {
        assert_eq!(
            ImageInput::parse(raw),
            Ok(ImageInput::Existing(MediaUrl::new(raw)))
        );
    }

    #[rstest]
    #[case("", ImageValidationError::Empty)]
    #[case("ftp://host/x.png", ImageValidationError::UnsupportedScheme)]
    #[case("data:text/plain;base64,aGk=", ImageValidationError::MalformedDataUri)]
    #[case("data:image/png,plain", ImageValidationError::MalformedDataUri)]
    #[case("data:image/png;base64,@@@", ImageValidationError::InvalidBase64)]
    #[case("data:image/png;base64,", ImageValidationError::Empty)]
    fn rejects_malformed_inputs(#[case] raw: &str, #[case] expected: ImageValidationError) {
        assert_eq!(ImageInput::parse(raw), Err(expected));
    }

    #[rstest]
    fn rejects_unknown_formats() {
        let err = ImageInput::parse("data:image/tiff;base64,AAAA").expect_err("tiff rejected");
        assert_eq!(
            err,
            ImageValidationError::UnsupportedFormat {
                format: "tiff".to_owned()
            }
        );
    }
}
