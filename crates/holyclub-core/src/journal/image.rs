//! Image attachments for entries and profiles.

use std::fmt;

use crate::error::{Error, InvalidInputError};

/// Multipart field carrying an entry photo.
pub const ENTRY_IMAGE_FIELD: &str = "images";

/// Multipart field carrying a new profile picture.
pub const PROFILE_IMAGE_FIELD: &str = "profileImg";

/// An image file to upload, held in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePart {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl ImagePart {
    /// An image named `file_name`. The content type is taken from the
    /// extension; unknown extensions upload as `application/octet-stream`.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, Error> {
        let file_name = file_name.into().trim().to_string();
        if file_name.is_empty() {
            return Err(InvalidInputError::Blank { field: "image name" }.into());
        }
        if bytes.is_empty() {
            return Err(InvalidInputError::Blank { field: "image" }.into());
        }
        let content_type = content_type_for(&file_name).to_string();
        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    /// Override the guessed content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for ImagePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePart")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}
