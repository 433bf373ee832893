//! Subcommand implementations.

pub mod auth;
pub mod comment;
pub mod pober;
pub mod profile;
pub mod stats;

use std::path::Path;

use anyhow::{Context, Result};

use holyclub_core::journal::ImagePart;

/// Read an image file for upload, named after its file name.
pub(crate) async fn read_image(path: &Path) -> Result<ImagePart> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    ImagePart::new(name, bytes).with_context(|| format!("Unusable image {}", path.display()))
}
