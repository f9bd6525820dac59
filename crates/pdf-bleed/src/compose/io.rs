//! Source loading and output saving

use crate::types::{BleedError, Result};
use image::DynamicImage;
use lopdf::Document;
use std::path::Path;

/// Load a PDF document
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    let doc = tokio::task::spawn_blocking(move || Document::load_mem(&bytes)).await??;
    Ok(doc)
}

/// Load and decode a raster image
pub async fn load_image(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    let image = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes)).await??;
    Ok(image)
}

/// Save a composed document
pub async fn save_pdf(mut doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(move || {
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok::<_, BleedError>(writer)
    })
    .await??;
    tokio::fs::write(&path, bytes).await?;
    Ok(())
}
