//! Embedded image export
//!
//! Images referenced from descriptions are fetched from the source's image
//! store and written next to the export file as PNG. Every written file is
//! registered as an auxiliary file so the archive step can bundle it.

use crate::core::export::context::ExportContext;
use crate::domain::{ReqportError, Result};
use image::ImageFormat;
use std::path::Path;

/// What an `<img>` element becomes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageObject {
    /// File name referenced by the object element
    pub data: String,
    /// Media type of the referenced file
    pub media_type: String,
}

/// Lowercase extension of a file name
fn extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase()
}

fn media_type(ext: &str) -> String {
    match ext {
        "jpg" => "image/jpeg".to_string(),
        other => format!("image/{other}"),
    }
}

/// Exports image `image_id`, originally named `file_name`
///
/// Returns `None` when the image is dropped: unsupported format, missing
/// image or undecodable content. Drops are logged and counted, never fatal.
/// An image referenced again is not written twice; two different images
/// never share an output file.
///
/// # Errors
///
/// Returns a format error only when a converted image cannot be written to
/// the output directory.
pub fn export_image(
    ctx: &mut ExportContext,
    image_id: u32,
    file_name: &str,
) -> Result<Option<ImageObject>> {
    // Never let a source file name escape the output directory
    let file_name = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let ext = extension(&file_name);

    if ctx.options.skip_images {
        return Ok(Some(ImageObject {
            media_type: media_type(&ext),
            data: file_name,
        }));
    }

    if !matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "bmp") {
        tracing::warn!(image_id, file_name = %file_name, "Incompatible image format, image dropped");
        ctx.record_dropped_image();
        return Ok(None);
    }

    if let Some(name) = ctx.exported_image(image_id, &file_name) {
        return Ok(Some(ImageObject {
            data: name.to_string(),
            media_type: "image/png".to_string(),
        }));
    }

    let bytes = match ctx.image_store().fetch(image_id, &file_name) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(image_id, file_name = %file_name, error = %e, "Image unavailable, image dropped");
            ctx.record_dropped_image();
            return Ok(None);
        }
    };

    let output_name = if ext == "png" {
        let name = ctx.claim_image_name(image_id, &file_name, &file_name);
        let path = ctx.output_dir().join(&name);
        std::fs::write(&path, &bytes).map_err(|e| {
            ReqportError::Format(format!("Failed to write image {}: {e}", path.display()))
        })?;
        name
    } else {
        let decoded = match image::load_from_memory(&bytes) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::warn!(image_id, file_name = %file_name, error = %e, "Could not convert image, image dropped");
                ctx.record_dropped_image();
                return Ok(None);
            }
        };
        let stem = Path::new(&file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image");
        let png_name = ctx.claim_image_name(image_id, &file_name, &format!("{stem}.png"));
        let path = ctx.output_dir().join(&png_name);
        decoded
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| {
                ReqportError::Format(format!("Failed to write image {}: {e}", path.display()))
            })?;
        tracing::debug!(from = %file_name, to = %png_name, "Converted image to PNG");
        png_name
    };

    ctx.add_auxiliary_file(ctx.output_dir().join(&output_name));
    Ok(Some(ImageObject {
        data: output_name,
        media_type: "image/png".to_string(),
    }))
}
