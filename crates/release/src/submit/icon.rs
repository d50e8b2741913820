use imagesize::ImageType;

use super::SubmitError;

/// Largest icon accepted, in pixels along either side
pub const MAX_ICON_SIZE: usize = 256;

/// Check that `content` is a PNG, JPEG or GIF no larger than
/// [`MAX_ICON_SIZE`] square. `path` is only used in messages.
pub(crate) fn check_icon(path: &str, content: &[u8]) -> Result<(), SubmitError> {
    let kind = imagesize::image_type(content).map_err(|_| {
        SubmitError::invalid(format!("File at {path} is of an unsupported format"))
    })?;
    if !matches!(kind, ImageType::Png | ImageType::Jpeg | ImageType::Gif) {
        return Err(SubmitError::invalid(format!(
            "File at {path} contains an image of unsupported format; only PNG, JPEG and GIF are allowed"
        )));
    }

    let size = imagesize::blob_size(content).map_err(|_| {
        SubmitError::invalid(format!("File at {path} is not a readable image"))
    })?;
    if size.width > MAX_ICON_SIZE || size.height > MAX_ICON_SIZE {
        return Err(SubmitError::invalid(format!(
            "Icon at {path} must not exceed the dimensions {MAX_ICON_SIZE}x{MAX_ICON_SIZE} px"
        )));
    }
    Ok(())
}
