use std::path::Path;

use crate::imaging::domain::image_reader::ImageReader;
use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;

/// Decodes still images with the `image` crate, converting any pixel layout
/// (grayscale, RGBA, 16-bit) to 8-bit RGB.
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for ImageFileReader {
    fn read(&self, path: &Path) -> Result<Frame, Box<dyn std::error::Error>> {
        let img = image::open(path)?.to_rgb8();
        log::debug!(
            "Decoded {} ({}x{})",
            path.display(),
            img.width(),
            img.height()
        );
        Ok(Frame::from_rgb_image(img, 0))
    }
}

/// True if the path has one of the supported still-image extensions.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_read_converts_rgba_to_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.png");
        let img = image::RgbaImage::from_pixel(6, 4, image::Rgba([10, 20, 30, 128]));
        img.save(&path).unwrap();

        let frame = ImageFileReader::new().read(&path).unwrap();
        assert_eq!(frame.width(), 6);
        assert_eq!(frame.height(), 4);
        assert_eq!(frame.channels(), 3);
        assert_eq!(&frame.data()[..3], &[10, 20, 30]);
    }

    #[test]
    fn test_read_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ImageFileReader::new()
            .read(&dir.path().join("missing.png"))
            .is_err());
    }

    #[rstest]
    #[case("photo.jpg", true)]
    #[case("photo.JPEG", true)]
    #[case("scan.tif", true)]
    #[case("clip.mp4", false)]
    #[case("noext", false)]
    fn test_is_supported_image(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_supported_image(Path::new(name)), expected);
    }
}
