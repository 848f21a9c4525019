//! Image saving utilities.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::error::{Error, Result};

/// Write a colorized image under `output_dir`, creating the directory if
/// absent.
///
/// The file is named after the source image as `<stem>_colorized.jpg` and
/// encoded as JPEG with the given quality (1-100). Returns the written
/// path.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or encoding fails.
pub fn save_image(
    img: &RgbImage,
    source_path: &Path,
    output_dir: &Path,
    quality: u8,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir).map_err(|source| Error::OutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let stem = source_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    let path = output_dir.join(format!("{stem}_colorized.jpg"));

    let mut output = fs::File::create(&path)?;
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut output, quality);
    img.write_with_encoder(encoder)
        .map_err(|source| Error::ImageSave {
            path: path.clone(),
            source,
        })?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn creates_directory_and_names_after_stem() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("colorized");
        let img = RgbImage::from_pixel(3, 3, Rgb([10, 20, 30]));

        let path = save_image(&img, Path::new("photos/old_house.png"), &out, 95).unwrap();
        assert_eq!(path, out.join("old_house_colorized.jpg"));
        assert!(path.exists());
    }

    #[test]
    fn saved_file_decodes_to_same_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let img = RgbImage::from_pixel(6, 4, Rgb([200, 200, 200]));

        let path = save_image(&img, Path::new("x.jpg"), dir.path(), 90).unwrap();
        let back = image::open(&path).unwrap();
        assert_eq!((back.width(), back.height()), (6, 4));
    }
}
