//! Desktop-style session: one current image, explicit command handlers.

use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::error::{Error, Result};
use crate::image::{load_image, save_image};
use crate::model::AssetPaths;
use crate::pipeline::Colorizer;

/// Configuration for a colorization session.
#[derive(Debug, Clone)]
pub struct Config {
    /// Locations of the model assets.
    pub assets: AssetPaths,
    /// Directory colorized images are written to.
    pub output_dir: PathBuf,
    /// Output JPEG quality (1-100).
    pub output_quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assets: AssetPaths::default(),
            output_dir: PathBuf::from("colorized"),
            output_quality: 95,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.output_quality) {
            return Err(Error::InvalidParameter {
                name: "output_quality".to_string(),
                reason: "must be between 1 and 100".to_string(),
            });
        }

        Ok(())
    }
}

/// Holds the state the original desktop surface kept in globals: the
/// current image path, the decoded buffer, and the last colorized
/// result. Commands are synchronous and short-lived.
pub struct Session {
    colorizer: Colorizer,
    output_dir: PathBuf,
    output_quality: u8,
    current_path: Option<PathBuf>,
    current_image: Option<RgbImage>,
    colorized: Option<RgbImage>,
}

impl Session {
    /// Create a session, loading the model assets up front.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or any model
    /// asset is missing or corrupt.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let colorizer = Colorizer::new(&config.assets)?;

        Ok(Self {
            colorizer,
            output_dir: config.output_dir,
            output_quality: config.output_quality,
            current_path: None,
            current_image: None,
            colorized: None,
        })
    }

    /// Open an image, making it the session's current image.
    ///
    /// Any previously colorized result is discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be decoded; the session
    /// state is left unchanged in that case.
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let img = load_image(path)?;

        tracing::info!("opened {} ({}x{})", path.display(), img.width(), img.height());

        self.current_path = Some(path.to_path_buf());
        self.current_image = Some(img);
        self.colorized = None;
        Ok(())
    }

    /// Colorize the current image.
    ///
    /// # Errors
    ///
    /// Returns an error if no image is open or the pipeline fails.
    pub fn colorize(&mut self) -> Result<&RgbImage> {
        let img = self.current_image.as_ref().ok_or(Error::NoImageOpen)?;
        let colorized = self.colorizer.colorize(img)?;
        Ok(self.colorized.insert(colorized))
    }

    /// Save the last colorized result, returning the written path.
    ///
    /// The output directory is created if absent; the file is named
    /// `<original-stem>_colorized.jpg`.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing has been colorized yet or the file
    /// cannot be written.
    pub fn save(&self) -> Result<PathBuf> {
        let colorized = self.colorized.as_ref().ok_or(Error::NothingColorized)?;
        let source = self.current_path.as_deref().ok_or(Error::NoImageOpen)?;

        let path = save_image(colorized, source, &self.output_dir, self.output_quality)?;
        tracing::info!("saved colorized image to {}", path.display());
        Ok(path)
    }

    /// The last colorized result, if any.
    #[must_use]
    pub fn colorized(&self) -> Option<&RgbImage> {
        self.colorized.as_ref()
    }
}
