//! The colorizer: Lab conversion, forward inference, reconstruction.

use std::path::Path;

use image::RgbImage;
use ndarray::Array4;
use ort::session::Session;
use ort::value::Tensor;

use crate::error::{Error, Result};
use crate::image::{
    lab_to_rgb, lightness_tensor, load_image, merge_chrominance, resize_lab, rgb_to_lab,
    NET_INPUT_SIZE,
};
use crate::model::{load_assets, AssetPaths, ClusterWeights};

use super::decode::decode_chrominance;

/// Mean lightness of the training distribution, subtracted from the
/// network input.
const L_MEAN_OFFSET: f32 = 50.0;

/// Colorizes rasters with a pretrained chrominance-prediction network.
///
/// The ONNX session and cluster weights are loaded once at construction
/// and reused across calls; colorization itself is deterministic per
/// fixed input.
pub struct Colorizer {
    session: Session,
    weights: ClusterWeights,
}

impl Colorizer {
    /// Create a colorizer from the given asset paths.
    ///
    /// # Errors
    ///
    /// Returns an error if any model asset is missing or corrupt.
    pub fn new(assets: &AssetPaths) -> Result<Self> {
        let (session, weights) = load_assets(assets)?;
        Ok(Self { session, weights })
    }

    /// Colorize the image at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be decoded or the pipeline
    /// fails; no partial output is produced.
    pub fn colorize_file<P: AsRef<Path>>(&mut self, path: P) -> Result<RgbImage> {
        let img = load_image(path)?;
        self.colorize(&img)
    }

    /// Colorize a decoded image.
    ///
    /// The output has the same dimensions as the input. The lightness
    /// channel is carried over from the full-resolution source; only the
    /// chrominance is synthesized by the network.
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails or the network output has an
    /// unexpected shape.
    pub fn colorize(&mut self, img: &RgbImage) -> Result<RgbImage> {
        let (width, height) = img.dimensions();

        let lab = rgb_to_lab(img);

        // Network input comes from a fixed-size copy; the full-resolution
        // lightness is kept for reconstruction.
        let resized = resize_lab(&lab, NET_INPUT_SIZE, NET_INPUT_SIZE);
        let mut input = lightness_tensor(&resized);
        input -= L_MEAN_OFFSET;

        tracing::debug!("running inference on {NET_INPUT_SIZE}x{NET_INPUT_SIZE} lightness input");
        let scores = self.forward(input)?;

        let ab = decode_chrominance(&scores, &self.weights)?;
        let ab_full = resize_lab(&ab, width, height);

        Ok(lab_to_rgb(&merge_chrominance(&lab, &ab_full)))
    }

    /// Run the forward pass, returning the class-score tensor.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    fn forward(&mut self, input: Array4<f32>) -> Result<Array4<f32>> {
        let input_value =
            Tensor::from_array(input).map_err(|source| Error::Inference { source })?;

        let outputs = self
            .session
            .run(ort::inputs![input_value])
            .map_err(|source| Error::Inference { source })?;

        let output = outputs
            .values()
            .next()
            .ok_or_else(|| Error::ShapeMismatch {
                expected: "class-score output".to_string(),
                actual: "no output".to_string(),
            })?;

        let (shape_info, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|source| Error::Inference { source })?;

        let dims: Vec<usize> = shape_info.iter().map(|&x| x as usize).collect();

        if dims.len() != 4 {
            return Err(Error::ShapeMismatch {
                expected: "4D tensor".to_string(),
                actual: format!("{}D tensor", dims.len()),
            });
        }

        Array4::from_shape_vec((dims[0], dims[1], dims[2], dims[3]), data.to_vec()).map_err(|_| {
            Error::ShapeMismatch {
                expected: format!("{dims:?}"),
                actual: "reshape failed".to_string(),
            }
        })
    }
}
