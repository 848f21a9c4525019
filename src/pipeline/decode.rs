//! Annealed-mean decoding of class scores into chrominance planes.

use image::Rgb;
use ndarray::Array4;

use crate::error::{Error, Result};
use crate::image::LabImage;
use crate::model::{ClusterWeights, AB_CLUSTERS};

/// Turn the network's class-score tensor into a chrominance image at the
/// native output resolution.
///
/// Scores are rescaled per class, pushed through a softmax, and the
/// resulting distribution is projected through the centroid table. The
/// returned image keeps Lab channel order with a zero lightness plane,
/// so it can go through [`crate::image::resize_lab`] unchanged.
///
/// # Errors
///
/// Returns an error if the tensor is not shaped (1, 313, H, W).
#[allow(clippy::cast_possible_truncation)]
pub(super) fn decode_chrominance(
    scores: &Array4<f32>,
    weights: &ClusterWeights,
) -> Result<LabImage> {
    let dims = scores.dim();
    if dims.0 != 1 || dims.1 != AB_CLUSTERS {
        return Err(Error::ShapeMismatch {
            expected: format!("(1, {AB_CLUSTERS}, H, W)"),
            actual: format!("{dims:?}"),
        });
    }

    let (height, width) = (dims.2, dims.3);
    let mut ab = LabImage::new(width as u32, height as u32);

    let mut scratch = vec![0.0f32; AB_CLUSTERS];
    for y in 0..height {
        for x in 0..width {
            for (c, slot) in scratch.iter_mut().enumerate() {
                *slot = scores[[0, c, y, x]] * weights.rescale[c];
            }

            // Softmax over the class axis, shifted by the max for
            // numerical stability.
            let max = scratch.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            let mut sum = 0.0f32;
            for v in &mut scratch {
                *v = (*v - max).exp();
                sum += *v;
            }

            let (mut a, mut b) = (0.0f32, 0.0f32);
            for (p, centroid) in scratch.iter().zip(weights.centroids.outer_iter()) {
                a += p * centroid[0];
                b += p * centroid[1];
            }

            ab.put_pixel(x as u32, y as u32, Rgb([0.0, a / sum, b / sum]));
        }
    }

    Ok(ab)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};

    fn test_weights() -> ClusterWeights {
        let mut centroids = Array2::<f32>::zeros((AB_CLUSTERS, 2));
        for (i, mut row) in centroids.outer_iter_mut().enumerate() {
            row[0] = i as f32;
            row[1] = -(i as f32);
        }
        ClusterWeights {
            centroids,
            rescale: Array1::from_elem(AB_CLUSTERS, 1.0),
        }
    }

    #[test]
    fn uniform_scores_give_the_centroid_mean() {
        let scores = Array4::<f32>::zeros((1, AB_CLUSTERS, 2, 2));
        let ab = decode_chrominance(&scores, &test_weights()).unwrap();

        let mean = (AB_CLUSTERS as f32 - 1.0) / 2.0;
        for px in ab.pixels() {
            assert!((px[1] - mean).abs() < 0.1);
            assert!((px[2] + mean).abs() < 0.1);
        }
    }

    #[test]
    fn a_dominant_class_pulls_to_its_centroid() {
        let mut scores = Array4::<f32>::zeros((1, AB_CLUSTERS, 1, 1));
        scores[[0, 42, 0, 0]] = 50.0;

        let ab = decode_chrominance(&scores, &test_weights()).unwrap();
        let px = ab.get_pixel(0, 0);
        assert!((px[1] - 42.0).abs() < 0.01);
        assert!((px[2] + 42.0).abs() < 0.01);
    }

    #[test]
    fn output_matches_native_resolution() {
        let scores = Array4::<f32>::zeros((1, AB_CLUSTERS, 56, 56));
        let ab = decode_chrominance(&scores, &test_weights()).unwrap();
        assert_eq!(ab.dimensions(), (56, 56));
    }

    #[test]
    fn rejects_a_wrong_class_count() {
        let scores = Array4::<f32>::zeros((1, 10, 4, 4));
        let err = decode_chrominance(&scores, &test_weights()).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }
}
