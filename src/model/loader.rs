//! Model asset loading.

use std::fs::File;
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2};
use ndarray_npy::ReadNpyExt;
use ort::session::{builder::GraphOptimizationLevel, Session};

use crate::error::{Error, Result};

use super::AB_CLUSTERS;

/// Annealed-softmax temperature applied to the raw class scores; matches
/// the rescale blob of the original deploy graph.
const SCORE_RESCALE: f32 = 2.606;

/// Locations of the three fixed model assets.
///
/// The defaults point at a `model/` directory relative to the working
/// directory; tests substitute fixture assets by building their own
/// paths.
#[derive(Debug, Clone)]
pub struct AssetPaths {
    /// ONNX graph describing the network architecture.
    pub graph: PathBuf,
    /// External weight file referenced by the graph.
    pub weights: PathBuf,
    /// Cluster-point table: 313 centroid pairs as f32 NPY.
    pub cluster_points: PathBuf,
}

impl AssetPaths {
    /// Asset paths under a common directory, using the canonical
    /// filenames.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            graph: dir.join("colorizer.onnx"),
            weights: dir.join("colorizer.onnx_data"),
            cluster_points: dir.join("pts_in_hull.npy"),
        }
    }

    /// Whether all three asset files are present on disk.
    #[must_use]
    pub fn all_present(&self) -> bool {
        self.graph.exists() && self.weights.exists() && self.cluster_points.exists()
    }

    fn check_present(&self) -> Result<()> {
        for path in [&self.graph, &self.weights, &self.cluster_points] {
            if !path.exists() {
                return Err(Error::MissingAsset { path: path.clone() });
            }
        }
        Ok(())
    }
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self::from_dir("model")
    }
}

/// Fixed pretrained parameters held outside the graph: the quantized
/// ab-space centroids and the per-class score rescale vector.
#[derive(Debug, Clone)]
pub struct ClusterWeights {
    /// Centroid table shaped (313, 2); columns are (a, b).
    pub centroids: Array2<f32>,
    /// Per-class rescale applied to the raw scores before the softmax.
    pub rescale: Array1<f32>,
}

impl ClusterWeights {
    /// Read the centroid table from an NPY file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not shaped
    /// (313, 2).
    pub fn from_npy<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path)?;
        let centroids = Array2::<f32>::read_npy(file).map_err(|source| Error::ClusterTable {
            path: path.to_path_buf(),
            source,
        })?;

        if centroids.dim() != (AB_CLUSTERS, 2) {
            return Err(Error::ShapeMismatch {
                expected: format!("({AB_CLUSTERS}, 2)"),
                actual: format!("{:?}", centroids.shape()),
            });
        }

        Ok(Self {
            rescale: Array1::from_elem(AB_CLUSTERS, SCORE_RESCALE),
            centroids,
        })
    }
}

/// Load the ONNX session and cluster weights from the given asset paths.
///
/// # Errors
///
/// Fails before any image work if an asset file is missing or corrupt.
pub fn load_assets(paths: &AssetPaths) -> Result<(Session, ClusterWeights)> {
    paths.check_present()?;

    let name = paths
        .graph
        .file_name()
        .map_or_else(|| paths.graph.display().to_string(), |s| s.to_string_lossy().into_owned());
    let model_err = |source| Error::ModelLoad {
        name: name.clone(),
        source,
    };

    tracing::info!("loading colorization graph from {}", paths.graph.display());
    let session = Session::builder()
        .map_err(model_err)?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(model_err)?
        .commit_from_file(&paths.graph)
        .map_err(model_err)?;

    let weights = ClusterWeights::from_npy(&paths.cluster_points)?;

    Ok((session, weights))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray_npy::WriteNpyExt;

    fn write_npy(path: &Path, arr: &Array2<f32>) {
        let file = File::create(path).unwrap();
        arr.write_npy(file).unwrap();
    }

    #[test]
    fn reads_a_valid_centroid_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pts_in_hull.npy");
        write_npy(&path, &Array2::zeros((AB_CLUSTERS, 2)));

        let weights = ClusterWeights::from_npy(&path).unwrap();
        assert_eq!(weights.centroids.shape(), &[AB_CLUSTERS, 2]);
        assert_eq!(weights.rescale.len(), AB_CLUSTERS);
        assert!((weights.rescale[0] - SCORE_RESCALE).abs() < f32::EPSILON);
    }

    #[test]
    fn rejects_a_misshapen_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pts.npy");
        write_npy(&path, &Array2::zeros((10, 2)));

        let err = ClusterWeights::from_npy(&path).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn missing_asset_is_fatal() {
        let paths = AssetPaths::from_dir("definitely/not/here");
        let err = load_assets(&paths).unwrap_err();
        assert!(matches!(err, Error::MissingAsset { .. }));
    }

    #[test]
    fn default_paths_use_the_model_directory() {
        let paths = AssetPaths::default();
        assert_eq!(paths.graph, Path::new("model/colorizer.onnx"));
        assert_eq!(paths.cluster_points, Path::new("model/pts_in_hull.npy"));
    }
}
