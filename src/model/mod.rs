//! Model asset locations and loading.

mod loader;

pub use loader::{load_assets, AssetPaths, ClusterWeights};

/// Number of quantized ab-space clusters the network classifies into.
pub const AB_CLUSTERS: usize = 313;
