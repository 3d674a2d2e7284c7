//! croprec Model
//!
//! Inference-only evaluation of pre-trained tree ensembles.
//!
//! Models are trained elsewhere and exported as a self-describing artifact
//! (JSON or YAML) carrying the input schema, the class labels and the
//! estimator's node arrays. This crate loads such an artifact once,
//! validates it, and exposes it through the [`Predictor`] trait.

pub mod artifact;
pub mod forest;
pub mod loader;
pub mod predictor;
pub mod tree;

pub use artifact::{EstimatorSpec, ModelArtifact, FORMAT_VERSION};
pub use forest::RandomForest;
pub use loader::{load_model, ArtifactFormat};
pub use predictor::{Estimator, LoadedModel, Predictor};
pub use tree::{DecisionTree, TreeSpec};
