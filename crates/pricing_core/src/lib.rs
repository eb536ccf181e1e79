//! Pricing Core - model artifacts for the property price predictor
//!
//! Holds the types a training run persists and a serving component reads
//! back: the random forest model, categorical label encoders, feature
//! identifiers and the on-disk artifact bundle tying them together.

pub mod bundle;
pub mod encoding;
pub mod errors;
pub mod features;
pub mod forest;
pub mod serde_canon;

pub use bundle::ArtifactBundle;
pub use encoding::LabelEncoder;
pub use errors::ModelError;
pub use features::{feature_field_map, slugify};
pub use forest::{ForestModel, Node, Tree};
