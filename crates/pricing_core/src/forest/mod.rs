//! Random forest model format and inference
//!
//! Models are serialized as canonical JSON:
//!
//! ```json
//! {
//!   "n_features": 2,
//!   "trees": [
//!     {
//!       "nodes": [
//!         {"feature_idx":0,"id":0,"leaf":null,"left":1,"right":2,"threshold":3.5},
//!         {"feature_idx":-1,"id":1,"leaf":120000.0,"left":-1,"right":-1,"threshold":0.0},
//!         {"feature_idx":-1,"id":2,"leaf":340000.0,"left":-1,"right":-1,"threshold":0.0}
//!       ]
//!     }
//!   ],
//!   "version": 1
//! }
//! ```
//!
//! # Usage
//!
//! ```rust
//! use pricing_core::forest::{ForestModel, Node, Tree};
//!
//! let tree = Tree::new(vec![
//!     Node::internal(0, 0, 3.5, 1, 2),
//!     Node::leaf(1, 120_000.0),
//!     Node::leaf(2, 340_000.0),
//! ]);
//! let model = ForestModel::new(1, vec![tree]);
//!
//! assert_eq!(model.predict(&[2.0]).unwrap(), 120_000.0);
//! ```

pub mod model;
pub mod tree;

pub use model::{ForestModel, FORMAT_VERSION};
pub use tree::{Node, Tree};
