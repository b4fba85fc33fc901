//! An implementation of a growable K-D Tree over points of any fixed dimensionality.

#![warn(missing_docs)]

mod distance;
mod index;
mod node;
mod r#trait;
mod traversal;

pub use distance::{DistanceMetric, EuclideanDistance, ManhattanDistance};
pub use index::KdTree;
pub use node::Node;
pub use r#trait::{KdTreeIndex, Neighbor};
pub use traversal::Iter;
