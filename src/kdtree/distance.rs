//! Distance metrics for nearest-neighbor queries.
//!
//! Every metric here is computed in `f64`, whatever the coordinate type of the tree.

use crate::r#type::IndexableNum;

/// A trait for calculating distances between points in a [`KdTree`][crate::kdtree::KdTree].
///
/// Nearest-neighbor search skips a subtree when the gap between the query and the splitting
/// plane, as reported by [`axis_distance`][DistanceMetric::axis_distance], is not smaller than the
/// best distance found so far. Implementations must therefore never report an axis distance
/// larger than the full distance between two points differing on that axis.
pub trait DistanceMetric<N: IndexableNum> {
    /// The distance between two points.
    fn distance<const K: usize>(&self, a: &[N; K], b: &[N; K]) -> f64;

    /// A lower bound on the distance between a point with coordinate `a` on some axis and any
    /// point with coordinate `b` on the same axis.
    #[inline]
    fn axis_distance(&self, a: N, b: N) -> f64 {
        (a.as_f64() - b.as_f64()).abs()
    }
}

/// Euclidean distance metric.
///
/// This is the standard straight-line distance and the metric used by
/// [`find_nearest`][crate::kdtree::KdTreeIndex::find_nearest].
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanDistance;

impl<N: IndexableNum> DistanceMetric<N> for EuclideanDistance {
    #[inline]
    fn distance<const K: usize>(&self, a: &[N; K], b: &[N; K]) -> f64 {
        a.iter()
            .zip(b)
            .map(|(a, b)| {
                let d = a.as_f64() - b.as_f64();
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }
}

/// Manhattan (taxicab) distance metric: the sum of the absolute differences on every axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManhattanDistance;

impl<N: IndexableNum> DistanceMetric<N> for ManhattanDistance {
    #[inline]
    fn distance<const K: usize>(&self, a: &[N; K], b: &[N; K]) -> f64 {
        a.iter()
            .zip(b)
            .map(|(a, b)| (a.as_f64() - b.as_f64()).abs())
            .sum()
    }
}
