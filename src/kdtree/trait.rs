use std::cmp::Ordering;

use geo_traits::CoordTrait;
use tracing::debug;

use crate::error::Result;
use crate::kdtree::distance::{DistanceMetric, EuclideanDistance};
use crate::kdtree::traversal::{height, walk_pruned, Descend, Iter};
use crate::kdtree::Node;
use crate::r#type::{as_mask, as_point, coord_to_point, IndexableNum};

/// The result of a nearest-neighbor search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a, N: IndexableNum, const K: usize> {
    /// The stored point closest to the query
    pub point: &'a [N; K],
    /// Its distance to the query under the metric used for the search
    pub distance: f64,
    /// The number of nodes inspected during the search
    pub visited: usize,
}

/// A trait for searching a KdTree, or any subtree of one.
///
/// Only [`root`][KdTreeIndex::root] needs implementing. All queries validate the length of the
/// slices they are given against `K` and return
/// [`KdTreeError::InvalidArgument`][crate::KdTreeError::InvalidArgument] on a mismatch.
pub trait KdTreeIndex<N: IndexableNum, const K: usize>: Sized {
    /// The node queries start from, or `None` if there is nothing to search.
    fn root(&self) -> Option<&Node<N, K>>;

    /// An iterator over every stored point, in pre-order.
    fn iter(&self) -> Iter<'_, N, K> {
        Iter::new(self.root())
    }

    /// The number of nodes on the longest root-to-leaf path. Zero when empty.
    fn height(&self) -> usize {
        height(self.root())
    }

    /// Find a stored point equal to `point` on every axis.
    ///
    /// This follows the same path insertion would, so it runs in time proportional to the depth
    /// of the tree and returns the first equal point on that path.
    fn find_exact(&self, point: &[N]) -> Result<Option<&[N; K]>> {
        let point = as_point::<N, K>(point)?;

        let mut current = self.root();
        while let Some(node) = current {
            if node.point() == point {
                return Ok(Some(node.point()));
            }
            current = node.child_for(point);
        }

        Ok(None)
    }

    /// Find every stored point agreeing with `point` on the axes where `mask` is `true`.
    ///
    /// Axes where `mask` is `false` are wildcards, so an all-`false` mask returns every point.
    /// Results are in pre-order.
    ///
    /// ```
    /// use kd_index::kdtree::{KdTree, KdTreeIndex};
    ///
    /// let mut tree = KdTree::<i32, 2>::new().unwrap();
    /// tree.try_extend([[5, 5], [8, 2], [8, 4], [6, 7]]).unwrap();
    ///
    /// let found = tree.find_with_mask(&[8, 0], &[true, false]).unwrap();
    /// assert_eq!(found, vec![&[8, 2], &[8, 4]]);
    /// ```
    fn find_with_mask(&self, point: &[N], mask: &[bool]) -> Result<Vec<&[N; K]>> {
        let point = as_point::<N, K>(point)?;
        let mask = as_mask::<K>(mask)?;

        let mut result = vec![];
        let visited = walk_pruned(self.root(), |node| {
            if node.matches(point, mask) {
                result.push(node.point());
            }

            let axis = node.discriminant();
            if !mask[axis] {
                return Descend::BOTH;
            }
            // A tie on a masked-in axis does not prune: either side may hold equal values.
            match point[axis].partial_cmp(&node.split()) {
                Some(Ordering::Less) => Descend {
                    left: true,
                    right: false,
                },
                Some(Ordering::Greater) => Descend {
                    left: false,
                    right: true,
                },
                _ => Descend::BOTH,
            }
        });

        debug!(matches = result.len(), visited, "masked search finished");
        Ok(result)
    }

    /// Find the stored point closest to `point` by Euclidean distance.
    ///
    /// Returns `None` if there is nothing stored. Among equally distant points, the first one
    /// reached by the search wins.
    fn find_nearest(&self, point: &[N]) -> Result<Option<&[N; K]>> {
        Ok(self
            .find_nearest_with(point, &EuclideanDistance)?
            .map(|neighbor| neighbor.point))
    }

    /// Like [`find_nearest`][KdTreeIndex::find_nearest], but also reports the distance and the
    /// number of nodes inspected.
    fn find_nearest_with_stats(&self, point: &[N]) -> Result<Option<Neighbor<'_, N, K>>> {
        self.find_nearest_with(point, &EuclideanDistance)
    }

    /// Find the stored point closest to `point` under the given metric.
    fn find_nearest_with<M: DistanceMetric<N>>(
        &self,
        point: &[N],
        metric: &M,
    ) -> Result<Option<Neighbor<'_, N, K>>> {
        let query = as_point::<N, K>(point)?;

        let mut visited = 0;
        let best = nearest(self.root(), query, metric, &mut visited);

        let neighbor = best.map(|(node, distance)| Neighbor {
            point: node.point(),
            distance,
            visited,
        });
        debug!(
            visited,
            distance = neighbor.map(|n| n.distance),
            "nearest neighbor search finished"
        );
        Ok(neighbor)
    }

    /// Find the stored point closest to a coordinate by Euclidean distance.
    ///
    /// The coordinate must have exactly `K` dimensions.
    fn find_nearest_coord(&self, coord: &impl CoordTrait<T = N>) -> Result<Option<&[N; K]>> {
        let point = coord_to_point::<N, K>(coord)?;
        self.find_nearest(&point)
    }

    /// Search for points inside an axis-aligned box.
    ///
    /// - min: the lowest corner of the box, inclusive
    /// - max: the highest corner of the box, inclusive
    ///
    /// Returns the found points in pre-order.
    fn range(&self, min: &[N], max: &[N]) -> Result<Vec<&[N; K]>> {
        let min = as_point::<N, K>(min)?;
        let max = as_point::<N, K>(max)?;

        let mut result = vec![];
        walk_pruned(self.root(), |node| {
            let inside = node
                .point()
                .iter()
                .zip(min.iter().zip(max))
                .all(|(coord, (lo, hi))| lo <= coord && coord <= hi);
            if inside {
                result.push(node.point());
            }

            // queue search in halves that intersect the query
            let axis = node.discriminant();
            Descend {
                left: min[axis] <= node.split(),
                right: max[axis] > node.split(),
            }
        });

        Ok(result)
    }

    /// Search for points within a given Euclidean distance of a query point.
    ///
    /// - point: the query point
    /// - r: radius, inclusive
    ///
    /// Returns the found points in pre-order.
    fn within(&self, point: &[N], r: f64) -> Result<Vec<&[N; K]>> {
        let query = as_point::<N, K>(point)?;
        let metric = EuclideanDistance;

        let mut result = vec![];
        walk_pruned(self.root(), |node| {
            if metric.distance(node.point(), query) <= r {
                result.push(node.point());
            }

            let axis = node.discriminant();
            let q = query[axis].as_f64();
            let split = node.split().as_f64();
            Descend {
                left: q - r <= split,
                right: q + r > split,
            }
        });

        Ok(result)
    }
}

/// Recursive nearest-neighbor search over a subtree, returning the best node and its distance.
///
/// The near side of each node is searched first, then the node itself, then the far side if the
/// splitting plane is closer than the best distance so far. A candidate only replaces the current
/// best on strict improvement.
fn nearest<'a, N, const K: usize, M>(
    subtree: Option<&'a Node<N, K>>,
    query: &[N; K],
    metric: &M,
    visited: &mut usize,
) -> Option<(&'a Node<N, K>, f64)>
where
    N: IndexableNum,
    M: DistanceMetric<N>,
{
    let node = subtree?;
    *visited += 1;

    if node.point() == query {
        return Some((node, 0.));
    }

    let axis = node.discriminant();
    let (near, far) = if query[axis] < node.split() {
        (node.left(), node.right())
    } else {
        (node.right(), node.left())
    };

    let mut best = nearest(near, query, metric, visited);
    let mut best_distance = best.map_or(f64::INFINITY, |(_, distance)| distance);

    let distance = metric.distance(node.point(), query);
    if distance < best_distance {
        best = Some((node, distance));
        best_distance = distance;
    }

    if metric.axis_distance(node.split(), query[axis]) < best_distance {
        if let Some((candidate, distance)) = nearest(far, query, metric, visited) {
            if distance < best_distance {
                best = Some((candidate, distance));
            }
        }
    }

    best
}
