use std::fmt;

use geo_traits::CoordTrait;
use tracing::trace;

use crate::error::{KdTreeError, Result};
use crate::kdtree::traversal::Iter;
use crate::kdtree::{KdTreeIndex, Node};
use crate::r#type::{coord_to_point, to_point, IndexableNum};

/// A growable k-d tree over points with `K` coordinates of type `N`.
///
/// Points are placed by successive insertion: each node splits its children on one axis, and the
/// axis cycles with depth starting from axis 0 at the root. The tree is never rebalanced, so
/// inserting points in sorted order produces a tree as deep as it is long.
///
/// ```
/// use kd_index::kdtree::{KdTree, KdTreeIndex};
///
/// let mut tree = KdTree::<f64, 2>::new().unwrap();
/// tree.insert(&[5., 5.]).unwrap().insert(&[2., 3.]).unwrap();
///
/// assert_eq!(tree.find_exact(&[2., 3.]).unwrap(), Some(&[2., 3.]));
/// assert_eq!(tree.find_nearest(&[6., 6.]).unwrap(), Some(&[5., 5.]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct KdTree<N: IndexableNum, const K: usize> {
    root: Option<Box<Node<N, K>>>,
    num_items: usize,
}

impl<N: IndexableNum, const K: usize> KdTree<N, K> {
    /// Create an empty tree.
    ///
    /// Fails if `K` is less than 2.
    pub fn new() -> Result<Self> {
        if K < 2 {
            return Err(KdTreeError::InvalidArgument(format!(
                "A KdTree needs at least 2 dimensions, got {}.",
                K
            )));
        }
        Ok(Self {
            root: None,
            num_items: 0,
        })
    }

    /// The number of coordinates in every stored point.
    #[inline]
    pub fn dimensionality(&self) -> usize {
        K
    }

    /// The number of points stored in this tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.num_items
    }

    /// Returns `true` if nothing has been inserted yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Add a point to the tree.
    ///
    /// Fails without modifying the tree if `point` does not have exactly `K` coordinates. Points
    /// equal to one already stored are added again as a separate node.
    pub fn insert(&mut self, point: &[N]) -> Result<&mut Self> {
        let point = to_point::<N, K>(point)?;
        self.insert_point(point);
        Ok(self)
    }

    /// Add a coordinate to the tree. The coordinate must have exactly `K` dimensions.
    pub fn insert_coord(&mut self, coord: &impl CoordTrait<T = N>) -> Result<&mut Self> {
        let point = coord_to_point::<N, K>(coord)?;
        self.insert_point(point);
        Ok(self)
    }

    /// Insert a sequence of points, in order.
    ///
    /// Every point is validated before any is inserted, so on failure the tree is unchanged.
    pub fn try_extend<I, P>(&mut self, points: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[N]>,
    {
        let points = points
            .into_iter()
            .map(|point| to_point::<N, K>(point.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        for point in points {
            self.insert_point(point);
        }
        Ok(self)
    }

    fn insert_point(&mut self, point: [N; K]) {
        let mut slot = &mut self.root;
        let mut discriminant = 0;
        let mut depth = 0;

        // descend until we find an empty child slot, ties going left
        while let Some(node) = slot {
            discriminant = (node.discriminant() + 1) % K;
            depth += 1;
            slot = node.child_slot_mut(&point);
        }

        trace!(depth, discriminant, "inserting point");
        *slot = Some(Box::new(Node::new(point, discriminant)));
        self.num_items += 1;
    }
}

impl<N: IndexableNum, const K: usize> KdTreeIndex<N, K> for KdTree<N, K> {
    fn root(&self) -> Option<&Node<N, K>> {
        self.root.as_deref()
    }
}

impl<'a, N: IndexableNum, const K: usize> IntoIterator for &'a KdTree<N, K> {
    type Item = &'a [N; K];
    type IntoIter = Iter<'a, N, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<N: IndexableNum, const K: usize> fmt::Display for KdTree<N, K> {
    /// Writes one line per node in pre-order, indented two spaces per level and prefixed with
    /// `r` for the root, `l` for a left child and `r` for a right child.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root() {
            Some(root) => write_subtree(f, root, 0, 'r'),
            None => Ok(()),
        }
    }
}

fn write_subtree<N: IndexableNum, const K: usize>(
    f: &mut fmt::Formatter<'_>,
    node: &Node<N, K>,
    indent: usize,
    marker: char,
) -> fmt::Result {
    write!(f, "{:indent$}{}:{}", "", marker, node, indent = indent)?;
    for (child, marker) in [(node.left(), 'l'), (node.right(), 'r')] {
        if let Some(child) = child {
            f.write_str("\n")?;
            write_subtree(f, child, indent + 2, marker)?;
        }
    }
    Ok(())
}
