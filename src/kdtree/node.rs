//! The owned node type making up a [`KdTree`][crate::kdtree::KdTree].

use std::fmt;
use std::ops::Index;

use geo_traits::{CoordTrait, Dimensions};

use crate::error::Result;
use crate::kdtree::KdTreeIndex;
use crate::r#type::{as_mask, as_point, IndexableNum};

/// A single stored point in the tree, together with the axis it partitions its children on.
///
/// For a node with discriminant `d`, every point in the left subtree has a `d`-th coordinate less
/// than or equal to this node's, and every point in the right subtree has a strictly greater one.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<N: IndexableNum, const K: usize> {
    point: [N; K],

    /// The axis that the children of this node are split over.
    discriminant: usize,

    left: Option<Box<Node<N, K>>>,
    right: Option<Box<Node<N, K>>>,
}

impl<N: IndexableNum, const K: usize> Node<N, K> {
    pub(crate) fn new(point: [N; K], discriminant: usize) -> Self {
        debug_assert!(discriminant < K);
        Self {
            point,
            discriminant,
            left: None,
            right: None,
        }
    }

    /// The stored point.
    #[inline]
    pub fn point(&self) -> &[N; K] {
        &self.point
    }

    /// The axis this node partitions its children on.
    #[inline]
    pub fn discriminant(&self) -> usize {
        self.discriminant
    }

    /// The number of coordinates in the stored point. Always `K`.
    #[inline]
    pub fn dimensions(&self) -> usize {
        K
    }

    /// The child holding points that are less than or equal to this one on the discriminant axis.
    #[inline]
    pub fn left(&self) -> Option<&Node<N, K>> {
        self.left.as_deref()
    }

    /// The child holding points strictly greater than this one on the discriminant axis.
    #[inline]
    pub fn right(&self) -> Option<&Node<N, K>> {
        self.right.as_deref()
    }

    /// Returns `true` if this node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Returns `true` if `point` agrees with the stored point on every axis selected by `mask`.
    ///
    /// An all-`false` mask matches any point.
    pub fn equal_with_mask(&self, point: &[N], mask: &[bool]) -> Result<bool> {
        let point = as_point::<N, K>(point)?;
        let mask = as_mask::<K>(mask)?;
        Ok(self.matches(point, mask))
    }

    #[inline]
    pub(crate) fn matches(&self, point: &[N; K], mask: &[bool; K]) -> bool {
        self.point
            .iter()
            .zip(point)
            .zip(mask)
            .all(|((stored, query), selected)| !selected || stored == query)
    }

    /// The value this node splits on, i.e. its coordinate on the discriminant axis.
    #[inline]
    pub(crate) fn split(&self) -> N {
        self.point[self.discriminant]
    }

    /// The child slot a point with the given coordinates belongs to. Ties go left.
    #[inline]
    pub(crate) fn child_slot_mut(&mut self, point: &[N; K]) -> &mut Option<Box<Node<N, K>>> {
        if point[self.discriminant] <= self.split() {
            &mut self.left
        } else {
            &mut self.right
        }
    }

    /// The child a point with the given coordinates would have been inserted under.
    #[inline]
    pub(crate) fn child_for(&self, point: &[N; K]) -> Option<&Node<N, K>> {
        if point[self.discriminant] <= self.split() {
            self.left()
        } else {
            self.right()
        }
    }
}

impl<N: IndexableNum, const K: usize> Index<usize> for Node<N, K> {
    type Output = N;

    fn index(&self, axis: usize) -> &Self::Output {
        &self.point[axis]
    }
}

impl<N: IndexableNum, const K: usize> fmt::Display for Node<N, K> {
    /// Formats as `(<discriminant>|<c0>,<c1>,...)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}|", self.discriminant)?;
        for (i, coord) in self.point.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", coord)?;
        }
        f.write_str(")")
    }
}

impl<N: IndexableNum, const K: usize> Drop for Node<N, K> {
    /// Releases the subtree with an explicit stack. Each node's children are detached before the
    /// node itself is freed, so a tree built from sorted input is not released recursively.
    fn drop(&mut self) {
        let mut stack: Vec<Box<Node<N, K>>> = Vec::new();
        stack.extend(self.left.take());
        stack.extend(self.right.take());

        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

impl<N: IndexableNum, const K: usize> KdTreeIndex<N, K> for Node<N, K> {
    fn root(&self) -> Option<&Node<N, K>> {
        Some(self)
    }
}

impl<N: IndexableNum, const K: usize> CoordTrait for Node<N, K> {
    type T = N;

    fn dim(&self) -> Dimensions {
        match K {
            2 => Dimensions::Xy,
            3 => Dimensions::Xyz,
            n => Dimensions::Unknown(n),
        }
    }

    fn x(&self) -> Self::T {
        self.point[0]
    }

    fn y(&self) -> Self::T {
        self.point[1]
    }

    fn nth_or_panic(&self, n: usize) -> Self::T {
        self.point[n]
    }
}
