//! Utilities to traverse the KdTree structure.

use tinyvec::TinyVec;

use crate::kdtree::Node;
use crate::r#type::IndexableNum;

// Enough for trees about 32 levels deep before spilling to the heap.
type Stack<'a, N, const K: usize> = TinyVec<[Option<&'a Node<N, K>>; 32]>;

/// Which children of a visited node a pruned traversal should descend into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Descend {
    pub(crate) left: bool,
    pub(crate) right: bool,
}

impl Descend {
    pub(crate) const BOTH: Self = Self {
        left: true,
        right: true,
    };
}

/// Walk a subtree in pre-order (node, left subtree, right subtree), letting `visit` decide which
/// children of each node are worth descending into.
///
/// Returns the number of nodes visited.
pub(crate) fn walk_pruned<'a, N: IndexableNum, const K: usize>(
    root: Option<&'a Node<N, K>>,
    mut visit: impl FnMut(&'a Node<N, K>) -> Descend,
) -> usize {
    // Use TinyVec to avoid heap allocations
    let mut stack: Stack<'a, N, K> = TinyVec::new();
    stack.push(root);

    let mut visited = 0;
    while let Some(entry) = stack.pop() {
        let Some(node) = entry else {
            continue;
        };
        visited += 1;

        let descend = visit(node);

        // Note: these are pushed in backwards order to what gets popped
        if descend.right {
            stack.push(node.right());
        }
        if descend.left {
            stack.push(node.left());
        }
    }

    visited
}

/// The number of nodes on the longest path from `node` down to a leaf.
pub(crate) fn height<N: IndexableNum, const K: usize>(node: Option<&Node<N, K>>) -> usize {
    node.map_or(0, |node| 1 + height(node.left()).max(height(node.right())))
}

/// An iterator over the points stored in a subtree, in pre-order.
///
/// Created by [`KdTreeIndex::iter`][crate::kdtree::KdTreeIndex::iter].
#[derive(Debug, Clone)]
pub struct Iter<'a, N: IndexableNum, const K: usize> {
    stack: Stack<'a, N, K>,
}

impl<'a, N: IndexableNum, const K: usize> Iter<'a, N, K> {
    pub(crate) fn new(root: Option<&'a Node<N, K>>) -> Self {
        let mut stack = TinyVec::new();
        stack.push(root);
        Self { stack }
    }
}

impl<'a, N: IndexableNum, const K: usize> Iterator for Iter<'a, N, K> {
    type Item = &'a [N; K];

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(entry) = self.stack.pop() {
            if let Some(node) = entry {
                self.stack.push(node.right());
                self.stack.push(node.left());
                return Some(node.point());
            }
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn small_tree() -> Node<i32, 2> {
        let mut root = Node::new([5, 5], 0);
        let mut left = Node::new([2, 3], 1);
        *left.child_slot_mut(&[0, 4]) = Some(Box::new(Node::new([0, 4], 0)));
        *root.child_slot_mut(&[2, 3]) = Some(Box::new(left));
        *root.child_slot_mut(&[8, 2]) = Some(Box::new(Node::new([8, 2], 1)));
        root
    }

    #[test]
    fn iterates_in_pre_order() {
        let root = small_tree();
        let points: Vec<_> = Iter::new(Some(&root)).collect();
        assert_eq!(points, vec![&[5, 5], &[2, 3], &[0, 4], &[8, 2]]);
    }

    #[test]
    fn empty_iterator() {
        assert_eq!(Iter::<f64, 2>::new(None).count(), 0);
    }

    #[test]
    fn walk_respects_pruning() {
        let root = small_tree();
        let mut seen = vec![];
        let visited = walk_pruned(Some(&root), |node| {
            seen.push(*node.point());
            Descend {
                left: false,
                right: true,
            }
        });
        assert_eq!(visited, 2);
        assert_eq!(seen, vec![[5, 5], [8, 2]]);
    }

    #[test]
    fn height_counts_levels() {
        let root = small_tree();
        assert_eq!(height(Some(&root)), 3);
        assert_eq!(height::<i32, 2>(None), 0);
    }
}
