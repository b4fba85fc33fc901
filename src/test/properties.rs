//! Randomized checks of every query against a brute-force scan over the stored points.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::kdtree::{DistanceMetric, EuclideanDistance, KdTree, KdTreeIndex, Node};
use crate::IndexableNum;

const NUM_TREES: usize = 20;
const NUM_POINTS: usize = 300;
const NUM_QUERIES: usize = 50;

/// Integer points from a small range, so ties and duplicates are common.
fn random_tree(rng: &mut StdRng) -> (KdTree<i32, 3>, Vec<[i32; 3]>) {
    let points: Vec<[i32; 3]> = (0..NUM_POINTS)
        .map(|_| [rng.gen_range(0..8), rng.gen_range(0..8), rng.gen_range(0..8)])
        .collect();
    let mut tree = KdTree::new().unwrap();
    tree.try_extend(&points).unwrap();
    (tree, points)
}

fn random_float_tree(rng: &mut StdRng) -> (KdTree<f64, 2>, Vec<[f64; 2]>) {
    let points: Vec<[f64; 2]> = (0..NUM_POINTS)
        .map(|_| [rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0)])
        .collect();
    let mut tree = KdTree::new().unwrap();
    tree.try_extend(&points).unwrap();
    (tree, points)
}

fn assert_partitioned<N: IndexableNum, const K: usize>(node: &Node<N, K>) {
    let axis = node.discriminant();
    let split = node[axis];
    assert!(axis < K);

    if let Some(left) = node.left() {
        assert_eq!(left.discriminant(), (axis + 1) % K);
        assert!(left.iter().all(|point| point[axis] <= split));
        assert_partitioned(left);
    }
    if let Some(right) = node.right() {
        assert_eq!(right.discriminant(), (axis + 1) % K);
        assert!(right.iter().all(|point| point[axis] > split));
        assert_partitioned(right);
    }
}

#[test]
fn insertion_preserves_the_partition() {
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..NUM_TREES {
        let (tree, points) = random_tree(&mut rng);
        assert_eq!(tree.len(), points.len());
        assert_eq!(tree.iter().count(), points.len());

        let root = tree.root().unwrap();
        assert_eq!(root.discriminant(), 0);
        assert_partitioned(root);

        let (tree, _) = random_float_tree(&mut rng);
        assert_partitioned(tree.root().unwrap());
    }
}

#[test]
fn every_inserted_point_is_found() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..NUM_TREES {
        let (tree, points) = random_tree(&mut rng);
        for point in &points {
            assert_eq!(tree.find_exact(point).unwrap(), Some(point));
        }

        let (tree, points) = random_float_tree(&mut rng);
        for point in &points {
            assert_eq!(tree.find_exact(point).unwrap(), Some(point));
        }
    }
}

#[test]
fn masked_search_matches_a_scan() {
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..NUM_TREES {
        let (tree, _) = random_tree(&mut rng);
        for _ in 0..NUM_QUERIES {
            let query = [rng.gen_range(0..8), rng.gen_range(0..8), rng.gen_range(0..8)];
            let mask = [rng.gen_bool(0.5), rng.gen_bool(0.5), rng.gen_bool(0.5)];

            let expected: Vec<_> = tree
                .iter()
                .filter(|point| (0..3).all(|i| !mask[i] || point[i] == query[i]))
                .collect();
            let found = tree.find_with_mask(&query, &mask).unwrap();

            // Pruning only skips nodes, so matches keep their pre-order
            assert_eq!(found, expected);
        }

        let everything = tree.find_with_mask(&[0, 0, 0], &[false; 3]).unwrap();
        assert_eq!(everything.len(), tree.len());
    }
}

#[test]
fn nearest_matches_a_scan() {
    let metric = EuclideanDistance;
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..NUM_TREES {
        let (tree, points) = random_float_tree(&mut rng);
        for _ in 0..NUM_QUERIES {
            let query = [rng.gen_range(-120.0..120.0), rng.gen_range(-120.0..120.0)];

            let best = points
                .iter()
                .map(|point| metric.distance(point, &query))
                .fold(f64::INFINITY, f64::min);
            let neighbor = tree.find_nearest_with_stats(&query).unwrap().unwrap();

            assert_eq!(neighbor.distance, best);
            assert_eq!(metric.distance(neighbor.point, &query), best);
            assert!(neighbor.visited <= tree.len());
        }

        let (tree, _) = random_tree(&mut rng);
        for _ in 0..NUM_QUERIES {
            let query = [rng.gen_range(-2..10), rng.gen_range(-2..10), rng.gen_range(-2..10)];
            let best = tree
                .iter()
                .map(|point| metric.distance(point, &query))
                .fold(f64::INFINITY, f64::min);
            let found = tree.find_nearest(&query).unwrap().unwrap();
            assert_eq!(metric.distance(found, &query), best);
        }
    }
}

#[test]
fn nearest_of_a_stored_point_is_itself() {
    let mut rng = StdRng::seed_from_u64(4);
    let (tree, points) = random_float_tree(&mut rng);
    for point in &points {
        let neighbor = tree.find_nearest_with_stats(point).unwrap().unwrap();
        assert_eq!(neighbor.point, point);
        assert_eq!(neighbor.distance, 0.);
    }
}

#[test]
fn range_and_radius_match_a_scan() {
    let metric = EuclideanDistance;
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..NUM_TREES {
        let (tree, _) = random_float_tree(&mut rng);
        for _ in 0..NUM_QUERIES {
            let a = [rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0)];
            let b = [rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0)];
            let min = [f64::min(a[0], b[0]), f64::min(a[1], b[1])];
            let max = [f64::max(a[0], b[0]), f64::max(a[1], b[1])];

            let expected: Vec<_> = tree
                .iter()
                .filter(|p| min[0] <= p[0] && p[0] <= max[0] && min[1] <= p[1] && p[1] <= max[1])
                .collect();
            assert_eq!(tree.range(&min, &max).unwrap(), expected);

            let r = rng.gen_range(0.0..40.0);
            let expected: Vec<_> = tree
                .iter()
                .filter(|p| metric.distance(*p, &a) <= r)
                .collect();
            assert_eq!(tree.within(&a, r).unwrap(), expected);
        }
    }
}
