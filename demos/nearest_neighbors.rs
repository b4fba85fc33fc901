//! Example building a small k-d tree and running each kind of query on it.
//!
//! Run with `RUST_LOG=kd_index=trace` to see the diagnostics emitted by the tree.

use kd_index::kdtree::{KdTree, KdTreeIndex, ManhattanDistance};
use tracing_subscriber::EnvFilter;

fn main() -> kd_index::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== K-D Tree Example ===\n");

    let mut tree = KdTree::<f64, 2>::new()?;
    tree.try_extend([
        [5., 5.],
        [2., 3.],
        [2., 4.],
        [3., 6.],
        [8., 2.],
        [6., 7.],
        [8., 4.],
        [8., 1.],
        [6., 2.],
        [9., 2.],
        [4.95, 0.25],
    ])?;

    println!("Tree with {} points:\n{}\n", tree.len(), tree);

    let query = [7.5, 2.5];
    if let Some(neighbor) = tree.find_nearest_with_stats(&query)? {
        println!(
            "Nearest to {:?}: {:?} at distance {:.3} ({} nodes visited)",
            query, neighbor.point, neighbor.distance, neighbor.visited
        );
    }
    if let Some(neighbor) = tree.find_nearest_with(&query, &ManhattanDistance)? {
        println!(
            "Nearest to {:?} by Manhattan distance: {:?} at distance {:.3}",
            query, neighbor.point, neighbor.distance
        );
    }

    println!("Exact match for [5, 8]: {:?}", tree.find_exact(&[5., 8.])?);
    println!(
        "Points with x == 8: {:?}",
        tree.find_with_mask(&[8., 0.], &[true, false])?
    );
    println!(
        "Points in [6, 1]..[8, 2]: {:?}",
        tree.range(&[6., 1.], &[8., 2.])?
    );
    println!("Points within 1 of [8, 2]: {:?}", tree.within(&[8., 2.], 1.)?);

    // Shape mismatches are reported, not panicked on
    if let Err(err) = tree.insert(&[1., 2., 3.]) {
        println!("\nRejected insertion: {}", err);
    }

    Ok(())
}
