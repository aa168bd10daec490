use nodefinder::{BoundingBox, FinderConfig, IndexKind, NearestPointResolver, NodeFinder, PointSet};
use std::time::Instant;

fn main() {
    // RUST_LOG=debug shows the build summaries.
    env_logger::init();

    // Initialize Rayon explicitly so thread creation happens
    // before the batch we want to profile.
    rayon::ThreadPoolBuilder::new().build_global().unwrap();

    let bounds = BoundingBox::new([0.0, 0.0], [1000.0, 1000.0]);
    let points = PointSet::random(100_000, bounds, 7);
    let queries = PointSet::random(1_000_000, bounds, 8);
    let queries: Vec<[f64; 2]> = queries.iter().map(|p| p.position()).collect();

    for kind in [IndexKind::Tree, IndexKind::Grid] {
        let config = FinderConfig { kind, ..Default::default() };

        let start = Instant::now();
        let finder = NodeFinder::new(&points, &config);
        let built = start.elapsed();

        let start = Instant::now();
        let found = finder.query_batch(&queries, finder.default_max_distance());
        let queried = start.elapsed();

        let hits = found.iter().filter(|id| id.is_some()).count();
        println!(
            "{:?}: build {:?}, {} queries {:?}, {} hits",
            kind,
            built,
            queries.len(),
            queried,
            hits
        );
    }
}
