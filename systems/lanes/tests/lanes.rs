use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use starmap_core::{Edge, LaneTuning, Point};
use starmap_system_lanes::{EdgeAugmenter, SpanningTreeBuilder, UnionFind};

fn grid(side: usize, spacing: f64) -> Vec<Point> {
    (0..side * side)
        .map(|index| {
            Point::new(
                (index % side) as f64 * spacing,
                (index / side) as f64 * spacing,
            )
        })
        .collect()
}

fn all_pairs(points: &[Point]) -> Vec<Edge> {
    (0..points.len())
        .flat_map(|a| ((a + 1)..points.len()).map(move |b| (a, b)))
        .map(|(a, b)| Edge::measured(points, a, b))
        .collect()
}

#[test]
fn backbone_spans_a_grid_with_unit_lanes() {
    let points = grid(4, 100.0);
    let edges = all_pairs(&points);
    let tuning = LaneTuning::default();

    let adjacency = SpanningTreeBuilder::new(&tuning).build_mst(&points, &edges);

    assert_eq!(adjacency.edge_count(), points.len() - 1);
    let mut sets = UnionFind::new(points.len());
    for (a, b) in adjacency.edges() {
        assert!((points[a].distance(points[b]) - 100.0).abs() < 1e-9);
        let _ = sets.union(a, b);
    }
    assert!((1..points.len()).all(|node| sets.connected(0, node)));
}

#[test]
fn augmentation_adds_clear_short_lanes_up_to_the_cap() {
    let points = grid(4, 100.0);
    let edges = all_pairs(&points);
    let tuning = LaneTuning::default();
    let mut adjacency = SpanningTreeBuilder::new(&tuning).build_mst(&points, &edges);
    let backbone = adjacency.clone();
    let mut rng = ChaCha8Rng::seed_from_u64(6);

    let outcome = EdgeAugmenter::new(&tuning).augment(&points, &mut adjacency, &edges, &mut rng);

    assert_eq!(outcome.cap(), 1);
    assert_eq!(outcome.added().len(), 1);
    let lane = outcome.added()[0];
    assert!(!backbone.contains(lane.u(), lane.v()));
    assert!(lane.length() < 150.0, "lane of {} crosses a star", lane.length());
    assert_eq!(adjacency.edge_count(), backbone.edge_count() + 1);
}
