//! Kruskal backbone that refuses lanes clipping unrelated stars.

use starmap_core::{segment_clears, Adjacency, Edge, LaneTuning, Point};
use tracing::debug;

use crate::UnionFind;

/// Pure system that derives the minimum spanning backbone of a galaxy.
#[derive(Clone, Debug)]
pub struct SpanningTreeBuilder {
    clearance: f64,
}

impl Default for SpanningTreeBuilder {
    fn default() -> Self {
        Self::new(&LaneTuning::default())
    }
}

impl SpanningTreeBuilder {
    /// Creates a builder using the backbone clearance from `tuning`.
    #[must_use]
    pub fn new(tuning: &LaneTuning) -> Self {
        Self::with_clearance(tuning.backbone_clearance)
    }

    /// Creates a builder with an explicit clearance radius.
    #[must_use]
    pub const fn with_clearance(clearance: f64) -> Self {
        Self { clearance }
    }

    /// Runs Kruskal's algorithm over `edges`.
    ///
    /// Candidates are visited shortest first; equal lengths keep their
    /// enumeration order. A candidate is skipped when it would close a cycle
    /// or pass within the clearance radius of a third star. The search stops
    /// after `n - 1` lanes or when candidates run out, so the result may be a
    /// forest that connectivity repair has to join.
    #[must_use]
    pub fn build_mst(&self, points: &[Point], edges: &[Edge]) -> Adjacency {
        let node_count = points.len();
        let mut adjacency = Adjacency::new(node_count);
        if node_count < 2 {
            return adjacency;
        }

        let mut ordered: Vec<&Edge> = edges.iter().collect();
        ordered.sort_by(|a, b| a.length().total_cmp(&b.length()));

        let target = node_count - 1;
        let mut sets = UnionFind::new(node_count);
        let mut accepted = 0usize;
        let mut rejected = 0usize;

        for edge in ordered {
            if accepted == target {
                break;
            }
            let (u, v) = edge.endpoints();
            if u == v || v >= node_count || sets.connected(u, v) {
                continue;
            }
            if !segment_clears(points, u, v, self.clearance) {
                rejected += 1;
                continue;
            }

            let _ = sets.union(u, v);
            if adjacency.connect(u, v) {
                accepted += 1;
            }
        }

        debug!(
            accepted,
            rejected,
            target,
            "built collision-aware spanning backbone"
        );
        adjacency
    }
}
