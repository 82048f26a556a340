//! Short redundant lanes layered on top of the backbone.

use rand::seq::SliceRandom;
use rand::Rng;
use starmap_core::{segment_clears, Adjacency, Edge, LaneTuning, Point};
use tracing::debug;

/// Lanes added by one augmentation pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AugmentOutcome {
    added: Vec<Edge>,
    cap: usize,
}

impl AugmentOutcome {
    /// Lanes that were added, in insertion order.
    #[must_use]
    pub fn added(&self) -> &[Edge] {
        &self.added
    }

    /// Maximum number of lanes the pass was allowed to add.
    #[must_use]
    pub const fn cap(&self) -> usize {
        self.cap
    }
}

/// Pure system that densifies the backbone with short triangulation edges.
#[derive(Clone, Debug)]
pub struct EdgeAugmenter {
    clearance: f64,
    fraction: f64,
    max_length: f64,
}

impl Default for EdgeAugmenter {
    fn default() -> Self {
        Self::new(&LaneTuning::default())
    }
}

impl EdgeAugmenter {
    /// Creates an augmenter from the lane tuning.
    #[must_use]
    pub fn new(tuning: &LaneTuning) -> Self {
        Self {
            clearance: tuning.augment_clearance,
            fraction: tuning.augment_fraction.max(0.0),
            max_length: tuning.augment_max_length,
        }
    }

    /// Maximum number of lanes added to a map of `node_count` territories.
    #[must_use]
    pub fn cap(&self, node_count: usize) -> usize {
        (node_count as f64 * self.fraction + 1e-9).floor() as usize
    }

    /// Adds up to [`cap`](Self::cap) short lanes from `edges` that are not yet
    /// present and that keep clear of unrelated stars.
    pub fn augment<R>(
        &self,
        points: &[Point],
        adjacency: &mut Adjacency,
        edges: &[Edge],
        rng: &mut R,
    ) -> AugmentOutcome
    where
        R: Rng + ?Sized,
    {
        let cap = self.cap(points.len());
        let mut outcome = AugmentOutcome {
            added: Vec::with_capacity(cap),
            cap,
        };
        if cap == 0 {
            return outcome;
        }

        let mut candidates: Vec<Edge> = edges
            .iter()
            .filter(|edge| {
                edge.v() < points.len()
                    && edge.length() <= self.max_length
                    && !adjacency.contains(edge.u(), edge.v())
            })
            .copied()
            .collect();
        let candidate_count = candidates.len();
        candidates.shuffle(rng);

        for edge in candidates {
            if outcome.added.len() >= cap {
                break;
            }
            if !segment_clears(points, edge.u(), edge.v(), self.clearance) {
                continue;
            }
            if adjacency.connect(edge.u(), edge.v()) {
                outcome.added.push(edge);
            }
        }

        debug!(
            cap,
            candidates = candidate_count,
            added = outcome.added.len(),
            "augmented warp lanes"
        );
        outcome
    }
}
