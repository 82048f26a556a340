//! Bridges disconnected lane components.

use starmap_core::{segment_clears, Adjacency, Edge, LaneTuning, Point};
use tracing::{debug, error, warn};

use crate::components;

/// Bridges inserted by one repair pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RepairOutcome {
    bridges: Vec<Edge>,
    clipping_bridges: usize,
    components_before: usize,
    components_after: usize,
}

impl RepairOutcome {
    /// Bridge lanes in insertion order.
    #[must_use]
    pub fn bridges(&self) -> &[Edge] {
        &self.bridges
    }

    /// Bridges that had to pass within the clearance radius of a third star.
    #[must_use]
    pub const fn clipping_bridges(&self) -> usize {
        self.clipping_bridges
    }

    /// Component count found before repairing.
    #[must_use]
    pub const fn components_before(&self) -> usize {
        self.components_before
    }

    /// Component count after repairing; `1` for any non-empty graph.
    #[must_use]
    pub const fn components_after(&self) -> usize {
        self.components_after
    }
}

/// Pure system that joins every component of the lane graph.
#[derive(Clone, Debug)]
pub struct ConnectivityRepair {
    clearance: f64,
}

impl Default for ConnectivityRepair {
    fn default() -> Self {
        Self::new(&LaneTuning::default())
    }
}

impl ConnectivityRepair {
    /// Creates a repair pass preferring bridges that respect the backbone clearance.
    #[must_use]
    pub fn new(tuning: &LaneTuning) -> Self {
        Self {
            clearance: tuning.backbone_clearance,
        }
    }

    /// Connects every component to the first-discovered one.
    ///
    /// Each other component is bridged at its closest pair of stars to the
    /// main component. The closest pair that keeps clear of unrelated stars
    /// is preferred; when none does, the closest pair overall is used so the
    /// graph always ends up connected.
    pub fn repair(&self, points: &[Point], adjacency: &mut Adjacency) -> RepairOutcome {
        let mut remaining = components(adjacency);
        let mut outcome = RepairOutcome {
            components_before: remaining.len(),
            ..RepairOutcome::default()
        };

        let mut rounds = points.len();
        while remaining.len() > 1 && rounds > 0 {
            rounds -= 1;
            let mut groups = remaining.into_iter();
            let mut main = groups.next().unwrap_or_default();

            for other in groups {
                let Some(bridge) = self.closest_bridge(points, &main, &other) else {
                    continue;
                };
                if !bridge.clears {
                    outcome.clipping_bridges += 1;
                    warn!(
                        from = bridge.edge.u(),
                        to = bridge.edge.v(),
                        "no clear bridge available, accepting a lane that clips a star"
                    );
                }
                if adjacency.connect(bridge.edge.u(), bridge.edge.v()) {
                    outcome.bridges.push(bridge.edge);
                }
                main.extend(other);
            }

            remaining = components(adjacency);
        }

        outcome.components_after = remaining.len();
        if outcome.components_after > 1 {
            error!(
                components = outcome.components_after,
                "connectivity repair failed to join every component"
            );
        }
        debug!(
            before = outcome.components_before,
            bridges = outcome.bridges.len(),
            clipping = outcome.clipping_bridges,
            "repaired lane connectivity"
        );
        outcome
    }

    fn closest_bridge(&self, points: &[Point], main: &[usize], other: &[usize]) -> Option<Bridge> {
        let mut pairs: Vec<(f64, usize, usize)> = main
            .iter()
            .flat_map(|&a| {
                other
                    .iter()
                    .map(move |&b| (points[a].distance_squared(points[b]), a, b))
            })
            .collect();
        pairs.sort_by(|left, right| left.0.total_cmp(&right.0));

        let &(_, nearest_a, nearest_b) = pairs.first()?;
        let (a, b, clears) = pairs
            .iter()
            .find(|&&(_, a, b)| segment_clears(points, a, b, self.clearance))
            .map_or((nearest_a, nearest_b, false), |&(_, a, b)| (a, b, true));

        Some(Bridge {
            edge: Edge::measured(points, a, b),
            clears,
        })
    }
}

#[derive(Clone, Copy, Debug)]
struct Bridge {
    edge: Edge,
    clears: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isolated_nodes_are_bridged_to_the_main_component() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(400.0, 0.0),
            Point::new(100.0, 300.0),
        ];
        let mut adjacency = Adjacency::new(points.len());
        let _ = adjacency.connect(0, 1);

        let outcome = ConnectivityRepair::default().repair(&points, &mut adjacency);

        assert_eq!(outcome.components_before(), 3);
        assert_eq!(outcome.components_after(), 1);
        assert_eq!(outcome.clipping_bridges(), 0);
        assert!(adjacency.contains(1, 2));
        assert!(adjacency.contains(1, 3));
        assert_eq!(components(&adjacency).len(), 1);
    }

    #[test]
    fn clear_bridge_is_preferred_over_a_clipping_one() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(50.0, 10.0),
            Point::new(0.0, -60.0),
        ];
        let mut adjacency = Adjacency::new(points.len());
        let _ = adjacency.connect(0, 3);

        let outcome = ConnectivityRepair::default().repair(&points, &mut adjacency);

        assert_eq!(outcome.components_before(), 3);
        assert_eq!(outcome.bridges()[0].endpoints(), (1, 3));
        assert_eq!(outcome.clipping_bridges(), 0);
        assert!(!adjacency.contains(0, 1));
        assert_eq!(components(&adjacency).len(), 1);
    }

    #[test]
    fn clipping_bridge_is_used_when_nothing_clears() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(0.0, 10.0),
        ];
        let mut adjacency = Adjacency::new(points.len());
        let _ = adjacency.connect(0, 2);

        let outcome = ConnectivityRepair::default().repair(&points, &mut adjacency);

        assert_eq!(outcome.bridges().len(), 1);
        assert_eq!(outcome.bridges()[0].endpoints(), (0, 1));
        assert_eq!(outcome.clipping_bridges(), 1);
        assert_eq!(outcome.components_after(), 1);
    }

    #[test]
    fn connected_graph_is_left_untouched() {
        let points = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let mut adjacency = Adjacency::new(2);
        let _ = adjacency.connect(0, 1);
        let before = adjacency.clone();

        let outcome = ConnectivityRepair::default().repair(&points, &mut adjacency);

        assert!(outcome.bridges().is_empty());
        assert_eq!(adjacency, before);
    }

    #[test]
    fn single_and_empty_graphs_need_no_repair() {
        let mut empty = Adjacency::new(0);
        let outcome = ConnectivityRepair::default().repair(&[], &mut empty);
        assert_eq!(outcome.components_after(), 0);

        let mut single = Adjacency::new(1);
        let outcome = ConnectivityRepair::default().repair(&[Point::new(1.0, 1.0)], &mut single);
        assert_eq!(outcome.components_after(), 1);
    }
}
