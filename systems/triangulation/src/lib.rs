#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Candidate lane extraction from a planar triangulation.
//!
//! The triangulation itself is pluggable through [`TriangleSource`]; the
//! default [`SpadeDelaunay`] source wraps the `spade` crate. Whenever the
//! source cannot produce triangles the [`Triangulator`] degrades to the
//! all-pairs edge set so downstream stages always have candidates to work
//! with.

use std::collections::HashSet;

use spade::{DelaunayTriangulation, Point2, Triangulation};
use starmap_core::{Edge, Point};
use tracing::{debug, warn};

/// Reasons a [`TriangleSource`] could not triangulate a point set.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TriangulationError {
    /// Fewer than three points cannot form a triangle.
    #[error("triangulation needs at least 3 points, got {count}")]
    TooFewPoints {
        /// Number of points supplied.
        count: usize,
    },
    /// The backend rejected a point.
    #[error("point {index} could not be inserted: {reason}")]
    Insertion {
        /// Index of the rejected point.
        index: usize,
        /// Backend description of the failure.
        reason: String,
    },
    /// Two points share the same coordinates.
    #[error("point {index} duplicates point {existing}")]
    DuplicatePoint {
        /// Index of the later point.
        index: usize,
        /// Index of the point it coincides with.
        existing: usize,
    },
    /// The points are collinear and span no triangle.
    #[error("points are collinear and form no triangles")]
    Degenerate,
    /// A custom source failed for its own reasons.
    #[error("triangle source failed: {0}")]
    Backend(String),
}

/// Produces triangles as index triples into the supplied point slice.
pub trait TriangleSource {
    /// Triangulates `points`.
    fn triangles(&self, points: &[Point]) -> Result<Vec<[usize; 3]>, TriangulationError>;
}

/// Delaunay triangulation backed by the `spade` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpadeDelaunay;

impl TriangleSource for SpadeDelaunay {
    fn triangles(&self, points: &[Point]) -> Result<Vec<[usize; 3]>, TriangulationError> {
        if points.len() < 3 {
            return Err(TriangulationError::TooFewPoints {
                count: points.len(),
            });
        }

        let mut triangulation: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();
        for (index, point) in points.iter().enumerate() {
            if !point.is_finite() {
                return Err(TriangulationError::Insertion {
                    index,
                    reason: "coordinates are not finite".to_owned(),
                });
            }
            let handle = triangulation
                .insert(Point2::new(point.x, point.y))
                .map_err(|error| TriangulationError::Insertion {
                    index,
                    reason: format!("{error:?}"),
                })?;
            if handle.index() != index {
                return Err(TriangulationError::DuplicatePoint {
                    index,
                    existing: handle.index(),
                });
            }
        }

        let triangles: Vec<[usize; 3]> = triangulation
            .inner_faces()
            .map(|face| face.vertices().map(|vertex| vertex.fix().index()))
            .collect();
        if triangles.is_empty() {
            return Err(TriangulationError::Degenerate);
        }
        Ok(triangles)
    }
}

/// Candidate lanes produced by a [`Triangulator`].
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateEdges {
    edges: Vec<Edge>,
    fallback: Option<TriangulationError>,
}

impl CandidateEdges {
    /// Candidate edges in enumeration order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Reason the all-pairs fallback was used, if it was.
    #[must_use]
    pub fn fallback_reason(&self) -> Option<&TriangulationError> {
        self.fallback.as_ref()
    }

    /// Returns `true` when the candidates came from the all-pairs fallback.
    #[must_use]
    pub fn used_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Pure system turning point clouds into deduplicated candidate lanes.
#[derive(Clone, Debug, Default)]
pub struct Triangulator<S = SpadeDelaunay> {
    source: S,
}

impl<S: TriangleSource> Triangulator<S> {
    /// Creates a triangulator backed by `source`.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Extracts every distinct triangulation edge, annotated with its length.
    ///
    /// Falls back to all pairs when the source fails.
    pub fn triangulate(&self, points: &[Point]) -> CandidateEdges {
        match self.source.triangles(points) {
            Ok(triangles) => {
                let edges = triangle_edges(points, &triangles);
                debug!(
                    triangles = triangles.len(),
                    edges = edges.len(),
                    "extracted triangulation edges"
                );
                CandidateEdges {
                    edges,
                    fallback: None,
                }
            }
            Err(error) => {
                if points.len() >= 3 {
                    warn!(%error, "triangulation failed, using all-pairs candidates");
                } else {
                    debug!(%error, "too few points to triangulate, using all-pairs candidates");
                }
                CandidateEdges {
                    edges: all_pairs(points),
                    fallback: Some(error),
                }
            }
        }
    }
}

/// Unique canonical edges of `triangles` in the order they are first seen.
#[must_use]
pub fn triangle_edges(points: &[Point], triangles: &[[usize; 3]]) -> Vec<Edge> {
    let mut seen = HashSet::new();
    let mut edges = Vec::with_capacity(triangles.len() * 3 / 2 + 2);

    for &[a, b, c] in triangles {
        for (u, v) in [(a, b), (b, c), (c, a)] {
            if u == v || u >= points.len() || v >= points.len() {
                continue;
            }
            if seen.insert((u.min(v), u.max(v))) {
                edges.push(Edge::measured(points, u, v));
            }
        }
    }
    edges
}

/// Every unordered pair of points as an edge.
#[must_use]
pub fn all_pairs(points: &[Point]) -> Vec<Edge> {
    let mut edges = Vec::with_capacity(points.len() * points.len().saturating_sub(1) / 2);
    for u in 0..points.len() {
        for v in (u + 1)..points.len() {
            edges.push(Edge::measured(points, u, v));
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ]
    }

    #[test]
    fn shared_edges_are_deduplicated() {
        let points = square();
        let edges = triangle_edges(&points, &[[0, 1, 2], [0, 2, 3]]);

        let pairs: Vec<_> = edges.iter().map(Edge::endpoints).collect();
        assert_eq!(pairs, vec![(0, 1), (1, 2), (0, 2), (2, 3), (0, 3)]);
        assert_eq!(edges[0].length(), 100.0);
    }

    #[test]
    fn spade_triangulates_a_square_into_five_edges() {
        let candidates = Triangulator::<SpadeDelaunay>::default().triangulate(&square());

        assert!(!candidates.used_fallback());
        assert_eq!(candidates.edges().len(), 5);
        assert!(candidates.edges().iter().all(|edge| edge.u() < edge.v()));
    }

    #[test]
    fn two_points_fall_back_to_a_single_pair() {
        let points = [Point::new(0.0, 0.0), Point::new(3.0, 4.0)];
        let candidates = Triangulator::<SpadeDelaunay>::default().triangulate(&points);

        assert_eq!(
            candidates.fallback_reason(),
            Some(&TriangulationError::TooFewPoints { count: 2 })
        );
        assert_eq!(candidates.edges(), &[Edge::between(0, 1, 5.0)]);
    }

    #[test]
    fn collinear_points_fall_back_to_all_pairs() {
        let points: Vec<Point> = (0..4).map(|i| Point::new(f64::from(i) * 10.0, 0.0)).collect();
        let candidates = Triangulator::<SpadeDelaunay>::default().triangulate(&points);

        assert_eq!(
            candidates.fallback_reason(),
            Some(&TriangulationError::Degenerate)
        );
        assert_eq!(candidates.edges().len(), 6);
    }

    #[test]
    fn duplicate_points_are_reported() {
        let mut points = square();
        points.push(Point::new(100.0, 0.0));

        assert_eq!(
            SpadeDelaunay.triangles(&points),
            Err(TriangulationError::DuplicatePoint {
                index: 4,
                existing: 1
            })
        );
    }

    #[test]
    fn non_finite_points_are_rejected() {
        let mut points = square();
        points[2] = Point::new(f64::NAN, 1.0);

        assert!(matches!(
            SpadeDelaunay.triangles(&points),
            Err(TriangulationError::Insertion { index: 2, .. })
        ));

        points[2] = Point::new(1.0, 1.0);
        points[3] = Point::new(0.0, f64::INFINITY);
        let candidates = Triangulator::<SpadeDelaunay>::default().triangulate(&points);
        assert!(matches!(
            candidates.fallback_reason(),
            Some(TriangulationError::Insertion { index: 3, reason }) if reason.contains("finite")
        ));
    }
}
