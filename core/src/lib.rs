#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Starmap galaxy generator.
//!
//! This crate defines the vocabulary that connects the generation stages.
//! Samplers emit [`Point`] clouds, the triangulation stage turns them into
//! candidate [`Edge`] lists, the lane and repair stages grow an [`Adjacency`],
//! and the world crate finally materialises [`Territory`] records for the
//! hosting game. Every stage is a pure function of its inputs and the random
//! stream it is handed, so nothing in here carries global state.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod tuning;

pub use tuning::{
    AssemblyTuning, GeneratorTuning, LaneTuning, RelaxationTuning, SamplingTuning, TuningError,
};

/// Label of the random stream consumed by point sampling.
pub const RNG_STREAM_SAMPLING: &str = "starmap.sampling";
/// Label of the random stream consumed by lane augmentation.
pub const RNG_STREAM_AUGMENTATION: &str = "starmap.augmentation";
/// Label of the random stream consumed when rolling initial garrisons.
pub const RNG_STREAM_GARRISON: &str = "starmap.garrison";

/// Named point-placement strategy producing a distinct galaxy shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Poisson-disk growth inside an irregular galactic boundary.
    Organic,
    /// Dense star clusters spread across the map.
    Clusters,
    /// Four-armed spiral galaxy.
    Spiral,
    /// Centre-weighted disk.
    Core,
    /// Concentric rings.
    Rings,
    /// Two disks orbiting a shared centre.
    Binary,
}

impl Layout {
    /// Every layout in declaration order.
    pub const ALL: [Layout; 6] = [
        Layout::Organic,
        Layout::Clusters,
        Layout::Spiral,
        Layout::Core,
        Layout::Rings,
        Layout::Binary,
    ];

    /// Lower-case name used on the command line and in serialised output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Layout::Organic => "organic",
            Layout::Clusters => "clusters",
            Layout::Spiral => "spiral",
            Layout::Core => "core",
            Layout::Rings => "rings",
            Layout::Binary => "binary",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layout {
    type Err = ParseLayoutError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Layout::ALL
            .into_iter()
            .find(|layout| layout.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseLayoutError(trimmed.to_owned()))
    }
}

/// Reports that a string did not name any known [`Layout`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown galaxy layout '{0}' (expected organic, clusters, spiral, core, rings or binary)")]
pub struct ParseLayoutError(pub String);

/// Position of a star system in map space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate in world units.
    pub x: f64,
    /// Vertical coordinate in world units.
    pub y: f64,
}

impl Point {
    /// Creates a point from its coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Creates a point at `radius` from `center` along `angle` (radians).
    #[must_use]
    pub fn polar(center: Point, radius: f64, angle: f64) -> Self {
        Self {
            x: center.x + radius * angle.cos(),
            y: center.y + radius * angle.sin(),
        }
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Squared distance from this point to the segment `a`–`b`.
    ///
    /// The point is projected onto the segment and the projection parameter
    /// clamped to `[0, 1]`, so distances past either end are measured to the
    /// nearest endpoint.
    #[must_use]
    pub fn segment_distance_squared(self, a: Point, b: Point) -> f64 {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let length_squared = dx * dx + dy * dy;
        if length_squared == 0.0 {
            return self.distance_squared(a);
        }

        let t = (((self.x - a.x) * dx + (self.y - a.y) * dy) / length_squared).clamp(0.0, 1.0);
        self.distance_squared(Point::new(a.x + t * dx, a.y + t * dy))
    }

    /// Returns `true` when both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Returns `true` when the segment between `points[u]` and `points[v]` keeps
/// at least `clearance` units away from every other point.
#[must_use]
pub fn segment_clears(points: &[Point], u: usize, v: usize, clearance: f64) -> bool {
    let clearance_squared = clearance * clearance;
    let (a, b) = (points[u], points[v]);
    points
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != u && *index != v)
        .all(|(_, point)| point.segment_distance_squared(a, b) >= clearance_squared)
}

/// Undirected connection between two point indices, canonicalised so that
/// `u < v`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    u: usize,
    v: usize,
    length: f64,
}

impl Edge {
    /// Creates an edge between `a` and `b` with the provided length.
    ///
    /// The endpoints are reordered so the lower index comes first.
    #[must_use]
    pub fn between(a: usize, b: usize, length: f64) -> Self {
        Self {
            u: a.min(b),
            v: a.max(b),
            length,
        }
    }

    /// Creates an edge between `a` and `b` measuring its length from `points`.
    #[must_use]
    pub fn measured(points: &[Point], a: usize, b: usize) -> Self {
        Self::between(a, b, points[a].distance(points[b]))
    }

    /// Lower endpoint index.
    #[must_use]
    pub const fn u(&self) -> usize {
        self.u
    }

    /// Higher endpoint index.
    #[must_use]
    pub const fn v(&self) -> usize {
        self.v
    }

    /// Both endpoints as `(u, v)`.
    #[must_use]
    pub const fn endpoints(&self) -> (usize, usize) {
        (self.u, self.v)
    }

    /// Euclidean length of the edge in world units.
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.length
    }
}

/// Undirected neighbour sets keyed by point index.
///
/// Insertion keeps both directions in sync, so the structure can never hold a
/// unidirectional lane, a self-loop, or a duplicate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Adjacency {
    neighbors: Vec<BTreeSet<usize>>,
}

impl Adjacency {
    /// Creates an adjacency with `node_count` isolated nodes.
    #[must_use]
    pub fn new(node_count: usize) -> Self {
        Self {
            neighbors: vec![BTreeSet::new(); node_count],
        }
    }

    /// Number of nodes tracked by the adjacency.
    #[must_use]
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Returns `true` when the adjacency tracks no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Connects `a` and `b` in both directions.
    ///
    /// Returns `false` without modifying anything when the pair is a
    /// self-loop, out of range, or already connected.
    pub fn connect(&mut self, a: usize, b: usize) -> bool {
        if a == b || a >= self.neighbors.len() || b >= self.neighbors.len() {
            return false;
        }
        if !self.neighbors[a].insert(b) {
            return false;
        }
        let _ = self.neighbors[b].insert(a);
        true
    }

    /// Returns `true` when `a` and `b` are connected.
    #[must_use]
    pub fn contains(&self, a: usize, b: usize) -> bool {
        self.neighbors
            .get(a)
            .is_some_and(|neighbors| neighbors.contains(&b))
    }

    /// Neighbours of `node` in ascending order.
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.neighbors
            .get(node)
            .into_iter()
            .flat_map(|neighbors| neighbors.iter().copied())
    }

    /// Number of undirected edges stored.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Iterates every undirected edge once as `(u, v)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.neighbors
            .iter()
            .enumerate()
            .flat_map(|(u, neighbors)| neighbors.range(u + 1..).map(move |&v| (u, v)))
    }
}

/// Identifier assigned to a territory; matches its index in the generated list.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TerritoryId(u32);

impl TerritoryId {
    /// Creates a new territory identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Index of the territory inside the generated list.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TerritoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a player owning territories.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a new player identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Star-system node handed to the hosting game.
///
/// The topology (position, radius, neighbours) is fixed once generated; game
/// state may only change the owner and the garrison.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Territory {
    id: TerritoryId,
    x: f64,
    y: f64,
    radius: f64,
    neighbors: Vec<TerritoryId>,
    owner_id: Option<PlayerId>,
    army_size: u32,
}

impl Territory {
    /// Creates an unowned territory.
    #[must_use]
    pub fn new(
        id: TerritoryId,
        position: Point,
        radius: f64,
        neighbors: Vec<TerritoryId>,
        army_size: u32,
    ) -> Self {
        Self {
            id,
            x: position.x,
            y: position.y,
            radius,
            neighbors,
            owner_id: None,
            army_size,
        }
    }

    /// Identifier of the territory.
    #[must_use]
    pub const fn id(&self) -> TerritoryId {
        self.id
    }

    /// Horizontal coordinate in map space.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Vertical coordinate in map space.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Position as a [`Point`].
    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Visual radius of the star system.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Territories reachable over a single warp lane, ascending by id.
    #[must_use]
    pub fn neighbors(&self) -> &[TerritoryId] {
        &self.neighbors
    }

    /// Player currently owning the territory, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<PlayerId> {
        self.owner_id
    }

    /// Assigns or clears the owning player.
    pub fn set_owner(&mut self, owner: Option<PlayerId>) {
        self.owner_id = owner;
    }

    /// Size of the garrison stationed at the territory.
    #[must_use]
    pub const fn army_size(&self) -> u32 {
        self.army_size
    }

    /// Replaces the garrison size.
    pub fn set_army_size(&mut self, army_size: u32) {
        self.army_size = army_size;
    }
}

/// Extent of the generated map in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapDimensions {
    width: f64,
    height: f64,
}

impl MapDimensions {
    /// Creates a dimension descriptor.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Total width of the map.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Total height of the map.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Centre of the map.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Returns `true` when `point` lies inside `[0, width] × [0, height]`.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }
}

/// Structural defect found while validating a territory list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TopologyIssue {
    /// The territory's id does not match its position in the list.
    IdMismatch {
        /// Position of the territory in the list.
        index: usize,
        /// Identifier stored on the territory.
        id: TerritoryId,
    },
    /// The territory lists itself as a neighbour.
    SelfLoop {
        /// Offending territory.
        territory: TerritoryId,
    },
    /// The territory lists the same neighbour more than once.
    DuplicateNeighbor {
        /// Territory owning the neighbour list.
        territory: TerritoryId,
        /// Neighbour that appears repeatedly.
        neighbor: TerritoryId,
    },
    /// The territory references an id that is not part of the list.
    DanglingReference {
        /// Territory owning the neighbour list.
        territory: TerritoryId,
        /// Identifier that could not be resolved.
        neighbor: TerritoryId,
    },
    /// `from` lists `to` as a neighbour but not the other way around.
    Unidirectional {
        /// Territory holding the reference.
        from: TerritoryId,
        /// Territory missing the reverse reference.
        to: TerritoryId,
    },
}

impl fmt::Display for TopologyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdMismatch { index, id } => {
                write!(f, "territory at index {index} carries id {id}")
            }
            Self::SelfLoop { territory } => write!(f, "{territory} lists itself as a neighbour"),
            Self::DuplicateNeighbor {
                territory,
                neighbor,
            } => write!(f, "{territory} lists {neighbor} more than once"),
            Self::DanglingReference {
                territory,
                neighbor,
            } => write!(f, "{territory} references unknown territory {neighbor}"),
            Self::Unidirectional { from, to } => {
                write!(f, "{from} links to {to} but {to} does not link back")
            }
        }
    }
}

/// Read-only health report describing a territory graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    territory_count: usize,
    lane_count: usize,
    component_count: usize,
    issues: Vec<TopologyIssue>,
}

impl ValidationReport {
    /// Creates a report from its parts.
    #[must_use]
    pub fn new(
        territory_count: usize,
        lane_count: usize,
        component_count: usize,
        issues: Vec<TopologyIssue>,
    ) -> Self {
        Self {
            territory_count,
            lane_count,
            component_count,
            issues,
        }
    }

    /// Number of territories inspected.
    #[must_use]
    pub const fn territory_count(&self) -> usize {
        self.territory_count
    }

    /// Number of distinct bidirectional lanes.
    #[must_use]
    pub const fn lane_count(&self) -> usize {
        self.lane_count
    }

    /// Number of connected components, following resolvable references only.
    #[must_use]
    pub const fn component_count(&self) -> usize {
        self.component_count
    }

    /// Defects found in the neighbour lists.
    #[must_use]
    pub fn issues(&self) -> &[TopologyIssue] {
        &self.issues
    }

    /// Returns `true` when the graph is free of defects and fully connected.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty() && self.component_count <= 1
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} territories, {} lanes, {} component(s)",
            self.territory_count, self.lane_count, self.component_count
        )?;
        for issue in &self.issues {
            write!(f, "\n  - {issue}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_parses_case_insensitively() {
        assert_eq!("Rings".parse::<Layout>(), Ok(Layout::Rings));
        assert_eq!(" organic ".parse::<Layout>(), Ok(Layout::Organic));
        assert_eq!(
            "ellipse".parse::<Layout>(),
            Err(ParseLayoutError("ellipse".to_owned()))
        );
        for layout in Layout::ALL {
            assert_eq!(layout.to_string().parse::<Layout>(), Ok(layout));
        }
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);

        assert_eq!(Point::new(5.0, 3.0).segment_distance_squared(a, b), 9.0);
        assert_eq!(Point::new(-4.0, 3.0).segment_distance_squared(a, b), 25.0);
        assert_eq!(Point::new(13.0, 4.0).segment_distance_squared(a, b), 25.0);
        assert_eq!(Point::new(2.0, 2.0).segment_distance_squared(a, a), 8.0);
    }

    #[test]
    fn finiteness_checks_both_axes() {
        assert!(Point::new(-3.0, 1e300).is_finite());
        assert!(!Point::new(f64::NAN, 0.0).is_finite());
        assert!(!Point::new(0.0, f64::NEG_INFINITY).is_finite());
    }

    #[test]
    fn segment_clears_ignores_endpoints() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(50.0, 10.0),
        ];

        assert!(segment_clears(&points, 0, 1, 10.0));
        assert!(!segment_clears(&points, 0, 1, 10.5));
        assert!(segment_clears(&points[..2], 0, 1, 1_000.0));
    }

    #[test]
    fn edge_canonicalises_endpoints() {
        let edge = Edge::between(7, 3, 2.5);
        assert_eq!(edge.endpoints(), (3, 7));
        assert_eq!(edge.length(), 2.5);
    }

    #[test]
    fn adjacency_rejects_loops_and_duplicates() {
        let mut adjacency = Adjacency::new(3);

        assert!(adjacency.connect(0, 1));
        assert!(!adjacency.connect(1, 0));
        assert!(!adjacency.connect(2, 2));
        assert!(!adjacency.connect(0, 9));
        assert!(adjacency.connect(2, 1));

        assert!(adjacency.contains(1, 0));
        assert_eq!(adjacency.edge_count(), 2);
        assert_eq!(adjacency.neighbors(1).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(adjacency.edges().collect::<Vec<_>>(), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn territory_serialises_with_consumer_field_names() {
        let mut territory = Territory::new(
            TerritoryId::new(4),
            Point::new(1.5, 2.0),
            20.0,
            vec![TerritoryId::new(1), TerritoryId::new(9)],
            3,
        );
        territory.set_owner(Some(PlayerId::new(2)));

        let json = serde_json::to_value(&territory).expect("territory serialises");
        assert_eq!(json["id"], 4);
        assert_eq!(json["neighbors"], serde_json::json!([1, 9]));
        assert_eq!(json["ownerId"], 2);
        assert_eq!(json["armySize"], 3);
    }

    #[test]
    fn map_dimensions_contains_edges() {
        let dimensions = MapDimensions::new(100.0, 50.0);
        assert!(dimensions.contains(Point::new(0.0, 50.0)));
        assert!(!dimensions.contains(Point::new(100.1, 10.0)));
        assert_eq!(dimensions.center(), Point::new(50.0, 25.0));
    }
}
