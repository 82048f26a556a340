#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! End-to-end galaxy generation for Starmap.
//!
//! [`GalaxyGenerator`] runs the pure systems in a single linear pass:
//! sampling, relaxation, triangulation, the spanning backbone, augmentation,
//! connectivity repair, recentering and territory assembly. Each stage that
//! consumes randomness owns a `ChaCha8Rng` stream derived from the base seed,
//! so a supplied seed always reproduces the same galaxy.

use rand::Rng;
use starmap_core::{
    GeneratorTuning, Layout, MapDimensions, Territory, RNG_STREAM_AUGMENTATION,
    RNG_STREAM_GARRISON, RNG_STREAM_SAMPLING,
};
use starmap_system_connectivity::ConnectivityRepair;
use starmap_system_lanes::{EdgeAugmenter, SpanningTreeBuilder};
use starmap_system_relaxation::{RelaxationBounds, Relaxer};
use starmap_system_sampling::{PointSampler, SamplingArea};
use starmap_system_triangulation::{SpadeDelaunay, TriangleSource, Triangulator};
use tracing::{debug, error};

mod assembly;
mod dimensions;
mod seeds;

pub use assembly::TerritoryAssembler;
pub use dimensions::DimensionCalculator;
pub use starmap_system_connectivity::validate;

/// Parameters of a single generation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GalaxyRequest {
    map_size: u32,
    layout: Layout,
    players: u32,
    seed: Option<u64>,
}

impl GalaxyRequest {
    /// Requests `map_size` territories shaped by `layout` for `players` players.
    #[must_use]
    pub const fn new(map_size: u32, layout: Layout, players: u32) -> Self {
        Self {
            map_size,
            layout,
            players,
            seed: None,
        }
    }

    /// Pins the base seed so the galaxy can be replayed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of territories requested.
    #[must_use]
    pub const fn map_size(&self) -> u32 {
        self.map_size
    }

    /// Requested galaxy shape.
    #[must_use]
    pub const fn layout(&self) -> Layout {
        self.layout
    }

    /// Number of players the galaxy is generated for.
    #[must_use]
    pub const fn players(&self) -> u32 {
        self.players
    }

    /// Base seed, if one was pinned.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }
}

/// Counters describing how a galaxy came together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationStats {
    requested: usize,
    placed: usize,
    candidate_edges: usize,
    triangulation_fallback: bool,
    backbone_edges: usize,
    augmented_edges: usize,
    bridge_edges: usize,
    clipping_bridges: usize,
}

impl GenerationStats {
    /// Territories requested.
    #[must_use]
    pub const fn requested(&self) -> usize {
        self.requested
    }

    /// Territories actually placed; lower than requested only on sampling shortfall.
    #[must_use]
    pub const fn placed(&self) -> usize {
        self.placed
    }

    /// Candidate lanes offered by the triangulator.
    #[must_use]
    pub const fn candidate_edges(&self) -> usize {
        self.candidate_edges
    }

    /// Whether the all-pairs fallback replaced the triangulation.
    #[must_use]
    pub const fn triangulation_fallback(&self) -> bool {
        self.triangulation_fallback
    }

    /// Lanes accepted into the spanning backbone.
    #[must_use]
    pub const fn backbone_edges(&self) -> usize {
        self.backbone_edges
    }

    /// Short lanes added on top of the backbone.
    #[must_use]
    pub const fn augmented_edges(&self) -> usize {
        self.augmented_edges
    }

    /// Lanes added by connectivity repair.
    #[must_use]
    pub const fn bridge_edges(&self) -> usize {
        self.bridge_edges
    }

    /// Repair lanes that pass within the clearance radius of another star.
    #[must_use]
    pub const fn clipping_bridges(&self) -> usize {
        self.clipping_bridges
    }

    /// Total lanes in the finished galaxy.
    #[must_use]
    pub const fn total_lanes(&self) -> usize {
        self.backbone_edges + self.augmented_edges + self.bridge_edges
    }
}

/// A generated galaxy ready to seed a match.
#[derive(Clone, Debug, PartialEq)]
pub struct Galaxy {
    territories: Vec<Territory>,
    dimensions: MapDimensions,
    layout: Layout,
    seed: u64,
    stats: GenerationStats,
}

impl Galaxy {
    /// Territories in id order.
    #[must_use]
    pub fn territories(&self) -> &[Territory] {
        &self.territories
    }

    /// Mutable access for downstream owner and garrison updates.
    #[must_use]
    pub fn territories_mut(&mut self) -> &mut [Territory] {
        &mut self.territories
    }

    /// Consumes the galaxy, yielding its territories.
    #[must_use]
    pub fn into_territories(self) -> Vec<Territory> {
        self.territories
    }

    /// Map extent enclosing every territory.
    #[must_use]
    pub const fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    /// Layout the galaxy was generated with.
    #[must_use]
    pub const fn layout(&self) -> Layout {
        self.layout
    }

    /// Base seed used; feeding it back reproduces this galaxy.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Counters collected while generating.
    #[must_use]
    pub const fn stats(&self) -> GenerationStats {
        self.stats
    }
}

/// Galaxy pipeline wired from a tuning surface.
///
/// The generator holds configuration only; every call to
/// [`generate`](Self::generate) owns its random streams and intermediate data.
#[derive(Clone, Debug)]
pub struct GalaxyGenerator<S = SpadeDelaunay> {
    tuning: GeneratorTuning,
    sampler: PointSampler,
    relaxer: Relaxer,
    triangulator: Triangulator<S>,
    spanning: SpanningTreeBuilder,
    augmenter: EdgeAugmenter,
    repair: ConnectivityRepair,
    dimensions: DimensionCalculator,
    assembler: TerritoryAssembler,
}

impl Default for GalaxyGenerator {
    fn default() -> Self {
        Self::new(&GeneratorTuning::default())
    }
}

impl GalaxyGenerator {
    /// Creates a generator triangulating with `spade`.
    #[must_use]
    pub fn new(tuning: &GeneratorTuning) -> Self {
        Self::with_triangle_source(tuning, SpadeDelaunay)
    }
}

impl<S: TriangleSource> GalaxyGenerator<S> {
    /// Creates a generator backed by a custom triangle source.
    #[must_use]
    pub fn with_triangle_source(tuning: &GeneratorTuning, source: S) -> Self {
        Self {
            tuning: tuning.clone(),
            sampler: PointSampler::new(tuning.sampling.clone()),
            relaxer: Relaxer::new(tuning.relaxation.clone()),
            triangulator: Triangulator::new(source),
            spanning: SpanningTreeBuilder::new(&tuning.lanes),
            augmenter: EdgeAugmenter::new(&tuning.lanes),
            repair: ConnectivityRepair::new(&tuning.lanes),
            dimensions: DimensionCalculator::new(&tuning.assembly),
            assembler: TerritoryAssembler::new(&tuning.assembly),
        }
    }

    /// Tuning the generator was built from.
    #[must_use]
    pub fn tuning(&self) -> &GeneratorTuning {
        &self.tuning
    }

    /// Generates a galaxy for `request`.
    ///
    /// When the request carries no seed one is drawn from the thread RNG and
    /// reported on the returned [`Galaxy`].
    ///
    /// # Panics
    ///
    /// Panics if the finished territory graph is not a single connected
    /// component, which connectivity repair rules out.
    #[must_use]
    pub fn generate(&self, request: &GalaxyRequest) -> Galaxy {
        let seed = request
            .seed()
            .unwrap_or_else(|| rand::thread_rng().gen::<u64>());
        let layout = request.layout();
        let requested = request.map_size() as usize;

        let area = SamplingArea::for_population(
            requested,
            request.players() as usize,
            &self.tuning.sampling,
        );
        let mut sampling_rng = seeds::stage_rng(seed, RNG_STREAM_SAMPLING);
        let mut points = self.sampler.sample(&area, layout, &mut sampling_rng);

        self.relaxer.relax(
            &mut points,
            layout,
            RelaxationBounds::new(area.width(), area.height()),
        );

        let candidates = self.triangulator.triangulate(&points);
        let mut adjacency = self.spanning.build_mst(&points, candidates.edges());
        let backbone_edges = adjacency.edge_count();

        let mut augmentation_rng = seeds::stage_rng(seed, RNG_STREAM_AUGMENTATION);
        let augmentation =
            self.augmenter
                .augment(&points, &mut adjacency, candidates.edges(), &mut augmentation_rng);

        let repair = self.repair.repair(&points, &mut adjacency);

        let dimensions = self.dimensions.recenter(&mut points);
        let mut garrison_rng = seeds::stage_rng(seed, RNG_STREAM_GARRISON);
        let territories = self
            .assembler
            .assemble(&points, &adjacency, &mut garrison_rng);

        let report = validate(&territories);
        if report.component_count() > 1 {
            error!(
                seed,
                %layout,
                components = report.component_count(),
                "generated galaxy is disconnected"
            );
            panic!(
                "galaxy generated from seed {seed} has {} components",
                report.component_count()
            );
        }

        let stats = GenerationStats {
            requested,
            placed: points.len(),
            candidate_edges: candidates.edges().len(),
            triangulation_fallback: candidates.used_fallback(),
            backbone_edges,
            augmented_edges: augmentation.added().len(),
            bridge_edges: repair.bridges().len(),
            clipping_bridges: repair.clipping_bridges(),
        };
        debug!(
            seed,
            %layout,
            territories = stats.placed,
            lanes = stats.total_lanes(),
            width = dimensions.width(),
            height = dimensions.height(),
            "generated galaxy"
        );

        Galaxy {
            territories,
            dimensions,
            layout,
            seed,
            stats,
        }
    }
}

/// Generates a galaxy with the default tuning.
#[must_use]
pub fn generate(map_size: u32, layout: Layout, players: u32, seed: Option<u64>) -> Galaxy {
    let mut request = GalaxyRequest::new(map_size, layout, players);
    if let Some(seed) = seed {
        request = request.with_seed(seed);
    }
    generate_with(&request, &GeneratorTuning::default())
}

/// Generates a galaxy for `request` using explicit tuning.
#[must_use]
pub fn generate_with(request: &GalaxyRequest, tuning: &GeneratorTuning) -> Galaxy {
    GalaxyGenerator::new(tuning).generate(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_pins_seed() {
        let request = GalaxyRequest::new(30, Layout::Spiral, 3).with_seed(9);

        assert_eq!(request.map_size(), 30);
        assert_eq!(request.layout(), Layout::Spiral);
        assert_eq!(request.players(), 3);
        assert_eq!(request.seed(), Some(9));
    }

    #[test]
    fn stats_account_for_every_lane() {
        let galaxy = generate(40, Layout::Clusters, 4, Some(5));
        let stats = galaxy.stats();
        let listed: usize = galaxy
            .territories()
            .iter()
            .map(|territory| territory.neighbors().len())
            .sum();

        assert_eq!(stats.requested(), 40);
        assert_eq!(stats.placed(), galaxy.territories().len());
        assert_eq!(listed, 2 * stats.total_lanes());
    }

    #[test]
    fn unseeded_generation_reports_a_replayable_seed() {
        let first = generate(25, Layout::Binary, 2, None);
        let replay = generate(25, Layout::Binary, 2, Some(first.seed()));

        assert_eq!(first, replay);
    }
}
