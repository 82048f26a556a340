#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Point placement strategies that give each galaxy layout its shape.
//!
//! Every [`Layout`] maps to one [`LayoutStrategy`]. The [`PointSampler`]
//! selects the strategy, runs it against a [`SamplingArea`], and clamps the
//! result into the map rectangle. Strategies draw all randomness from the
//! stream they are handed, so a seeded stream always yields the same cloud.

use rand::{Rng, RngCore};
use starmap_core::{Layout, Point, SamplingTuning};
use tracing::{debug, warn};

mod binary;
mod clusters;
mod galactic_core;
mod organic;
mod rings;
mod spiral;

pub use binary::Binary;
pub use clusters::Clusters;
pub use galactic_core::GalacticCore;
pub use organic::{organic_min_distance, Organic};
pub use rings::{ring_count, Rings};
pub use spiral::Spiral;

/// Rectangle and population a strategy samples into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplingArea {
    count: usize,
    width: f64,
    height: f64,
    players: usize,
}

impl SamplingArea {
    /// Creates an area with explicit dimensions.
    #[must_use]
    pub const fn new(count: usize, width: f64, height: f64, players: usize) -> Self {
        Self {
            count,
            width,
            height,
            players,
        }
    }

    /// Derives the sampling rectangle for `count` territories.
    ///
    /// The extent grows with the square root of the territory count so the
    /// average spacing stays roughly constant across map sizes.
    #[must_use]
    pub fn for_population(count: usize, players: usize, tuning: &SamplingTuning) -> Self {
        let height = ((count as f64).sqrt() * tuning.extent_per_node).max(tuning.min_extent);
        Self::new(count, height * tuning.aspect_ratio, height, players)
    }

    /// Number of points requested.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Width of the sampling rectangle.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Height of the sampling rectangle.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Number of players taking part in the match.
    #[must_use]
    pub const fn players(&self) -> usize {
        self.players
    }

    /// Smaller of width and height.
    #[must_use]
    pub fn min_dimension(&self) -> f64 {
        self.width.min(self.height)
    }

    /// Area of the sampling rectangle.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Centre of the sampling rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    fn clamp(&self, point: Point) -> Point {
        Point::new(point.x.clamp(0.0, self.width), point.y.clamp(0.0, self.height))
    }
}

/// A point placement strategy for one galaxy layout.
pub trait LayoutStrategy {
    /// Produces up to `area.count()` points; callers clamp them to the area.
    fn sample(&self, area: &SamplingArea, rng: &mut dyn RngCore) -> Vec<Point>;
}

/// Selects and runs the strategy matching a [`Layout`].
#[derive(Clone, Debug, Default)]
pub struct PointSampler {
    tuning: SamplingTuning,
}

impl PointSampler {
    /// Creates a sampler with the provided tuning.
    #[must_use]
    pub fn new(tuning: SamplingTuning) -> Self {
        Self { tuning }
    }

    /// Strategy used for `layout`.
    #[must_use]
    pub fn strategy(&self, layout: Layout) -> Box<dyn LayoutStrategy> {
        match layout {
            Layout::Organic => Box::new(Organic::new(&self.tuning)),
            Layout::Clusters => Box::new(Clusters::new(&self.tuning)),
            Layout::Spiral => Box::new(Spiral),
            Layout::Core => Box::new(GalacticCore),
            Layout::Rings => Box::new(Rings::new(&self.tuning)),
            Layout::Binary => Box::new(Binary),
        }
    }

    /// Samples the initial star positions for `layout`.
    ///
    /// Fewer than `area.count()` points are returned only when the organic
    /// strategy exhausts its attempt budget.
    pub fn sample(&self, area: &SamplingArea, layout: Layout, rng: &mut dyn RngCore) -> Vec<Point> {
        if area.count() == 0 {
            return Vec::new();
        }

        let mut points = self.strategy(layout).sample(area, rng);
        points.truncate(area.count());
        for point in &mut points {
            *point = area.clamp(*point);
        }

        if points.len() < area.count() {
            warn!(
                %layout,
                requested = area.count(),
                placed = points.len(),
                "sampling ran out of attempts before placing every territory"
            );
        }
        debug!(%layout, placed = points.len(), "sampled star positions");
        points
    }
}

/// Area-uniform sample inside the disk of `radius` around `center`.
fn disk_point(center: Point, radius: f64, rng: &mut dyn RngCore) -> Point {
    let distance = rng.gen::<f64>().sqrt() * radius;
    Point::polar(center, distance, random_angle(rng))
}

fn random_angle(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>() * std::f64::consts::TAU
}
