//! Organic galaxies grown with Bridson-style Poisson-disk sampling.
//!
//! Growth starts from a seed near the galactic centre and expands through an
//! active list until either the request is met or every active point has
//! failed to spawn a neighbour. The boundary is a circle modulated by four
//! sine harmonics with random phases, which keeps the rim ragged. Whatever the
//! growth phase could not place is backfilled with density-weighted rejection
//! sampling and, as a last resort, loosely spaced random placement.

use rand::{Rng, RngCore};
use starmap_core::{Point, SamplingTuning};

use crate::{random_angle, LayoutStrategy, SamplingArea};

/// Boundary harmonics as `(frequency, amplitude)`.
const HARMONICS: [(f64, f64); 4] = [(2.0, 0.10), (3.0, 0.06), (5.0, 0.04), (7.0, 0.03)];
/// Base boundary radius as a fraction of the smaller map dimension.
const BOUNDARY_FRACTION: f64 = 0.40;

/// Minimum spacing enforced by the organic growth phase.
#[must_use]
pub fn organic_min_distance(area: &SamplingArea, tuning: &SamplingTuning) -> f64 {
    Organic::new(tuning).min_distance(area)
}

/// Poisson-disk growth inside an irregular galactic rim.
#[derive(Clone, Debug)]
pub struct Organic {
    spacing_factor: f64,
    candidates: u32,
    backfill_attempts_per_node: u32,
}

impl Organic {
    /// Creates the strategy from the sampling tuning.
    #[must_use]
    pub fn new(tuning: &SamplingTuning) -> Self {
        Self {
            spacing_factor: tuning.organic_spacing_factor,
            candidates: tuning.organic_candidates,
            backfill_attempts_per_node: tuning.backfill_attempts_per_node,
        }
    }

    fn min_distance(&self, area: &SamplingArea) -> f64 {
        let count = area.count().max(1) as f64;
        (area.area() / count).sqrt() * self.spacing_factor
    }

    fn grow(
        &self,
        boundary: &GalaxyBoundary,
        min_distance: f64,
        target: usize,
        points: &mut Vec<Point>,
        rng: &mut dyn RngCore,
    ) {
        let seed_jitter = boundary.base_radius * 0.1;
        let seed = Point::polar(
            boundary.center,
            rng.gen::<f64>() * seed_jitter,
            random_angle(rng),
        );
        points.push(seed);
        let mut active = vec![0usize];

        while !active.is_empty() && points.len() < target {
            let slot = rng.gen_range(0..active.len());
            let origin = points[active[slot]];
            let mut spawned = false;

            for _ in 0..self.candidates {
                let distance = min_distance * (1.0 + rng.gen::<f64>());
                let candidate = Point::polar(origin, distance, random_angle(rng));
                if boundary.contains(candidate) && is_spaced(points, candidate, min_distance) {
                    active.push(points.len());
                    points.push(candidate);
                    spawned = true;
                    break;
                }
            }

            if !spawned {
                let _ = active.swap_remove(slot);
            }
        }
    }

    fn backfill(
        &self,
        boundary: &GalaxyBoundary,
        density: &DensityField,
        spacing: f64,
        target: usize,
        points: &mut Vec<Point>,
        rng: &mut dyn RngCore,
    ) {
        let mut attempts = self.attempt_budget(target, points.len());
        while points.len() < target && attempts > 0 {
            attempts -= 1;
            let candidate = boundary.random_point(rng);
            if rng.gen::<f64>() > density.at(candidate) {
                continue;
            }
            if is_spaced(points, candidate, spacing) {
                points.push(candidate);
            }
        }
    }

    fn scatter(
        &self,
        boundary: &GalaxyBoundary,
        spacing: f64,
        target: usize,
        points: &mut Vec<Point>,
        rng: &mut dyn RngCore,
    ) {
        let mut attempts = self.attempt_budget(target, points.len());
        while points.len() < target && attempts > 0 {
            attempts -= 1;
            let candidate = boundary.random_point(rng);
            if is_spaced(points, candidate, spacing) {
                points.push(candidate);
            }
        }
    }

    fn attempt_budget(&self, target: usize, placed: usize) -> usize {
        target
            .saturating_sub(placed)
            .saturating_mul(self.backfill_attempts_per_node as usize)
    }
}

impl LayoutStrategy for Organic {
    fn sample(&self, area: &SamplingArea, rng: &mut dyn RngCore) -> Vec<Point> {
        let target = area.count();
        let min_distance = self.min_distance(area);
        let boundary = GalaxyBoundary::random(area, rng);
        let mut points = Vec::with_capacity(target);

        self.grow(&boundary, min_distance, target, &mut points, rng);
        if points.len() < target {
            let density = DensityField::random(&boundary, rng);
            self.backfill(&boundary, &density, min_distance * 0.5, target, &mut points, rng);
        }
        if points.len() < target {
            self.scatter(&boundary, min_distance * 0.25, target, &mut points, rng);
        }
        points
    }
}

fn is_spaced(points: &[Point], candidate: Point, spacing: f64) -> bool {
    let spacing_squared = spacing * spacing;
    points
        .iter()
        .all(|point| point.distance_squared(candidate) >= spacing_squared)
}

/// Circle whose radius is perturbed by phase-shifted sine harmonics.
#[derive(Clone, Debug)]
struct GalaxyBoundary {
    center: Point,
    base_radius: f64,
    phases: [f64; 4],
}

impl GalaxyBoundary {
    fn random(area: &SamplingArea, rng: &mut dyn RngCore) -> Self {
        let mut phases = [0.0; 4];
        for phase in &mut phases {
            *phase = random_angle(rng);
        }
        Self {
            center: area.center(),
            base_radius: area.min_dimension() * BOUNDARY_FRACTION,
            phases,
        }
    }

    fn radius_at(&self, angle: f64) -> f64 {
        let modulation: f64 = HARMONICS
            .iter()
            .zip(self.phases)
            .map(|(&(frequency, amplitude), phase)| amplitude * (frequency * angle + phase).sin())
            .sum();
        self.base_radius * (1.0 + modulation)
    }

    fn contains(&self, point: Point) -> bool {
        let angle = (point.y - self.center.y).atan2(point.x - self.center.x);
        point.distance(self.center) <= self.radius_at(angle)
    }

    fn random_point(&self, rng: &mut dyn RngCore) -> Point {
        let angle = random_angle(rng);
        let distance = rng.gen::<f64>().sqrt() * self.radius_at(angle);
        Point::polar(self.center, distance, angle)
    }
}

/// Acceptance probability peaking at the galactic centre and a few clusters.
#[derive(Clone, Debug)]
struct DensityField {
    center: Point,
    core_sigma: f64,
    clusters: Vec<Point>,
    cluster_sigma: f64,
}

impl DensityField {
    fn random(boundary: &GalaxyBoundary, rng: &mut dyn RngCore) -> Self {
        let cluster_count = rng.gen_range(3..=5);
        let clusters = (0..cluster_count)
            .map(|_| {
                let angle = random_angle(rng);
                let distance = rng.gen::<f64>().sqrt() * boundary.radius_at(angle) * 0.7;
                Point::polar(boundary.center, distance, angle)
            })
            .collect();
        Self {
            center: boundary.center,
            core_sigma: boundary.base_radius * 0.35,
            clusters,
            cluster_sigma: boundary.base_radius * 0.15,
        }
    }

    fn at(&self, point: Point) -> f64 {
        let core = 0.6 * gaussian(point.distance_squared(self.center), self.core_sigma);
        let clusters: f64 = self
            .clusters
            .iter()
            .map(|cluster| 0.7 * gaussian(point.distance_squared(*cluster), self.cluster_sigma))
            .sum();
        (0.2 + core + clusters).min(1.0)
    }
}

fn gaussian(distance_squared: f64, sigma: f64) -> f64 {
    (-distance_squared / (2.0 * sigma * sigma)).exp()
}
