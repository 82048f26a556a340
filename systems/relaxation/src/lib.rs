#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Force-directed relaxation that spreads crowded star systems apart.
//!
//! Every iteration accumulates an inverse-square repulsion between all pairs
//! of points, clamps the per-axis force, and applies a damped step. The pass
//! is O(n²), which is acceptable for maps in the hundreds of territories but
//! is the scaling limit for anything larger.

use starmap_core::{Layout, Point, RelaxationTuning};
use tracing::debug;

/// Rectangle the relaxed points must stay inside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RelaxationBounds {
    width: f64,
    height: f64,
}

impl RelaxationBounds {
    /// Creates bounds spanning `[0, width] × [0, height]`.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width of the rectangle.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Height of the rectangle.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }
}

/// Pure system that relaxes sampled point clouds.
#[derive(Clone, Debug, Default)]
pub struct Relaxer {
    tuning: RelaxationTuning,
}

impl Relaxer {
    /// Creates a relaxer with the provided tuning; a negative force clamp
    /// counts by its magnitude.
    #[must_use]
    pub fn new(mut tuning: RelaxationTuning) -> Self {
        tuning.max_force = tuning.max_force.abs();
        Self { tuning }
    }

    /// Number of iterations run for `layout`.
    #[must_use]
    pub fn iterations(&self, layout: Layout) -> u32 {
        match layout {
            Layout::Organic => self.tuning.organic_iterations,
            _ => self.tuning.default_iterations,
        }
    }

    /// Pushes points apart in place, keeping them inside `bounds` minus the margin.
    pub fn relax(&self, points: &mut [Point], layout: Layout, bounds: RelaxationBounds) {
        let iterations = self.iterations(layout);
        let (min_x, max_x) = inset(bounds.width(), self.tuning.margin);
        let (min_y, max_y) = inset(bounds.height(), self.tuning.margin);
        let mut forces = vec![(0.0f64, 0.0f64); points.len()];

        for _ in 0..iterations {
            forces.fill((0.0, 0.0));
            self.accumulate_forces(points, &mut forces);

            for (point, &(fx, fy)) in points.iter_mut().zip(&forces) {
                let fx = fx.clamp(-self.tuning.max_force, self.tuning.max_force);
                let fy = fy.clamp(-self.tuning.max_force, self.tuning.max_force);
                point.x = (point.x + fx * self.tuning.damping).clamp(min_x, max_x);
                point.y = (point.y + fy * self.tuning.damping).clamp(min_y, max_y);
            }
        }

        debug!(%layout, iterations, points = points.len(), "relaxed star positions");
    }

    fn accumulate_forces(&self, points: &[Point], forces: &mut [(f64, f64)]) {
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                let dx = points[i].x - points[j].x;
                let dy = points[i].y - points[j].y;
                let distance = (dx * dx + dy * dy).sqrt();
                if distance < self.tuning.min_separation {
                    continue;
                }

                let magnitude = self.tuning.repulsion / (distance * distance);
                let fx = magnitude * dx / distance;
                let fy = magnitude * dy / distance;
                forces[i].0 += fx;
                forces[i].1 += fy;
                forces[j].0 -= fx;
                forces[j].1 -= fy;
            }
        }
    }
}

/// Clamp range for one axis; collapses to the midpoint when the span is
/// narrower than two margins.
fn inset(span: f64, margin: f64) -> (f64, f64) {
    if span <= 2.0 * margin {
        let middle = span / 2.0;
        (middle, middle)
    } else {
        (margin, span - margin)
    }
}
