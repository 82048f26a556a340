//! Four-armed spiral galaxy.

use std::f64::consts::TAU;

use rand::{Rng, RngCore};
use starmap_core::Point;

use crate::{LayoutStrategy, SamplingArea};

const ARMS: usize = 4;
/// Full turns each arm makes from the core to the rim.
const TURNS: f64 = 3.0;
const ANGULAR_NOISE: f64 = 0.15;
const RADIAL_NOISE: f64 = 30.0;

/// Points strung along four logarithmic-looking arms.
#[derive(Clone, Copy, Debug, Default)]
pub struct Spiral;

impl LayoutStrategy for Spiral {
    fn sample(&self, area: &SamplingArea, rng: &mut dyn RngCore) -> Vec<Point> {
        let center = area.center();
        let max_radius = area.min_dimension() * 0.45;
        let per_arm = area.count().div_ceil(ARMS).max(1) as f64;

        (0..area.count())
            .map(|index| {
                let arm = (index % ARMS) as f64;
                let progress = (index / ARMS) as f64 / per_arm;
                let angle = arm * (TAU / ARMS as f64)
                    + progress * TURNS * TAU
                    + rng.gen_range(-ANGULAR_NOISE..=ANGULAR_NOISE);
                let radius = max_radius * (0.1 + 0.9 * progress)
                    + rng.gen_range(-RADIAL_NOISE..=RADIAL_NOISE);
                Point::polar(center, radius.max(0.0), angle)
            })
            .collect()
    }
}
