//! Centre-weighted disk.

use rand::{Rng, RngCore};
use starmap_core::Point;

use crate::{random_angle, LayoutStrategy, SamplingArea};

/// Exponent below `0.5` pulls the density towards the centre.
const CENTER_BIAS: f64 = 0.6;

/// Disk whose density peaks at the galactic core.
#[derive(Clone, Copy, Debug, Default)]
pub struct GalacticCore;

impl LayoutStrategy for GalacticCore {
    fn sample(&self, area: &SamplingArea, rng: &mut dyn RngCore) -> Vec<Point> {
        let center = area.center();
        let max_radius = area.min_dimension() * 0.45;
        (0..area.count())
            .map(|_| {
                let distance = rng.gen::<f64>().powf(CENTER_BIAS) * max_radius;
                Point::polar(center, distance, random_angle(rng))
            })
            .collect()
    }
}
