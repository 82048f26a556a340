//! Concentric rings.

use std::f64::consts::TAU;

use rand::{Rng, RngCore};
use starmap_core::{Point, SamplingTuning};

use crate::{random_angle, LayoutStrategy, SamplingArea};

/// Number of rings laid out for `count` territories.
#[must_use]
pub fn ring_count(count: usize) -> usize {
    count.div_ceil(20).max(4)
}

/// Evenly spaced rings, each with its own phase and radial jitter.
#[derive(Clone, Debug)]
pub struct Rings {
    jitter: f64,
}

impl Rings {
    /// Creates the strategy from the sampling tuning.
    #[must_use]
    pub fn new(tuning: &SamplingTuning) -> Self {
        Self {
            jitter: tuning.ring_jitter.abs(),
        }
    }
}

impl LayoutStrategy for Rings {
    fn sample(&self, area: &SamplingArea, rng: &mut dyn RngCore) -> Vec<Point> {
        let center = area.center();
        let rings = ring_count(area.count());
        let spacing = area.min_dimension() * 0.45 / rings as f64;
        let mut points = Vec::with_capacity(area.count());

        for (ring, members) in ring_populations(area.count(), rings)
            .into_iter()
            .enumerate()
        {
            if members == 0 {
                continue;
            }
            let radius = spacing * (ring + 1) as f64;
            let phase = random_angle(rng);
            let step = TAU / members as f64;
            for member in 0..members {
                let angle = phase + step * member as f64 + rng.gen_range(-0.1..=0.1) * step;
                let distance = radius + rng.gen_range(-self.jitter..=self.jitter);
                points.push(Point::polar(center, distance, angle));
            }
        }
        points
    }
}

/// Splits `count` points across rings in proportion to their circumference.
///
/// Rounding leftovers go to the outermost rings first.
fn ring_populations(count: usize, rings: usize) -> Vec<usize> {
    let total_weight = rings * (rings + 1) / 2;
    let mut populations: Vec<usize> = (0..rings)
        .map(|ring| count * (ring + 1) / total_weight)
        .collect();
    let assigned: usize = populations.iter().sum();
    for slot in populations.iter_mut().rev().take(count - assigned) {
        *slot += 1;
    }
    populations
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn ring_count_has_a_floor_of_four() {
        assert_eq!(ring_count(2), 4);
        assert_eq!(ring_count(80), 4);
        assert_eq!(ring_count(100), 5);
        assert_eq!(ring_count(101), 6);
    }

    #[test]
    fn populations_cover_the_request() {
        assert_eq!(ring_populations(100, 5), vec![6, 13, 20, 27, 34]);
        assert_eq!(ring_populations(2, 4), vec![0, 0, 1, 1]);
        for count in 0..200 {
            let rings = ring_count(count);
            assert_eq!(ring_populations(count, rings).iter().sum::<usize>(), count);
        }
    }

    #[test]
    fn members_sit_within_jitter_of_their_ring() {
        let tuning = SamplingTuning::default();
        let area = SamplingArea::for_population(100, 4, &tuning);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let points = Rings::new(&tuning).sample(&area, &mut rng);
        let spacing = area.min_dimension() * 0.45 / 5.0;

        assert_eq!(points.len(), 100);
        for point in &points {
            let distance = point.distance(area.center());
            let nearest_ring = (distance / spacing).round();
            assert!((1.0..=5.0).contains(&nearest_ring));
            assert!((distance - nearest_ring * spacing).abs() <= tuning.ring_jitter + 1e-9);
        }
    }
}
