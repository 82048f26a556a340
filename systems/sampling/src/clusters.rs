//! Star clusters scattered across the map, one or two per player.

use rand::{Rng, RngCore};
use starmap_core::{Point, SamplingTuning};

use crate::{random_angle, LayoutStrategy, SamplingArea};

/// Rejection attempts spent on each cluster centre before settling.
const CENTER_ATTEMPTS: u32 = 20;
/// Required centre separation as a fraction of the smaller map dimension.
const CENTER_SEPARATION: f64 = 0.3;

/// Round-robin disks around well-separated cluster centres.
#[derive(Clone, Debug)]
pub struct Clusters {
    spread: f64,
    inner_radius: f64,
}

impl Clusters {
    /// Creates the strategy from the sampling tuning.
    #[must_use]
    pub fn new(tuning: &SamplingTuning) -> Self {
        Self {
            spread: tuning.cluster_spread,
            inner_radius: tuning.cluster_inner_radius,
        }
    }

    /// Number of clusters seeded for a match with `players` participants.
    #[must_use]
    pub fn cluster_count(players: usize) -> usize {
        players.saturating_add(2).clamp(3, 8)
    }

    fn centers(&self, area: &SamplingArea, rng: &mut dyn RngCore) -> Vec<Point> {
        let count = Self::cluster_count(area.players());
        let separation = area.min_dimension() * CENTER_SEPARATION;
        let inset = (self.spread + self.inner_radius).min(area.min_dimension() * 0.25);
        let mut centers: Vec<Point> = Vec::with_capacity(count);

        for _ in 0..count {
            let mut candidate = area.center();
            for _ in 0..CENTER_ATTEMPTS {
                candidate = Point::new(
                    rng.gen_range(inset..=(area.width() - inset).max(inset)),
                    rng.gen_range(inset..=(area.height() - inset).max(inset)),
                );
                if centers
                    .iter()
                    .all(|center| center.distance(candidate) >= separation)
                {
                    break;
                }
            }
            centers.push(candidate);
        }
        centers
    }
}

impl LayoutStrategy for Clusters {
    fn sample(&self, area: &SamplingArea, rng: &mut dyn RngCore) -> Vec<Point> {
        let centers = self.centers(area, rng);
        (0..area.count())
            .map(|index| {
                let center = centers[index % centers.len()];
                let distance = rng.gen::<f64>().sqrt() * self.spread + self.inner_radius;
                Point::polar(center, distance, random_angle(rng))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn cluster_count_tracks_players_within_limits() {
        assert_eq!(Clusters::cluster_count(0), 3);
        assert_eq!(Clusters::cluster_count(2), 4);
        assert_eq!(Clusters::cluster_count(5), 7);
        assert_eq!(Clusters::cluster_count(12), 8);
    }

    #[test]
    fn points_form_rings_around_centres() {
        let tuning = SamplingTuning::default();
        let clusters = Clusters::new(&tuning);
        let area = SamplingArea::for_population(40, 2, &tuning);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let centers = clusters.centers(&area, &mut rng);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let points = clusters.sample(&area, &mut rng);

        assert_eq!(centers.len(), 4);
        for (index, point) in points.iter().enumerate() {
            let distance = point.distance(centers[index % centers.len()]);
            assert!(distance >= tuning.cluster_inner_radius - 1e-9);
            assert!(distance <= tuning.cluster_inner_radius + tuning.cluster_spread + 1e-9);
        }
    }
}
