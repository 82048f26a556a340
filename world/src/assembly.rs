//! Conversion of the finished lane graph into territories.

use rand::Rng;
use starmap_core::{Adjacency, AssemblyTuning, Point, Territory, TerritoryId};

/// Emits territories with sequential ids and sorted neighbour lists.
#[derive(Clone, Debug)]
pub struct TerritoryAssembler {
    radius: f64,
    garrison_min: u32,
    garrison_max: u32,
}

impl Default for TerritoryAssembler {
    fn default() -> Self {
        Self::new(&AssemblyTuning::default())
    }
}

impl TerritoryAssembler {
    /// Creates an assembler; a reversed garrison range is swapped.
    #[must_use]
    pub fn new(tuning: &AssemblyTuning) -> Self {
        Self {
            radius: tuning.territory_radius,
            garrison_min: tuning.garrison_min.min(tuning.garrison_max),
            garrison_max: tuning.garrison_min.max(tuning.garrison_max),
        }
    }

    /// Builds one territory per point, wiring neighbours from `adjacency`.
    ///
    /// Owners start empty and garrisons are drawn uniformly from the
    /// configured inclusive range.
    pub fn assemble<R>(&self, points: &[Point], adjacency: &Adjacency, rng: &mut R) -> Vec<Territory>
    where
        R: Rng + ?Sized,
    {
        points
            .iter()
            .enumerate()
            .map(|(index, &position)| {
                let neighbors = adjacency.neighbors(index).map(territory_id).collect();
                let garrison = rng.gen_range(self.garrison_min..=self.garrison_max);
                Territory::new(territory_id(index), position, self.radius, neighbors, garrison)
            })
            .collect()
    }
}

fn territory_id(index: usize) -> TerritoryId {
    TerritoryId::new(index as u32)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn territories_mirror_the_lane_graph() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 0.0),
        ];
        let mut adjacency = Adjacency::new(3);
        let _ = adjacency.connect(2, 0);
        let _ = adjacency.connect(1, 0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let territories = TerritoryAssembler::default().assemble(&points, &adjacency, &mut rng);

        assert_eq!(territories.len(), 3);
        assert_eq!(
            territories[0].neighbors(),
            &[TerritoryId::new(1), TerritoryId::new(2)]
        );
        assert_eq!(territories[2].neighbors(), &[TerritoryId::new(0)]);
        for (index, territory) in territories.iter().enumerate() {
            assert_eq!(territory.id().index(), index);
            assert_eq!(territory.position(), points[index]);
            assert_eq!(territory.radius(), 20.0);
            assert_eq!(territory.owner(), None);
            assert!((1..=3).contains(&territory.army_size()));
        }
    }

    #[test]
    fn reversed_garrison_range_is_swapped() {
        let assembler = TerritoryAssembler::new(&AssemblyTuning {
            garrison_min: 6,
            garrison_max: 4,
            ..AssemblyTuning::default()
        });
        let points = vec![Point::default(); 40];
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let territories = assembler.assemble(&points, &Adjacency::new(40), &mut rng);

        assert!(territories
            .iter()
            .all(|territory| (4..=6).contains(&territory.army_size())));
    }
}
