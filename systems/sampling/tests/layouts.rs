use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use starmap_core::{Layout, Point, SamplingTuning};
use starmap_system_sampling::{organic_min_distance, ring_count, PointSampler, SamplingArea};

fn sample(layout: Layout, count: usize, seed: u64) -> (SamplingArea, Vec<Point>) {
    let tuning = SamplingTuning::default();
    let area = SamplingArea::for_population(count, 4, &tuning);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let points = PointSampler::new(tuning).sample(&area, layout, &mut rng);
    (area, points)
}

#[test]
fn rings_settle_into_distinct_bands() {
    let (area, points) = sample(Layout::Rings, 100, 4);
    let rings = ring_count(100);
    let spacing = area.min_dimension() * 0.45 / rings as f64;

    let mut bands: Vec<i64> = points
        .iter()
        .map(|point| (point.distance(area.center()) / spacing).round() as i64)
        .collect();
    bands.sort_unstable();
    bands.dedup();

    assert_eq!(points.len(), 100);
    assert!(rings >= 4);
    assert_eq!(bands, (1..=rings as i64).collect::<Vec<_>>());
}

#[test]
fn organic_nearest_neighbours_respect_minimum_spacing() {
    let tuning = SamplingTuning::default();
    for seed in [3, 14, 15, 92] {
        let (area, points) = sample(Layout::Organic, 50, seed);
        let spacing = organic_min_distance(&area, &tuning);

        let spaced = points
            .iter()
            .enumerate()
            .filter(|&(index, point)| {
                let nearest = points
                    .iter()
                    .enumerate()
                    .filter(|&(other, _)| other != index)
                    .map(|(_, other)| point.distance(*other))
                    .fold(f64::INFINITY, f64::min);
                nearest >= spacing * 0.999
            })
            .count();

        assert_eq!(points.len(), 50, "seed {seed}");
        assert!(
            spaced * 10 >= points.len() * 9,
            "seed {seed}: only {spaced} of {} points keep the minimum spacing",
            points.len()
        );
    }
}

#[test]
fn seeded_streams_replay_every_layout() {
    for layout in Layout::ALL {
        let (_, first) = sample(layout, 40, 99);
        let (_, second) = sample(layout, 40, 99);
        assert_eq!(first, second, "{layout} diverged");
    }
}
