//! Twin disks sharing the map.

use rand::RngCore;
use starmap_core::Point;

use crate::{disk_point, LayoutStrategy, SamplingArea};

/// Two area-uniform disks separated by 40 % of the map width.
#[derive(Clone, Copy, Debug, Default)]
pub struct Binary;

impl LayoutStrategy for Binary {
    fn sample(&self, area: &SamplingArea, rng: &mut dyn RngCore) -> Vec<Point> {
        let center = area.center();
        let offset = area.width() * 0.2;
        let centers = [
            Point::new(center.x - offset, center.y),
            Point::new(center.x + offset, center.y),
        ];
        let radius = (area.width() * 0.18).min(area.height() * 0.42);

        (0..area.count())
            .map(|index| disk_point(centers[index % 2], radius, rng))
            .collect()
    }
}
