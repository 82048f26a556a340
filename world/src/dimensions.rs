//! Map framing around the final point cloud.

use starmap_core::{AssemblyTuning, MapDimensions, Point};

/// Derives map dimensions and centres the points inside them.
#[derive(Clone, Debug)]
pub struct DimensionCalculator {
    margin: f64,
}

impl Default for DimensionCalculator {
    fn default() -> Self {
        Self::new(&AssemblyTuning::default())
    }
}

impl DimensionCalculator {
    /// Creates a calculator using the configured margin; negative margins count as zero.
    #[must_use]
    pub fn new(tuning: &AssemblyTuning) -> Self {
        Self {
            margin: tuning.margin.max(0.0),
        }
    }

    /// Sizes the map to the bounding box plus the margin and translates every
    /// point so the bounding box sits in the middle of it.
    ///
    /// Every point ends up within `[margin, extent - margin]` on both axes. An
    /// empty cloud yields a square of twice the margin.
    pub fn recenter(&self, points: &mut [Point]) -> MapDimensions {
        let Some(first) = points.first().copied() else {
            return MapDimensions::new(2.0 * self.margin, 2.0 * self.margin);
        };

        let (min, max) = points.iter().fold((first, first), |(min, max), point| {
            (
                Point::new(min.x.min(point.x), min.y.min(point.y)),
                Point::new(max.x.max(point.x), max.y.max(point.y)),
            )
        });

        let dimensions = MapDimensions::new(
            max.x - min.x + 2.0 * self.margin,
            max.y - min.y + 2.0 * self.margin,
        );
        let dx = self.margin - min.x;
        let dy = self.margin - min.y;
        for point in points.iter_mut() {
            point.x += dx;
            point.y += dy;
        }
        dimensions
    }
}
