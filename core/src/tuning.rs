//! Tuning knobs for every generation stage.
//!
//! Each stage owns a small struct whose [`Default`] holds the shipped
//! constants. All structs deserialize with `#[serde(default)]`, so a TOML file
//! only needs to list the values it overrides.

use serde::Deserialize;

/// Aggregated tuning surface for the whole generator.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeneratorTuning {
    /// Point placement parameters.
    pub sampling: SamplingTuning,
    /// Force-directed spacing parameters.
    pub relaxation: RelaxationTuning,
    /// Backbone and augmentation parameters.
    pub lanes: LaneTuning,
    /// Map framing and territory defaults.
    pub assembly: AssemblyTuning,
}

impl GeneratorTuning {
    /// Parses a (possibly partial) tuning file and rejects unusable values.
    pub fn from_toml_str(contents: &str) -> Result<Self, TuningError> {
        let tuning: Self = toml::from_str(contents).map_err(TuningError::Parse)?;
        tuning.check()?;
        Ok(tuning)
    }

    /// Verifies every knob is finite and inside the range the stages accept.
    ///
    /// Extents, the aspect ratio and the organic spacing factor must be
    /// strictly positive; every other value must be non-negative.
    pub fn check(&self) -> Result<(), TuningError> {
        let sampling = &self.sampling;
        positive("sampling.extent_per_node", sampling.extent_per_node)?;
        positive("sampling.min_extent", sampling.min_extent)?;
        positive("sampling.aspect_ratio", sampling.aspect_ratio)?;
        positive(
            "sampling.organic_spacing_factor",
            sampling.organic_spacing_factor,
        )?;
        non_negative("sampling.cluster_spread", sampling.cluster_spread)?;
        non_negative("sampling.cluster_inner_radius", sampling.cluster_inner_radius)?;
        non_negative("sampling.ring_jitter", sampling.ring_jitter)?;

        let relaxation = &self.relaxation;
        non_negative("relaxation.repulsion", relaxation.repulsion)?;
        non_negative("relaxation.min_separation", relaxation.min_separation)?;
        non_negative("relaxation.max_force", relaxation.max_force)?;
        non_negative("relaxation.damping", relaxation.damping)?;
        non_negative("relaxation.margin", relaxation.margin)?;

        let lanes = &self.lanes;
        non_negative("lanes.backbone_clearance", lanes.backbone_clearance)?;
        non_negative("lanes.augment_clearance", lanes.augment_clearance)?;
        non_negative("lanes.augment_fraction", lanes.augment_fraction)?;
        non_negative("lanes.augment_max_length", lanes.augment_max_length)?;

        non_negative("assembly.margin", self.assembly.margin)?;
        non_negative("assembly.territory_radius", self.assembly.territory_radius)
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            value,
            expected: "a finite value greater than zero",
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::Invalid {
            field,
            value,
            expected: "a finite, non-negative value",
        })
    }
}

/// Errors raised while loading tuning overrides.
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    /// The TOML document could not be parsed into the tuning surface.
    #[error("could not parse generator tuning: {0}")]
    Parse(#[source] toml::de::Error),
    /// A knob holds a value the generator cannot work with.
    #[error("tuning value {field} = {value} is invalid, expected {expected}")]
    Invalid {
        /// Dotted path of the offending knob.
        field: &'static str,
        /// Value found in the file.
        value: f64,
        /// Accepted range.
        expected: &'static str,
    },
}

/// Point placement parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SamplingTuning {
    /// Sampling extent granted per `sqrt(territory)`; larger values spread the galaxy out.
    pub extent_per_node: f64,
    /// Smallest sampling extent regardless of territory count.
    pub min_extent: f64,
    /// Width divided by height of the sampling rectangle.
    pub aspect_ratio: f64,
    /// Factor applied to `sqrt(area / count)` to obtain the organic minimum spacing.
    pub organic_spacing_factor: f64,
    /// Candidate offsets tried around each active point before it is retired.
    pub organic_candidates: u32,
    /// Backfill attempts granted per missing territory before giving up.
    pub backfill_attempts_per_node: u32,
    /// Polar spread of points around a cluster centre.
    pub cluster_spread: f64,
    /// Empty radius kept around each cluster centre.
    pub cluster_inner_radius: f64,
    /// Maximum radial jitter applied to ring members.
    pub ring_jitter: f64,
}

impl Default for SamplingTuning {
    fn default() -> Self {
        Self {
            extent_per_node: 200.0,
            min_extent: 1_200.0,
            aspect_ratio: 1.4,
            organic_spacing_factor: 0.42,
            organic_candidates: 30,
            backfill_attempts_per_node: 50,
            cluster_spread: 250.0,
            cluster_inner_radius: 50.0,
            ring_jitter: 20.0,
        }
    }
}

/// Force-directed spacing parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RelaxationTuning {
    /// Iterations applied to organic galaxies.
    pub organic_iterations: u32,
    /// Iterations applied to every other layout.
    pub default_iterations: u32,
    /// Repulsion constant `k` in `k / distance²`.
    pub repulsion: f64,
    /// Pairs closer than this are skipped to avoid division blow-up.
    pub min_separation: f64,
    /// Per-axis clamp applied to the accumulated force.
    pub max_force: f64,
    /// Fraction of the clamped force applied per iteration.
    pub damping: f64,
    /// Distance kept from the sampling rectangle's edges.
    pub margin: f64,
}

impl Default for RelaxationTuning {
    fn default() -> Self {
        Self {
            organic_iterations: 8,
            default_iterations: 5,
            repulsion: 20_000.0,
            min_separation: 0.1,
            max_force: 15.0,
            damping: 0.8,
            margin: 50.0,
        }
    }
}

/// Backbone and augmentation parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LaneTuning {
    /// Minimum distance between a backbone lane and any unrelated star.
    pub backbone_clearance: f64,
    /// Minimum distance between an augmented lane and any unrelated star.
    pub augment_clearance: f64,
    /// Extra lanes allowed as a fraction of the territory count.
    pub augment_fraction: f64,
    /// Longest lane the augmenter may add.
    pub augment_max_length: f64,
}

impl Default for LaneTuning {
    fn default() -> Self {
        Self {
            backbone_clearance: 25.0,
            augment_clearance: 20.0,
            augment_fraction: 0.12,
            augment_max_length: 200.0,
        }
    }
}

/// Map framing and territory defaults.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssemblyTuning {
    /// Empty border added around the point cloud on every side.
    pub margin: f64,
    /// Radius assigned to every territory.
    pub territory_radius: f64,
    /// Smallest initial garrison.
    pub garrison_min: u32,
    /// Largest initial garrison.
    pub garrison_max: u32,
}

impl Default for AssemblyTuning {
    fn default() -> Self {
        Self {
            margin: 200.0,
            territory_radius: 20.0,
            garrison_min: 1,
            garrison_max: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_overrides_only_listed_values() {
        let tuning = GeneratorTuning::from_toml_str(
            "[lanes]\naugment_fraction = 0.15\n\n[assembly]\ngarrison_max = 5\n",
        )
        .expect("tuning parses");

        assert_eq!(tuning.lanes.augment_fraction, 0.15);
        assert_eq!(tuning.lanes.backbone_clearance, 25.0);
        assert_eq!(tuning.assembly.garrison_max, 5);
        assert_eq!(tuning.relaxation, RelaxationTuning::default());
    }

    #[test]
    fn malformed_toml_reports_parse_error() {
        let error = GeneratorTuning::from_toml_str("[lanes]\naugment_fraction = \"lots\"")
            .expect_err("string is not a float");
        assert!(matches!(error, TuningError::Parse(_)));
    }

    #[test]
    fn negative_force_clamp_is_rejected() {
        let error = GeneratorTuning::from_toml_str("[relaxation]\nmax_force = -1.0\n")
            .expect_err("negative clamp is unusable");

        assert!(matches!(
            error,
            TuningError::Invalid {
                field: "relaxation.max_force",
                ..
            }
        ));
        assert!(error.to_string().contains("relaxation.max_force = -1"));
    }

    #[test]
    fn degenerate_extents_are_rejected() {
        for (contents, field) in [
            ("[sampling]\naspect_ratio = -1.4\n", "sampling.aspect_ratio"),
            ("[sampling]\nmin_extent = 0.0\n", "sampling.min_extent"),
            ("[lanes]\naugment_clearance = nan\n", "lanes.augment_clearance"),
            ("[assembly]\nmargin = -inf\n", "assembly.margin"),
        ] {
            let error = GeneratorTuning::from_toml_str(contents).expect_err(contents);
            assert!(
                matches!(error, TuningError::Invalid { field: found, .. } if found == field),
                "{contents} reported {error}"
            );
        }
    }

    #[test]
    fn shipped_defaults_pass_their_own_checks() {
        assert!(GeneratorTuning::default().check().is_ok());
        assert!(GeneratorTuning::from_toml_str("").is_ok());
    }
}
