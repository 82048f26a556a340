use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use starmap_core::{Layout, MapDimensions, Territory};
use starmap_world::Galaxy;

const SNAPSHOT_DOMAIN: &str = "galaxy";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "galaxy:v1";
/// Delimiter used to separate the prefix, map dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Portable copy of a generated galaxy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GalaxySnapshot {
    /// Width of the map in world units.
    pub(crate) width: f64,
    /// Height of the map in world units.
    pub(crate) height: f64,
    /// Layout the galaxy was generated with.
    pub(crate) layout: Layout,
    /// Seed that reproduces the galaxy.
    pub(crate) seed: u64,
    /// Territories in id order.
    pub(crate) territories: Vec<Territory>,
}

impl GalaxySnapshot {
    /// Captures the parts of `galaxy` that downstream consumers need.
    #[must_use]
    pub(crate) fn capture(galaxy: &Galaxy) -> Self {
        let dimensions = galaxy.dimensions();
        Self {
            width: dimensions.width(),
            height: dimensions.height(),
            layout: galaxy.layout(),
            seed: galaxy.seed(),
            territories: galaxy.territories().to_vec(),
        }
    }

    /// Map extent recorded in the snapshot.
    #[must_use]
    pub(crate) const fn dimensions(&self) -> MapDimensions {
        MapDimensions::new(self.width, self.height)
    }

    /// Encodes the snapshot into a single-line string suitable for clipboard transfer.
    pub(crate) fn encode(&self) -> Result<String, TransferError> {
        let payload = SerializablePayload {
            layout: self.layout,
            seed: self.seed,
            territories: self.territories.clone(),
        };
        let json = serde_json::to_vec(&payload).map_err(TransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{SNAPSHOT_HEADER}:{}x{}:{encoded}",
            self.width, self.height
        ))
    }

    /// Decodes a snapshot from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, TransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(TransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(TransferError::MissingPrefix)?;
        let version = parts.next().ok_or(TransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(TransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(TransferError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(TransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(TransferError::UnsupportedVersion(version.to_owned()));
        }

        let (width, height) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(TransferError::InvalidEncoding)?;
        let decoded: SerializablePayload =
            serde_json::from_slice(&bytes).map_err(TransferError::InvalidPayload)?;

        Ok(Self {
            width,
            height,
            layout: decoded.layout,
            seed: decoded.seed,
            territories: decoded.territories,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializablePayload {
    layout: Layout,
    seed: u64,
    territories: Vec<Territory>,
}

/// Errors that can occur while encoding or decoding galaxy transfer strings.
#[derive(Debug, thiserror::Error)]
pub(crate) enum TransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("transfer string was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded snapshot.
    #[error("galaxy string is missing the prefix")]
    MissingPrefix,
    /// The encoded snapshot did not contain a version segment.
    #[error("galaxy string is missing the version")]
    MissingVersion,
    /// The encoded snapshot did not include map dimensions.
    #[error("galaxy string is missing the map dimensions")]
    MissingDimensions,
    /// The encoded snapshot did not include the payload segment.
    #[error("galaxy string is missing the payload")]
    MissingPayload,
    /// The encoded snapshot used an unexpected prefix segment.
    #[error("galaxy prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded snapshot used an unsupported version identifier.
    #[error("galaxy version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The map dimensions could not be parsed from the encoded snapshot.
    #[error("could not parse map dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode galaxy payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    #[error("could not process galaxy payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}

fn parse_dimensions(dimensions: &str) -> Result<(f64, f64), TransferError> {
    let invalid = || TransferError::InvalidDimensions(dimensions.to_owned());
    let (width, height) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let width = width.trim().parse::<f64>().map_err(|_| invalid())?;
    let height = height.trim().parse::<f64>().map_err(|_| invalid())?;

    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        return Err(invalid());
    }

    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use starmap_world::generate;

    use super::*;

    #[test]
    fn generated_galaxy_survives_transfer() {
        let galaxy = generate(24, Layout::Spiral, 3, Some(404));
        let snapshot = GalaxySnapshot::capture(&galaxy);

        let encoded = snapshot.encode().expect("snapshot encodes");
        assert!(encoded.starts_with(&format!("{SNAPSHOT_HEADER}:")));
        assert!(!encoded.contains('\n'));

        let decoded = GalaxySnapshot::decode(&encoded).expect("snapshot decodes");
        assert_eq!(decoded, snapshot);
        assert_eq!(decoded.dimensions(), galaxy.dimensions());
    }

    #[test]
    fn empty_galaxy_keeps_its_frame() {
        let snapshot = GalaxySnapshot {
            width: 400.0,
            height: 400.0,
            layout: Layout::Rings,
            seed: 3,
            territories: Vec::new(),
        };

        let encoded = snapshot.encode().expect("snapshot encodes");
        assert!(encoded.starts_with("galaxy:v1:400x400:"));
        assert_eq!(GalaxySnapshot::decode(&encoded).expect("decodes"), snapshot);
    }

    #[test]
    fn malformed_strings_are_rejected() {
        assert!(matches!(
            GalaxySnapshot::decode("   "),
            Err(TransferError::EmptyPayload)
        ));
        assert!(matches!(
            GalaxySnapshot::decode("maze:v1:10x10:e30"),
            Err(TransferError::InvalidPrefix(prefix)) if prefix == "maze"
        ));
        assert!(matches!(
            GalaxySnapshot::decode("galaxy:v9:10x10:e30"),
            Err(TransferError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            GalaxySnapshot::decode("galaxy:v1:wide:e30"),
            Err(TransferError::InvalidDimensions(_))
        ));
        assert!(matches!(
            GalaxySnapshot::decode("galaxy:v1:10x10"),
            Err(TransferError::MissingPayload)
        ));
        assert!(matches!(
            GalaxySnapshot::decode("galaxy:v1:10x10:!!!"),
            Err(TransferError::InvalidEncoding(_))
        ));
        assert!(matches!(
            GalaxySnapshot::decode("galaxy:v1:10x10:e30"),
            Err(TransferError::InvalidPayload(_))
        ));
    }
}
