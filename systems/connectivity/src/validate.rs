//! Read-only structural checks over finished territory lists.

use std::collections::{BTreeSet, HashMap};

use starmap_core::{Adjacency, Territory, TerritoryId, TopologyIssue, ValidationReport};

use crate::components;

/// Inspects `territories` and reports every structural defect.
///
/// References are resolved by identifier, so a list whose ids disagree with
/// their positions is still checked for symmetry and connectivity. The input
/// is never modified; calling this twice yields identical reports.
#[must_use]
pub fn validate(territories: &[Territory]) -> ValidationReport {
    let mut issues = Vec::new();
    let mut positions = HashMap::with_capacity(territories.len());

    for (index, territory) in territories.iter().enumerate() {
        if territory.id().index() != index {
            issues.push(TopologyIssue::IdMismatch {
                index,
                id: territory.id(),
            });
        }
        let _ = positions.entry(territory.id()).or_insert(index);
    }

    let mut graph = Adjacency::new(territories.len());
    let mut lanes = 0;

    for (index, territory) in territories.iter().enumerate() {
        let id = territory.id();
        let mut seen = BTreeSet::new();

        for &neighbor in territory.neighbors() {
            if neighbor == id {
                issues.push(TopologyIssue::SelfLoop { territory: id });
                continue;
            }
            if !seen.insert(neighbor) {
                issues.push(TopologyIssue::DuplicateNeighbor {
                    territory: id,
                    neighbor,
                });
                continue;
            }
            let Some(&other) = positions.get(&neighbor) else {
                issues.push(TopologyIssue::DanglingReference {
                    territory: id,
                    neighbor,
                });
                continue;
            };

            let _ = graph.connect(index, other);
            if !lists(&territories[other], id) {
                issues.push(TopologyIssue::Unidirectional { from: id, to: neighbor });
            } else if index < other {
                lanes += 1;
            }
        }
    }

    ValidationReport::new(territories.len(), lanes, components(&graph).len(), issues)
}

fn lists(territory: &Territory, neighbor: TerritoryId) -> bool {
    territory.neighbors().contains(&neighbor)
}
