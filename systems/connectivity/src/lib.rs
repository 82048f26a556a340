#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Connectivity guarantees for the lane graph.
//!
//! [`ConnectivityRepair`] bridges whatever components the lane stages left
//! apart, and [`validate`] inspects finished territory lists without touching
//! them.

use std::collections::VecDeque;

use starmap_core::Adjacency;

mod repair;
mod validate;

pub use repair::{ConnectivityRepair, RepairOutcome};
pub use validate::validate;

/// Partitions the nodes of `adjacency` into connected components.
///
/// Components are listed in discovery order, each starting from its lowest
/// node index, with members in breadth-first order.
#[must_use]
pub fn components(adjacency: &Adjacency) -> Vec<Vec<usize>> {
    let mut visited = vec![false; adjacency.len()];
    let mut components = Vec::new();
    let mut queue = VecDeque::new();

    for start in 0..adjacency.len() {
        if visited[start] {
            continue;
        }

        visited[start] = true;
        queue.push_back(start);
        let mut members = Vec::new();

        while let Some(node) = queue.pop_front() {
            members.push(node);
            for neighbor in adjacency.neighbors(node) {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }
        components.push(members);
    }
    components
}
