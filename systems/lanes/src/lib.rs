#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Warp lane selection: a collision-aware minimum spanning backbone plus a
//! bounded number of short redundant lanes.

mod augment;
mod spanning;
mod union_find;

pub use augment::{AugmentOutcome, EdgeAugmenter};
pub use spanning::SpanningTreeBuilder;
pub use union_find::UnionFind;
