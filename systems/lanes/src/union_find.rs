//! Disjoint-set forest used to detect cycles while growing the backbone.

use std::cmp::Ordering;

/// Union-find with iterative path halving and union by rank.
#[derive(Clone, Debug)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    /// Creates `len` singleton sets.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    /// Number of elements tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns `true` when no elements are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of the set containing `element`.
    ///
    /// Each visited node is re-pointed at its grandparent, so long chains
    /// flatten without recursion.
    pub fn find(&mut self, mut element: usize) -> usize {
        while self.parent[element] != element {
            let grandparent = self.parent[self.parent[element]];
            self.parent[element] = grandparent;
            element = grandparent;
        }
        element
    }

    /// Merges the sets containing `a` and `b`.
    ///
    /// Returns `false` when they already shared a set.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }

        match self.rank[root_a].cmp(&self.rank[root_b]) {
            Ordering::Less => self.parent[root_a] = root_b,
            Ordering::Greater => self.parent[root_b] = root_a,
            Ordering::Equal => {
                self.parent[root_b] = root_a;
                self.rank[root_a] = self.rank[root_a].saturating_add(1);
            }
        }
        true
    }

    /// Returns `true` when `a` and `b` share a set.
    pub fn connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }
}
