//! Per-vertex longest paths that avoid one color.
//!
//! `P[i][c]` is the length of the longest increasing-index path ending at `i`
//! whose arcs never take color `c`:
//!
//! `P[i][c] = 1 + max { P[j][c] : j < i, color(i, j) != c }`, or `1` when no such `j` exists.

use crate::graph::{COLORS, ColoredTournament};

/// Table of color-avoiding path lengths, one triple per vertex.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathInvariant {
    lengths: Vec<[u32; COLORS]>,
}

impl PathInvariant {
    /// Computes the full table from scratch in `O(n^2)`.
    pub fn compute(graph: &ColoredTournament) -> Self {
        let n = graph.order();
        let mut lengths: Vec<[u32; COLORS]> = Vec::with_capacity(n);
        for i in 0..n {
            let mut row = [1u32; COLORS];
            for j in 0..i {
                let arc = graph.color(i, j) as usize;
                for (c, best) in row.iter_mut().enumerate() {
                    if c != arc {
                        *best = (*best).max(lengths[j][c] + 1);
                    }
                }
            }
            lengths.push(row);
        }
        Self { lengths }
    }

    /// Wraps an externally claimed table, typically to be checked with [`Self::compress`].
    pub fn from_table(lengths: Vec<[u32; COLORS]>) -> Self {
        Self { lengths }
    }

    /// Number of vertices covered by the table.
    #[inline]
    pub fn order(&self) -> usize {
        self.lengths.len()
    }

    /// `P[vertex][color]`, or `None` if either index is out of range.
    pub fn get(&self, vertex: usize, color: usize) -> Option<u32> {
        self.lengths.get(vertex).and_then(|row| row.get(color)).copied()
    }

    /// The per-vertex triples in vertex order.
    #[inline]
    pub fn per_vertex(&self) -> &[[u32; COLORS]] {
        &self.lengths
    }

    /// Longest path avoiding `color` anywhere in the graph (0 for the empty graph).
    pub fn longest_path(&self, color: usize) -> u32 {
        self.lengths.iter().map(|row| row[color]).max().unwrap_or(0)
    }

    /// Sorted per-vertex triples.
    ///
    /// Two tables with different signatures come from different colorings. Equal
    /// signatures prove nothing.
    pub fn signature(&self) -> Vec<[u32; COLORS]> {
        let mut sig = self.lengths.clone();
        sig.sort_unstable();
        sig
    }

    /// Whether the two tables share a signature.
    pub fn may_match(&self, other: &Self) -> bool {
        self.order() == other.order() && self.signature() == other.signature()
    }

    /// Tightens a claimed table against `graph` in place.
    ///
    /// Vertices are visited in increasing order. For each `(i, c)` the value
    /// required by the already tightened predecessors is computed; a stored value
    /// below it is an inconsistency and the walk stops with `false`, leaving the
    /// table partially rewritten. Otherwise the entry is lowered to the required
    /// value. On `true` the table equals [`Self::compute`] for `graph`.
    pub fn compress(&mut self, graph: &ColoredTournament) -> bool {
        if self.lengths.len() != graph.order() {
            return false;
        }
        for i in 0..self.lengths.len() {
            let mut required = [1u32; COLORS];
            for j in 0..i {
                let arc = graph.color(i, j) as usize;
                for (c, need) in required.iter_mut().enumerate() {
                    if c != arc {
                        *need = (*need).max(self.lengths[j][c] + 1);
                    }
                }
            }
            for c in 0..COLORS {
                if self.lengths[i][c] < required[c] {
                    return false;
                }
                self.lengths[i][c] = required[c];
            }
        }
        true
    }

    /// Whether this table is exactly the one `graph` produces.
    pub fn is_valid_for(&self, graph: &ColoredTournament) -> bool {
        *self == Self::compute(graph)
    }
}
