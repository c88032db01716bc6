//! Dense-index undirected graph used as the working structure for
//! kekulization and cyclic-core reduction.
//!
//! Vertices are plain indices `0..size()`. The graph stores no payload; a
//! caller that needs to map vertices back to atoms keeps its own side table
//! and follows the index changes reported by [`SparseGraph::remove_vertex`]
//! and [`cyclic_core`].

mod cyclic;

pub use cyclic::cyclic_core;

use crate::error::GraphError;

/// Index of a vertex in a [`SparseGraph`].
pub type VertexId = usize;

/// Undirected simple graph stored as one neighbor list per vertex.
///
/// Every edge `(a, b)` appears as `b` in `a`'s list and as `a` in `b`'s
/// list. Neighbor lists keep insertion order.
///
/// Every operation that takes a vertex validates it and returns
/// [`GraphError::VertexOutOfRange`] when it is not below [`size`](Self::size).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseGraph {
    adjacency: Vec<Vec<VertexId>>,
}

impl SparseGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph with `size` isolated vertices.
    pub fn with_vertices(size: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); size],
        }
    }

    /// Number of vertices.
    pub fn size(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Grows or shrinks the vertex set to `size`.
    ///
    /// Shrinking drops the removed vertices together with every edge that
    /// touched them.
    pub fn resize(&mut self, size: usize) {
        if size < self.adjacency.len() {
            self.adjacency.truncate(size);
            for neighbors in &mut self.adjacency {
                neighbors.retain(|&n| n < size);
            }
        } else {
            self.adjacency.resize(size, Vec::new());
        }
    }

    /// Appends an isolated vertex and returns its index.
    pub fn add_vertex(&mut self) -> VertexId {
        self.adjacency.push(Vec::new());
        self.adjacency.len() - 1
    }

    /// Removes `vertex` and its edges.
    ///
    /// Every vertex with a larger index moves down by one.
    pub fn remove_vertex(&mut self, vertex: VertexId) -> Result<(), GraphError> {
        self.check(vertex)?;

        let neighbors = std::mem::take(&mut self.adjacency[vertex]);
        for n in neighbors {
            self.adjacency[n].retain(|&x| x != vertex);
        }
        self.adjacency.remove(vertex);

        for list in &mut self.adjacency {
            for n in list.iter_mut() {
                if *n > vertex {
                    *n -= 1;
                }
            }
        }
        Ok(())
    }

    pub fn add_edge(&mut self, a: VertexId, b: VertexId) -> Result<(), GraphError> {
        self.check(a)?;
        self.check(b)?;
        if a == b {
            return Err(GraphError::SelfLoop { vertex: a });
        }
        if self.adjacent(a, b) {
            return Err(GraphError::DuplicateEdge { a, b });
        }

        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
        Ok(())
    }

    pub fn remove_edge(&mut self, a: VertexId, b: VertexId) -> Result<(), GraphError> {
        self.check(a)?;
        self.check(b)?;
        if !self.adjacent(a, b) {
            return Err(GraphError::MissingEdge { a, b });
        }

        self.unlink(a, b);
        Ok(())
    }

    pub fn neighbors(&self, vertex: VertexId) -> Result<&[VertexId], GraphError> {
        self.check(vertex)?;
        Ok(&self.adjacency[vertex])
    }

    pub fn degree(&self, vertex: VertexId) -> Result<usize, GraphError> {
        self.check(vertex)?;
        Ok(self.adjacency[vertex].len())
    }

    /// Returns `true` if an edge joins `a` and `b`. Scans the shorter of
    /// the two neighbor lists.
    pub fn is_adjacent(&self, a: VertexId, b: VertexId) -> Result<bool, GraphError> {
        self.check(a)?;
        self.check(b)?;
        Ok(self.adjacent(a, b))
    }

    pub(crate) fn adjacent(&self, a: VertexId, b: VertexId) -> bool {
        if self.adjacency[a].len() <= self.adjacency[b].len() {
            self.adjacency[a].contains(&b)
        } else {
            self.adjacency[b].contains(&a)
        }
    }

    /// Iterates over every edge once, as `(a, b)` with `a < b`.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(a, neighbors)| {
            neighbors
                .iter()
                .filter(move |&&b| a < b)
                .map(move |&b| (a, b))
        })
    }

    /// Exchanges the positions of `a` and `b`.
    ///
    /// Afterwards `a` holds `b`'s former neighbors and vice versa, and all
    /// back-references are rewritten. No other index changes, so this is
    /// the cheap way to relocate a vertex.
    pub fn swap(&mut self, a: VertexId, b: VertexId) -> Result<(), GraphError> {
        self.check(a)?;
        self.check(b)?;
        self.swap_unchecked(a, b);
        Ok(())
    }

    pub(crate) fn swap_unchecked(&mut self, a: VertexId, b: VertexId) {
        if a == b {
            return;
        }
        let relabel = |x: VertexId| {
            if x == a {
                b
            } else if x == b {
                a
            } else {
                x
            }
        };

        // A vertex adjacent to both must be rewritten exactly once.
        let mut touched: Vec<VertexId> = self.adjacency[a]
            .iter()
            .chain(&self.adjacency[b])
            .copied()
            .filter(|&n| n != a && n != b)
            .collect();
        touched.sort_unstable();
        touched.dedup();

        for n in touched {
            for x in self.adjacency[n].iter_mut() {
                *x = relabel(*x);
            }
        }

        self.adjacency.swap(a, b);
        for v in [a, b] {
            for x in self.adjacency[v].iter_mut() {
                *x = relabel(*x);
            }
        }
    }

    pub(crate) fn list(&self, vertex: VertexId) -> &[VertexId] {
        &self.adjacency[vertex]
    }

    pub(crate) fn unlink(&mut self, a: VertexId, b: VertexId) {
        if let Some(pos) = self.adjacency[a].iter().position(|&x| x == b) {
            self.adjacency[a].remove(pos);
        }
        if let Some(pos) = self.adjacency[b].iter().position(|&x| x == a) {
            self.adjacency[b].remove(pos);
        }
    }

    pub(crate) fn truncate(&mut self, size: usize) {
        self.adjacency.truncate(size);
    }

    fn check(&self, vertex: VertexId) -> Result<(), GraphError> {
        if vertex < self.adjacency.len() {
            Ok(())
        } else {
            Err(GraphError::VertexOutOfRange {
                vertex,
                size: self.adjacency.len(),
            })
        }
    }
}
