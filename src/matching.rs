//! Maximum-weight matching in general undirected graphs.
//!
//! This is Edmonds' blossom method combined with the primal-dual scheme for
//! weights, following Galil's presentation ("Efficient Algorithms for
//! Finding Maximum Matching in Graphs", ACM Computing Surveys, 1986). Each
//! stage grows alternating trees from every exposed vertex over tight edges
//! (zero slack), contracts odd cycles into blossoms, and either augments
//! the matching or adjusts the dual variables to make new edges tight.
//! Running time is `O(V^3)`.
//!
//! Vertices are `0..n`. Non-trivial blossoms live in the same index space
//! at `n..2n`, so the blossom forest is a set of parent/child index tables
//! rather than a pointer structure. Edge `k` has two endpoints, numbered
//! `2k` and `2k + 1`; `endpoint[p]` is the vertex at endpoint `p` and
//! `p ^ 1` is the opposite end of the same edge.

use tracing::{instrument, trace};

use crate::error::GraphError;
use crate::graph::{SparseGraph, VertexId};
use crate::weight::Weight;

/// Largest edge weight magnitude a problem accepts.
///
/// The solver works on doubled weights and sums of dual variables, so the
/// bound leaves ample headroom in an `i64`.
pub const MAX_EDGE_WEIGHT: Weight = 1 << 40;

/// Undirected edge with an integer weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedEdge {
    pub a: VertexId,
    pub b: VertexId,
    pub weight: Weight,
}

/// A weighted matching problem.
///
/// # Examples
///
/// ```
/// use kekule::MaximumWeightMatching;
///
/// // path 0-1-2-3 where the middle edge is heavy but the two outer edges
/// // together weigh more
/// let mut problem = MaximumWeightMatching::new(4);
/// problem.add_edge(0, 1, 5).unwrap();
/// problem.add_edge(1, 2, 8).unwrap();
/// problem.add_edge(2, 3, 5).unwrap();
///
/// let matching = problem.run();
/// assert_eq!(matching.weight(), 10);
/// assert!(matching.contains(0, 1));
/// assert!(matching.contains(3, 2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MaximumWeightMatching {
    vertex_count: usize,
    edges: Vec<WeightedEdge>,
    max_cardinality: bool,
}

impl MaximumWeightMatching {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            edges: Vec::new(),
            max_cardinality: false,
        }
    }

    /// Builds a problem with one edge per edge of `graph`.
    pub fn from_graph<F>(graph: &SparseGraph, mut weight: F) -> Result<Self, GraphError>
    where
        F: FnMut(VertexId, VertexId) -> Weight,
    {
        let edges = graph
            .edges()
            .map(|(a, b)| -> Result<WeightedEdge, GraphError> {
                let weight = checked_weight(weight(a, b))?;
                Ok(WeightedEdge { a, b, weight })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self {
            vertex_count: graph.size(),
            edges,
            max_cardinality: false,
        })
    }

    /// Restricts the search to matchings of maximum cardinality, returning
    /// the heaviest among those.
    pub fn with_max_cardinality(mut self, enabled: bool) -> Self {
        self.max_cardinality = enabled;
        self
    }

    /// Adds an edge and returns its index.
    ///
    /// Fails on an out-of-range or repeated vertex pair and on a weight
    /// beyond [`MAX_EDGE_WEIGHT`].
    pub fn add_edge(
        &mut self,
        a: VertexId,
        b: VertexId,
        weight: Weight,
    ) -> Result<usize, GraphError> {
        for v in [a, b] {
            if v >= self.vertex_count {
                return Err(GraphError::VertexOutOfRange {
                    vertex: v,
                    size: self.vertex_count,
                });
            }
        }
        if a == b {
            return Err(GraphError::SelfLoop { vertex: a });
        }
        if self
            .edges
            .iter()
            .any(|e| (e.a == a && e.b == b) || (e.a == b && e.b == a))
        {
            return Err(GraphError::DuplicateEdge { a, b });
        }
        let weight = checked_weight(weight)?;
        self.edges.push(WeightedEdge { a, b, weight });
        Ok(self.edges.len() - 1)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn edges(&self) -> &[WeightedEdge] {
        &self.edges
    }

    /// Solves the problem.
    #[instrument(skip_all, fields(vertices = self.vertex_count, edges = self.edges.len()))]
    pub fn run(&self) -> Matching {
        let n = self.vertex_count;
        if self.edges.is_empty() {
            return Matching {
                mate: vec![None; n],
                edge: vec![None; n],
                weight: 0,
            };
        }

        let mut solver = Solver::new(n, &self.edges, self.max_cardinality);
        solver.solve();
        debug_assert!(
            solver.certificate_holds(),
            "dual solution does not certify the matching"
        );

        let mut mate = vec![None; n];
        let mut edge = vec![None; n];
        for v in 0..n {
            if let Some(p) = solver.mate[v] {
                mate[v] = Some(solver.endpoint[p]);
                edge[v] = Some(p / 2);
            }
        }
        let weight: Weight = (0..n)
            .filter_map(|v| match (mate[v], edge[v]) {
                (Some(w), Some(k)) if v < w => Some(self.edges[k].weight),
                _ => None,
            })
            .sum();

        let matching = Matching { mate, edge, weight };
        trace!(pairs = matching.len(), weight, "matching complete");
        matching
    }
}

fn checked_weight(weight: Weight) -> Result<Weight, GraphError> {
    if (-MAX_EDGE_WEIGHT..=MAX_EDGE_WEIGHT).contains(&weight) {
        Ok(weight)
    } else {
        Err(GraphError::WeightOutOfRange { weight })
    }
}

/// Result of [`MaximumWeightMatching::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matching {
    mate: Vec<Option<VertexId>>,
    edge: Vec<Option<usize>>,
    weight: Weight,
}

impl Matching {
    /// The vertex matched to `v`, if any.
    pub fn mate(&self, v: VertexId) -> Option<VertexId> {
        self.mate[v]
    }

    /// Index (into the problem's edge list) of the edge covering `v`.
    pub fn edge(&self, v: VertexId) -> Option<usize> {
        self.edge[v]
    }

    pub fn is_matched(&self, v: VertexId) -> bool {
        self.mate[v].is_some()
    }

    pub fn contains(&self, a: VertexId, b: VertexId) -> bool {
        self.mate.get(a).copied().flatten() == Some(b)
    }

    /// Matched pairs `(a, b)` with `a < b`, in order of `a`.
    pub fn pairs(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.mate
            .iter()
            .enumerate()
            .filter_map(|(a, m)| m.filter(|&b| a < b).map(|b| (a, b)))
    }

    /// Vertices left exposed.
    pub fn unmatched(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.mate
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_none())
            .map(|(v, _)| v)
    }

    /// Number of matched edges.
    pub fn len(&self) -> usize {
        self.pairs().count()
    }

    pub fn is_empty(&self) -> bool {
        self.mate.iter().all(Option::is_none)
    }

    /// Total weight of the matched edges.
    pub fn weight(&self) -> Weight {
        self.weight
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Unlabeled,
    /// Even distance from an exposed root (S in Galil's notation).
    Outer,
    /// Odd distance from an exposed root (T).
    Inner,
    /// Temporary mark left by `scan_blossom` while walking up two trees.
    Breadcrumb,
}

enum Delta {
    /// No further improvement is possible.
    Finished,
    /// An edge from an outer blossom to an unlabeled vertex became tight.
    Grow(usize),
    /// An edge between two outer blossoms became tight.
    Merge(usize),
    /// An inner blossom's dual reached zero.
    Expand(usize),
}

struct Solver<'a> {
    n: usize,
    edges: &'a [WeightedEdge],
    max_cardinality: bool,

    endpoint: Vec<VertexId>,
    /// Remote endpoints of the edges incident to each vertex.
    neighbor_endpoints: Vec<Vec<usize>>,
    /// Remote endpoint of the matched edge of each vertex.
    mate: Vec<Option<usize>>,

    /// Label of each top-level blossom, and of vertices inside inner
    /// blossoms that are reachable from outside.
    label: Vec<Label>,
    /// Remote endpoint of the edge through which the label was obtained.
    label_end: Vec<Option<usize>>,
    /// Top-level blossom containing each vertex.
    in_blossom: Vec<usize>,
    blossom_parent: Vec<Option<usize>>,
    /// Sub-blossoms in cyclic order, starting at the base.
    blossom_children: Vec<Vec<usize>>,
    blossom_base: Vec<Option<VertexId>>,
    /// `blossom_endpoints[b][i]` is the endpoint on child `i` of the edge
    /// joining it to child `i + 1`.
    blossom_endpoints: Vec<Vec<usize>>,
    /// Least-slack edge to an outer blossom (for free vertices) or to a
    /// different outer blossom (for outer blossoms).
    best_edge: Vec<Option<usize>>,
    /// Least-slack edges from an outer blossom to every other outer
    /// blossom; `None` means "derive from the leaves".
    blossom_best_edges: Vec<Option<Vec<usize>>>,
    unused_blossoms: Vec<usize>,

    /// Vertex duals at `0..n`, blossom duals at `n..2n`. Vertex duals are
    /// stored doubled so every quantity stays integral.
    dual: Vec<Weight>,
    allowed: Vec<bool>,
    queue: Vec<VertexId>,
}

impl<'a> Solver<'a> {
    fn new(n: usize, edges: &'a [WeightedEdge], max_cardinality: bool) -> Self {
        let max_weight = edges.iter().map(|e| e.weight).max().unwrap_or(0).max(0);

        let mut endpoint = Vec::with_capacity(2 * edges.len());
        let mut neighbor_endpoints = vec![Vec::new(); n];
        for (k, e) in edges.iter().enumerate() {
            endpoint.push(e.a);
            endpoint.push(e.b);
            neighbor_endpoints[e.a].push(2 * k + 1);
            neighbor_endpoints[e.b].push(2 * k);
        }

        let mut dual = vec![0; 2 * n];
        dual[..n].fill(max_weight);

        Self {
            n,
            edges,
            max_cardinality,
            endpoint,
            neighbor_endpoints,
            mate: vec![None; n],
            label: vec![Label::Unlabeled; 2 * n],
            label_end: vec![None; 2 * n],
            in_blossom: (0..n).collect(),
            blossom_parent: vec![None; 2 * n],
            blossom_children: vec![Vec::new(); 2 * n],
            blossom_base: (0..n).map(Some).chain((0..n).map(|_| None)).collect(),
            blossom_endpoints: vec![Vec::new(); 2 * n],
            best_edge: vec![None; 2 * n],
            blossom_best_edges: vec![None; 2 * n],
            unused_blossoms: (n..2 * n).collect(),
            dual,
            allowed: vec![false; edges.len()],
            queue: Vec::new(),
        }
    }

    fn slack(&self, k: usize) -> Weight {
        let e = &self.edges[k];
        self.dual[e.a] + self.dual[e.b] - 2 * e.weight
    }

    /// Vertices contained in blossom `b`, in child order.
    fn leaves(&self, b: usize) -> Vec<VertexId> {
        let mut out = Vec::new();
        let mut stack = vec![b];
        while let Some(t) = stack.pop() {
            if t < self.n {
                out.push(t);
            } else {
                stack.extend(self.blossom_children[t].iter().rev());
            }
        }
        out
    }

    fn assign_label(&mut self, w: VertexId, label: Label, p: Option<usize>) {
        let b = self.in_blossom[w];
        debug_assert!(self.label[w] == Label::Unlabeled && self.label[b] == Label::Unlabeled);
        self.label[w] = label;
        self.label[b] = label;
        self.label_end[w] = p;
        self.label_end[b] = p;
        self.best_edge[w] = None;
        self.best_edge[b] = None;

        match label {
            Label::Outer => {
                let leaves = self.leaves(b);
                self.queue.extend(leaves);
            }
            Label::Inner => {
                // The mate of an inner blossom's base becomes outer.
                let base = self.blossom_base[b].expect("top-level blossom has a base");
                let m = self.mate[base].expect("inner blossom base is matched");
                let next = self.endpoint[m];
                self.assign_label(next, Label::Outer, Some(m ^ 1));
            }
            Label::Unlabeled | Label::Breadcrumb => {}
        }
    }

    /// Walks up the alternating trees from `v` and `w` in lockstep. Returns
    /// the base of the new blossom if both trees meet, or `None` when they
    /// reach two different roots (an augmenting path).
    fn scan_blossom(&mut self, v: VertexId, w: VertexId) -> Option<VertexId> {
        let mut path = Vec::new();
        let mut base = None;
        let mut v = Some(v);
        let mut w = Some(w);

        while let Some(cur) = v {
            let b = self.in_blossom[cur];
            if self.label[b] == Label::Breadcrumb {
                base = self.blossom_base[b];
                break;
            }
            debug_assert_eq!(self.label[b], Label::Outer);
            path.push(b);
            self.label[b] = Label::Breadcrumb;

            v = match self.label_end[b] {
                None => None,
                Some(p) => {
                    let t = self.endpoint[p];
                    let bt = self.in_blossom[t];
                    debug_assert_eq!(self.label[bt], Label::Inner);
                    let q = self.label_end[bt].expect("inner blossom has a label end");
                    Some(self.endpoint[q])
                }
            };
            if w.is_some() {
                std::mem::swap(&mut v, &mut w);
            }
        }

        for b in path {
            self.label[b] = Label::Outer;
        }
        base
    }

    /// Contracts the odd cycle closed by edge `k` into a new blossom with
    /// the given base.
    fn add_blossom(&mut self, base: VertexId, k: usize) {
        let WeightedEdge { a: v, b: w, .. } = self.edges[k];
        let bb = self.in_blossom[base];
        let mut bv = self.in_blossom[v];
        let mut bw = self.in_blossom[w];

        let b = self
            .unused_blossoms
            .pop()
            .expect("at most n / 2 blossoms are live");
        trace!(blossom = b, base, edge = k, "contracting blossom");
        self.blossom_base[b] = Some(base);
        self.blossom_parent[b] = None;
        self.blossom_parent[bb] = Some(b);

        let mut children = Vec::new();
        let mut endps = Vec::new();
        while bv != bb {
            self.blossom_parent[bv] = Some(b);
            children.push(bv);
            let p = self.label_end[bv].expect("blossom on the path has a label end");
            endps.push(p);
            bv = self.in_blossom[self.endpoint[p]];
        }
        children.push(bb);
        children.reverse();
        endps.reverse();
        endps.push(2 * k);
        while bw != bb {
            self.blossom_parent[bw] = Some(b);
            children.push(bw);
            let p = self.label_end[bw].expect("blossom on the path has a label end");
            endps.push(p ^ 1);
            bw = self.in_blossom[self.endpoint[p]];
        }

        debug_assert_eq!(self.label[bb], Label::Outer);
        self.label[b] = Label::Outer;
        self.label_end[b] = self.label_end[bb];
        self.dual[b] = 0;
        self.blossom_children[b] = children.clone();
        self.blossom_endpoints[b] = endps;

        for leaf in self.leaves(b) {
            if self.label[self.in_blossom[leaf]] == Label::Inner {
                // Inner vertices become outer as part of an outer blossom.
                self.queue.push(leaf);
            }
            self.in_blossom[leaf] = b;
        }

        let mut best_to: Vec<Option<usize>> = vec![None; 2 * self.n];
        for &sub in &children {
            let stored = self.blossom_best_edges[sub].take();
            let candidates: Vec<usize> = match stored {
                Some(list) => list,
                None => self
                    .leaves(sub)
                    .into_iter()
                    .flat_map(|leaf| self.neighbor_endpoints[leaf].iter().map(|&p| p / 2))
                    .collect(),
            };
            for c in candidates {
                let e = self.edges[c];
                let j = if self.in_blossom[e.b] == b { e.a } else { e.b };
                let bj = self.in_blossom[j];
                if bj != b
                    && self.label[bj] == Label::Outer
                    && best_to[bj].map_or(true, |cur| self.slack(c) < self.slack(cur))
                {
                    best_to[bj] = Some(c);
                }
            }
            self.best_edge[sub] = None;
        }

        let best: Vec<usize> = best_to.into_iter().flatten().collect();
        let mut best_edge = None;
        for &k in &best {
            if best_edge.map_or(true, |cur| self.slack(k) < self.slack(cur)) {
                best_edge = Some(k);
            }
        }
        self.best_edge[b] = best_edge;
        self.blossom_best_edges[b] = Some(best);
    }

    /// Turns the children of top-level blossom `b` back into top-level
    /// blossoms. Mid-stage expansion of an inner blossom relabels the
    /// children so the alternating tree stays consistent.
    fn expand_blossom(&mut self, b: usize, end_stage: bool) {
        trace!(blossom = b, end_stage, "expanding blossom");
        let children = self.blossom_children[b].clone();
        for &s in &children {
            self.blossom_parent[s] = None;
            if s < self.n {
                self.in_blossom[s] = s;
            } else if end_stage && self.dual[s] == 0 {
                self.expand_blossom(s, end_stage);
            } else {
                for leaf in self.leaves(s) {
                    self.in_blossom[leaf] = s;
                }
            }
        }

        if !end_stage && self.label[b] == Label::Inner {
            let endps = self.blossom_endpoints[b].clone();
            let len = children.len() as isize;
            let at = |j: isize| j.rem_euclid(len) as usize;

            // Child through which the blossom got its label.
            let entry_end = self.label_end[b].expect("inner blossom has a label end");
            let entry_child = self.in_blossom[self.endpoint[entry_end ^ 1]];
            let start = children
                .iter()
                .position(|&c| c == entry_child)
                .expect("entry child belongs to the blossom") as isize;

            // Walk towards the base along the even-length side.
            let (mut j, step, trick): (isize, isize, usize) = if start & 1 == 1 {
                (start - len, 1, 0)
            } else {
                (start, -1, 1)
            };

            let mut p = entry_end;
            while j != 0 {
                let q = endps[at(j - trick as isize)];
                let inner = self.endpoint[p ^ 1];
                self.label[inner] = Label::Unlabeled;
                self.label[self.endpoint[q ^ trick ^ 1]] = Label::Unlabeled;
                self.assign_label(inner, Label::Inner, Some(p));

                self.allowed[q / 2] = true;
                j += step;
                p = endps[at(j - trick as isize)] ^ trick;
                self.allowed[p / 2] = true;
                j += step;
            }

            // The base child keeps its label without passing it to its mate.
            let bv = children[at(j)];
            let inner = self.endpoint[p ^ 1];
            self.label[inner] = Label::Inner;
            self.label[bv] = Label::Inner;
            self.label_end[inner] = Some(p);
            self.label_end[bv] = Some(p);
            self.best_edge[bv] = None;

            // The odd side: children reachable from outside get relabeled.
            j += step;
            while children[at(j)] != entry_child {
                let bv = children[at(j)];
                if self.label[bv] == Label::Outer {
                    j += step;
                    continue;
                }
                let reached = self
                    .leaves(bv)
                    .into_iter()
                    .find(|&v| self.label[v] != Label::Unlabeled);
                if let Some(v) = reached {
                    debug_assert_eq!(self.label[v], Label::Inner);
                    debug_assert_eq!(self.in_blossom[v], bv);
                    self.label[v] = Label::Unlabeled;
                    let base = self.blossom_base[bv].expect("top-level blossom has a base");
                    let m = self.mate[base].expect("inner blossom base is matched");
                    self.label[self.endpoint[m]] = Label::Unlabeled;
                    let end = self.label_end[v];
                    self.assign_label(v, Label::Inner, end);
                }
                j += step;
            }
        }

        self.label[b] = Label::Unlabeled;
        self.label_end[b] = None;
        self.blossom_children[b].clear();
        self.blossom_endpoints[b].clear();
        self.blossom_base[b] = None;
        self.blossom_best_edges[b] = None;
        self.best_edge[b] = None;
        self.unused_blossoms.push(b);
    }

    /// Flips matched and unmatched edges on the alternating path through
    /// blossom `b` from vertex `v` to the base, making `v` the new base.
    fn augment_blossom(&mut self, b: usize, v: VertexId) {
        let mut t = v;
        while self.blossom_parent[t] != Some(b) {
            t = self.blossom_parent[t].expect("vertex lies inside the blossom");
        }
        if t >= self.n {
            self.augment_blossom(t, v);
        }

        let len = self.blossom_children[b].len() as isize;
        let at = |j: isize| j.rem_euclid(len) as usize;
        let i = self.blossom_children[b]
            .iter()
            .position(|&c| c == t)
            .expect("child belongs to the blossom");
        let (mut j, step, trick): (isize, isize, usize) = if i & 1 == 1 {
            (i as isize - len, 1, 0)
        } else {
            (i as isize, -1, 1)
        };

        while j != 0 {
            j += step;
            let t = self.blossom_children[b][at(j)];
            let p = self.blossom_endpoints[b][at(j - trick as isize)] ^ trick;
            if t >= self.n {
                let end = self.endpoint[p];
                self.augment_blossom(t, end);
            }
            j += step;
            let t = self.blossom_children[b][at(j)];
            if t >= self.n {
                let end = self.endpoint[p ^ 1];
                self.augment_blossom(t, end);
            }
            let (x, y) = (self.endpoint[p], self.endpoint[p ^ 1]);
            self.mate[x] = Some(p ^ 1);
            self.mate[y] = Some(p);
        }

        self.blossom_children[b].rotate_left(i);
        self.blossom_endpoints[b].rotate_left(i);
        let first = self.blossom_children[b][0];
        self.blossom_base[b] = self.blossom_base[first];
        debug_assert_eq!(self.blossom_base[b], Some(v));
    }

    /// Augments along the path through edge `k`, which joins two outer
    /// vertices in different trees.
    fn augment_matching(&mut self, k: usize) {
        let WeightedEdge { a: v, b: w, .. } = self.edges[k];
        trace!(edge = k, v, w, "augmenting");
        for (mut s, mut p) in [(v, 2 * k + 1), (w, 2 * k)] {
            loop {
                let bs = self.in_blossom[s];
                debug_assert_eq!(self.label[bs], Label::Outer);
                if bs >= self.n {
                    self.augment_blossom(bs, s);
                }
                self.mate[s] = Some(p);

                let Some(end) = self.label_end[bs] else {
                    // Reached the exposed root.
                    break;
                };
                let t = self.endpoint[end];
                let bt = self.in_blossom[t];
                debug_assert_eq!(self.label[bt], Label::Inner);
                let tend = self.label_end[bt].expect("inner blossom has a label end");
                s = self.endpoint[tend];
                let j = self.endpoint[tend ^ 1];
                if bt >= self.n {
                    self.augment_blossom(bt, j);
                }
                self.mate[j] = Some(tend);
                p = tend ^ 1;
            }
        }
    }

    fn min_vertex_dual(&self) -> Weight {
        self.dual[..self.n].iter().copied().min().unwrap_or(0)
    }

    fn solve(&mut self) {
        let n = self.n;

        for stage in 0..n {
            self.label.fill(Label::Unlabeled);
            self.best_edge.fill(None);
            for b in n..2 * n {
                self.blossom_best_edges[b] = None;
            }
            self.allowed.fill(false);
            self.queue.clear();

            for v in 0..n {
                if self.mate[v].is_none() && self.label[self.in_blossom[v]] == Label::Unlabeled {
                    self.assign_label(v, Label::Outer, None);
                }
            }

            let mut augmented = false;
            loop {
                while !augmented {
                    let Some(v) = self.queue.pop() else {
                        break;
                    };
                    debug_assert_eq!(self.label[self.in_blossom[v]], Label::Outer);

                    for i in 0..self.neighbor_endpoints[v].len() {
                        let p = self.neighbor_endpoints[v][i];
                        let k = p / 2;
                        let w = self.endpoint[p];
                        if self.in_blossom[v] == self.in_blossom[w] {
                            continue;
                        }

                        let mut kslack = 0;
                        if !self.allowed[k] {
                            kslack = self.slack(k);
                            if kslack <= 0 {
                                self.allowed[k] = true;
                            }
                        }

                        let bw = self.in_blossom[w];
                        let bw_label = self.label[bw];
                        if self.allowed[k] {
                            match bw_label {
                                Label::Unlabeled => {
                                    self.assign_label(w, Label::Inner, Some(p ^ 1));
                                }
                                Label::Outer => match self.scan_blossom(v, w) {
                                    Some(base) => self.add_blossom(base, k),
                                    None => {
                                        self.augment_matching(k);
                                        augmented = true;
                                        break;
                                    }
                                },
                                Label::Inner | Label::Breadcrumb => {
                                    if self.label[w] == Label::Unlabeled {
                                        // w sits inside an inner blossom and
                                        // is now reachable from outside.
                                        self.label[w] = Label::Inner;
                                        self.label_end[w] = Some(p ^ 1);
                                    }
                                }
                            }
                        } else if bw_label == Label::Outer {
                            let b = self.in_blossom[v];
                            if self.best_edge[b].map_or(true, |cur| kslack < self.slack(cur)) {
                                self.best_edge[b] = Some(k);
                            }
                        } else if self.label[w] == Label::Unlabeled
                            && self.best_edge[w].map_or(true, |cur| kslack < self.slack(cur))
                        {
                            self.best_edge[w] = Some(k);
                        }
                    }
                }

                if augmented {
                    break;
                }

                let (delta, kind) = self.choose_delta();

                for v in 0..n {
                    match self.label[self.in_blossom[v]] {
                        Label::Outer => self.dual[v] -= delta,
                        Label::Inner => self.dual[v] += delta,
                        Label::Unlabeled | Label::Breadcrumb => {}
                    }
                }
                for b in n..2 * n {
                    if self.blossom_base[b].is_some() && self.blossom_parent[b].is_none() {
                        match self.label[b] {
                            Label::Outer => self.dual[b] += delta,
                            Label::Inner => self.dual[b] -= delta,
                            Label::Unlabeled | Label::Breadcrumb => {}
                        }
                    }
                }

                match kind {
                    Delta::Finished => break,
                    Delta::Grow(k) => {
                        self.allowed[k] = true;
                        let e = self.edges[k];
                        let outer = if self.label[self.in_blossom[e.a]] == Label::Unlabeled {
                            e.b
                        } else {
                            e.a
                        };
                        self.queue.push(outer);
                    }
                    Delta::Merge(k) => {
                        self.allowed[k] = true;
                        self.queue.push(self.edges[k].a);
                    }
                    Delta::Expand(b) => self.expand_blossom(b, false),
                }
            }

            if !augmented {
                trace!(stage, "no augmenting path left");
                break;
            }

            // Outer blossoms whose dual dropped to zero are expanded.
            for b in n..2 * n {
                if self.blossom_parent[b].is_none()
                    && self.blossom_base[b].is_some()
                    && self.label[b] == Label::Outer
                    && self.dual[b] == 0
                {
                    self.expand_blossom(b, true);
                }
            }
        }
    }

    /// Picks the smallest dual adjustment that makes progress.
    fn choose_delta(&self) -> (Weight, Delta) {
        let n = self.n;
        let mut best: Option<(Weight, Delta)> = None;
        let beats = |best: &Option<(Weight, Delta)>, d: Weight| {
            best.as_ref().map_or(true, |(cur, _)| d < *cur)
        };

        // Vertex duals may not go negative unless cardinality comes first.
        if !self.max_cardinality {
            best = Some((self.min_vertex_dual(), Delta::Finished));
        }

        for v in 0..n {
            if self.label[self.in_blossom[v]] == Label::Unlabeled {
                if let Some(k) = self.best_edge[v] {
                    let d = self.slack(k);
                    if beats(&best, d) {
                        best = Some((d, Delta::Grow(k)));
                    }
                }
            }
        }

        for b in 0..2 * n {
            if self.blossom_parent[b].is_none() && self.label[b] == Label::Outer {
                if let Some(k) = self.best_edge[b] {
                    // Slack between two outer vertices is always even.
                    let d = self.slack(k) / 2;
                    if beats(&best, d) {
                        best = Some((d, Delta::Merge(k)));
                    }
                }
            }
        }

        for b in n..2 * n {
            if self.blossom_base[b].is_some()
                && self.blossom_parent[b].is_none()
                && self.label[b] == Label::Inner
                && beats(&best, self.dual[b])
            {
                best = Some((self.dual[b], Delta::Expand(b)));
            }
        }

        // Maximum cardinality reached; a last adjustment keeps the duals
        // verifiable.
        best.unwrap_or_else(|| (self.min_vertex_dual().max(0), Delta::Finished))
    }

    /// Checks complementary slackness of the final primal/dual pair.
    fn certificate_holds(&self) -> bool {
        let n = self.n;
        let offset = if self.max_cardinality {
            (-self.min_vertex_dual()).max(0)
        } else {
            0
        };

        if self.min_vertex_dual() + offset < 0 || self.dual[n..].iter().any(|&d| d < 0) {
            return false;
        }

        let ancestry = |v: usize| {
            let mut chain = vec![v];
            while let Some(parent) = self.blossom_parent[chain[chain.len() - 1]] {
                chain.push(parent);
            }
            chain.reverse();
            chain
        };

        for (k, e) in self.edges.iter().enumerate() {
            let mut s = self.dual[e.a] + self.dual[e.b] - 2 * e.weight;
            for (bi, bj) in ancestry(e.a).into_iter().zip(ancestry(e.b)) {
                if bi != bj {
                    break;
                }
                s += 2 * self.dual[bi];
            }
            if s < 0 {
                return false;
            }
            let ma = self.mate[e.a].map(|p| p / 2) == Some(k);
            let mb = self.mate[e.b].map(|p| p / 2) == Some(k);
            if (ma || mb) && !(ma && mb && s == 0) {
                return false;
            }
        }

        if (0..n).any(|v| self.mate[v].is_none() && self.dual[v] + offset != 0) {
            return false;
        }

        for b in n..2 * n {
            if self.blossom_base[b].is_some() && self.dual[b] > 0 {
                let endps = &self.blossom_endpoints[b];
                if endps.len() % 2 != 1 {
                    return false;
                }
                for &p in endps.iter().skip(1).step_by(2) {
                    if self.mate[self.endpoint[p]] != Some(p ^ 1)
                        || self.mate[self.endpoint[p ^ 1]] != Some(p)
                    {
                        return false;
                    }
                }
            }
        }
        true
    }
}
