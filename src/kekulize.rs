//! Kekulization assigns explicit single and double bonds to a conjugated
//! or aromatic bond set.
//!
//! Every bond is weighted `large_constant - cost`, where the cost comes
//! from a [`BondWeightModel`], and a maximum-weight matching over the bond
//! graph picks the double bonds. Matched bonds become
//! [`BondOrder::Double`], the rest [`BondOrder::Single`].
//!
//! The result is best effort. When no perfect matching exists (an odd
//! fragment with no valid Kekulé structure) the leftover atoms simply keep
//! single bonds and are listed in [`Kekulization::unmatched`].

use std::collections::HashMap;
use std::hash::Hash;

use petgraph::graph::NodeIndex;
use tracing::{debug, instrument};

use crate::atom::{Atom, AtomSite};
use crate::bond::{Bond, BondOrder};
use crate::error::{GraphError, KekulizeError};
use crate::graph::{SparseGraph, VertexId};
use crate::matching::{MaximumWeightMatching, MAX_EDGE_WEIGHT};
use crate::mol::Mol;
use crate::traits::{HasAtomicNum, HasBondOrderMut, HasHydrogenCount};
use crate::weight::{BondWeightModel, CostTable, Weight};

/// Edge weight ceiling. Larger than any cost the default table produces, so
/// every bond weighs more than zero and the matching covers as many atoms
/// as it can.
pub const DEFAULT_LARGE_CONSTANT: Weight = 10_000_000;

/// Configured kekulization engine.
///
/// # Examples
///
/// ```
/// use kekule::{AtomSite, BondOrder, Kekulizer};
///
/// // benzene: six carbons, each with two ring neighbors and one hydrogen
/// let bonds: Vec<(usize, usize)> = (0..6).map(|i| (i, (i + 1) % 6)).collect();
/// let result = Kekulizer::new()
///     .kekulize(&bonds, |_| AtomSite::new(6, 3))
///     .unwrap();
///
/// assert!(result.is_complete());
/// assert_eq!(result.double_bonds().count(), 3);
/// assert_ne!(result.order(0), result.order(1));
/// assert!(result.orders().iter().all(|&o| o != BondOrder::Aromatic));
/// ```
#[derive(Debug, Clone)]
pub struct Kekulizer<W = CostTable> {
    weights: W,
    large: Weight,
    max_atoms: Option<usize>,
    max_cardinality: bool,
}

impl Default for Kekulizer<CostTable> {
    fn default() -> Self {
        Self::new()
    }
}

impl Kekulizer<CostTable> {
    pub fn new() -> Self {
        Self {
            weights: CostTable::default(),
            large: DEFAULT_LARGE_CONSTANT,
            max_atoms: None,
            max_cardinality: false,
        }
    }
}

impl<W> Kekulizer<W> {
    /// Replaces the cost model, keeping the other settings.
    ///
    /// Costs are subtracted from the large constant. A bond whose weight
    /// ends up beyond [`MAX_EDGE_WEIGHT`] in magnitude fails the call with
    /// [`KekulizeError::WeightOutOfRange`].
    pub fn with_weight_model<V>(self, weights: V) -> Kekulizer<V> {
        Kekulizer {
            weights,
            large: self.large,
            max_atoms: self.max_atoms,
            max_cardinality: self.max_cardinality,
        }
    }

    /// Sets the value every bond cost is subtracted from. It should exceed
    /// any cost the model returns and stay within [`MAX_EDGE_WEIGHT`].
    pub fn with_large_constant(mut self, large: Weight) -> Self {
        self.large = large;
        self
    }

    /// Rejects inputs with more than `limit` distinct atoms.
    pub fn with_max_atoms(mut self, limit: usize) -> Self {
        self.max_atoms = Some(limit);
        self
    }

    /// Prefers more double bonds over cheaper ones, even when a bond's
    /// cost exceeds the large constant.
    pub fn with_max_cardinality(mut self, enabled: bool) -> Self {
        self.max_cardinality = enabled;
        self
    }

    pub fn weights(&self) -> &W {
        &self.weights
    }

    pub fn large_constant(&self) -> Weight {
        self.large
    }

    /// Assigns a bond order to every bond in `bonds`.
    ///
    /// `atom` resolves a handle to whatever the weight model reads; it is
    /// called once per distinct handle, in order of first appearance.
    /// `orders[i]` of the result belongs to `bonds[i]`.
    #[instrument(skip_all, fields(bonds = bonds.len()))]
    pub fn kekulize<H, A, F>(
        &self,
        bonds: &[(H, H)],
        mut atom: F,
    ) -> Result<Kekulization<H>, KekulizeError>
    where
        H: Copy + Eq + Hash,
        F: FnMut(H) -> A,
        W: BondWeightModel<A>,
    {
        if bonds.is_empty() {
            return Ok(Kekulization::default());
        }

        let mut index: HashMap<H, VertexId> = HashMap::new();
        let mut handles: Vec<H> = Vec::new();
        let mut ends: Vec<(VertexId, VertexId)> = Vec::with_capacity(bonds.len());
        for (i, &(a, b)) in bonds.iter().enumerate() {
            if a == b {
                return Err(KekulizeError::SelfBond { bond: i });
            }
            let mut intern = |h: H| {
                *index.entry(h).or_insert_with(|| {
                    handles.push(h);
                    handles.len() - 1
                })
            };
            let va = intern(a);
            let vb = intern(b);
            ends.push((va, vb));
        }

        if let Some(limit) = self.max_atoms {
            if handles.len() > limit {
                return Err(KekulizeError::TooLarge {
                    atoms: handles.len(),
                    limit,
                });
            }
        }

        let mut graph = SparseGraph::with_vertices(handles.len());
        for (i, &(va, vb)) in ends.iter().enumerate() {
            match graph.add_edge(va, vb) {
                Ok(()) => {}
                Err(GraphError::DuplicateEdge { .. }) => {
                    let first = ends
                        .iter()
                        .position(|&(x, y)| (x, y) == (va, vb) || (y, x) == (va, vb))
                        .unwrap_or(i);
                    return Err(KekulizeError::DuplicateBond { bond: i, first });
                }
                Err(err) => return Err(err.into()),
            }
        }

        let atoms: Vec<A> = handles.iter().map(|&h| atom(h)).collect();
        let costs: Vec<Weight> = ends
            .iter()
            .map(|&(va, vb)| self.weights.cost(&atoms[va], &atoms[vb]))
            .collect();
        let weights: Vec<Weight> = costs
            .iter()
            .enumerate()
            .map(|(i, &cost)| match self.large.checked_sub(cost) {
                Some(w) if (-MAX_EDGE_WEIGHT..=MAX_EDGE_WEIGHT).contains(&w) => Ok(w),
                _ => Err(KekulizeError::WeightOutOfRange { bond: i }),
            })
            .collect::<Result<_, _>>()?;
        let mut bond_of: HashMap<(VertexId, VertexId), usize> = HashMap::with_capacity(ends.len());
        for (i, &(va, vb)) in ends.iter().enumerate() {
            bond_of.insert((va.min(vb), va.max(vb)), i);
        }

        let matching = MaximumWeightMatching::from_graph(&graph, |a, b| weights[bond_of[&(a, b)]])?
            .with_max_cardinality(self.max_cardinality)
            .run();

        let orders: Vec<BondOrder> = ends
            .iter()
            .map(|&(va, vb)| {
                if matching.contains(va, vb) {
                    BondOrder::Double
                } else {
                    BondOrder::Single
                }
            })
            .collect();
        let cost: Weight = orders
            .iter()
            .zip(&costs)
            .filter(|(order, _)| **order == BondOrder::Double)
            .map(|(_, c)| c)
            .sum();
        let unmatched: Vec<H> = matching.unmatched().map(|v| handles[v]).collect();

        debug!(
            atoms = handles.len(),
            doubles = matching.len(),
            unmatched = unmatched.len(),
            cost,
            "kekulized"
        );

        Ok(Kekulization {
            orders,
            weight: matching.weight(),
            cost,
            unmatched,
        })
    }

    /// Kekulizes every [`BondOrder::Aromatic`] bond of `mol` in place.
    ///
    /// Atom degrees count implicit hydrogens. Nothing is written if an
    /// error is returned.
    pub fn kekulize_mol<A, B>(
        &self,
        mol: &mut Mol<A, B>,
    ) -> Result<Kekulization<NodeIndex>, KekulizeError>
    where
        A: HasAtomicNum + HasHydrogenCount,
        B: HasBondOrderMut,
        W: BondWeightModel<AtomSite>,
    {
        let edges: Vec<_> = mol.aromatic_bonds().collect();
        let bonds: Vec<(NodeIndex, NodeIndex)> = edges
            .iter()
            .filter_map(|&e| mol.bond_endpoints(e))
            .collect();

        let result = self.kekulize(&bonds, |n| {
            AtomSite::new(mol.atom(n).atomic_num(), mol.total_degree(n))
        })?;

        for (&e, &order) in edges.iter().zip(result.orders()) {
            *mol.bond_mut(e).bond_order_mut() = order;
        }
        Ok(result)
    }
}

/// Outcome of one kekulization call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kekulization<H> {
    orders: Vec<BondOrder>,
    weight: Weight,
    cost: Weight,
    unmatched: Vec<H>,
}

impl<H> Default for Kekulization<H> {
    fn default() -> Self {
        Self {
            orders: Vec::new(),
            weight: 0,
            cost: 0,
            unmatched: Vec::new(),
        }
    }
}

impl<H> Kekulization<H> {
    /// One order per input bond, in input order.
    pub fn orders(&self) -> &[BondOrder] {
        &self.orders
    }

    pub fn order(&self, bond: usize) -> BondOrder {
        self.orders[bond]
    }

    /// Atoms left without a double bond.
    pub fn unmatched(&self) -> &[H] {
        &self.unmatched
    }

    /// Whether every atom received exactly one double bond.
    pub fn is_complete(&self) -> bool {
        self.unmatched.is_empty()
    }

    /// Input positions of the bonds made double.
    pub fn double_bonds(&self) -> impl Iterator<Item = usize> + '_ {
        self.orders
            .iter()
            .enumerate()
            .filter(|(_, &o)| o == BondOrder::Double)
            .map(|(i, _)| i)
    }

    /// Total matching weight.
    pub fn weight(&self) -> Weight {
        self.weight
    }

    /// Summed cost of the double bonds.
    pub fn cost(&self) -> Weight {
        self.cost
    }

    pub fn into_orders(self) -> Vec<BondOrder> {
        self.orders
    }
}

/// Kekulizes `mol` with the default cost table.
///
/// ```
/// use kekule::{kekulize, Atom, Bond, BondOrder, Mol};
///
/// let mut mol: Mol<Atom, Bond> = Mol::new();
/// let atoms: Vec<_> = (0..6).map(|_| mol.add_atom(Atom::aromatic(6, 1))).collect();
/// for i in 0..6 {
///     mol.add_bond(atoms[i], atoms[(i + 1) % 6], Bond::aromatic());
/// }
///
/// let result = kekulize(&mut mol).unwrap();
/// assert!(result.is_complete());
/// let doubles = mol.bonds().filter(|&e| mol.bond(e).order == BondOrder::Double).count();
/// assert_eq!(doubles, 3);
/// ```
pub fn kekulize(mol: &mut Mol<Atom, Bond>) -> Result<Kekulization<NodeIndex>, KekulizeError> {
    Kekulizer::new().kekulize_mol(mol)
}
