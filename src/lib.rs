pub mod atom;
pub mod bond;
pub mod error;
pub mod graph;
pub mod kekulize;
pub mod matching;
pub mod mol;
pub mod rings;
pub mod traits;
pub mod weight;

pub use atom::{Atom, AtomSite};
pub use bond::{Bond, BondOrder};
pub use error::{GraphError, KekulizeError};
pub use graph::{cyclic_core, SparseGraph, VertexId};
pub use kekulize::{kekulize, Kekulization, Kekulizer, DEFAULT_LARGE_CONSTANT};
pub use matching::{Matching, MaximumWeightMatching, WeightedEdge, MAX_EDGE_WEIGHT};
pub use mol::Mol;
pub use rings::{ring_atoms, CyclicGraph};
pub use traits::{HasAtomicNum, HasBondOrder, HasBondOrderMut, HasDegree, HasHydrogenCount};
pub use weight::{BondWeightModel, CostTable, Weight};

#[cfg(test)]
mod tests;
