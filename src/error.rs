use thiserror::Error;

use crate::graph::VertexId;
use crate::weight::Weight;

/// Precondition violations reported by [`SparseGraph`](crate::SparseGraph).
///
/// These indicate a bug in the caller rather than a property of the input
/// chemistry, so nothing in the crate tries to recover from them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("vertex {vertex} is out of range for a graph of {size} vertices")]
    VertexOutOfRange { vertex: VertexId, size: usize },

    #[error("self loop on vertex {vertex}")]
    SelfLoop { vertex: VertexId },

    #[error("edge {a}-{b} already exists")]
    DuplicateEdge { a: VertexId, b: VertexId },

    #[error("edge {a}-{b} does not exist")]
    MissingEdge { a: VertexId, b: VertexId },

    /// Edge weight magnitude above [`MAX_EDGE_WEIGHT`](crate::MAX_EDGE_WEIGHT).
    #[error("edge weight {weight} is out of range")]
    WeightOutOfRange { weight: Weight },
}

/// Errors that abort a kekulization call.
///
/// An incomplete Kekulé structure is not an error; see
/// [`Kekulization::is_complete`](crate::Kekulization::is_complete).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KekulizeError {
    /// Bond at the given input position joins an atom to itself.
    #[error("bond {bond} connects an atom to itself")]
    SelfBond { bond: usize },

    /// Bond at position `bond` repeats the atom pair of bond `first`.
    #[error("bond {bond} duplicates bond {first}")]
    DuplicateBond { bond: usize, first: usize },

    /// The subsystem exceeds the configured atom limit.
    #[error("conjugated system has {atoms} atoms, limit is {limit}")]
    TooLarge { atoms: usize, limit: usize },

    /// The large constant minus the cost of bond `bond` does not fit the
    /// supported edge weight range.
    #[error("weight of bond {bond} is out of range")]
    WeightOutOfRange { bond: usize },

    #[error(transparent)]
    Graph(#[from] GraphError),
}
