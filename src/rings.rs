//! Ring membership from the cyclic core of a molecule.

use std::collections::HashMap;

use petgraph::graph::NodeIndex;

use crate::graph::{cyclic_core, SparseGraph, VertexId};
use crate::mol::Mol;

/// The part of a molecule that lies on at least one cycle, as a
/// [`SparseGraph`] plus the atom behind each vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclicGraph {
    graph: SparseGraph,
    atoms: Vec<NodeIndex>,
}

impl CyclicGraph {
    /// Builds the cyclic graph of `mol`.
    ///
    /// Atoms with fewer than two neighbors cannot be on a ring and are left
    /// out up front; the remaining graph is pruned by [`cyclic_core`].
    /// Parallel bonds collapse into a single edge.
    pub fn new<A, B>(mol: &Mol<A, B>) -> Self {
        let candidates: Vec<NodeIndex> = mol.atoms().filter(|&n| mol.degree(n) >= 2).collect();
        let vertex_of: HashMap<NodeIndex, VertexId> = candidates
            .iter()
            .enumerate()
            .map(|(v, &n)| (n, v))
            .collect();

        let mut graph = SparseGraph::with_vertices(candidates.len());
        for e in mol.bonds() {
            let Some((a, b)) = mol.bond_endpoints(e) else {
                continue;
            };
            if let (Some(&va), Some(&vb)) = (vertex_of.get(&a), vertex_of.get(&b)) {
                if va != vb && !graph.adjacent(va, vb) {
                    graph
                        .add_edge(va, vb)
                        .expect("distinct in-range vertices");
                }
            }
        }

        let map = cyclic_core(&mut graph);
        let atoms = map.into_iter().map(|v| candidates[v]).collect();
        Self { graph, atoms }
    }

    pub fn graph(&self) -> &SparseGraph {
        &self.graph
    }

    /// Ring atoms, one per vertex of [`graph`](Self::graph).
    pub fn atoms(&self) -> &[NodeIndex] {
        &self.atoms
    }

    pub fn atom(&self, vertex: VertexId) -> NodeIndex {
        self.atoms[vertex]
    }

    pub fn contains(&self, atom: NodeIndex) -> bool {
        self.atoms.contains(&atom)
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

/// Atoms of the cyclic core of `mol`, sorted by index.
///
/// Besides ring members this includes the atoms on chains that join two
/// ring systems.
pub fn ring_atoms<A, B>(mol: &Mol<A, B>) -> Vec<NodeIndex> {
    let mut atoms = CyclicGraph::new(mol).atoms;
    atoms.sort();
    atoms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::bond::Bond;

    fn mol_from(n: usize, bonds: &[(usize, usize)]) -> Mol<Atom, Bond> {
        let mut mol = Mol::new();
        let atoms: Vec<_> = (0..n).map(|_| mol.add_atom(Atom::aromatic(6, 0))).collect();
        for &(a, b) in bonds {
            mol.add_bond(atoms[a], atoms[b], Bond::default());
        }
        mol
    }

    fn indices(atoms: &[NodeIndex]) -> Vec<usize> {
        atoms.iter().map(|n| n.index()).collect()
    }

    #[test]
    fn benzene() {
        let mol = mol_from(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)]);
        let cyclic = CyclicGraph::new(&mol);
        assert_eq!(cyclic.graph().size(), 6);
        assert_eq!(cyclic.graph().edge_count(), 6);
        assert_eq!(indices(&ring_atoms(&mol)), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn toluene_drops_methyl() {
        let mol = mol_from(7, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0), (0, 6)]);
        assert_eq!(indices(&ring_atoms(&mol)), vec![0, 1, 2, 3, 4, 5]);
        assert!(!CyclicGraph::new(&mol).contains(NodeIndex::new(6)));
    }

    #[test]
    fn diphenyl_ether_keeps_linker() {
        // two rings joined through an oxygen: the linker sits on no cycle
        // but keeps degree two, so the core retains it
        let mut bonds: Vec<(usize, usize)> = (0..6).map(|i| (i, (i + 1) % 6)).collect();
        bonds.extend((0..6).map(|i| (7 + i, 7 + (i + 1) % 6)));
        bonds.push((0, 6));
        bonds.push((6, 7));
        let mol = mol_from(13, &bonds);
        assert_eq!(ring_atoms(&mol).len(), 13);
    }

    #[test]
    fn parallel_bonds_collapse() {
        let mol = mol_from(4, &[(0, 1), (1, 0), (1, 2), (2, 0), (2, 3)]);
        let cyclic = CyclicGraph::new(&mol);
        assert_eq!(cyclic.graph().edge_count(), 3);
        assert_eq!(indices(&ring_atoms(&mol)), vec![0, 1, 2]);
    }

    #[test]
    fn acyclic_has_no_ring_atoms() {
        let mol = mol_from(3, &[(0, 1), (1, 2)]);
        assert!(CyclicGraph::new(&mol).is_empty());
        assert!(ring_atoms(&mol).is_empty());
        assert!(ring_atoms(&Mol::<Atom, Bond>::new()).is_empty());
    }

    #[test]
    fn vertices_map_back_to_bonded_atoms() {
        let mol = mol_from(
            8,
            &[(7, 0), (0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 5), (5, 3), (5, 6)],
        );
        let cyclic = CyclicGraph::new(&mol);
        assert_eq!(cyclic.graph().size(), 6);
        for (a, b) in cyclic.graph().edges() {
            assert!(mol.bond_between(cyclic.atom(a), cyclic.atom(b)).is_some());
        }
    }
}
