use petgraph::graph::NodeIndex;

use crate::*;

fn aromatic_ring(mol: &mut Mol<Atom, Bond>, atoms: &[NodeIndex]) {
    for i in 0..atoms.len() {
        mol.add_bond(atoms[i], atoms[(i + 1) % atoms.len()], Bond::aromatic());
    }
}

fn double_count(mol: &Mol<Atom, Bond>, atom: NodeIndex) -> usize {
    mol.bonds_of(atom)
        .filter(|&e| mol.bond(e).order == BondOrder::Double)
        .count()
}

#[test]
fn pyridine() {
    let mut mol = Mol::<Atom, Bond>::new();
    let n = mol.add_atom(Atom::aromatic(7, 0));
    let mut atoms = vec![n];
    atoms.extend((0..5).map(|_| mol.add_atom(Atom::aromatic(6, 1))));
    aromatic_ring(&mut mol, &atoms);

    let result = kekulize(&mut mol).unwrap();
    assert!(result.is_complete());
    assert_eq!(result.double_bonds().count(), 3);
    for &atom in &atoms {
        assert_eq!(double_count(&mol, atom), 1);
    }
}

#[test]
fn pyrrole_leaves_nh_single() {
    let mut mol = Mol::<Atom, Bond>::new();
    let n = mol.add_atom(Atom::aromatic(7, 1));
    let mut atoms = vec![n];
    atoms.extend((0..4).map(|_| mol.add_atom(Atom::aromatic(6, 1))));
    aromatic_ring(&mut mol, &atoms);

    let result = kekulize(&mut mol).unwrap();
    assert_eq!(result.unmatched(), &[n]);
    assert_eq!(double_count(&mol, n), 0);
    for &atom in &atoms[1..] {
        assert_eq!(double_count(&mol, atom), 1);
    }
}

#[test]
fn thiophene_sulfur_stays_single() {
    let mut mol = Mol::<Atom, Bond>::new();
    let s = mol.add_atom(Atom::aromatic(16, 0));
    let mut atoms = vec![s];
    atoms.extend((0..4).map(|_| mol.add_atom(Atom::aromatic(6, 1))));
    aromatic_ring(&mut mol, &atoms);

    kekulize(&mut mol).unwrap();
    assert_eq!(double_count(&mol, s), 0);
    assert_eq!(mol.aromatic_bonds().count(), 0);
}

#[test]
fn non_aromatic_bonds_untouched() {
    let mut mol = Mol::<Atom, Bond>::new();
    let a = mol.add_atom(Atom::default());
    let b = mol.add_atom(Atom::default());
    let c = mol.add_atom(Atom::default());
    let ab = mol.add_bond(
        a,
        b,
        Bond {
            order: BondOrder::Triple,
        },
    );
    let bc = mol.add_bond(b, c, Bond::default());

    let result = kekulize(&mut mol).unwrap();
    assert!(result.orders().is_empty());
    assert_eq!(mol.bond(ab).order, BondOrder::Triple);
    assert_eq!(mol.bond(bc).order, BondOrder::Single);
}

#[test]
fn indole_fused_system() {
    // benzene ring 0..5 fused with pyrrole through 0-5; N is atom 6
    let mut mol = Mol::<Atom, Bond>::new();
    let ring: Vec<_> = (0..6)
        .map(|i| mol.add_atom(Atom::aromatic(6, if i == 0 || i == 5 { 0 } else { 1 })))
        .collect();
    aromatic_ring(&mut mol, &ring);
    let n = mol.add_atom(Atom::aromatic(7, 1));
    let c7 = mol.add_atom(Atom::aromatic(6, 1));
    let c8 = mol.add_atom(Atom::aromatic(6, 1));
    mol.add_bond(ring[0], n, Bond::aromatic());
    mol.add_bond(n, c7, Bond::aromatic());
    mol.add_bond(c7, c8, Bond::aromatic());
    mol.add_bond(c8, ring[5], Bond::aromatic());

    let result = kekulize(&mut mol).unwrap();
    assert_eq!(result.double_bonds().count(), 4);
    assert_eq!(result.unmatched(), &[n]);
    for atom in mol.atoms() {
        assert!(double_count(&mol, atom) <= 1);
    }
}

#[test]
fn custom_kekulizer_on_mol() {
    // a uniform table without degree penalty still finds a complete structure
    let mut mol = Mol::<Atom, Bond>::new();
    let atoms: Vec<_> = (0..4).map(|_| mol.add_atom(Atom::aromatic(6, 1))).collect();
    aromatic_ring(&mut mol, &atoms);

    let kekulizer = Kekulizer::new()
        .with_weight_model(CostTable::uniform(5).with_degree_penalty(false))
        .with_large_constant(100);
    let result = kekulizer.kekulize_mol(&mut mol).unwrap();
    assert!(result.is_complete());
    assert_eq!(result.cost(), 20);
    assert_eq!(result.weight(), 2 * (100 - 10));
}

#[test]
fn ring_atoms_feed_the_kekulizer() {
    // biphenyl: only ring bonds are aromatic; the linker is single
    let mut mol = Mol::<Atom, Bond>::new();
    let left: Vec<_> = (0..6).map(|_| mol.add_atom(Atom::aromatic(6, 1))).collect();
    let right: Vec<_> = (0..6).map(|_| mol.add_atom(Atom::aromatic(6, 1))).collect();
    aromatic_ring(&mut mol, &left);
    aromatic_ring(&mut mol, &right);
    let link = mol.add_bond(left[0], right[0], Bond::default());

    assert_eq!(ring_atoms(&mol).len(), 12);
    let result = kekulize(&mut mol).unwrap();
    assert!(result.is_complete());
    assert_eq!(result.double_bonds().count(), 6);
    assert_eq!(mol.bond(link).order, BondOrder::Single);
}

#[test]
fn matching_on_sparse_graph() {
    let mut graph = SparseGraph::with_vertices(6);
    for i in 0..6 {
        graph.add_edge(i, (i + 1) % 6).unwrap();
    }
    let matching = MaximumWeightMatching::from_graph(&graph, |_, _| 7)
        .unwrap()
        .run();
    assert_eq!(matching.len(), 3);
    assert_eq!(matching.weight(), 21);
    for (a, b) in matching.pairs() {
        assert!(graph.is_adjacent(a, b).unwrap());
    }
}

#[test]
fn cyclic_core_then_match() {
    // hexagon with a two-atom tail; the core is matched on its own
    let mut graph = SparseGraph::with_vertices(8);
    for i in 0..6 {
        graph.add_edge(i, (i + 1) % 6).unwrap();
    }
    graph.add_edge(2, 6).unwrap();
    graph.add_edge(6, 7).unwrap();

    let map = cyclic_core(&mut graph);
    assert_eq!(graph.size(), 6);
    let mut original = map.clone();
    original.sort();
    assert_eq!(original, vec![0, 1, 2, 3, 4, 5]);

    let matching = MaximumWeightMatching::from_graph(&graph, |_, _| 1)
        .unwrap()
        .run();
    assert_eq!(matching.len(), 3);
}
