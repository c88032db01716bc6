use std::collections::HashSet;

use serde::Deserialize;

use kekule::{kekulize, Atom, Bond, BondOrder, Mol};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Deserialize)]
struct KekulizeEntry {
    name: String,
    /// `(atomic number, implicit hydrogens)` per atom.
    atoms: Vec<(u8, u8)>,
    /// Aromatic bonds as atom index pairs.
    bonds: Vec<(usize, usize)>,
    double_bonds: usize,
    unmatched: usize,
    /// Atoms that must not receive a double bond.
    #[serde(default)]
    no_double: Vec<usize>,
}

fn build(entry: &KekulizeEntry) -> Mol<Atom, Bond> {
    let mut mol = Mol::with_capacity(entry.atoms.len(), entry.bonds.len());
    let atoms: Vec<_> = entry
        .atoms
        .iter()
        .map(|&(z, h)| mol.add_atom(Atom::aromatic(z, h)))
        .collect();
    for &(a, b) in &entry.bonds {
        mol.add_bond(atoms[a], atoms[b], Bond::aromatic());
    }
    mol
}

#[test]
fn approval_kekulize() {
    init_tracing();
    let data: Vec<KekulizeEntry> =
        serde_json::from_str(include_str!("approval_data/kekulize.json")).unwrap();

    let mut failures = Vec::new();
    for entry in &data {
        let mut mol = build(entry);
        let result = match kekulize(&mut mol) {
            Ok(r) => r,
            Err(e) => {
                failures.push(format!("[error] {}: {e}", entry.name));
                continue;
            }
        };

        let doubles = mol
            .bonds()
            .filter(|&e| mol.bond(e).order == BondOrder::Double)
            .count();
        if doubles != entry.double_bonds {
            failures.push(format!(
                "[doubles] {}: expected {}, got {}",
                entry.name, entry.double_bonds, doubles
            ));
        }

        if result.unmatched().len() != entry.unmatched {
            failures.push(format!(
                "[unmatched] {}: expected {}, got {:?}",
                entry.name,
                entry.unmatched,
                result.unmatched()
            ));
        }

        if mol.aromatic_bonds().count() != 0 {
            failures.push(format!("[aromatic left] {}", entry.name));
        }

        let mut seen = HashSet::new();
        for e in mol.bonds() {
            if mol.bond(e).order != BondOrder::Double {
                continue;
            }
            let Some((a, b)) = mol.bond_endpoints(e) else {
                continue;
            };
            for atom in [a, b] {
                if !seen.insert(atom) {
                    failures.push(format!(
                        "[valence] {}: atom {} has two double bonds",
                        entry.name,
                        atom.index()
                    ));
                }
                if entry.no_double.contains(&atom.index()) {
                    failures.push(format!(
                        "[heteroatom] {}: atom {} received a double bond",
                        entry.name,
                        atom.index()
                    ));
                }
            }
        }
    }

    if !failures.is_empty() {
        panic!(
            "{} kekulization failures:\n{}",
            failures.len(),
            failures.join("\n")
        );
    }
}

#[test]
fn approval_kekulize_is_deterministic() {
    let data: Vec<KekulizeEntry> =
        serde_json::from_str(include_str!("approval_data/kekulize.json")).unwrap();

    for entry in &data {
        let mut first = build(entry);
        let mut second = build(entry);
        let r1 = kekulize(&mut first).unwrap();
        let r2 = kekulize(&mut second).unwrap();
        assert_eq!(r1, r2, "{}", entry.name);
        assert_eq!(first, second, "{}", entry.name);
    }
}
