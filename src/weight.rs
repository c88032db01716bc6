//! Costs of placing a double bond between two atoms.
//!
//! The matching engine maximizes weight, so the kekulizer feeds it
//! `large_constant - cost` per bond: cheap double bonds become heavy edges.

use std::collections::BTreeMap;

use crate::traits::{HasAtomicNum, HasDegree};

/// Integer edge weight used throughout the matching engine.
pub type Weight = i64;

const BORON: u8 = 5;
const NITROGEN: u8 = 7;
const OXYGEN: u8 = 8;
const SULFUR: u8 = 16;
const ARSENIC: u8 = 33;
const SELENIUM: u8 = 34;

/// Cost of turning the bond between `a` and `b` into a double bond.
///
/// Any `Fn(&A, &A) -> Weight` closure is a model, so callers can swap in
/// their own rule set without defining a type.
pub trait BondWeightModel<A> {
    fn cost(&self, a: &A, b: &A) -> Weight;
}

impl<A, F> BondWeightModel<A> for F
where
    F: Fn(&A, &A) -> Weight,
{
    fn cost(&self, a: &A, b: &A) -> Weight {
        self(a, b)
    }
}

/// Per-element cost table.
///
/// The cost of an atom is its element's base cost plus, unless disabled,
/// its degree. A bond costs the sum of its two atoms. The default table
/// makes heteroatoms resist double bonds: oxygen 5000, sulfur 4000,
/// nitrogen 2000, selenium 200, arsenic 150, boron 100, everything else 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostTable {
    base: BTreeMap<u8, Weight>,
    default_cost: Weight,
    degree_penalty: bool,
}

impl Default for CostTable {
    fn default() -> Self {
        Self::uniform(1)
            .with_cost(NITROGEN, 2000)
            .with_cost(OXYGEN, 5000)
            .with_cost(SULFUR, 4000)
            .with_cost(BORON, 100)
            .with_cost(ARSENIC, 150)
            .with_cost(SELENIUM, 200)
    }
}

impl CostTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table where every element costs `cost`.
    pub fn uniform(cost: Weight) -> Self {
        Self {
            base: BTreeMap::new(),
            default_cost: cost,
            degree_penalty: true,
        }
    }

    pub fn with_cost(mut self, atomic_num: u8, cost: Weight) -> Self {
        self.base.insert(atomic_num, cost);
        self
    }

    pub fn with_default_cost(mut self, cost: Weight) -> Self {
        self.default_cost = cost;
        self
    }

    /// Whether an atom's degree is added to its cost.
    pub fn with_degree_penalty(mut self, enabled: bool) -> Self {
        self.degree_penalty = enabled;
        self
    }

    pub fn base_cost(&self, atomic_num: u8) -> Weight {
        self.base
            .get(&atomic_num)
            .copied()
            .unwrap_or(self.default_cost)
    }

    pub fn atom_cost<A: HasAtomicNum + HasDegree>(&self, atom: &A) -> Weight {
        let mut cost = self.base_cost(atom.atomic_num());
        if self.degree_penalty {
            cost += atom.degree() as Weight;
        }
        cost
    }
}

impl<A: HasAtomicNum + HasDegree> BondWeightModel<A> for CostTable {
    fn cost(&self, a: &A, b: &A) -> Weight {
        self.atom_cost(a) + self.atom_cost(b)
    }
}
