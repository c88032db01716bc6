use crate::bond::BondOrder;

pub trait HasAtomicNum {
    fn atomic_num(&self) -> u8;
}

pub trait HasHydrogenCount {
    fn hydrogen_count(&self) -> u8;
}

/// Number of bonded neighbors in the whole molecule, hydrogens included.
pub trait HasDegree {
    fn degree(&self) -> usize;
}

pub trait HasBondOrder {
    fn bond_order(&self) -> BondOrder;
}

pub trait HasBondOrderMut: HasBondOrder {
    fn bond_order_mut(&mut self) -> &mut BondOrder;
}
