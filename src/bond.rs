/// Bond multiplicity.
///
/// `Aromatic` marks a bond whose Kekulé order has not been decided yet.
/// [`kekulize`](crate::kekulize()) replaces every such bond with `Single`
/// or `Double`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    Aromatic,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bond {
    pub order: BondOrder,
}

impl Bond {
    pub fn aromatic() -> Self {
        Self {
            order: BondOrder::Aromatic,
        }
    }
}

impl crate::traits::HasBondOrder for Bond {
    fn bond_order(&self) -> BondOrder {
        self.order
    }
}

impl crate::traits::HasBondOrderMut for Bond {
    fn bond_order_mut(&mut self) -> &mut BondOrder {
        &mut self.order
    }
}
