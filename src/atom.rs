/// Default atom type for a molecular graph node.
///
/// Hydrogens are usually implicit: they are not graph nodes but are
/// counted here, and they still contribute to the atom's degree when bond
/// costs are computed.
///
/// # Examples
///
/// ```
/// use kekule::Atom;
///
/// let carbon = Atom {
///     atomic_num: 6,
///     hydrogen_count: 1,
///     is_aromatic: true,
/// };
/// assert_eq!(carbon.atomic_num, 6);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Atom {
    /// Atomic number (1 = H, 6 = C, 7 = N, …).
    pub atomic_num: u8,
    /// Number of implicit hydrogens on this atom.
    pub hydrogen_count: u8,
    /// Whether this atom was perceived as part of an aromatic system.
    pub is_aromatic: bool,
}

impl Atom {
    pub fn aromatic(atomic_num: u8, hydrogen_count: u8) -> Self {
        Self {
            atomic_num,
            hydrogen_count,
            is_aromatic: true,
        }
    }
}

impl crate::traits::HasAtomicNum for Atom {
    fn atomic_num(&self) -> u8 {
        self.atomic_num
    }
}

impl crate::traits::HasHydrogenCount for Atom {
    fn hydrogen_count(&self) -> u8 {
        self.hydrogen_count
    }
}

/// The two facts the default bond cost needs about an atom: its element
/// and how many neighbors it has in the whole molecule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtomSite {
    pub atomic_num: u8,
    pub degree: usize,
}

impl AtomSite {
    pub fn new(atomic_num: u8, degree: usize) -> Self {
        Self { atomic_num, degree }
    }
}

impl crate::traits::HasAtomicNum for AtomSite {
    fn atomic_num(&self) -> u8 {
        self.atomic_num
    }
}

impl crate::traits::HasDegree for AtomSite {
    fn degree(&self) -> usize {
        self.degree
    }
}
