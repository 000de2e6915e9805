//! Shared primitive types used by the structure, topology, and parameter tables.
//!
//! Coordinates reuse `nalgebra`'s point type so geometric reporting stays in one coordinate
//! system, while the two closed enums below name the physically distinct atom populations
//! the resolution engine has to tell apart.

use nalgebra::Point3;
use std::fmt;

/// Cartesian position in ångströms.
pub type Point = Point3<f64>;

/// Population an atom belongs to, decided by its residue name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomGroup {
    /// Rigid nanoparticle core atom; charges follow positional id correspondence.
    Lattice,
    /// Surface-attached chain atom; charges follow per-instance name matching.
    Ligand,
}

impl fmt::Display for AtomGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomGroup::Lattice => write!(f, "lattice"),
            AtomGroup::Ligand => write!(f, "ligand"),
        }
    }
}

/// Protonation variant of a ligand residue instance.
///
/// The two variants differ only in how many atoms the instance carries; each has its own
/// canonical charge set in the topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LigandVariant {
    /// Variant carrying the extra titratable hydrogen.
    Protonated,
    /// Variant without the titratable hydrogen.
    Deprotonated,
}

impl fmt::Display for LigandVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LigandVariant::Protonated => write!(f, "protonated"),
            LigandVariant::Deprotonated => write!(f, "deprotonated"),
        }
    }
}
