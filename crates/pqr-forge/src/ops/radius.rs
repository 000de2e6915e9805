//! Radius resolution against the parameter table.
//!
//! Lattice rows in the parameter table are keyed by force-field atom type, so lattice atoms
//! borrow the type alias of the topology row at the same position. Ligand rows are keyed by
//! atom name and are matched directly.

use crate::model::{atom::StructureAtom, parameter::ParameterTable, topology::TopologyAtom};
use smol_str::SmolStr;

/// Radius lookup outcome together with the key that was used.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusLookup {
    /// Atom name or type alias looked up in the parameter table.
    pub key: SmolStr,
    /// Radius found under `key`, if any.
    pub radius: Option<f64>,
}

/// Resolves lattice radii through the topology type aliases.
///
/// `topology_atoms` are the lattice rows of the topology; the result is aligned with them,
/// so callers pair it with structure atoms only after checking the two name sequences match.
/// The alias is only a lookup key and never replaces a structure atom's name.
pub fn lattice_radii(
    residue_name: &str,
    topology_atoms: &[&TopologyAtom],
    parameters: &ParameterTable,
) -> Vec<RadiusLookup> {
    topology_atoms
        .iter()
        .map(|topo| RadiusLookup {
            key: topo.atom_type.clone(),
            radius: parameters.radius(residue_name, &topo.atom_type),
        })
        .collect()
}

/// Resolves ligand radii by each atom's own name.
pub fn ligand_radii(
    residue_name: &str,
    atoms: &[&StructureAtom],
    parameters: &ParameterTable,
) -> Vec<RadiusLookup> {
    atoms
        .iter()
        .map(|atom| RadiusLookup {
            key: atom.name.clone(),
            radius: parameters.radius(residue_name, &atom.name),
        })
        .collect()
}
