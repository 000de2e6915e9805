//! Charge resolution for lattice and ligand atoms.
//!
//! Lattice atoms have no per-instance structure, so their charges are joined by atom id
//! against the topology's atom numbers once the two name sequences are proven identical.
//! Ligand atoms instead take charges from a prototype instance of the matching variant,
//! joined by atom name.

use super::classify::VariantRule;
use super::error::Error;
use crate::model::{
    atom::StructureAtom,
    topology::{Topology, TopologyAtom},
    types::LigandVariant,
};
use log::debug;
use smol_str::SmolStr;
use std::collections::HashMap;

/// Name-to-charge table taken from one topology ligand instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargePrototype {
    /// Local residue number of the topology instance the charges came from.
    pub source_residue: i32,
    charges: HashMap<SmolStr, f64>,
}

impl ChargePrototype {
    fn from_atoms(source_residue: i32, atoms: &[&TopologyAtom]) -> Self {
        let mut charges = HashMap::with_capacity(atoms.len());
        for atom in atoms {
            charges.entry(atom.name.clone()).or_insert(atom.charge);
        }
        Self {
            source_residue,
            charges,
        }
    }

    /// Charge of the named site, if the prototype defines it.
    pub fn charge(&self, atom_name: &str) -> Option<f64> {
        self.charges.get(atom_name).copied()
    }

    /// Number of named sites.
    pub fn len(&self) -> usize {
        self.charges.len()
    }

    /// Whether the prototype defines no site.
    pub fn is_empty(&self) -> bool {
        self.charges.is_empty()
    }
}

/// The protonated and deprotonated charge sets found in a topology.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChargePrototypes {
    protonated: Option<ChargePrototype>,
    deprotonated: Option<ChargePrototype>,
}

impl ChargePrototypes {
    /// Scans the topology's ligand instances in ascending local residue number.
    ///
    /// The first instance of each variant size becomes that variant's prototype. Scanning
    /// stops as soon as both are known.
    pub fn scan(topology: &Topology, ligand_residue: &str, rule: VariantRule) -> Self {
        let mut prototypes = Self::default();

        for instance in topology.residue_instances(ligand_residue) {
            let slot = match rule.classify(instance.atoms.len()) {
                Some(LigandVariant::Protonated) => &mut prototypes.protonated,
                Some(LigandVariant::Deprotonated) => &mut prototypes.deprotonated,
                None => continue,
            };
            if slot.is_none() {
                debug!(
                    "Using topology {} {} ({} atoms) as charge prototype",
                    ligand_residue,
                    instance.number,
                    instance.atoms.len()
                );
                *slot = Some(ChargePrototype::from_atoms(instance.number, &instance.atoms));
            }
            if prototypes.protonated.is_some() && prototypes.deprotonated.is_some() {
                break;
            }
        }

        prototypes
    }

    /// Prototype of `variant`, if the topology defines one.
    pub fn get(&self, variant: LigandVariant) -> Option<&ChargePrototype> {
        match variant {
            LigandVariant::Protonated => self.protonated.as_ref(),
            LigandVariant::Deprotonated => self.deprotonated.as_ref(),
        }
    }
}

/// Verifies that structure and topology list the same lattice atom names in the same order.
///
/// # Errors
///
/// Returns [`Error::LatticeMismatch`] naming the first diverging position, or the two
/// counts when one sequence is a prefix of the other.
pub fn check_lattice_alignment(
    residue_name: &str,
    structure_atoms: &[&StructureAtom],
    topology_atoms: &[&TopologyAtom],
) -> Result<(), Error> {
    for (position, (s, t)) in structure_atoms.iter().zip(topology_atoms).enumerate() {
        if s.name != t.name {
            return Err(Error::lattice_mismatch(
                residue_name,
                format!(
                    "position {} holds '{}' (atom {}) in the structure but '{}' (nr {}) in the topology",
                    position + 1,
                    s.name,
                    s.id,
                    t.name,
                    t.nr
                ),
            ));
        }
    }

    if structure_atoms.len() != topology_atoms.len() {
        return Err(Error::lattice_mismatch(
            residue_name,
            format!(
                "structure has {} atoms but topology has {}",
                structure_atoms.len(),
                topology_atoms.len()
            ),
        ));
    }

    Ok(())
}

/// Looks up lattice charges by matching each atom id against topology atom numbers.
///
/// The lookup spans the whole topology, not only its lattice rows. A row found under an
/// atom's id must carry the same atom name and the lattice residue name; ids with no row
/// at all yield `None`. Returned values are aligned with `lattice_atoms`.
///
/// # Errors
///
/// Returns [`Error::LatticeMismatch`] when an id points at a topology row describing a
/// different atom.
pub fn lattice_charges(
    residue_name: &str,
    lattice_atoms: &[&StructureAtom],
    topology: &Topology,
) -> Result<Vec<Option<f64>>, Error> {
    let by_nr: HashMap<u32, &TopologyAtom> =
        topology.iter_atoms().map(|atom| (atom.nr, atom)).collect();

    lattice_atoms
        .iter()
        .map(|atom| match by_nr.get(&atom.id) {
            None => Ok(None),
            Some(row) if row.name == atom.name && row.residue_name == residue_name => {
                Ok(Some(row.charge))
            }
            Some(row) => Err(Error::lattice_mismatch(
                residue_name,
                format!(
                    "atom {} '{}' maps to topology nr {} which is '{}' in {}",
                    atom.id, atom.name, row.nr, row.name, row.residue_name
                ),
            )),
        })
        .collect()
}

/// Charges for the members of one ligand instance, by exact atom name.
pub fn ligand_charges(atoms: &[&StructureAtom], prototype: &ChargePrototype) -> Vec<Option<f64>> {
    atoms.iter().map(|atom| prototype.charge(&atom.name)).collect()
}
