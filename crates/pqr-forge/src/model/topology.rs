//! Force-field topology atoms as declared in a molecule's `[ atoms ]` table.
//!
//! Topology rows carry the charge of every atom plus the atom-type alias used to look up
//! radii for lattice atoms. Residue numbers here are local to the topology and only serve
//! to group ligand instances when searching for charge prototypes.

use smol_str::SmolStr;
use std::collections::BTreeMap;

/// One row of the topology atom table.
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyAtom {
    /// Atom number within the molecule (`nr` column).
    pub nr: u32,
    /// Force-field atom type, used as an alias into the radius table.
    pub atom_type: SmolStr,
    /// Residue number local to the topology.
    pub residue_number: i32,
    /// Residue name.
    pub residue_name: SmolStr,
    /// Atom name.
    pub name: SmolStr,
    /// Charge group index.
    pub charge_group: u32,
    /// Partial charge in elementary charge units.
    pub charge: f64,
    /// Atomic mass when the row declares one.
    pub mass: Option<f64>,
}

impl TopologyAtom {
    /// Creates a topology row with charge group equal to the atom number and no mass.
    pub fn new(
        nr: u32,
        atom_type: &str,
        residue_number: i32,
        residue_name: &str,
        name: &str,
        charge: f64,
    ) -> Self {
        Self {
            nr,
            atom_type: SmolStr::new(atom_type),
            residue_number,
            residue_name: SmolStr::new(residue_name),
            name: SmolStr::new(name),
            charge_group: nr,
            charge,
            mass: None,
        }
    }
}

/// Atoms of one topology residue instance, in declaration order.
#[derive(Debug, Clone)]
pub struct TopologyInstance<'a> {
    /// Local residue number shared by every member.
    pub number: i32,
    /// Member rows in declaration order.
    pub atoms: Vec<&'a TopologyAtom>,
}

/// Parsed topology: molecule name plus the concatenated atom tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    /// Name from the `[ moleculetype ]` directive, when present.
    pub molecule_name: Option<String>,
    atoms: Vec<TopologyAtom>,
}

impl Topology {
    /// Creates an empty topology with no molecule name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row, preserving declaration order.
    pub fn add_atom(&mut self, atom: TopologyAtom) {
        self.atoms.push(atom);
    }

    /// All rows in declaration order.
    pub fn atoms(&self) -> &[TopologyAtom] {
        &self.atoms
    }

    /// Number of rows read.
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Iterates all rows in declaration order.
    pub fn iter_atoms(&self) -> std::slice::Iter<'_, TopologyAtom> {
        self.atoms.iter()
    }

    /// Iterates the declaration-order subsequence of rows with the given residue name.
    pub fn residue_atoms<'a, 'b>(
        &'a self,
        residue_name: &'b str,
    ) -> impl Iterator<Item = &'a TopologyAtom> + use<'a, 'b> {
        self.atoms
            .iter()
            .filter(move |atom| atom.residue_name == residue_name)
    }

    /// Groups rows of one residue name by local residue number, ascending.
    pub fn residue_instances(&self, residue_name: &str) -> Vec<TopologyInstance<'_>> {
        let mut grouped: BTreeMap<i32, Vec<&TopologyAtom>> = BTreeMap::new();
        for atom in self.residue_atoms(residue_name) {
            grouped.entry(atom.residue_number).or_default().push(atom);
        }

        grouped
            .into_iter()
            .map(|(number, atoms)| TopologyInstance { number, atoms })
            .collect()
    }
}

impl FromIterator<TopologyAtom> for Topology {
    fn from_iter<I: IntoIterator<Item = TopologyAtom>>(iter: I) -> Self {
        Self {
            molecule_name: None,
            atoms: iter.into_iter().collect(),
        }
    }
}
