//! Ordered table of structure atoms with residue-instance grouping helpers.
//!
//! The structure keeps atoms in file order. Resolution relies on two views of it: the
//! file-order subsequence of one residue name (lattice atoms) and the per-instance grouping
//! of one residue name (ligand atoms), ordered by residue number.

use super::atom::StructureAtom;
use std::collections::BTreeMap;

/// Atoms belonging to one residue instance, in file order.
#[derive(Debug, Clone)]
pub struct ResidueInstance<'a> {
    /// Residue instance number shared by every member.
    pub number: i32,
    /// Member atoms in the order they appeared in the file.
    pub atoms: Vec<&'a StructureAtom>,
}

impl ResidueInstance<'_> {
    /// Number of member atoms.
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// Whether the instance has no atoms.
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

/// Whole-file atom table produced by the structure reader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    atoms: Vec<StructureAtom>,
}

impl Structure {
    /// Creates an empty structure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an atom, preserving file order.
    pub fn add_atom(&mut self, atom: StructureAtom) {
        self.atoms.push(atom);
    }

    /// All atoms in file order.
    pub fn atoms(&self) -> &[StructureAtom] {
        &self.atoms
    }

    /// Number of atoms read.
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Whether no atom was read.
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Iterates all atoms in file order.
    pub fn iter_atoms(&self) -> std::slice::Iter<'_, StructureAtom> {
        self.atoms.iter()
    }

    /// Iterates the file-order subsequence of atoms with the given residue name.
    pub fn residue_atoms<'a, 'b>(
        &'a self,
        residue_name: &'b str,
    ) -> impl Iterator<Item = &'a StructureAtom> + use<'a, 'b> {
        self.atoms
            .iter()
            .filter(move |atom| atom.residue_name == residue_name)
    }

    /// Groups atoms of one residue name into instances keyed by residue number.
    ///
    /// Instances are returned in ascending residue number; members keep file order.
    pub fn residue_instances(&self, residue_name: &str) -> Vec<ResidueInstance<'_>> {
        let mut grouped: BTreeMap<i32, Vec<&StructureAtom>> = BTreeMap::new();
        for atom in self.residue_atoms(residue_name) {
            grouped.entry(atom.residue_number).or_default().push(atom);
        }

        grouped
            .into_iter()
            .map(|(number, atoms)| ResidueInstance { number, atoms })
            .collect()
    }
}

impl FromIterator<StructureAtom> for Structure {
    fn from_iter<I: IntoIterator<Item = StructureAtom>>(iter: I) -> Self {
        Self {
            atoms: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::Point;

    fn atom(id: u32, name: &str, res: &str, num: i32) -> StructureAtom {
        StructureAtom::new(id, name, res, num, Point::origin())
    }

    fn sample() -> Structure {
        [
            atom(1, "SI1", "COR", 1),
            atom(2, "N", "APT", 7),
            atom(3, "O1", "COR", 1),
            atom(4, "CA", "APT", 2),
            atom(5, "HN", "APT", 7),
            atom(6, "CB", "APT", 2),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn residue_atoms_keeps_file_order() {
        let structure = sample();
        let ids: Vec<u32> = structure.residue_atoms("COR").map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn residue_instances_sorted_by_number_with_file_order_members() {
        let structure = sample();
        let instances = structure.residue_instances("APT");

        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].number, 2);
        assert_eq!(
            instances[0].atoms.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![4, 6]
        );
        assert_eq!(instances[1].number, 7);
        assert_eq!(instances[1].len(), 2);
    }

    #[test]
    fn residue_views_outlive_the_residue_name() {
        let structure = sample();
        let instances = {
            let name = String::from("APT");
            structure.residue_instances(&name)
        };
        let lattice: Vec<&StructureAtom> = {
            let name = String::from("COR");
            structure.residue_atoms(&name).collect()
        };

        assert_eq!(instances.len(), 2);
        assert_eq!(lattice.len(), 2);
    }

    #[test]
    fn residue_instances_empty_for_unknown_name() {
        let structure = sample();
        assert!(structure.residue_instances("SOL").is_empty());
    }

    #[test]
    fn add_atom_tracks_count() {
        let mut structure = Structure::new();
        assert!(structure.is_empty());
        structure.add_atom(atom(1, "SI1", "COR", 1));
        assert_eq!(structure.atom_count(), 1);
    }
}
